//! Interfaces to the collaborators the navigator drives but does not own.

use crate::error::UpstreamError;
use crate::model::{Character, Floor, OwnerId, SeasonRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use uuid::Uuid;

/// Identifies the original response a navigation session is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseHandle(pub Uuid);

impl ResponseHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResponseHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResponseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The player whose records are being viewed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: OwnerId,
    pub display_name: String,
}

impl Profile {
    pub fn new(id: OwnerId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Season overview as produced by the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSummary {
    pub title: String,
    pub body: String,
}

/// Client for the third-party statistics API.
pub trait FetchClient: Send + Sync + 'static {
    fn fetch_season_record(
        &self,
        owner: OwnerId,
        previous_period: bool,
    ) -> impl Future<Output = Result<SeasonRecord, UpstreamError>> + Send;
}

/// Stateless presentation of records.
pub trait Renderer: Send + Sync + 'static {
    fn render_season_summary(&self, record: &SeasonRecord) -> RenderedSummary;

    /// Draws one floor's chambers; returns encoded image bytes.
    fn render_floor_card(
        &self,
        floor: &Floor,
        roster: &[Character],
    ) -> Result<Vec<u8>, UpstreamError>;
}

/// Chat transport that owns the response a session edits.
pub trait Transport: Send + Sync + 'static {
    /// Acknowledges the request so the response can be filled in later.
    fn defer(
        &self,
        handle: &ResponseHandle,
    ) -> impl Future<Output = Result<(), UpstreamError>> + Send;
}
