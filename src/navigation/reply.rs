use super::collab::RenderedSummary;
use serde::{Deserialize, Serialize};

/// Which selection control an interaction came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    SeasonPicker,
    FloorPicker,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub label: String,
    pub description: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlView {
    pub id: ControlId,
    pub placeholder: String,
    pub options: Vec<OptionView>,
}

/// Content of the session's public response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub summary: Option<RenderedSummary>,
    pub error: Option<String>,
    pub image: Option<Vec<u8>>,
    pub controls: Vec<ControlView>,
}

impl View {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn control(&self, id: ControlId) -> Option<&ControlView> {
        self.controls.iter().find(|control| control.id == id)
    }
}

/// Short status messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    Saved,
    Deleted,
    PermissionDenied,
    NoHistory,
    SessionExpired,
    RecordMissing,
    InvalidSelection,
    Failed(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Saved => "Saved this Spiral Abyss record".into(),
            Notice::Deleted => "Deleted this Spiral Abyss record".into(),
            Notice::PermissionDenied => "Only the record's owner can do that".into(),
            Notice::NoHistory => "This user has no saved history".into(),
            Notice::SessionExpired => "This menu has expired, run the command again".into(),
            Notice::RecordMissing => "This record no longer exists".into(),
            Notice::InvalidSelection => "That option is not available".into(),
            Notice::Failed(reason) => format!("Something went wrong: {reason}"),
        }
    }
}

/// What the transport should do in response to a request or interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Send a new public response.
    Send(View),
    /// Edit the original response in place.
    Edit(View),
    /// Public plain message.
    Notice(Notice),
    /// Requester-only message.
    Ephemeral(Notice),
}

impl Reply {
    pub fn view(&self) -> Option<&View> {
        match self {
            Reply::Send(view) | Reply::Edit(view) => Some(view),
            Reply::Notice(_) | Reply::Ephemeral(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Reply::Notice(notice) | Reply::Ephemeral(notice) => Some(notice),
            Reply::Send(_) | Reply::Edit(_) => None,
        }
    }
}
