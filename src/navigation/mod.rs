//! Interactive browsing of live and saved Spiral Abyss records.
//!
//! A [`Navigator`] answers two entry points: a live fetch ([`Navigator::open_live`]) that shows a
//! freshly fetched season and offers to save it, and a history browse
//! ([`Navigator::open_history`]) that lists saved seasons and offers to delete them. Follow-up
//! selections arrive as [`Interaction`]s and are dispatched through the session's controls.
//! Sessions expire after the configured idle window.

pub mod collab;
pub mod control;
pub mod reply;
pub mod session;

use crate::config::RecordsConfig;
use crate::error::{RecordError, RecordResult};
use crate::model::{OwnerId, Period, SeasonRecord};
use crate::store::RecordStore;
use crate::summary::SeasonSummary;
use collab::{FetchClient, Profile, Renderer, ResponseHandle, Transport};
use control::{FloorPicker, RecordAction, SeasonPicker, SelectControl, Transition};
use reply::{ControlId, ControlView, Notice, OptionView, Reply, View};
use session::{NavigationSession, Origin, SessionMap, SessionState};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// A selection made on one of a session's controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interaction {
    pub handle: ResponseHandle,
    pub requester: OwnerId,
    pub control: ControlId,
    pub value: String,
}

impl Interaction {
    pub fn new(
        handle: &ResponseHandle,
        requester: OwnerId,
        control: ControlId,
        value: impl Into<String>,
    ) -> Self {
        Self {
            handle: handle.clone(),
            requester,
            control,
            value: value.into(),
        }
    }
}

type Step = (Reply, bool);

pub struct Navigator<F, R, T> {
    store: Arc<dyn RecordStore>,
    fetcher: F,
    renderer: R,
    transport: T,
    sessions: SessionMap,
}

impl<F, R, T> Navigator<F, R, T>
where
    F: FetchClient,
    R: Renderer,
    T: Transport,
{
    pub fn new(
        store: Arc<dyn RecordStore>,
        fetcher: F,
        renderer: R,
        transport: T,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            store,
            fetcher,
            renderer,
            transport,
            sessions: SessionMap::new(idle_timeout),
        }
    }

    /// Builds and initializes the configured store, then wires the collaborators around it.
    pub fn from_config(
        config: &RecordsConfig,
        fetcher: F,
        renderer: R,
        transport: T,
    ) -> RecordResult<Self> {
        let store = config.build_store()?;
        Ok(Self::new(
            store,
            fetcher,
            renderer,
            transport,
            config.idle_timeout(),
        ))
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Fetches the current or previous season for `target` and shows it with a save action.
    ///
    /// The acknowledgement and the fetch run concurrently; a failure of either replaces the
    /// record with an error and opens no session.
    pub async fn open_live(
        &self,
        handle: ResponseHandle,
        requester: OwnerId,
        target: Profile,
        period: Period,
    ) -> Reply {
        let (ack, fetched) = tokio::join!(
            self.transport.defer(&handle),
            self.fetcher
                .fetch_season_record(target.id, period.is_previous()),
        );
        if let Err(err) = ack {
            warn!(%handle, error = %err, "deferred acknowledgement failed");
            return Reply::Edit(View::failed(err.to_string()));
        }
        let record = match fetched {
            Ok(record) => record,
            Err(err) => {
                warn!(%handle, owner = %target.id, ?period, error = %err, "season fetch failed");
                return Reply::Edit(View::failed(err.to_string()));
            }
        };
        if requester == target.id {
            self.refresh_showcase(&record);
        }

        let view = self.detail_view(&target, RecordAction::Save, None, &record, None);
        info!(%handle, %requester, owner = %target.id, season = %record.season, "live session opened");
        self.sessions.insert(NavigationSession::new(
            handle,
            requester,
            target,
            Origin::Live(Box::new(record)),
            SessionState::SeasonDetail { season: 0 },
        ));
        Reply::Edit(view)
    }

    /// Lists the saved seasons of `target`.
    pub fn open_history(
        &self,
        handle: ResponseHandle,
        requester: OwnerId,
        target: Profile,
    ) -> Reply {
        let records = match self.store.list_seasons(target.id) {
            Ok(records) => records,
            Err(err) => return self.failure(err),
        };
        if records.is_empty() {
            debug!(owner = %target.id, "no saved history");
            return Reply::Notice(Notice::NoHistory);
        }

        let options: Vec<OptionView> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let summary = SeasonSummary::of(record);
                OptionView {
                    label: summary.option_label(),
                    description: summary.date_range(),
                    value: i.to_string(),
                }
            })
            .collect();
        let view = View {
            controls: vec![season_control(&options)],
            ..View::default()
        };
        info!(%handle, %requester, owner = %target.id, seasons = records.len(), "history session opened");
        self.sessions.insert(NavigationSession::new(
            handle,
            requester,
            target,
            Origin::History {
                seasons: records.iter().map(|record| record.season).collect(),
                options,
            },
            SessionState::SeasonList,
        ));
        Reply::Send(view)
    }

    /// Applies a selection to the session it belongs to.
    pub fn handle(&self, interaction: &Interaction) -> Reply {
        let Some(shared) = self.sessions.checkout(&interaction.handle) else {
            warn!(handle = %interaction.handle, requester = %interaction.requester, "interaction on expired session");
            return Reply::Ephemeral(Notice::SessionExpired);
        };
        let mut session = shared.lock();
        let (reply, finished) = match self.dispatch(&mut session, interaction) {
            Ok(step) => step,
            Err(err) => (self.failure(err), false),
        };
        drop(session);
        if finished {
            self.sessions.remove(&interaction.handle);
            info!(handle = %interaction.handle, "session finished");
        }
        reply
    }

    fn dispatch(
        &self,
        session: &mut NavigationSession,
        interaction: &Interaction,
    ) -> RecordResult<Step> {
        let (transition, record) = match interaction.control {
            ControlId::SeasonPicker => {
                let transition = match &session.origin {
                    Origin::History { seasons, .. } => SeasonPicker {
                        seasons: seasons.len(),
                    }
                    .on_select(&interaction.value),
                    Origin::Live(_) => None,
                };
                (transition, None)
            }
            ControlId::FloorPicker => {
                let Some(index) = session.state.season() else {
                    return Ok((Reply::Ephemeral(Notice::InvalidSelection), false));
                };
                let Some(record) = self.load_record(session, index)? else {
                    return Ok((Reply::Ephemeral(Notice::RecordMissing), false));
                };
                let transition = FloorPicker::for_record(session.action(), &record)
                    .on_select(&interaction.value);
                (transition, Some(record))
            }
        };

        debug!(handle = %session.handle, ?transition, "selection");
        match (transition, record) {
            (Some(Transition::OpenSeason(index)), _) => self.open_season(session, index),
            (Some(Transition::OpenFloor(index)), Some(record)) => {
                Ok(self.open_floor(session, record, index))
            }
            (Some(Transition::Apply(action)), Some(record)) => {
                self.apply(interaction.requester, &record, action)
            }
            _ => Ok((Reply::Ephemeral(Notice::InvalidSelection), false)),
        }
    }

    fn open_season(&self, session: &mut NavigationSession, index: usize) -> RecordResult<Step> {
        let Some(record) = self.load_record(session, index)? else {
            return Ok((Reply::Ephemeral(Notice::RecordMissing), false));
        };
        session.state = SessionState::SeasonDetail { season: index };
        let view = self.session_view(session, &record, None);
        Ok((Reply::Edit(view), false))
    }

    fn open_floor(&self, session: &mut NavigationSession, record: SeasonRecord, index: usize) -> Step {
        let Some(floor) = record.floor(index) else {
            return (Reply::Ephemeral(Notice::InvalidSelection), false);
        };
        let image = match self.renderer.render_floor_card(floor, &record.characters) {
            Ok(image) => image,
            Err(err) => {
                error!(handle = %session.handle, floor = floor.floor, error = %err, "floor card rendering failed");
                return (Reply::Ephemeral(Notice::Failed(err.to_string())), false);
            }
        };
        if let Some(season) = session.state.season() {
            session.state = SessionState::FloorDetail {
                season,
                floor: index,
            };
        }
        let view = self.session_view(session, &record, Some(image));
        (Reply::Edit(view), false)
    }

    fn apply(
        &self,
        requester: OwnerId,
        record: &SeasonRecord,
        action: RecordAction,
    ) -> RecordResult<Step> {
        if !record.is_owned_by(requester) {
            warn!(%requester, owner = %record.owner_id, ?action, "permission denied");
            return Ok((Reply::Ephemeral(Notice::PermissionDenied), false));
        }
        match action {
            RecordAction::Save => {
                self.store.add_season(record)?;
                info!(owner = %record.owner_id, season = %record.season, "season saved");
                Ok((Reply::Ephemeral(Notice::Saved), true))
            }
            RecordAction::Remove => {
                self.store.remove_season(record.owner_id, record.season)?;
                info!(owner = %record.owner_id, season = %record.season, "season deleted");
                Ok((Reply::Ephemeral(Notice::Deleted), false))
            }
        }
    }

    fn load_record(
        &self,
        session: &NavigationSession,
        index: usize,
    ) -> RecordResult<Option<SeasonRecord>> {
        match &session.origin {
            Origin::Live(record) => Ok((index == 0).then(|| SeasonRecord::clone(record))),
            Origin::History { .. } => match session.season_at(index) {
                Some(season) => self.store.get_season(session.target.id, season),
                None => Ok(None),
            },
        }
    }

    fn refresh_showcase(&self, record: &SeasonRecord) {
        let payload = match serde_json::to_value(record) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(owner = %record.owner_id, error = %err, "showcase payload not encodable");
                return;
            }
        };
        if let Err(err) = self
            .store
            .put_showcase(record.owner_id, record.season, &payload)
        {
            warn!(owner = %record.owner_id, error = %err, "showcase refresh failed");
        }
    }

    fn session_view(
        &self,
        session: &NavigationSession,
        record: &SeasonRecord,
        image: Option<Vec<u8>>,
    ) -> View {
        let options = match &session.origin {
            Origin::History { options, .. } => Some(options.as_slice()),
            Origin::Live(_) => None,
        };
        self.detail_view(&session.target, session.action(), options, record, image)
    }

    fn detail_view(
        &self,
        target: &Profile,
        action: RecordAction,
        season_options: Option<&[OptionView]>,
        record: &SeasonRecord,
        image: Option<Vec<u8>>,
    ) -> View {
        let mut summary = self.renderer.render_season_summary(record);
        summary.title = format!("{}'s Spiral Abyss record", target.display_name);
        let mut controls = vec![FloorPicker::for_record(action, record).view(record)];
        if let Some(options) = season_options {
            controls.push(season_control(options));
        }
        View {
            summary: Some(summary),
            error: None,
            image,
            controls,
        }
    }

    fn failure(&self, err: RecordError) -> Reply {
        error!(error = %err, integrity = err.is_integrity(), "record store failure");
        Reply::Ephemeral(Notice::Failed(err.to_string()))
    }
}

fn season_control(options: &[OptionView]) -> ControlView {
    ControlView {
        id: ControlId::SeasonPicker,
        placeholder: "Select a season".into(),
        options: options.to_vec(),
    }
}
