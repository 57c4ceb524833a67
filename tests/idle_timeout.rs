use abyss_records::inmemory::InMemoryRecordStore;
use abyss_records::model::{Character, Floor, OwnerId, Season, SeasonRecord, SpiralAbyss};
use abyss_records::navigation::collab::{
    FetchClient, Profile, RenderedSummary, Renderer, ResponseHandle, Transport,
};
use abyss_records::navigation::reply::{ControlId, Notice, Reply};
use abyss_records::navigation::{Interaction, Navigator};
use abyss_records::store::RecordStore;
use abyss_records::{RecordsConfig, UpstreamError};
use std::future::Future;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use time::macros::datetime;

struct Unreachable;

impl FetchClient for Unreachable {
    fn fetch_season_record(
        &self,
        _owner: OwnerId,
        _previous_period: bool,
    ) -> impl Future<Output = Result<SeasonRecord, UpstreamError>> + Send {
        async { Err(UpstreamError::new("offline")) }
    }
}

impl Transport for Unreachable {
    fn defer(
        &self,
        _handle: &ResponseHandle,
    ) -> impl Future<Output = Result<(), UpstreamError>> + Send {
        async { Ok(()) }
    }
}

struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render_season_summary(&self, record: &SeasonRecord) -> RenderedSummary {
        RenderedSummary {
            title: String::new(),
            body: record.season.to_string(),
        }
    }

    fn render_floor_card(
        &self,
        _floor: &Floor,
        _roster: &[Character],
    ) -> Result<Vec<u8>, UpstreamError> {
        Ok(Vec::new())
    }
}

fn saved(owner: OwnerId, season: u32) -> SeasonRecord {
    SeasonRecord {
        owner_id: owner,
        season: Season(season),
        abyss: SpiralAbyss {
            season: Season(season),
            start_time: datetime!(2023-12-16 04:00 UTC),
            end_time: datetime!(2024-01-15 03:59 UTC),
            total_battles: 16,
            total_wins: 12,
            max_floor: "12-3".into(),
            total_stars: 34,
            floors: vec![],
        },
        characters: vec![],
    }
}

fn navigator(idle: Duration) -> (Navigator<Unreachable, PlainRenderer, Unreachable>, Arc<InMemoryRecordStore>) {
    let store = Arc::new(InMemoryRecordStore::new());
    store.add_season(&saved(OwnerId(1), 78)).expect("add");
    let nav = Navigator::new(store.clone(), Unreachable, PlainRenderer, Unreachable, idle);
    (nav, store)
}

#[test]
fn interaction_after_idle_window_is_rejected() {
    let (nav, store) = navigator(Duration::from_millis(60));
    let handle = ResponseHandle::new();
    nav.open_history(handle.clone(), OwnerId(1), Profile::new(OwnerId(1), "Lumine"));

    sleep(Duration::from_millis(120));

    let reply = nav.handle(&Interaction::new(
        &handle,
        OwnerId(1),
        ControlId::SeasonPicker,
        "0",
    ));
    assert_eq!(reply, Reply::Ephemeral(Notice::SessionExpired));
    assert_eq!(nav.active_sessions(), 0);

    let delete = nav.handle(&Interaction::new(
        &handle,
        OwnerId(1),
        ControlId::FloorPicker,
        "REMOVE",
    ));
    assert_eq!(delete, Reply::Ephemeral(Notice::SessionExpired));
    assert_eq!(store.list_seasons(OwnerId(1)).expect("list").len(), 1);
}

#[test]
fn interactions_keep_a_session_alive() {
    let (nav, _store) = navigator(Duration::from_millis(150));
    let handle = ResponseHandle::new();
    nav.open_history(handle.clone(), OwnerId(1), Profile::new(OwnerId(1), "Lumine"));

    for _ in 0..4 {
        sleep(Duration::from_millis(60));
        let reply = nav.handle(&Interaction::new(
            &handle,
            OwnerId(1),
            ControlId::SeasonPicker,
            "0",
        ));
        assert!(matches!(reply, Reply::Edit(_)), "unexpected reply {reply:?}");
    }

    sleep(Duration::from_millis(200));
    assert_eq!(
        nav.handle(&Interaction::new(
            &handle,
            OwnerId(1),
            ControlId::SeasonPicker,
            "0"
        )),
        Reply::Ephemeral(Notice::SessionExpired)
    );
}

#[test]
fn unknown_handle_fails_gracefully() {
    let (nav, _store) = navigator(Duration::from_secs(5));
    let reply = nav.handle(&Interaction::new(
        &ResponseHandle::new(),
        OwnerId(1),
        ControlId::FloorPicker,
        "SAVE",
    ));
    assert_eq!(reply, Reply::Ephemeral(Notice::SessionExpired));
}

#[test]
fn navigator_built_from_config() {
    let config =
        RecordsConfig::from_json(r#"{"compression_level":9,"idle_timeout_secs":120}"#)
            .expect("config");
    let nav = Navigator::from_config(&config, Unreachable, PlainRenderer, Unreachable)
        .expect("navigator");
    nav.store().add_season(&saved(OwnerId(5), 70)).expect("add");
    let reply = nav.open_history(ResponseHandle::new(), OwnerId(5), Profile::new(OwnerId(5), "Aether"));
    assert!(matches!(reply, Reply::Send(_)));
}
