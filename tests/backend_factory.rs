use abyss_records::model::{OwnerId, Season};
use abyss_records::{create_record_store, BackendConfig, Codec, RecordsConfig};
use serde_json::json;

#[test]
fn factory_returns_inmemory_store() {
    let store = create_record_store(&BackendConfig::InMemory, Codec::default())
        .expect("factory should build in-memory store");
    store.initialize().expect("initialize");

    store
        .put_showcase(OwnerId(11), Season(3), &json!({ "stars": 27 }))
        .expect("put succeeds");
    let fetched = store
        .get_showcase(OwnerId(11))
        .expect("get succeeds")
        .expect("entry exists");
    assert_eq!(fetched.payload["stars"], 27);
}

#[test]
fn config_builds_initialized_store() {
    let store = RecordsConfig::default()
        .build_store()
        .expect("default config builds");
    store.initialize().expect("initialize twice");
    assert!(store.list_seasons(OwnerId(1)).expect("list").is_empty());
}

#[test]
fn invalid_config_builds_nothing() {
    let config = RecordsConfig {
        compression_level: 11,
        ..RecordsConfig::default()
    };
    assert!(config.build_store().is_err());
}
