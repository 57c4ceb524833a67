use crate::codec::{Codec, SCHEMA_VERSION};
use crate::error::{RecordError, RecordResult};
use crate::model::{OwnerId, Season, SeasonRecord, ShowcaseEntry};
use crate::store::{ensure_consistent, history_key, showcase_key, RecordStore};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::debug;

/// In-memory implementation backed by concurrent hash maps.
///
/// Payloads are held compressed exactly as a durable backend would store them, so the codec and
/// its integrity checks are exercised on every read.
pub struct InMemoryRecordStore {
    codec: Codec,
    showcase: DashMap<OwnerId, Vec<u8>>,
    history: DashMap<OwnerId, BTreeMap<Season, Vec<u8>>>,
    schema: Mutex<Option<u32>>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::with_codec(Codec::default())
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(codec: Codec) -> Self {
        Self {
            codec,
            showcase: DashMap::new(),
            history: DashMap::new(),
            schema: Mutex::new(None),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn initialize(&self) -> RecordResult<()> {
        let mut schema = self.schema.lock();
        match *schema {
            Some(found) if found != SCHEMA_VERSION => Err(RecordError::UnsupportedSchema {
                found,
                expected: SCHEMA_VERSION,
            }),
            _ => {
                *schema = Some(SCHEMA_VERSION);
                Ok(())
            }
        }
    }

    fn put_showcase(
        &self,
        owner: OwnerId,
        season: Season,
        payload: &serde_json::Value,
    ) -> RecordResult<()> {
        let entry = ShowcaseEntry {
            owner_id: owner,
            season,
            payload: payload.clone(),
        };
        let blob = self.codec.encode(&entry)?;
        debug!(%owner, %season, bytes = blob.len(), "showcase stored");
        self.showcase.insert(owner, blob);
        Ok(())
    }

    fn get_showcase(&self, owner: OwnerId) -> RecordResult<Option<ShowcaseEntry>> {
        match self.showcase.get(&owner) {
            Some(blob) => self.codec.decode(&showcase_key(owner), &blob).map(Some),
            None => Ok(None),
        }
    }

    fn remove_showcase(&self, owner: OwnerId) -> RecordResult<()> {
        self.showcase.remove(&owner);
        Ok(())
    }

    fn add_season(&self, record: &SeasonRecord) -> RecordResult<()> {
        ensure_consistent(record)?;
        let blob = self.codec.encode(record)?;
        debug!(owner = %record.owner_id, season = %record.season, bytes = blob.len(), "season stored");
        self.history
            .entry(record.owner_id)
            .or_default()
            .insert(record.season, blob);
        Ok(())
    }

    fn get_season(&self, owner: OwnerId, season: Season) -> RecordResult<Option<SeasonRecord>> {
        let Some(seasons) = self.history.get(&owner) else {
            return Ok(None);
        };
        match seasons.get(&season) {
            Some(blob) => self
                .codec
                .decode(&history_key(owner, season), blob)
                .map(Some),
            None => Ok(None),
        }
    }

    fn list_seasons(&self, owner: OwnerId) -> RecordResult<Vec<SeasonRecord>> {
        let Some(seasons) = self.history.get(&owner) else {
            return Ok(Vec::new());
        };
        seasons
            .iter()
            .map(|(season, blob)| self.codec.decode(&history_key(owner, *season), blob))
            .collect()
    }

    fn remove_season(&self, owner: OwnerId, season: Season) -> RecordResult<bool> {
        let removed = match self.history.get_mut(&owner) {
            Some(mut seasons) => seasons.remove(&season).is_some(),
            None => false,
        };
        self.history.remove_if(&owner, |_, seasons| seasons.is_empty());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn corrupted_history_row_is_surfaced() {
        let store = InMemoryRecordStore::new();
        store
            .history
            .entry(OwnerId(7))
            .or_default()
            .insert(Season(3), b"\x78\x9c broken".to_vec());

        let err = store
            .get_season(OwnerId(7), Season(3))
            .expect_err("corruption must not read as absent");
        assert!(err.is_integrity());
        assert!(store.list_seasons(OwnerId(7)).is_err());
    }

    #[test]
    fn corrupted_showcase_is_surfaced() {
        let store = InMemoryRecordStore::new();
        store.showcase.insert(OwnerId(1), vec![0, 1, 2, 3]);
        assert!(store
            .get_showcase(OwnerId(1))
            .expect_err("corrupt")
            .is_integrity());
    }

    #[test]
    fn payload_is_held_compressed() {
        let store = InMemoryRecordStore::new();
        let payload = json!({ "note": "a".repeat(4096) });
        store
            .put_showcase(OwnerId(1), Season(1), &payload)
            .expect("put");
        let stored = store.showcase.get(&OwnerId(1)).expect("row").len();
        assert!(stored < 4096);
    }

    #[test]
    fn initialize_is_idempotent() {
        let store = InMemoryRecordStore::new();
        store.initialize().expect("first");
        store.initialize().expect("second");
        *store.schema.lock() = Some(SCHEMA_VERSION + 1);
        assert!(store.initialize().is_err());
    }

    #[test]
    fn removing_last_season_drops_owner_bucket() {
        let store = InMemoryRecordStore::new();
        store
            .history
            .entry(OwnerId(9))
            .or_default()
            .insert(Season(1), Vec::new());
        assert!(store.remove_season(OwnerId(9), Season(1)).expect("remove"));
        assert!(!store.history.contains_key(&OwnerId(9)));
        assert!(!store.remove_season(OwnerId(9), Season(1)).expect("again"));
    }
}
