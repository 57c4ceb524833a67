use crate::error::{RecordError, RecordResult};
use crate::model::{OwnerId, Season, SeasonRecord, ShowcaseEntry};

/// Persistent storage for Spiral Abyss records.
///
/// Two independent indices share one codec: the per-owner `showcase` slot holding the latest
/// cached payload, and the `history` index keyed by `(owner, season)`. Implementations compress
/// every payload before it leaves the process and decompress on read; callers only ever see
/// decoded values. Every write is a single atomic backend operation and the last write wins.
pub trait RecordStore: Send + Sync + 'static {
    /// Ensures the backing namespace exists. Safe to call on every startup.
    fn initialize(&self) -> RecordResult<()>;

    /// Replaces the showcase slot for `owner`, regardless of which season it held before.
    fn put_showcase(
        &self,
        owner: OwnerId,
        season: Season,
        payload: &serde_json::Value,
    ) -> RecordResult<()>;

    /// Reads the showcase slot, `None` when the owner has nothing cached.
    fn get_showcase(&self, owner: OwnerId) -> RecordResult<Option<ShowcaseEntry>>;

    /// Clears the showcase slot. Absent slots are not an error.
    fn remove_showcase(&self, owner: OwnerId) -> RecordResult<()>;

    /// Inserts or replaces the `(owner, season)` history row.
    ///
    /// Fails with [`RecordError::SeasonMismatch`] when `record.season` differs from the
    /// snapshot's own season.
    fn add_season(&self, record: &SeasonRecord) -> RecordResult<()>;

    fn get_season(&self, owner: OwnerId, season: Season) -> RecordResult<Option<SeasonRecord>>;

    /// All saved seasons for `owner`, oldest first. Empty when nothing is saved.
    fn list_seasons(&self, owner: OwnerId) -> RecordResult<Vec<SeasonRecord>>;

    /// Deletes one history row; returns whether it existed.
    fn remove_season(&self, owner: OwnerId, season: Season) -> RecordResult<bool>;
}

pub(crate) fn showcase_key(owner: OwnerId) -> String {
    format!("showcase:{owner}")
}

pub(crate) fn history_key(owner: OwnerId, season: Season) -> String {
    format!("history:{owner}:{season}")
}

/// Rejects records whose key season and snapshot season disagree.
pub(crate) fn ensure_consistent(record: &SeasonRecord) -> RecordResult<()> {
    if record.season != record.abyss.season {
        return Err(RecordError::SeasonMismatch {
            record: record.season.value(),
            snapshot: record.abyss.season.value(),
        });
    }
    Ok(())
}
