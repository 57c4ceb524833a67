use crate::codec::{Codec, SCHEMA_VERSION};
use crate::error::{redis_error, RecordError, RecordResult};
use crate::model::{OwnerId, Season, SeasonRecord, ShowcaseEntry};
use crate::store::{ensure_consistent, history_key, showcase_key, RecordStore};
use redis::{Client, Commands, Connection};
use std::collections::BTreeMap;
use tracing::{debug, info};

const DEFAULT_NAMESPACE: &str = "abyss:records";

/// Redis-backed record store that mirrors the in-memory semantics.
///
/// Layout under the namespace prefix:
/// - `{ns}:schema` holds the envelope version, written once by [`RecordStore::initialize`].
/// - `{ns}:showcase:{owner}` is a string holding the compressed showcase slot.
/// - `{ns}:history:{owner}` is a hash whose fields are season numbers.
///
/// Each operation is a single Redis command, so writes are atomic per call.
pub struct RedisRecordStore {
    client: Client,
    namespace: String,
    codec: Codec,
}

impl RedisRecordStore {
    /// Creates a store using a Redis URL and the default namespace prefix.
    pub fn from_url(url: impl AsRef<str>, codec: Codec) -> RecordResult<Self> {
        Self::from_url_with_namespace(url, DEFAULT_NAMESPACE, codec)
    }

    /// Creates a store using a Redis URL and a custom namespace prefix.
    pub fn from_url_with_namespace(
        url: impl AsRef<str>,
        namespace: impl Into<String>,
        codec: Codec,
    ) -> RecordResult<Self> {
        let client = Client::open(url.as_ref()).map_err(redis_error)?;
        Ok(Self {
            client,
            namespace: namespace.into(),
            codec,
        })
    }

    fn conn(&self) -> RecordResult<Connection> {
        self.client.get_connection().map_err(redis_error)
    }

    fn schema_key(&self) -> String {
        format!("{}:schema", self.namespace)
    }

    fn showcase_entry_key(&self, owner: OwnerId) -> String {
        format!("{}:{}", self.namespace, showcase_key(owner))
    }

    fn history_hash_key(&self, owner: OwnerId) -> String {
        format!("{}:history:{}", self.namespace, owner)
    }
}

impl RecordStore for RedisRecordStore {
    fn initialize(&self) -> RecordResult<()> {
        let mut conn = self.conn()?;
        let key = self.schema_key();
        let created: bool = conn.set_nx(&key, SCHEMA_VERSION).map_err(redis_error)?;
        if created {
            info!(namespace = %self.namespace, schema = SCHEMA_VERSION, "record namespace created");
            return Ok(());
        }
        let found: Option<u32> = conn.get(&key).map_err(redis_error)?;
        match found {
            Some(found) if found != SCHEMA_VERSION => Err(RecordError::UnsupportedSchema {
                found,
                expected: SCHEMA_VERSION,
            }),
            _ => Ok(()),
        }
    }

    fn put_showcase(
        &self,
        owner: OwnerId,
        season: Season,
        payload: &serde_json::Value,
    ) -> RecordResult<()> {
        let blob = self.codec.encode(&ShowcaseEntry {
            owner_id: owner,
            season,
            payload: payload.clone(),
        })?;
        let mut conn = self.conn()?;
        conn.set::<_, _, ()>(self.showcase_entry_key(owner), blob)
            .map_err(redis_error)?;
        debug!(%owner, %season, "showcase stored");
        Ok(())
    }

    fn get_showcase(&self, owner: OwnerId) -> RecordResult<Option<ShowcaseEntry>> {
        let mut conn = self.conn()?;
        let blob: Option<Vec<u8>> = conn
            .get(self.showcase_entry_key(owner))
            .map_err(redis_error)?;
        blob.map(|blob| self.codec.decode(&showcase_key(owner), &blob))
            .transpose()
    }

    fn remove_showcase(&self, owner: OwnerId) -> RecordResult<()> {
        let mut conn = self.conn()?;
        conn.del::<_, ()>(self.showcase_entry_key(owner))
            .map_err(redis_error)?;
        Ok(())
    }

    fn add_season(&self, record: &SeasonRecord) -> RecordResult<()> {
        ensure_consistent(record)?;
        let blob = self.codec.encode(record)?;
        let mut conn = self.conn()?;
        conn.hset::<_, _, _, ()>(
            self.history_hash_key(record.owner_id),
            record.season.value(),
            blob,
        )
        .map_err(redis_error)?;
        debug!(owner = %record.owner_id, season = %record.season, "season stored");
        Ok(())
    }

    fn get_season(&self, owner: OwnerId, season: Season) -> RecordResult<Option<SeasonRecord>> {
        let mut conn = self.conn()?;
        let blob: Option<Vec<u8>> = conn
            .hget(self.history_hash_key(owner), season.value())
            .map_err(redis_error)?;
        blob.map(|blob| self.codec.decode(&history_key(owner, season), &blob))
            .transpose()
    }

    fn list_seasons(&self, owner: OwnerId) -> RecordResult<Vec<SeasonRecord>> {
        let mut conn = self.conn()?;
        let rows: BTreeMap<u32, Vec<u8>> = conn
            .hgetall(self.history_hash_key(owner))
            .map_err(redis_error)?;
        rows.into_iter()
            .map(|(season, blob)| {
                self.codec
                    .decode(&history_key(owner, Season(season)), &blob)
            })
            .collect()
    }

    fn remove_season(&self, owner: OwnerId, season: Season) -> RecordResult<bool> {
        let mut conn = self.conn()?;
        let removed: u32 = conn
            .hdel(self.history_hash_key(owner), season.value())
            .map_err(redis_error)?;
        Ok(removed > 0)
    }
}
