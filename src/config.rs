use crate::codec::{Codec, DEFAULT_COMPRESSION_LEVEL};
use crate::error::{invalid_config, serde_error, RecordResult};
use crate::inmemory::InMemoryRecordStore;
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default idle window for navigation sessions.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;

/// Which storage backend to build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    #[default]
    InMemory,
    Redis {
        url: String,
        #[serde(default)]
        namespace: Option<String>,
    },
}

/// Top-level settings for the record store and the navigation sessions built on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub backend: BackendConfig,
    pub compression_level: u32,
    pub idle_timeout_secs: u64,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}

impl RecordsConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(raw: &str) -> RecordResult<Self> {
        let config: Self = serde_json::from_str(raw).map_err(serde_error)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RecordResult<()> {
        Codec::new(self.compression_level)?;
        if self.idle_timeout_secs == 0 {
            return Err(invalid_config("idle_timeout_secs must be positive"));
        }
        if let BackendConfig::Redis { url, .. } = &self.backend {
            if url.trim().is_empty() {
                return Err(invalid_config("redis backend requires a url"));
            }
        }
        Ok(())
    }

    pub fn codec(&self) -> RecordResult<Codec> {
        Codec::new(self.compression_level)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Builds and initializes the configured store.
    pub fn build_store(&self) -> RecordResult<Arc<dyn RecordStore>> {
        self.validate()?;
        let store = create_record_store(&self.backend, self.codec()?)?;
        store.initialize()?;
        Ok(store)
    }
}

/// Creates a record store for the requested backend without initializing it.
pub fn create_record_store(
    config: &BackendConfig,
    codec: Codec,
) -> RecordResult<Arc<dyn RecordStore>> {
    match config {
        BackendConfig::InMemory => Ok(Arc::new(InMemoryRecordStore::with_codec(codec))),
        #[cfg(feature = "redis")]
        BackendConfig::Redis { url, namespace } => {
            use crate::redis_store::RedisRecordStore;
            let store = match namespace {
                Some(namespace) => {
                    RedisRecordStore::from_url_with_namespace(url, namespace.clone(), codec)?
                }
                None => RedisRecordStore::from_url(url, codec)?,
            };
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis"))]
        BackendConfig::Redis { .. } => Err(invalid_config(
            "redis backend requested but the `redis` feature is disabled",
        )),
    }
}
