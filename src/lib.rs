#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod inmemory;
pub mod model;
pub mod navigation;
#[cfg(feature = "redis")]
pub mod redis_store;
pub mod store;
pub mod summary;

pub use codec::Codec;
pub use config::{create_record_store, BackendConfig, RecordsConfig};
pub use error::{RecordError, RecordResult, UpstreamError};
pub use model::{OwnerId, Period, Season, SeasonRecord, ShowcaseEntry};
pub use navigation::{Interaction, Navigator};
pub use store::RecordStore;
pub use summary::{Honor, SeasonSummary};
