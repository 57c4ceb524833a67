use crate::error::{integrity_error, invalid_config, serde_error, RecordError, RecordResult};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Version of the JSON envelope written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_COMPRESSION_LEVEL: u32 = 5;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    schema: u32,
    data: serde_json::Value,
}

/// Turns payloads into the compressed blobs kept by every backend.
///
/// Blobs are zlib streams over a UTF-8 JSON envelope `{"schema":N,"data":...}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Codec {
    level: u32,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl Codec {
    /// Builds a codec with a zlib level between 0 (store) and 9 (best).
    pub fn new(level: u32) -> RecordResult<Self> {
        if level > 9 {
            return Err(invalid_config(format!(
                "compression level must be within 0..=9, got {level}"
            )));
        }
        Ok(Self { level })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> RecordResult<Vec<u8>> {
        let json = serde_json::to_vec(&EnvelopeRef {
            schema: SCHEMA_VERSION,
            data: value,
        })
        .map_err(serde_error)?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level));
        encoder
            .write_all(&json)
            .map_err(|err| RecordError::Serialization(err.to_string()))?;
        encoder
            .finish()
            .map_err(|err| RecordError::Serialization(err.to_string()))
    }

    /// Decodes a blob; `key` names the row in integrity errors.
    pub fn decode<T: DeserializeOwned>(&self, key: &str, blob: &[u8]) -> RecordResult<T> {
        let mut json = Vec::new();
        ZlibDecoder::new(blob)
            .read_to_end(&mut json)
            .map_err(|err| integrity_error(key, err))?;
        let envelope: RawEnvelope =
            serde_json::from_slice(&json).map_err(|err| integrity_error(key, err))?;
        if envelope.schema != SCHEMA_VERSION {
            return Err(RecordError::UnsupportedSchema {
                found: envelope.schema,
                expected: SCHEMA_VERSION,
            });
        }
        serde_json::from_value(envelope.data).map_err(|err| integrity_error(key, err))
    }
}
