//! Message Codec Module
//!
//! The cache stores messages as opaque blobs: it serializes on write and
//! deserializes on read, never inspecting fields. The [`Codec`] trait is
//! that boundary; [`Json`] is the default encoding.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CacheError, Result};

// == Codec Trait ==
/// Encodes messages to bytes and back.
pub trait Codec: Send + Sync {
    /// Serializes a message to an opaque blob.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserializes a blob back into a message.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

// == JSON Codec ==
/// JSON blob encoding, matching what the chat backend already stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Codec for Json {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_json_round_trip() {
        let value = Sample {
            name: "alice".to_string(),
            count: 3,
        };

        let bytes = Json.encode(&value).unwrap();
        let decoded: Sample = Json.decode(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_json_decode_garbage_fails() {
        let result: Result<Sample> = Json.decode(b"not json at all");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }
}
