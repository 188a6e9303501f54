//! Opaque value adaptor
//!
//! Values outside the intrinsic universe travel through a caller-supplied
//! codec pair: `encode` runs at write time and the resulting bytes are
//! stored verbatim under the opaque type tag; `decode` turns them back at
//! read time. The core never interprets the bytes and makes no stability
//! guarantee across different codecs.

use crate::value::Value;
use hashive_format::{HashiveError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A pluggable encoder/decoder pair for opaque values
pub trait OpaqueCodec {
    /// Serialize `value` to bytes
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;
    /// Deserialize a value from `bytes`
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// The reference adaptor, backed by bincode's standard configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeCodec;

impl OpaqueCodec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(|err| HashiveError::Format(err.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(value, _)| value)
            .map_err(|err| HashiveError::Format(err.to_string()))
    }
}

/// Encode `value` with `codec` and wrap the bytes as an opaque [`Value`].
pub fn to_opaque<T: Serialize, C: OpaqueCodec>(codec: &C, value: &T) -> Result<Value> {
    Ok(Value::Opaque(codec.encode(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Addr {
        line1: String,
        line2: String,
    }

    #[test]
    fn bincode_codec_roundtrip() {
        let addr = Addr {
            line1: "line1".to_string(),
            line2: "line2".to_string(),
        };
        let value = to_opaque(&BincodeCodec, &addr).unwrap();
        let Value::Opaque(bytes) = value else {
            panic!("expected opaque value");
        };
        let back: Addr = BincodeCodec.decode(&bytes).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn decode_of_garbage_is_a_format_error() {
        let err = BincodeCodec.decode::<Addr>(&[0xFF; 2]).unwrap_err();
        assert!(matches!(err, HashiveError::Format(_)));
    }
}
