//! Hashive codec - encoder/decoder engines
//!
//! This crate provides the value model and the two engines that operate on
//! the Hashive wire format:
//!
//! - [`Value`]: the tagged variant over the value universe
//! - [`encode::encode_value`]: scratch-buffer assembly of scalars, arrays
//!   with offset tables, and hash-bucketed objects
//! - [`decode::read_value`]: the type-marker dispatcher, returning lazy
//!   container handles or fully materialized values
//! - [`opaque`]: the pluggable adaptor for caller-encoded values

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod decode;
pub mod encode;
pub mod opaque;
pub mod value;

// Re-export commonly used types
pub use hashive_format::{HashiveError, Result, TypeMarker, ValueKind};

// Re-export our own types
pub use decode::{read_array, read_object, read_value, ArrayHandle, Decoded, ObjectHandle};
pub use encode::encode_value;
pub use opaque::{to_opaque, BincodeCodec, OpaqueCodec};
pub use value::Value;
