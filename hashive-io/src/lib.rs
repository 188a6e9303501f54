//! Hashive I/O - file I/O and high-level APIs
//!
//! This crate provides the outer surface of Hashive:
//!
//! - [`write`] / [`write_file`]: serialize a value tree behind the file
//!   signature
//! - [`write_json`] and friends: JSON ingestion
//! - [`Hashive`]: the reader instance with lazy path queries
//! - [`BufferedSeeker`]: the read-ahead adaptor the reader runs on
//!
//! # Example
//!
//! ```
//! use hashive_codec::Value;
//! use hashive_io::{write, Hashive};
//! use std::collections::BTreeMap;
//! use std::io::Cursor;
//!
//! let mut db = Vec::new();
//! write(
//!     &mut db,
//!     &Value::Object(BTreeMap::from([
//!         ("name".to_string(), Value::Text("mkch".to_string())),
//!         ("age".to_string(), Value::Int(18)),
//!     ])),
//! )?;
//!
//! let mut h = Hashive::from_stream(Cursor::new(db), None)?;
//! assert_eq!(h.query(&["age"])?, Value::Int(18));
//! # Ok::<(), hashive_format::HashiveError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod reader;
pub mod seeker;
pub mod writer;

// Re-export commonly used types
pub use hashive_codec::{
    to_opaque, ArrayHandle, BincodeCodec, Decoded, ObjectHandle, OpaqueCodec, Value,
};
pub use hashive_format::{HashiveError, Result, SIGNATURE};
pub use reader::{Hashive, DEFAULT_BUFFER_SIZE};
pub use seeker::BufferedSeeker;
pub use writer::{
    write, write_file, write_file_json, write_file_json_str, write_json, write_json_str,
};
