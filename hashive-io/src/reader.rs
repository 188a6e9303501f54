//! The Hashive reader instance
//!
//! [`Hashive`] wraps a buffered seekable source and resolves path queries
//! against the root container, materializing only the values a traversal
//! touches. The instance owns the single underlying cursor; every query
//! takes `&mut self`, so concurrent access means opening independent
//! instances over the same (immutable) file.

use crate::seeker::BufferedSeeker;
use hashive_codec::{
    read_array, read_object, read_value, ArrayHandle, BincodeCodec, Decoded, ObjectHandle,
    OpaqueCodec, Value,
};
use hashive_format::{HashiveError, Result, SIGNATURE};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Read buffer size used when none is requested.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// A read-only Hashive database instance
///
/// Dropping the instance releases the underlying source and its buffer.
#[derive(Debug)]
pub struct Hashive<R, C = BincodeCodec> {
    src: BufferedSeeker<R>,
    root_array: Option<ArrayHandle>,
    root_object: Option<ObjectHandle>,
    opaque: C,
}

impl Hashive<File> {
    /// Open the database file at `path`.
    ///
    /// `buffer_size` of `None` selects the [`DEFAULT_BUFFER_SIZE`];
    /// `Some(0)` disables read buffering.
    pub fn open<P: AsRef<Path>>(path: P, buffer_size: Option<usize>) -> Result<Self> {
        Self::from_stream(File::open(path)?, buffer_size)
    }
}

impl<R: Read + Seek> Hashive<R> {
    /// Construct an instance around an existing seekable source.
    pub fn from_stream(src: R, buffer_size: Option<usize>) -> Result<Self> {
        Self::with_opaque_codec(src, buffer_size, BincodeCodec)
    }
}

impl<R: Read + Seek, C: OpaqueCodec> Hashive<R, C> {
    /// Like [`Hashive::from_stream`], with a caller-supplied opaque codec.
    pub fn with_opaque_codec(src: R, buffer_size: Option<usize>, opaque: C) -> Result<Self> {
        let mut src = BufferedSeeker::new(src, buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE))?;

        let mut signature = [0u8; SIGNATURE.len()];
        src.read_exact(&mut signature)?;
        if signature != SIGNATURE {
            return Err(HashiveError::InvalidSignature);
        }

        // Sniff the root: object first, then array. A type mismatch here is
        // recoverable; any other error aborts. A scalar root leaves both
        // descriptors empty and is reachable only through the empty path.
        let mut root_array = None;
        let mut root_object = None;
        match read_object(&mut src) {
            Ok(handle) => root_object = Some(handle),
            Err(HashiveError::Type { .. }) => {
                src.seek(SeekFrom::Start(SIGNATURE.len() as u64))?;
                match read_array(&mut src) {
                    Ok(handle) => root_array = Some(handle),
                    Err(HashiveError::Type { .. }) => {}
                    Err(err) => return Err(err),
                }
            }
            Err(err) => return Err(err),
        }

        Ok(Hashive {
            src,
            root_array,
            root_object,
            opaque,
        })
    }

    /// Resolve `path` and materialize the value it denotes.
    ///
    /// Each path element is a map key or an array index, so
    /// `h.query(&["key1", "key2", "1", "key3"])` is analogous to
    /// `h["key1"]["key2"][1]["key3"]`. Which interpretation applies is
    /// decided by the container type at the current step; array indices are
    /// unsigned integer literals with base auto-detection (`0x`, `0o`, `0b`
    /// prefixes and leading-zero octal). The empty path denotes the entire
    /// root value.
    pub fn query(&mut self, path: &[&str]) -> Result<Value> {
        if path.is_empty() {
            self.src.seek(SeekFrom::Start(SIGNATURE.len() as u64))?;
            return match read_value(&mut self.src, true)? {
                Decoded::Value(value) => Ok(value),
                _ => Err(HashiveError::Internal(
                    "recursive decode returned a handle".to_string(),
                )),
            };
        }
        if let Some(root) = self.root_object.clone() {
            self.query_object(&root, path)
        } else if let Some(root) = self.root_array.clone() {
            self.query_array(&root, path)
        } else {
            Err(HashiveError::NotFound)
        }
    }

    /// Resolve `path`, require an opaque value, and decode it.
    ///
    /// Anything other than an opaque value at the path is [`HashiveError::NotFound`].
    pub fn query_opaque<T: DeserializeOwned>(&mut self, path: &[&str]) -> Result<T> {
        match self.query(path)? {
            Value::Opaque(bytes) => self.opaque.decode(&bytes),
            _ => Err(HashiveError::NotFound),
        }
    }

    fn descend(&mut self, decoded: Decoded, rest: &[&str]) -> Result<Value> {
        match decoded {
            Decoded::Value(value) if rest.is_empty() => Ok(value),
            Decoded::Object(handle) if !rest.is_empty() => self.query_object(&handle, rest),
            Decoded::Array(handle) if !rest.is_empty() => self.query_array(&handle, rest),
            // A scalar with path elements left cannot be descended into.
            _ => Err(HashiveError::NotFound),
        }
    }

    fn query_object(&mut self, object: &ObjectHandle, path: &[&str]) -> Result<Value> {
        let last = path.len() == 1;
        let decoded = object.get(&mut self.src, path[0], last)?;
        self.descend(decoded, &path[1..])
    }

    fn query_array(&mut self, array: &ArrayHandle, path: &[&str]) -> Result<Value> {
        let index = parse_index(path[0]).ok_or(HashiveError::NotFound)?;
        let index = usize::try_from(index)
            .map_err(|_| HashiveError::Format(format!("invalid index {index}")))?;
        let last = path.len() == 1;
        let decoded = array.get(&mut self.src, index, last)?;
        self.descend(decoded, &path[1..])
    }
}

/// Parse an array index as an unsigned integer literal with base
/// auto-detection: `0x`/`0X` hex, `0o`/`0O` octal, `0b`/`0B` binary, a bare
/// leading zero octal, decimal otherwise.
fn parse_index(s: &str) -> Option<u64> {
    let (digits, radix) = if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
    {
        (rest, 16)
    } else if let Some(rest) = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")) {
        (rest, 8)
    } else if let Some(rest) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (rest, 2)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    u64::from_str_radix(digits, radix).ok()
}
