//! Decode engine
//!
//! The dispatcher reads a type marker and decodes the matching value from a
//! seekable source. Containers come back as lazy handles by default: a
//! handle records where the container's offset table lives and resolves
//! elements with a bounded number of seeks, leaving everything else on disk.
//! With `recursive = true` containers are materialized into owned values
//! instead.

use crate::value::Value;
use hashive_format::varint::{read_fixed, read_u8, read_varuint, uint_to_int};
use hashive_format::{fnv1a64, HashiveError, Result, TypeMarker, ValueKind};
use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom};

/// Result of decoding one value
#[derive(Debug, Clone)]
pub enum Decoded {
    /// A scalar, or a container materialized recursively
    Value(Value),
    /// A lazy array descriptor
    Array(ArrayHandle),
    /// A lazy object descriptor
    Object(ObjectHandle),
}

impl Decoded {
    /// Unwrap a materialized value; handles yield `None`.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Decoded::Value(value) => Some(value),
            _ => None,
        }
    }
}

fn read_usize<R: Read>(r: &mut R, what: &str) -> Result<usize> {
    let n = read_varuint(r)?;
    usize::try_from(n).map_err(|_| HashiveError::Format(format!("invalid {what} length {n}")))
}

fn read_blob<R: Read>(r: &mut R, what: &str) -> Result<Vec<u8>> {
    let len = read_usize(r, what)?;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_text<R: Read>(r: &mut R) -> Result<String> {
    let bytes = read_blob(r, "text")?;
    String::from_utf8(bytes).map_err(|_| HashiveError::Format("invalid UTF-8 in text".to_string()))
}

fn read_bool_value<R: Read>(r: &mut R) -> Result<bool> {
    match read_varuint(r)? {
        0 => Ok(false),
        1 => Ok(true),
        n => Err(HashiveError::Format(format!("invalid bool value {n}"))),
    }
}

/// Convert a stored offset to a seekable distance.
fn checked_offset(offset: u64) -> Result<u64> {
    if offset > i64::MAX as u64 {
        return Err(HashiveError::Format(format!("invalid offset {offset}")));
    }
    Ok(offset)
}

/// Decode the value at the current position of `r`.
///
/// With `recursive = false` containers are returned as lazy handles;
/// otherwise they are materialized into [`Value::Array`] / [`Value::Object`].
pub fn read_value<R: Read + Seek>(r: &mut R, recursive: bool) -> Result<Decoded> {
    let marker = TypeMarker::from(read_u8(r)?);
    let decoded = match marker.kind()? {
        ValueKind::Null => Decoded::Value(Value::Null),
        ValueKind::Int => Decoded::Value(Value::Int(uint_to_int(read_varuint(r)?))),
        ValueKind::Uint => Decoded::Value(Value::Uint(read_varuint(r)?)),
        ValueKind::Bool => Decoded::Value(Value::Bool(read_bool_value(r)?)),
        ValueKind::Float => Decoded::Value(Value::Float(f64::from_bits(
            read_varuint(r)?.swap_bytes(),
        ))),
        ValueKind::Text => Decoded::Value(Value::Text(read_text(r)?)),
        ValueKind::Bytes => Decoded::Value(Value::Bytes(read_blob(r, "bytes")?)),
        ValueKind::Opaque => Decoded::Value(Value::Opaque(read_blob(r, "opaque")?)),
        ValueKind::Array => {
            let handle = ArrayHandle::read_after_marker(r, marker.offset_width())?;
            if recursive {
                Decoded::Value(Value::Array(handle.materialize(r)?))
            } else {
                Decoded::Array(handle)
            }
        }
        ValueKind::Object => {
            let handle = ObjectHandle::read_after_marker(r, marker.offset_width())?;
            if recursive {
                Decoded::Value(Value::Object(handle.materialize(r)?))
            } else {
                Decoded::Object(handle)
            }
        }
    };
    Ok(decoded)
}

/// Read an array value, failing with a recoverable type error on anything
/// else.
pub fn read_array<R: Read + Seek>(r: &mut R) -> Result<ArrayHandle> {
    let marker = TypeMarker::from(read_u8(r)?);
    match marker.kind()? {
        ValueKind::Array => ArrayHandle::read_after_marker(r, marker.offset_width()),
        got => Err(HashiveError::Type {
            expected: ValueKind::Array,
            got,
        }),
    }
}

/// Read an object value, failing with a recoverable type error on anything
/// else.
pub fn read_object<R: Read + Seek>(r: &mut R) -> Result<ObjectHandle> {
    let marker = TypeMarker::from(read_u8(r)?);
    match marker.kind()? {
        ValueKind::Object => ObjectHandle::read_after_marker(r, marker.offset_width()),
        got => Err(HashiveError::Type {
            expected: ValueKind::Object,
            got,
        }),
    }
}

/// Lazy descriptor of an encoded array
///
/// Holds the absolute position of the offset table plus the element count
/// and offset width; elements resolve with two seeks each.
#[derive(Debug, Clone)]
pub struct ArrayHandle {
    pos: u64,
    len: usize,
    width: u8,
}

impl ArrayHandle {
    fn read_after_marker<R: Read + Seek>(r: &mut R, width: u8) -> Result<Self> {
        let len = read_fixed(r, width)?;
        let len = usize::try_from(len)
            .map_err(|_| HashiveError::Format(format!("invalid array length {len}")))?;
        let pos = r.stream_position()?;
        Ok(ArrayHandle { pos, len, width })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decode the element at `index`.
    ///
    /// See [`read_value`] for the meaning of `recursive`.
    pub fn get<R: Read + Seek>(&self, r: &mut R, index: usize, recursive: bool) -> Result<Decoded> {
        if index >= self.len {
            return Err(HashiveError::OutOfBounds {
                len: self.len,
                index,
            });
        }
        r.seek(SeekFrom::Start(
            self.pos + index as u64 * u64::from(self.width),
        ))?;
        let offset = checked_offset(read_fixed(r, self.width)?)?;
        r.seek(SeekFrom::Start(self.pos + offset))?;
        read_value(r, recursive)
    }

    /// Decode every element recursively.
    pub fn materialize<R: Read + Seek>(&self, r: &mut R) -> Result<Vec<Value>> {
        let mut items = Vec::with_capacity(self.len);
        for index in 0..self.len {
            match self.get(r, index, true)? {
                Decoded::Value(value) => items.push(value),
                _ => {
                    return Err(HashiveError::Internal(
                        "recursive decode returned a handle".to_string(),
                    ))
                }
            }
        }
        Ok(items)
    }
}

/// Lazy descriptor of an encoded object
///
/// Holds the absolute position of the bucket offset table plus the bucket
/// count and offset width; a keyed lookup probes exactly one bucket.
#[derive(Debug, Clone)]
pub struct ObjectHandle {
    pos: u64,
    bucket_count: u64,
    width: u8,
}

impl ObjectHandle {
    fn read_after_marker<R: Read + Seek>(r: &mut R, width: u8) -> Result<Self> {
        let bucket_count = read_varuint(r)?;
        if bucket_count == 0 {
            return Err(HashiveError::Format("object with zero buckets".to_string()));
        }
        let pos = r.stream_position()?;
        Ok(ObjectHandle {
            pos,
            bucket_count,
            width,
        })
    }

    /// Seek to the payload of bucket `index` via the offset table.
    fn seek_bucket<R: Read + Seek>(&self, r: &mut R, index: u64) -> Result<()> {
        r.seek(SeekFrom::Start(self.pos + index * u64::from(self.width)))?;
        let offset = checked_offset(read_fixed(r, self.width)?)?;
        r.seek(SeekFrom::Start(self.pos + offset))?;
        Ok(())
    }

    /// Look up `key`, decoding the matched value.
    ///
    /// Non-matching entries in the probed bucket are skipped via their
    /// recorded value size without being decoded. See [`read_value`] for the
    /// meaning of `recursive`.
    pub fn get<R: Read + Seek>(&self, r: &mut R, key: &str, recursive: bool) -> Result<Decoded> {
        let bucket = fnv1a64(key.as_bytes()) % self.bucket_count;
        self.seek_bucket(r, bucket)?;
        let entries = read_varuint(r)?;
        for _ in 0..entries {
            let entry_key = read_blob(r, "key")?;
            if entry_key == key.as_bytes() {
                let _value_size = read_varuint(r)?;
                return read_value(r, recursive);
            }
            let value_size = checked_offset(read_varuint(r)?)?;
            r.seek(SeekFrom::Current(value_size as i64))?;
        }
        Err(HashiveError::NotFound)
    }

    /// Decode every entry recursively into a mapping.
    pub fn materialize<R: Read + Seek>(&self, r: &mut R) -> Result<BTreeMap<String, Value>> {
        let mut map = BTreeMap::new();
        for bucket in 0..self.bucket_count {
            self.seek_bucket(r, bucket)?;
            let entries = read_varuint(r)?;
            for _ in 0..entries {
                let key = read_text(r)?;
                let _value_size = read_varuint(r)?;
                match read_value(r, true)? {
                    Decoded::Value(value) => {
                        map.insert(key, value);
                    }
                    _ => {
                        return Err(HashiveError::Internal(
                            "recursive decode returned a handle".to_string(),
                        ))
                    }
                }
            }
        }
        Ok(map)
    }
}
