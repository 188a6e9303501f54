//! Top-level writers
//!
//! A database is produced in a single pass: the 8-byte signature, then
//! exactly one encoded root value. Containers are assembled in memory by the
//! encode engine, so the emitted stream is a handful of bulk writes.

use hashive_codec::{encode_value, Value};
use hashive_format::{HashiveError, Result, SIGNATURE};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Serialize `value` as a complete Hashive database into `w`.
pub fn write<W: Write>(mut w: W, value: &Value) -> Result<()> {
    let mut body = Vec::new();
    encode_value(&mut body, value)?;
    w.write_all(&SIGNATURE)?;
    w.write_all(&body)?;
    w.flush()?;
    Ok(())
}

/// Like [`write`], into a file at `path`, overwriting any existing file.
pub fn write_file<P: AsRef<Path>>(path: P, value: &Value) -> Result<()> {
    write(File::create(path)?, value)
}

/// Decode one JSON document from `json` and write it with [`write`].
///
/// JSON numbers land on the float side of the value universe.
pub fn write_json<W: Write, J: Read>(w: W, json: J) -> Result<()> {
    let document: serde_json::Value = serde_json::from_reader(json)
        .map_err(|err| HashiveError::Format(format!("invalid JSON: {err}")))?;
    write(w, &Value::from(document))
}

/// Like [`write_json`], reading the document from a string.
pub fn write_json_str<W: Write>(w: W, json: &str) -> Result<()> {
    write_json(w, json.as_bytes())
}

/// Like [`write_json`], into a file at `path`.
pub fn write_file_json<P: AsRef<Path>, J: Read>(path: P, json: J) -> Result<()> {
    write_json(File::create(path)?, json)
}

/// Like [`write_json_str`], into a file at `path`.
pub fn write_file_json_str<P: AsRef<Path>>(path: P, json: &str) -> Result<()> {
    write_json_str(File::create(path)?, json)
}
