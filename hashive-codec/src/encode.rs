//! Encode engine
//!
//! Values are assembled into in-memory scratch buffers: containers serialize
//! their children first, compute an offset table over the recorded start
//! positions, then emit header + table + payload. Offsets are relative to
//! the start of the offset table, so every container is position-independent.

use crate::value::Value;
use hashive_format::varint::{encode_varuint, fixed_width, int_to_uint, write_fixed};
use hashive_format::{fnv1a64, nearest_prime, HashiveError, Result, TypeMarker, ValueKind};
use std::collections::BTreeMap;

fn put_varuint(out: &mut Vec<u8>, n: u64) {
    out.extend_from_slice(&encode_varuint(n));
}

fn put_blob(out: &mut Vec<u8>, bytes: &[u8]) {
    put_varuint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Pick the uniform width of an offset table.
///
/// Starts from the smallest width holding the largest recorded offset, then
/// doubles (1 -> 2 -> 4 -> 8) while accounting for the table itself pushes
/// the inclusive maximum over a width boundary.
fn offset_width(max_offset: u64, slots: usize) -> Result<u8> {
    let mut width = fixed_width(max_offset);
    while width < fixed_width(max_offset + slots as u64 * u64::from(width)) {
        width *= 2;
        if width > 8 {
            return Err(HashiveError::Internal(format!(
                "offset width {width} out of range"
            )));
        }
    }
    Ok(width)
}

/// Append the encoding of `value` to `out`.
pub fn encode_value(out: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Null => {
            out.push(TypeMarker::scalar(ValueKind::Null).to_byte());
        }
        Value::Int(n) => {
            out.push(TypeMarker::scalar(ValueKind::Int).to_byte());
            put_varuint(out, int_to_uint(*n));
        }
        Value::Uint(n) => {
            out.push(TypeMarker::scalar(ValueKind::Uint).to_byte());
            put_varuint(out, *n);
        }
        Value::Bool(b) => {
            out.push(TypeMarker::scalar(ValueKind::Bool).to_byte());
            put_varuint(out, u64::from(*b));
        }
        Value::Float(f) => {
            // The byte-reversed bit pattern is part of the on-disk format:
            // the usually-zero high IEEE bytes end up in the varint tail.
            out.push(TypeMarker::scalar(ValueKind::Float).to_byte());
            put_varuint(out, f.to_bits().swap_bytes());
        }
        Value::Text(s) => {
            out.push(TypeMarker::scalar(ValueKind::Text).to_byte());
            put_blob(out, s.as_bytes());
        }
        Value::Bytes(p) => {
            out.push(TypeMarker::scalar(ValueKind::Bytes).to_byte());
            put_blob(out, p);
        }
        Value::Opaque(p) => {
            out.push(TypeMarker::scalar(ValueKind::Opaque).to_byte());
            put_blob(out, p);
        }
        Value::Array(items) => encode_array(out, items)?,
        Value::Object(map) => encode_object(out, map)?,
    }
    Ok(())
}

fn encode_array(out: &mut Vec<u8>, items: &[Value]) -> Result<()> {
    let mut data = Vec::new();
    let mut offsets = Vec::with_capacity(items.len());
    for item in items {
        offsets.push(data.len() as u64);
        encode_value(&mut data, item)?;
    }

    let max_offset = offsets.last().copied().unwrap_or(0);
    let width = offset_width(max_offset, items.len())?;
    let table_len = items.len() as u64 * u64::from(width);

    out.push(TypeMarker::container(ValueKind::Array, width).to_byte());
    write_fixed(out, items.len() as u64, width)?;
    for offset in &offsets {
        write_fixed(out, offset + table_len, width)?;
    }
    out.extend_from_slice(&data);
    Ok(())
}

/// Distribute entries over `bucket_count` separate-chaining buckets and
/// report the average length of the buckets holding more than one entry.
fn build_buckets<'a>(
    map: &'a BTreeMap<String, Value>,
    bucket_count: usize,
) -> (Vec<Vec<(&'a str, &'a Value)>>, u64) {
    let mut buckets: Vec<Vec<(&str, &Value)>> = vec![Vec::new(); bucket_count];
    for (key, value) in map {
        let index = fnv1a64(key.as_bytes()) % bucket_count as u64;
        buckets[index as usize].push((key.as_str(), value));
    }

    let mut sum_overflow = 0u64;
    let mut num_overflow = 0u64;
    for bucket in &buckets {
        if bucket.len() > 1 {
            num_overflow += 1;
            sum_overflow += bucket.len() as u64;
        }
    }
    let avg_overflow = if num_overflow > 0 {
        sum_overflow / num_overflow
    } else {
        0
    };
    (buckets, avg_overflow)
}

/// Bucket count for `entries` keys: the nearest prime at or above 4/3 of the
/// entry count, keeping the expected load factor under 3/4.
fn bucket_count_for(entries: usize) -> usize {
    let (prime, _) = nearest_prime((entries as u64 * 4).div_ceil(3));
    prime as usize
}

fn encode_object(out: &mut Vec<u8>, map: &BTreeMap<String, Value>) -> Result<()> {
    let mut bucket_count = bucket_count_for(map.len());
    let (mut buckets, avg_overflow) = build_buckets(map, bucket_count);
    if avg_overflow > 5 {
        // One rehash with a larger table; keys hashing this badly stay
        // linear-scanned within their buckets.
        let (next, _) = nearest_prime((bucket_count as u64 * 4 / 3).max(bucket_count as u64 + 1));
        bucket_count = next as usize;
        (buckets, _) = build_buckets(map, bucket_count);
    }

    let mut data = Vec::new();
    let mut offsets = Vec::with_capacity(bucket_count);
    let mut scratch = Vec::new();
    for bucket in &buckets {
        offsets.push(data.len() as u64);
        put_varuint(&mut data, bucket.len() as u64);
        for &(key, value) in bucket {
            put_blob(&mut data, key.as_bytes());
            scratch.clear();
            encode_value(&mut scratch, value)?;
            // The value size lets a keyed lookup skip mismatched entries
            // without decoding them.
            put_blob(&mut data, &scratch);
        }
    }

    let max_offset = offsets.last().copied().unwrap_or(0);
    let width = offset_width(max_offset, bucket_count)?;
    let table_len = bucket_count as u64 * u64::from(width);

    out.push(TypeMarker::container(ValueKind::Object, width).to_byte());
    put_varuint(out, bucket_count as u64);
    for offset in &offsets {
        write_fixed(out, offset + table_len, width)?;
    }
    out.extend_from_slice(&data);
    Ok(())
}
