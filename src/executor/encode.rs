// Copyright 2026 Rowjoin Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Equality key encoding
//!
//! Projects a row's equality columns into a byte string usable as a hash
//! map key. Two keys are byte-equal iff the projected values are pairwise
//! equal, so each value carries a type tag and text is length-prefixed -
//! without the prefix, ("ab","c") and ("a","bc") would collide.
//!
//! NULLs encode like any other value (the tag alone) but are reported to
//! the caller through the returned flag; SQL's NULL-never-matches rule is
//! the lookup site's job, not the encoder's.

use crate::core::error::{Error, Result};
use crate::core::row::Row;
use crate::core::types::DataType;
use crate::core::value::Value;

/// Encode the values of `row` at `cols` into `scratch`
///
/// Takes ownership of the scratch vector, clears it, and returns it filled
/// so callers can recycle the allocation across rows. The boolean is true
/// when any projected value is NULL.
pub fn encode_key(mut scratch: Vec<u8>, row: &Row, cols: &[usize]) -> Result<(Vec<u8>, bool)> {
    scratch.clear();
    let mut contains_null = false;
    for &col in cols {
        let value = row.get(col).ok_or_else(|| {
            Error::key_encoding(format!(
                "equality column {} out of range for row of width {}",
                col,
                row.len()
            ))
        })?;
        scratch.push(value.data_type().as_u8());
        match value {
            Value::Null(_) => contains_null = true,
            Value::Integer(v) => scratch.extend_from_slice(&v.to_be_bytes()),
            Value::Float(v) => scratch.extend_from_slice(&v.to_bits().to_be_bytes()),
            Value::Boolean(v) => scratch.push(*v as u8),
            Value::Text(s) => {
                let len = u32::try_from(s.len()).map_err(|_| {
                    Error::key_encoding(format!("text value of {} bytes in equality key", s.len()))
                })?;
                scratch.extend_from_slice(&len.to_be_bytes());
                scratch.extend_from_slice(s.as_bytes());
            }
            Value::Timestamp(ts) => {
                let nanos = ts.timestamp_nanos_opt().ok_or_else(|| {
                    Error::key_encoding(format!("timestamp {} out of encodable range", ts))
                })?;
                scratch.extend_from_slice(&nanos.to_be_bytes());
            }
        }
    }
    Ok((scratch, contains_null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn key(row: &Row, cols: &[usize]) -> (Vec<u8>, bool) {
        encode_key(Vec::new(), row, cols).unwrap()
    }

    #[test]
    fn test_equal_values_equal_keys() {
        let a = Row::from_values(vec![Value::integer(7), Value::text("x")]);
        let b = Row::from_values(vec![Value::integer(7), Value::text("x")]);
        assert_eq!(key(&a, &[0, 1]), key(&b, &[0, 1]));
    }

    #[test]
    fn test_different_values_different_keys() {
        let a = Row::from_values(vec![Value::integer(7)]);
        let b = Row::from_values(vec![Value::integer(8)]);
        assert_ne!(key(&a, &[0]).0, key(&b, &[0]).0);
    }

    #[test]
    fn test_text_boundaries_do_not_collide() {
        let a = Row::from_values(vec![Value::text("ab"), Value::text("c")]);
        let b = Row::from_values(vec![Value::text("a"), Value::text("bc")]);
        assert_ne!(key(&a, &[0, 1]).0, key(&b, &[0, 1]).0);
    }

    #[test]
    fn test_type_tag_disambiguates() {
        // 1_i64 and true must not encode to the same key prefix
        let a = Row::from_values(vec![Value::integer(1)]);
        let b = Row::from_values(vec![Value::boolean(true)]);
        assert_ne!(key(&a, &[0]).0, key(&b, &[0]).0);
    }

    #[test]
    fn test_null_flag() {
        let row = Row::from_values(vec![Value::integer(1), Value::null_unknown()]);
        assert!(!key(&row, &[0]).1);
        assert!(key(&row, &[0, 1]).1);
    }

    #[test]
    fn test_column_subset_and_order() {
        let row = Row::from_values(vec![Value::integer(1), Value::integer(2)]);
        assert_ne!(key(&row, &[0, 1]).0, key(&row, &[1, 0]).0);
    }

    #[test]
    fn test_timestamp_encodes() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let row = Row::from_values(vec![Value::timestamp(ts)]);
        let (bytes, null) = key(&row, &[0]);
        assert!(!null);
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_out_of_range_column() {
        let row = Row::from_values(vec![Value::integer(1)]);
        let err = encode_key(Vec::new(), &row, &[3]).unwrap_err();
        assert!(matches!(err, Error::KeyEncoding { .. }));
    }

    #[test]
    fn test_scratch_is_cleared() {
        let row = Row::from_values(vec![Value::integer(1)]);
        let (first, _) = encode_key(Vec::new(), &row, &[0]).unwrap();
        let (second, _) = encode_key(first.clone(), &row, &[0]).unwrap();
        assert_eq!(first, second);
    }
}
