//! Record adapter for host table payloads.
//!
//! The host's fetch API returns either a columnar payload (a mapping from
//! field name to an ordered sequence of values, all sequences equal length)
//! or an already row-oriented sequence. This module normalizes both shapes
//! into a uniform sequence of row records, and provides the small codecs the
//! host's cell encodings need (epoch-second dates, positionally encoded
//! reference lists).
//!
//! Field-name resolution is deliberately not handled here: the adapter makes
//! no assumption about which fields exist. Callers resolve names through the
//! deployment's field mapping.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, Result};
use crate::task::RowId;

/// A uniform row record: field name to cell value.
pub type Record = serde_json::Map<String, Value>;

/// The name of the row identifier column every host table carries.
pub const ROW_ID_FIELD: &str = "id";

/// A table payload as returned by the host, in either orientation.
///
/// # Examples
///
/// ```
/// use kanri_protocol::RecordPayload;
/// use serde_json::json;
///
/// // Columnar orientation
/// let columnar: RecordPayload = serde_json::from_value(json!({
///     "id": [1, 2, 3],
///     "Title": ["a", "b", "c"],
/// })).unwrap();
/// assert_eq!(columnar.into_records().len(), 3);
///
/// // Row orientation
/// let rows: RecordPayload = serde_json::from_value(json!([
///     {"id": 1, "Title": "a"},
/// ])).unwrap();
/// assert_eq!(rows.into_records().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordPayload {
    /// Already row-oriented records.
    Rows(Vec<Record>),
    /// Columnar records: field name to equal-length value sequences.
    Columnar(BTreeMap<String, Vec<Value>>),
}

impl RecordPayload {
    /// Normalizes the payload into a sequence of row records.
    ///
    /// An empty payload (no columns, or empty sequences) yields an empty
    /// vector, never an error. If columns disagree on length, shorter
    /// columns are padded with nulls so no row is silently dropped.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Rows(rows) => rows,
            Self::Columnar(columns) => {
                let len = columns.values().map(Vec::len).max().unwrap_or(0);
                (0..len)
                    .map(|i| {
                        columns
                            .iter()
                            .map(|(name, values)| {
                                (name.clone(), values.get(i).cloned().unwrap_or(Value::Null))
                            })
                            .collect()
                    })
                    .collect()
            }
        }
    }

    /// Returns the number of records without materializing rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Columnar(columns) => columns.values().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Returns `true` if the payload holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts the row identifier from a record.
///
/// # Errors
///
/// Returns [`ProtocolError::MissingRowId`] when the column is absent or
/// null, and [`ProtocolError::InvalidRowId`] when it is not an integer.
pub fn row_id(record: &Record) -> Result<RowId> {
    match record.get(ROW_ID_FIELD) {
        None | Some(Value::Null) => Err(ProtocolError::MissingRowId),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| ProtocolError::InvalidRowId(value.clone())),
    }
}

/// Decodes a host date cell (epoch seconds) into a timestamp.
///
/// Null, absent, zero, and non-numeric cells decode to `None`.
///
/// # Examples
///
/// ```
/// use kanri_protocol::decode_epoch_date;
/// use serde_json::json;
///
/// let date = decode_epoch_date(&json!(86_400)).unwrap();
/// assert_eq!(date.timestamp(), 86_400);
/// assert!(decode_epoch_date(&json!(null)).is_none());
/// ```
#[must_use]
pub fn decode_epoch_date(value: &Value) -> Option<DateTime<Utc>> {
    let secs = value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))?;
    if secs == 0 {
        return None;
    }
    Utc.timestamp_opt(secs, 0).single()
}

/// Encodes an optional timestamp as a host date cell (epoch seconds).
///
/// `None` encodes as null, which clears the field on write.
#[must_use]
pub fn encode_epoch_date(value: Option<DateTime<Utc>>) -> Value {
    match value {
        Some(ts) => Value::from(ts.timestamp()),
        None => Value::Null,
    }
}

/// Decodes a reference-list cell into row ids.
///
/// The host encodes multi-reference cells as a positional list with a
/// leading `"L"` marker (`["L", 4, 9]`); legacy data may instead hold a
/// comma-joined string or a bare number. All three shapes decode; anything
/// else yields an empty list.
///
/// # Examples
///
/// ```
/// use kanri_protocol::decode_reference_list;
/// use serde_json::json;
///
/// assert_eq!(decode_reference_list(&json!(["L", 4, 9])), vec![4, 9]);
/// assert_eq!(decode_reference_list(&json!("4, 9")), vec![4, 9]);
/// assert_eq!(decode_reference_list(&json!(7)), vec![7]);
/// assert!(decode_reference_list(&json!(null)).is_empty());
/// ```
#[must_use]
pub fn decode_reference_list(value: &Value) -> Vec<RowId> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| item.as_str() != Some("L"))
            .filter_map(Value::as_i64)
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .filter_map(|part| part.trim().parse::<RowId>().ok())
            .collect(),
        Value::Number(_) => value.as_i64().into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Encodes an assignee set for a write payload.
///
/// The empty set encodes as null (an empty-equivalent), not as an empty
/// list; non-empty sets are sent as plain id arrays.
#[must_use]
pub fn encode_reference_list(ids: &[RowId]) -> Value {
    if ids.is_empty() {
        Value::Null
    } else {
        Value::Array(ids.iter().copied().map(Value::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columnar(value: Value) -> RecordPayload {
        serde_json::from_value(value).expect("payload should parse")
    }

    #[test]
    fn columnar_payload_becomes_rows() {
        let payload = columnar(json!({
            "id": [1, 2],
            "Title": ["first", "second"],
            "Project": [10, null],
        }));

        let records = payload.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], json!(1));
        assert_eq!(records[0]["Title"], json!("first"));
        assert_eq!(records[1]["Project"], json!(null));
    }

    #[test]
    fn row_payload_passes_through() {
        let payload = columnar(json!([{"id": 5, "Title": "only"}]));
        let records = payload.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(row_id(&records[0]).unwrap(), 5);
    }

    #[test]
    fn empty_payloads_yield_no_records() {
        assert!(columnar(json!({})).into_records().is_empty());
        assert!(columnar(json!([])).into_records().is_empty());
        assert!(columnar(json!({"id": []})).into_records().is_empty());
    }

    #[test]
    fn ragged_columns_pad_with_null() {
        let payload = columnar(json!({
            "id": [1, 2, 3],
            "Title": ["only one"],
        }));

        let records = payload.into_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["Title"], Value::Null);
        assert_eq!(records[2]["id"], json!(3));
    }

    #[test]
    fn row_id_errors() {
        let record: Record = serde_json::from_value(json!({"Title": "x"})).unwrap();
        assert!(matches!(row_id(&record), Err(ProtocolError::MissingRowId)));

        let record: Record = serde_json::from_value(json!({"id": "seven"})).unwrap();
        assert!(matches!(
            row_id(&record),
            Err(ProtocolError::InvalidRowId(_))
        ));
    }

    #[test]
    fn epoch_date_roundtrip() {
        let ts = decode_epoch_date(&json!(1_700_000_000)).expect("decode");
        assert_eq!(encode_epoch_date(Some(ts)), json!(1_700_000_000));
        assert_eq!(encode_epoch_date(None), Value::Null);
    }

    #[test]
    fn zero_epoch_is_unset() {
        assert!(decode_epoch_date(&json!(0)).is_none());
    }

    #[test]
    fn reference_list_shapes() {
        assert_eq!(decode_reference_list(&json!(["L", 1, 2, 3])), vec![1, 2, 3]);
        assert_eq!(decode_reference_list(&json!([4, 5])), vec![4, 5]);
        assert_eq!(decode_reference_list(&json!("1,2, 3")), vec![1, 2, 3]);
        assert_eq!(decode_reference_list(&json!("L, 8")), vec![8]);
        assert!(decode_reference_list(&json!({})).is_empty());
    }

    #[test]
    fn reference_list_empty_encodes_as_null() {
        assert_eq!(encode_reference_list(&[]), Value::Null);
        assert_eq!(encode_reference_list(&[2, 4]), json!([2, 4]));
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every columnar payload yields one record per row, each carrying
        /// every column name.
        #[test]
        fn columnar_shape_is_preserved(
            names in proptest::collection::btree_set("[A-Za-z][A-Za-z0-9_]{0,8}", 1..5),
            len in 0usize..8,
        ) {
            let columns: BTreeMap<String, Vec<Value>> = names
                .iter()
                .map(|name| (name.clone(), (0..len).map(|i| Value::from(i as i64)).collect()))
                .collect();

            let records = RecordPayload::Columnar(columns).into_records();
            prop_assert_eq!(records.len(), len);
            for record in &records {
                for name in &names {
                    prop_assert!(record.contains_key(name));
                }
            }
        }
    }
}
