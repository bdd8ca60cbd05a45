//! An in-memory host implementation.
//!
//! Backs the demo binary and every test that exercises the full read/write
//! path without a live host platform. Tables are plain record vectors;
//! fetches are served in columnar orientation to exercise the record
//! adapter the same way the real host does.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use kanri_config::Schema;
use kanri_protocol::{Record, RecordPayload, RowId, row_id};

use crate::action::{ActionVerb, UserAction};
use crate::error::{HostError, Result};

#[derive(Debug, Default)]
struct Inner {
    schema: Schema,
    tables: BTreeMap<String, Vec<Record>>,
    options: BTreeMap<String, Value>,
    selected: Option<RowId>,
    fail_next: Option<String>,
}

/// An in-memory record store implementing [`HostApi`](crate::HostApi).
///
/// # Examples
///
/// ```
/// use kanri_host::{HostApi, MemoryHost};
/// use kanri_config::Schema;
///
/// # async fn example() -> kanri_host::Result<()> {
/// let host = MemoryHost::new(Schema::default()).with_table("Tasks", vec![]);
/// let payload = host.fetch_table("Tasks").await?;
/// assert!(payload.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryHost {
    inner: Mutex<Inner>,
}

impl MemoryHost {
    /// Creates an empty host exposing the given schema.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            inner: Mutex::new(Inner {
                schema,
                ..Inner::default()
            }),
        }
    }

    /// Adds a table of records (builder form).
    #[must_use]
    pub fn with_table(self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.lock().tables.insert(name.into(), records);
        self
    }

    /// Makes the next `apply_user_actions` call fail with `message`.
    ///
    /// One-shot: subsequent calls succeed again. Used to test the
    /// failure-and-reconcile path.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Returns the row last reported to the selection sink.
    #[must_use]
    pub fn selected_row(&self) -> Option<RowId> {
        self.lock().selected
    }

    /// Returns a persisted widget option.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<Value> {
        self.lock().options.get(key).cloned()
    }

    /// Returns a copy of a stored record, for test inspection.
    #[must_use]
    pub fn record(&self, table: &str, id: RowId) -> Option<Record> {
        self.lock()
            .tables
            .get(table)?
            .iter()
            .find(|r| row_id(r).is_ok_and(|rid| rid == id))
            .cloned()
    }

    /// Returns the number of rows in a table.
    #[must_use]
    pub fn table_len(&self, table: &str) -> usize {
        self.lock().tables.get(table).map_or(0, Vec::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-mutation; the
        // record store itself is still usable.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl crate::api::HostApi for MemoryHost {
    async fn get_schema(&self) -> Result<Schema> {
        Ok(self.lock().schema.clone())
    }

    async fn fetch_table(&self, name: &str) -> Result<RecordPayload> {
        let inner = self.lock();
        let records = inner
            .tables
            .get(name)
            .ok_or_else(|| HostError::UnknownTable(name.to_string()))?;
        Ok(to_columnar(records))
    }

    async fn apply_user_actions(&self, actions: &[UserAction]) -> Result<()> {
        let mut inner = self.lock();
        if let Some(message) = inner.fail_next.take() {
            return Err(HostError::Rejected(message));
        }

        for action in actions {
            let table = inner
                .tables
                .entry(action.table.clone())
                .or_default();
            match action.verb {
                ActionVerb::AddRecord => {
                    let next_id = table
                        .iter()
                        .filter_map(|r| row_id(r).ok())
                        .max()
                        .unwrap_or(0)
                        + 1;
                    let mut record = action.fields.clone();
                    record.insert("id".to_string(), Value::from(next_id));
                    debug!(table = %action.table, id = next_id, "added record");
                    table.push(record);
                }
                ActionVerb::UpdateRecord => {
                    let Some(id) = action.row_id else {
                        return Err(HostError::Rejected(
                            "UpdateRecord requires a row id".to_string(),
                        ));
                    };
                    let Some(record) = table.iter_mut().find(|r| row_id(r).is_ok_and(|rid| rid == id)) else {
                        return Err(HostError::Rejected(format!(
                            "no row {id} in table {}",
                            action.table
                        )));
                    };
                    for (field, value) in &action.fields {
                        record.insert(field.clone(), value.clone());
                    }
                    debug!(table = %action.table, id, "updated record");
                }
            }
        }
        Ok(())
    }

    async fn set_option(&self, key: &str, value: Value) -> Result<()> {
        self.lock().options.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_selected_row(&self, row: Option<RowId>) -> Result<()> {
        self.lock().selected = row;
        Ok(())
    }
}

/// Re-encodes row records in columnar orientation, padding absent cells
/// with nulls.
fn to_columnar(records: &[Record]) -> RecordPayload {
    let mut columns: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for record in records {
        for name in record.keys() {
            columns.entry(name.clone()).or_default();
        }
    }
    for record in records {
        for (name, values) in &mut columns {
            values.push(record.get(name).cloned().unwrap_or(Value::Null));
        }
    }
    RecordPayload::Columnar(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HostApi;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).expect("record should parse")
    }

    fn host() -> MemoryHost {
        MemoryHost::new(Schema::default()).with_table(
            "Tasks",
            vec![
                record(json!({"id": 1, "Title": "one", "Status": "To Do"})),
                record(json!({"id": 2, "Title": "two"})),
            ],
        )
    }

    #[tokio::test]
    async fn fetch_is_columnar_and_padded() {
        let payload = host().fetch_table("Tasks").await.unwrap();
        let records = payload.into_records();
        assert_eq!(records.len(), 2);
        // Row 2 has no Status; the columnar encoding padded it with null.
        assert_eq!(records[1]["Status"], Value::Null);
    }

    #[tokio::test]
    async fn fetch_unknown_table_fails() {
        let err = host().fetch_table("Nope").await.unwrap_err();
        assert!(matches!(err, HostError::UnknownTable(_)));
    }

    #[tokio::test]
    async fn add_allocates_the_next_row_id() {
        let host = host();
        let mut fields = Record::new();
        fields.insert("Title".to_string(), json!("three"));

        host.apply_user_actions(&[UserAction::add("Tasks", fields)])
            .await
            .unwrap();

        assert_eq!(host.table_len("Tasks"), 3);
        assert_eq!(host.record("Tasks", 3).unwrap()["Title"], json!("three"));
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let host = host();
        let mut fields = Record::new();
        fields.insert("Status".to_string(), json!("Done"));

        host.apply_user_actions(&[UserAction::update("Tasks", 1, fields)])
            .await
            .unwrap();

        let updated = host.record("Tasks", 1).unwrap();
        assert_eq!(updated["Status"], json!("Done"));
        assert_eq!(updated["Title"], json!("one"));
    }

    #[tokio::test]
    async fn update_missing_row_is_rejected() {
        let host = host();
        let err = host
            .apply_user_actions(&[UserAction::update("Tasks", 99, Record::new())])
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Rejected(_)));
    }

    #[tokio::test]
    async fn fail_next_is_one_shot() {
        let host = host();
        host.fail_next("simulated outage");

        let err = host
            .apply_user_actions(&[UserAction::update("Tasks", 1, Record::new())])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("simulated outage"));

        // The next attempt goes through.
        host.apply_user_actions(&[UserAction::update("Tasks", 1, Record::new())])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn selection_and_options_are_recorded() {
        let host = host();
        host.set_selected_row(Some(2)).await.unwrap();
        assert_eq!(host.selected_row(), Some(2));

        host.set_selected_row(None).await.unwrap();
        assert_eq!(host.selected_row(), None);

        host.set_option("columns", json!("[]")).await.unwrap();
        assert_eq!(host.option("columns"), Some(json!("[]")));
    }
}
