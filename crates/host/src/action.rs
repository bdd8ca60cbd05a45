//! User actions applied against the host record store.
//!
//! Every mutation the widget makes (create, field update, soft delete)
//! travels as an ordered list of user actions. On the wire each action is a
//! positional array: `[verb, table, row id or null, field payload]`.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use kanri_protocol::{Record, RowId};

/// The verb of a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionVerb {
    /// Create a new row; the host allocates the id.
    AddRecord,
    /// Update fields of an existing row.
    UpdateRecord,
}

impl ActionVerb {
    /// The wire name of the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddRecord => "AddRecord",
            Self::UpdateRecord => "UpdateRecord",
        }
    }
}

/// A single user action: verb, table, optional row id, field payload.
///
/// # Examples
///
/// ```
/// use kanri_host::UserAction;
/// use kanri_protocol::Record;
/// use serde_json::json;
///
/// let mut fields = Record::new();
/// fields.insert("Status".to_string(), json!("Done"));
///
/// let action = UserAction::update("Tasks", 7, fields);
/// let wire = serde_json::to_value(&action).unwrap();
/// assert_eq!(wire, json!(["UpdateRecord", "Tasks", 7, {"Status": "Done"}]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UserAction {
    /// What to do.
    pub verb: ActionVerb,
    /// The table to act on.
    pub table: String,
    /// The target row; `None` for creation.
    pub row_id: Option<RowId>,
    /// The fields to write.
    pub fields: Record,
}

impl UserAction {
    /// Creates an `AddRecord` action (row id null; the host assigns one).
    #[must_use]
    pub fn add(table: impl Into<String>, fields: Record) -> Self {
        Self {
            verb: ActionVerb::AddRecord,
            table: table.into(),
            row_id: None,
            fields,
        }
    }

    /// Creates an `UpdateRecord` action against an existing row.
    #[must_use]
    pub fn update(table: impl Into<String>, row_id: RowId, fields: Record) -> Self {
        Self {
            verb: ActionVerb::UpdateRecord,
            table: table.into(),
            row_id: Some(row_id),
            fields,
        }
    }
}

impl Serialize for UserAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(self.verb.as_str())?;
        seq.serialize_element(&self.table)?;
        seq.serialize_element(&self.row_id)?;
        seq.serialize_element(&self.fields)?;
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_serializes_with_null_row_id() {
        let mut fields = Record::new();
        fields.insert("Title".to_string(), json!("New task"));

        let wire = serde_json::to_value(UserAction::add("Tasks", fields)).unwrap();
        assert_eq!(wire, json!(["AddRecord", "Tasks", null, {"Title": "New task"}]));
    }

    #[test]
    fn update_serializes_positionally() {
        let mut fields = Record::new();
        fields.insert("Priority".to_string(), json!("High"));
        fields.insert("Removed".to_string(), json!(true));

        let wire = serde_json::to_value(UserAction::update("Tasks", 12, fields)).unwrap();
        assert_eq!(
            wire,
            json!(["UpdateRecord", "Tasks", 12, {"Priority": "High", "Removed": true}])
        );
    }

    #[test]
    fn verb_wire_names() {
        assert_eq!(ActionVerb::AddRecord.as_str(), "AddRecord");
        assert_eq!(ActionVerb::UpdateRecord.as_str(), "UpdateRecord");
    }
}
