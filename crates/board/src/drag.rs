//! Drag-and-drop reconciliation primitives.
//!
//! A drop writes exactly one field: the status column on the status board,
//! the priority column on the priority board. The controller applies the
//! mutation optimistically, issues the remote update, and re-fetches
//! authoritative state whether the update succeeded or not, so an
//! optimistic edit is never left unreconciled.

use serde_json::Value;

use kanri_config::{FieldMap, GroupDimension};
use kanri_protocol::{Priority, Record, Task};

/// How a drop gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The card was dropped back into its own column; nothing was written.
    SameColumn,
    /// The remote update committed.
    Committed {
        /// Whether the target column carries the celebration flag.
        celebrate: bool,
    },
    /// The remote update failed; authoritative state was re-fetched.
    Reverted,
}

/// The column name a drop writes under the given dimension.
#[must_use]
pub fn drop_field<'a>(dimension: GroupDimension, fields: &'a FieldMap) -> &'a str {
    match dimension {
        GroupDimension::Status => &fields.status,
        GroupDimension::Priority => &fields.priority,
    }
}

/// The single-field payload of a drop into `target`.
#[must_use]
pub fn drop_payload(dimension: GroupDimension, fields: &FieldMap, target: &str) -> Record {
    let mut payload = Record::new();
    payload.insert(
        drop_field(dimension, fields).to_string(),
        Value::from(target),
    );
    payload
}

/// Applies a drop to the in-memory task (the optimistic half).
pub fn apply_drop(task: &mut Task, dimension: GroupDimension, target: &str) {
    match dimension {
        GroupDimension::Status => task.status = target.to_string(),
        GroupDimension::Priority => {
            task.priority = Priority::from_label(target).unwrap_or_default();
        }
    }
}
