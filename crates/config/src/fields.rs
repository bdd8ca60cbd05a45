//! Explicit field-name mapping for the host tables.
//!
//! The host stores tasks in user-named tables with user-named columns; which
//! column means "title" or "deadline" is a per-deployment decision. The
//! [`FieldMap`] resolves that indirection once, at startup, into typed
//! accessors. A missing required mapping is a configuration error surfaced
//! immediately, never a silent `null` at render time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kanri_protocol::{
    Assignee, Priority, Project, Record, Task, decode_epoch_date, decode_reference_list, row_id,
};

use crate::error::{ConfigError, Result};

fn default_deleted_column() -> String {
    "Deleted".to_string()
}

/// Maps the engine's logical fields onto the deployment's table and column
/// names.
///
/// All entries except `folder` and `updated_at` are required; [`validate`]
/// rejects empty mappings before any data is fetched.
///
/// [`validate`]: FieldMap::validate
///
/// # Examples
///
/// ```
/// use kanri_config::FieldMap;
///
/// let map = FieldMap {
///     title: "Title".to_string(),
///     ..FieldMap::named("Tasks")
/// };
/// // Most entries are still empty, so validation fails fast.
/// assert!(map.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    /// Name of the task table.
    pub table: String,
    /// Column holding the task title.
    pub title: String,
    /// Column holding the free-text description.
    pub description: String,
    /// Column holding the status value.
    pub status: String,
    /// Column holding the priority label.
    pub priority: String,
    /// Column holding the type value.
    pub kind: String,
    /// Column holding the deadline (epoch seconds).
    pub deadline: String,
    /// Column holding the start date (epoch seconds).
    pub start_date: String,
    /// Column holding the project foreign key.
    pub project: String,
    /// Column holding the assignee reference list.
    pub assignees: String,
    /// Column holding the folder value, when the deployment uses folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Column holding the soft-delete flag.
    #[serde(default = "default_deleted_column")]
    pub deleted: String,
    /// Column holding the last-modified timestamp, when tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Name of the project reference table.
    pub project_table: String,
    /// Column holding the project display name.
    pub project_name: String,
    /// Name of the assignee reference table.
    pub assignee_table: String,
    /// Column holding the assignee display name.
    pub assignee_name: String,
}

impl FieldMap {
    /// Creates a mapping skeleton for the given task table with every other
    /// entry empty. Useful as a `..` base in tests and builders; the result
    /// does not validate until the remaining entries are filled in.
    #[must_use]
    pub fn named(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            title: String::new(),
            description: String::new(),
            status: String::new(),
            priority: String::new(),
            kind: String::new(),
            deadline: String::new(),
            start_date: String::new(),
            project: String::new(),
            assignees: String::new(),
            folder: None,
            deleted: default_deleted_column(),
            updated_at: None,
            project_table: String::new(),
            project_name: String::new(),
            assignee_table: String::new(),
            assignee_name: String::new(),
        }
    }

    /// The mapping for the sample tables shipped in `kanri-protocol`, used
    /// by the demo binary and by tests exercising the full read path.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            title: "Title".to_string(),
            description: "Notes".to_string(),
            status: "Status".to_string(),
            priority: "Priority".to_string(),
            kind: "Kind".to_string(),
            deadline: "Due".to_string(),
            start_date: "Start".to_string(),
            project: "Project".to_string(),
            assignees: "Crew".to_string(),
            folder: Some("Folder".to_string()),
            deleted: "Removed".to_string(),
            updated_at: Some("Updated".to_string()),
            project_table: "Projects".to_string(),
            project_name: "Name".to_string(),
            assignee_table: "Crew".to_string(),
            assignee_name: "Name".to_string(),
            ..Self::named("Tasks")
        }
    }

    /// Checks that every required mapping is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFieldMapping`] naming the first absent
    /// entry.
    pub fn validate(&self) -> Result<()> {
        let required: [(&'static str, &str); 15] = [
            ("table", &self.table),
            ("title", &self.title),
            ("description", &self.description),
            ("status", &self.status),
            ("priority", &self.priority),
            ("kind", &self.kind),
            ("deadline", &self.deadline),
            ("start_date", &self.start_date),
            ("project", &self.project),
            ("assignees", &self.assignees),
            ("deleted", &self.deleted),
            ("project_table", &self.project_table),
            ("project_name", &self.project_name),
            ("assignee_table", &self.assignee_table),
            ("assignee_name", &self.assignee_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingFieldMapping { name });
            }
        }
        Ok(())
    }

    /// Decodes a task record through this mapping.
    ///
    /// Absent cells decode to defined defaults: empty strings, `Low`
    /// priority, empty assignee set, unset dates. Only a missing or
    /// malformed row identifier is an error.
    ///
    /// # Errors
    ///
    /// Propagates row-identifier errors from [`kanri_protocol::row_id`].
    pub fn task_from_record(&self, record: &Record) -> kanri_protocol::Result<Task> {
        let mut task = Task::new(row_id(record)?, self.string(record, &self.title));
        task.description = self.string(record, &self.description);
        task.status = self.string(record, &self.status);
        task.priority = record
            .get(&self.priority)
            .and_then(Value::as_str)
            .and_then(Priority::from_label)
            .unwrap_or_default();
        task.kind = self.string(record, &self.kind);
        task.deadline = record.get(&self.deadline).and_then(decode_epoch_date);
        task.start_date = record.get(&self.start_date).and_then(decode_epoch_date);
        task.project = record
            .get(&self.project)
            .and_then(Value::as_i64)
            .filter(|id| *id > 0);
        task.assignees = record
            .get(&self.assignees)
            .map(decode_reference_list)
            .unwrap_or_default();
        task.folder = self
            .folder
            .as_ref()
            .and_then(|column| record.get(column))
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        task.deleted = record
            .get(&self.deleted)
            .is_some_and(|value| value.as_bool().unwrap_or(false));
        task.updated_at = self
            .updated_at
            .as_ref()
            .and_then(|column| record.get(column))
            .and_then(decode_epoch_date);
        Ok(task)
    }

    /// Decodes a project record; `None` when the id or name is absent.
    #[must_use]
    pub fn project_from_record(&self, record: &Record) -> Option<Project> {
        Some(Project {
            id: row_id(record).ok()?,
            name: named(record, &self.project_name)?,
        })
    }

    /// Decodes an assignee record; `None` when the id or name is absent.
    #[must_use]
    pub fn assignee_from_record(&self, record: &Record) -> Option<Assignee> {
        Some(Assignee {
            id: row_id(record).ok()?,
            name: named(record, &self.assignee_name)?,
        })
    }

    fn string(&self, record: &Record, column: &str) -> String {
        record
            .get(column)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

fn named(record: &Record, column: &str) -> Option<String> {
    record
        .get(column)
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
