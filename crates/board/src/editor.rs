//! The task edit session.
//!
//! A modal-scoped draft of one task, seeded either empty (create) or from
//! an existing task (edit). Values from older data that no longer match a
//! configured status or type key are remapped by display label where
//! possible. Validation gates submission; the controller turns a valid
//! draft into a create or update action keyed on id presence.

use chrono::{DateTime, Utc};
use serde_json::Value;

use kanri_config::{FieldMap, GroupDimension, Taxonomy};
use kanri_protocol::{
    AssigneeId, Priority, ProjectId, Record, Task, TaskId, encode_epoch_date,
    encode_reference_list,
};

/// Draft validation failures; each blocks submission with a user-visible
/// warning and no remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// The title is empty or whitespace.
    #[error("a task needs a title")]
    TitleRequired,

    /// No project reference is set.
    #[error("a task needs a project")]
    ProjectRequired,
}

/// A draft of one task being created or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    /// The task being edited; `None` while creating.
    pub task_id: Option<TaskId>,
    /// Draft title.
    pub title: String,
    /// Draft description.
    pub description: String,
    /// Draft status value.
    pub status: String,
    /// Draft priority.
    pub priority: Priority,
    /// Draft type value.
    pub kind: String,
    /// Draft start date.
    pub start_date: Option<DateTime<Utc>>,
    /// Draft deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Draft project reference.
    pub project: Option<ProjectId>,
    /// Draft assignee set.
    pub assignees: Vec<AssigneeId>,
}

impl EditSession {
    /// Starts a create draft.
    ///
    /// Seeds today as the start date, the lowest priority, and the first
    /// configured type. When opened from a column's add affordance,
    /// `target_column` seeds the grouping field of the active dimension;
    /// the status otherwise defaults to the taxonomy fallback.
    #[must_use]
    pub fn create(
        status_taxonomy: &Taxonomy,
        types: &[String],
        dimension: GroupDimension,
        target_column: Option<&str>,
        today: DateTime<Utc>,
    ) -> Self {
        let mut session = Self {
            task_id: None,
            title: String::new(),
            description: String::new(),
            status: status_taxonomy.fallback_id().to_string(),
            priority: Priority::default(),
            kind: types.first().cloned().unwrap_or_default(),
            start_date: Some(today),
            deadline: None,
            project: None,
            assignees: Vec::new(),
        };
        if let Some(target) = target_column {
            match dimension {
                GroupDimension::Status => session.status = target.to_string(),
                GroupDimension::Priority => {
                    session.priority = Priority::from_label(target).unwrap_or_default();
                }
            }
        }
        session
    }

    /// Starts an edit draft seeded from a task.
    ///
    /// Status and type values that no longer key into the configured
    /// entries are remapped by display label when a case-insensitive match
    /// exists; otherwise the stored value is kept as-is.
    #[must_use]
    pub fn edit(task: &Task, status_taxonomy: &Taxonomy, types: &[String]) -> Self {
        Self {
            task_id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            status: remap_status(&task.status, status_taxonomy),
            priority: task.priority,
            kind: remap_type(&task.kind, types),
            start_date: task.start_date,
            deadline: task.deadline,
            project: task.project,
            assignees: task.assignees.clone(),
        }
    }

    /// Returns `true` when saving will create a new task.
    #[must_use]
    pub fn is_create(&self) -> bool {
        self.task_id.is_none()
    }

    /// Checks the draft against the submission rules.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), EditError> {
        if self.title.trim().is_empty() {
            return Err(EditError::TitleRequired);
        }
        if self.project.is_none() {
            return Err(EditError::ProjectRequired);
        }
        Ok(())
    }

    /// Builds the full field payload for the save action.
    ///
    /// Dates travel as epoch seconds and an empty assignee set as null.
    #[must_use]
    pub fn payload(&self, fields: &FieldMap) -> Record {
        let mut payload = Record::new();
        payload.insert(fields.title.clone(), Value::from(self.title.trim()));
        payload.insert(
            fields.description.clone(),
            Value::from(self.description.as_str()),
        );
        payload.insert(fields.status.clone(), Value::from(self.status.as_str()));
        payload.insert(fields.priority.clone(), Value::from(self.priority.label()));
        payload.insert(fields.kind.clone(), Value::from(self.kind.as_str()));
        payload.insert(fields.start_date.clone(), encode_epoch_date(self.start_date));
        payload.insert(fields.deadline.clone(), encode_epoch_date(self.deadline));
        payload.insert(
            fields.project.clone(),
            self.project.map_or(Value::Null, Value::from),
        );
        payload.insert(
            fields.assignees.clone(),
            encode_reference_list(&self.assignees),
        );
        payload
    }
}

fn remap_status(stored: &str, taxonomy: &Taxonomy) -> String {
    if taxonomy.get(stored).is_some() {
        return stored.to_string();
    }
    taxonomy
        .columns()
        .iter()
        .find(|c| c.label.eq_ignore_ascii_case(stored))
        .map_or_else(|| stored.to_string(), |c| c.id.clone())
}

fn remap_type(stored: &str, types: &[String]) -> String {
    if types.iter().any(|t| t == stored) {
        return stored.to_string();
    }
    types
        .iter()
        .find(|t| t.eq_ignore_ascii_case(stored))
        .map_or_else(|| stored.to_string(), Clone::clone)
}
