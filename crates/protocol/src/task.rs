//! Task-related types for the Kanban board.
//!
//! This module defines the core task types used throughout the kanri
//! application, including identifiers, the fixed priority scale, the task
//! structure itself, and the reference entities tasks point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row identifier assigned by the host record store.
///
/// The host allocates these; the engine never invents one.
pub type RowId = i64;

/// Unique identifier for a task (its host row id).
pub type TaskId = RowId;

/// Identifier of a project reference entity.
pub type ProjectId = RowId;

/// Identifier of an assignee reference entity.
pub type AssigneeId = RowId;

/// The fixed three-value priority scale.
///
/// Unlike the status taxonomy, the priority taxonomy is never derived from
/// the host schema: labels, colors, and ordering are built in.
///
/// # Examples
///
/// ```
/// use kanri_protocol::Priority;
///
/// assert_eq!(Priority::High.rank(), 1);
/// assert_eq!(Priority::default(), Priority::Low);
/// assert_eq!(Priority::from_label("medium"), Some(Priority::Medium));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    /// Urgent work; sorts first.
    High,
    /// Normal work.
    Medium,
    /// Low-urgency work; the default for new tasks.
    #[default]
    Low,
}

impl Priority {
    /// Returns all priorities in column order (High first).
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    /// Returns the display label, which is also the stored field value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Returns the fixed display color for this priority.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::High => "#ef4444",
            Self::Medium => "#f59e0b",
            Self::Low => "#3b82f6",
        }
    }

    /// Returns the 1-based column sort order (High=1, Medium=2, Low=3).
    #[must_use]
    pub const fn rank(self) -> u32 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Parses a stored label back into a priority, ignoring ASCII case.
    ///
    /// Returns `None` for unrecognized labels; callers fall back to
    /// [`Priority::default`] where the data model requires a value.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }
}

/// A task on the Kanban board.
///
/// One row in the host's task table, decoded through the deployment's field
/// mapping. Status and type are free strings drawn from the configured
/// taxonomies; the priority is the fixed scale.
///
/// Soft-deleted tasks (`deleted == true`) are excluded from every read;
/// deletion is a flag mutation, never a row removal.
///
/// # Examples
///
/// ```
/// use kanri_protocol::{Priority, Task};
///
/// let task = Task::new(7, "Prepare workshop");
/// assert_eq!(task.id, 7);
/// assert_eq!(task.priority, Priority::Low);
/// assert!(!task.deleted);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Host row identifier.
    pub id: TaskId,
    /// Short summary of the task.
    pub title: String,
    /// Longer free-text description.
    pub description: String,
    /// Status value drawn from the configured status taxonomy.
    pub status: String,
    /// Priority on the fixed scale.
    pub priority: Priority,
    /// Type value drawn from the configured type list.
    pub kind: String,
    /// When work is planned to begin, if set.
    pub start_date: Option<DateTime<Utc>>,
    /// When the task is due, if set.
    pub deadline: Option<DateTime<Utc>>,
    /// Foreign key to the project table, if set.
    pub project: Option<ProjectId>,
    /// Foreign keys to the assignee table; empty when unassigned.
    pub assignees: Vec<AssigneeId>,
    /// Free-form folder value used by the folder filter, if set.
    pub folder: Option<String>,
    /// Soft-delete flag; deleted tasks never render.
    pub deleted: bool,
    /// When the host last modified this row, if the deployment tracks it.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task with the given id and title and empty/default fields.
    ///
    /// Mostly useful in tests and sample data; real tasks are decoded from
    /// host records through a field mapping.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            status: String::new(),
            priority: Priority::default(),
            kind: String::new(),
            start_date: None,
            deadline: None,
            project: None,
            assignees: Vec::new(),
            folder: None,
            deleted: false,
            updated_at: None,
        }
    }

    /// Returns `true` if the deadline is strictly in the past at `now`.
    ///
    /// Tasks without a deadline are never overdue.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use kanri_protocol::Task;
    ///
    /// let now = Utc::now();
    /// let mut task = Task::new(1, "Ship it");
    /// assert!(!task.is_overdue(now));
    ///
    /// task.deadline = Some(now - Duration::days(1));
    /// assert!(task.is_overdue(now));
    /// ```
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }
}

/// A project reference entity, looked up by foreign key from tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Host row identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
}

/// An assignee reference entity; tasks hold a set of assignee ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// Host row identifier.
    pub id: AssigneeId,
    /// Display name.
    pub name: String,
}

impl Assignee {
    /// Returns the initials used for the avatar badge.
    ///
    /// See [`initials`].
    #[must_use]
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Derives avatar initials from a display name.
///
/// Takes the first letter of up to two whitespace-separated words,
/// uppercased. Empty names yield `"?"`.
///
/// # Examples
///
/// ```
/// use kanri_protocol::initials;
///
/// assert_eq!(initials("Ada Lovelace"), "AL");
/// assert_eq!(initials("plato"), "P");
/// assert_eq!(initials(""), "?");
/// ```
#[must_use]
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}
