//! Application state.
//!
//! Everything the board knows at a point in time lives in one [`AppState`]
//! value owned by the controller: the fetched record sets, the resolved
//! taxonomies, the active grouping dimension, filters, search, selection,
//! collapse flags, and the notice queue. Nothing here talks to the host;
//! the controller mutates this state and the view builder reads it.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use kanri_config::{GroupDimension, Taxonomy};
use kanri_protocol::{Assignee, AssigneeId, Priority, Project, ProjectId, Task, TaskId};

use crate::notice::Notice;

/// Equality filters applied to the visible task set.
///
/// Unset entries are skipped; set entries AND-combine. Persisted in the
/// session store across reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Keep only tasks of this project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,
    /// Keep only tasks of this priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Keep only tasks with this status value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Keep only tasks in this folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl FilterState {
    /// Returns `true` when no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.folder.is_none()
    }

    /// Returns `true` if the task passes every set filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(project) = self.project
            && task.project != Some(project)
        {
            return false;
        }
        if let Some(priority) = self.priority
            && task.priority != priority
        {
            return false;
        }
        if let Some(status) = self.status.as_deref()
            && task.status != status
        {
            return false;
        }
        if let Some(folder) = self.folder.as_deref()
            && task.folder.as_deref() != Some(folder)
        {
            return false;
        }
        true
    }
}

/// The complete mutable state of the board.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Visible (non-deleted) tasks, as of the last authoritative refresh.
    pub tasks: Vec<Task>,
    /// Project reference entities.
    pub projects: Vec<Project>,
    /// Assignee reference entities.
    pub assignees: Vec<Assignee>,
    /// Resolved taxonomy for the status dimension.
    pub status_taxonomy: Taxonomy,
    /// Resolved type list for the edit session.
    pub types: Vec<String>,
    /// The active grouping dimension.
    pub group_by: GroupDimension,
    /// Active equality filters.
    pub filters: FilterState,
    /// Active free-text search (already debounced).
    pub search: String,
    /// The selected task, if any.
    pub selected: Option<TaskId>,
    /// Ids of collapsed columns.
    pub collapsed: BTreeSet<String>,
    /// Whether a refresh is in flight.
    pub loading: bool,
    /// Pending user notices, oldest first.
    pub notices: VecDeque<Notice>,
    priority_taxonomy: Taxonomy,
}

impl AppState {
    /// Creates an empty state with default taxonomies.
    #[must_use]
    pub fn new(status_taxonomy: Taxonomy, types: Vec<String>) -> Self {
        Self {
            tasks: Vec::new(),
            projects: Vec::new(),
            assignees: Vec::new(),
            status_taxonomy,
            types,
            group_by: GroupDimension::default(),
            filters: FilterState::default(),
            search: String::new(),
            selected: None,
            collapsed: BTreeSet::new(),
            loading: false,
            notices: VecDeque::new(),
            priority_taxonomy: Taxonomy::priority(),
        }
    }

    /// The taxonomy of the active grouping dimension.
    #[must_use]
    pub fn active_taxonomy(&self) -> &Taxonomy {
        match self.group_by {
            GroupDimension::Status => &self.status_taxonomy,
            GroupDimension::Priority => &self.priority_taxonomy,
        }
    }

    /// Looks up a project by id.
    #[must_use]
    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// A project's display name, or `"Unknown"` for dangling references.
    #[must_use]
    pub fn project_name(&self, id: ProjectId) -> &str {
        self.project(id).map_or("Unknown", |p| p.name.as_str())
    }

    /// Looks up an assignee by id.
    #[must_use]
    pub fn assignee(&self, id: AssigneeId) -> Option<&Assignee> {
        self.assignees.iter().find(|a| a.id == id)
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Projects sorted by display name, for the filter dropdown.
    #[must_use]
    pub fn project_options(&self) -> Vec<&Project> {
        let mut options: Vec<_> = self.projects.iter().collect();
        options.sort_by(|a, b| a.name.cmp(&b.name));
        options
    }

    /// Distinct folder values of the visible task set, sorted, for the
    /// filter dropdown.
    #[must_use]
    pub fn folder_options(&self) -> Vec<String> {
        let folders: BTreeSet<_> = self
            .tasks
            .iter()
            .filter_map(|t| t.folder.clone())
            .collect();
        folders.into_iter().collect()
    }

    /// Clears the selection when the selected task is no longer present.
    pub fn reconcile_selection(&mut self) {
        if let Some(id) = self.selected
            && self.task(id).is_none()
        {
            self.selected = None;
        }
    }

    /// Flips a column's collapse flag; returns the new state.
    pub fn toggle_collapsed(&mut self, column_id: &str) -> bool {
        if self.collapsed.remove(column_id) {
            false
        } else {
            self.collapsed.insert(column_id.to_string());
            true
        }
    }

    /// Queues a notice for the user.
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// Drains all pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanri_config::{FieldMap, WidgetConfig, resolve_taxonomy, resolve_types};

    fn state() -> AppState {
        let config = WidgetConfig::new(FieldMap::named("Tasks"));
        AppState::new(
            resolve_taxonomy(GroupDimension::Status, None, &config),
            resolve_types(None, &config),
        )
    }

    fn task(id: i64, title: &str) -> Task {
        Task::new(id, title)
    }

    #[test]
    fn filters_and_combine() {
        let mut t = task(1, "a");
        t.project = Some(3);
        t.priority = Priority::High;
        t.folder = Some("2026".to_string());

        let mut filters = FilterState::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&t));

        filters.project = Some(3);
        filters.priority = Some(Priority::High);
        assert!(filters.matches(&t));

        filters.folder = Some("2025".to_string());
        assert!(!filters.matches(&t));
    }

    #[test]
    fn unset_folder_never_matches_a_folder_filter() {
        let filters = FilterState {
            folder: Some("2026".to_string()),
            ..FilterState::default()
        };
        assert!(!filters.matches(&task(1, "a")));
    }

    #[test]
    fn active_taxonomy_follows_the_dimension() {
        let mut state = state();
        assert_eq!(state.active_taxonomy().columns().len(), 6);

        state.group_by = GroupDimension::Priority;
        let labels: Vec<_> = state
            .active_taxonomy()
            .columns()
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["High", "Medium", "Low"]);
    }

    #[test]
    fn selection_clears_when_the_task_disappears() {
        let mut state = state();
        state.tasks = vec![task(1, "a")];
        state.selected = Some(1);

        state.reconcile_selection();
        assert_eq!(state.selected, Some(1));

        state.tasks.clear();
        state.reconcile_selection();
        assert_eq!(state.selected, None);
    }

    #[test]
    fn collapse_toggles_round_trip() {
        let mut state = state();
        assert!(state.toggle_collapsed("Done"));
        assert!(state.collapsed.contains("Done"));
        assert!(!state.toggle_collapsed("Done"));
        assert!(state.collapsed.is_empty());
    }

    #[test]
    fn dangling_project_reference_reads_unknown() {
        let state = state();
        assert_eq!(state.project_name(99), "Unknown");
    }

    #[test]
    fn folder_options_are_distinct_and_sorted() {
        let mut state = state();
        let mut a = task(1, "a");
        a.folder = Some("Zeta".to_string());
        let mut b = task(2, "b");
        b.folder = Some("Alpha".to_string());
        let mut c = task(3, "c");
        c.folder = Some("Zeta".to_string());
        state.tasks = vec![a, b, c, task(4, "d")];

        assert_eq!(state.folder_options(), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn notices_drain_in_order() {
        let mut state = state();
        state.push_notice(Notice::info("one"));
        state.push_notice(Notice::error("two"));

        let drained = state.take_notices();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "one");
        assert!(state.notices.is_empty());
    }

    #[test]
    fn filter_state_serialization_skips_unset_entries() {
        let json = serde_json::to_string(&FilterState::default()).unwrap();
        assert_eq!(json, "{}");

        let filters: FilterState = serde_json::from_str(r#"{"priority":"High"}"#).unwrap();
        assert_eq!(filters.priority, Some(Priority::High));
    }
}
