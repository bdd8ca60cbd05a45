//! The filter and grouping engine.
//!
//! A pure function from the task set and the view inputs (taxonomy,
//! dimension, filters, search) to ordered columns of tasks. Re-runs on
//! every input change; never mutates anything.
//!
//! The partition contract: every visible task lands in exactly one column
//! (unrecognized grouping values map to the taxonomy fallback), so the
//! union of the columns is the filtered set and columns are pairwise
//! disjoint.

use std::cmp::Ordering;

use kanri_config::{GroupDimension, Taxonomy};
use kanri_protocol::Task;

use crate::state::FilterState;

/// One column's worth of filtered, ordered tasks.
#[derive(Debug, Clone)]
pub struct ColumnTasks<'a> {
    /// The column id (a status value or priority label).
    pub id: String,
    /// Tasks in column-local order.
    pub tasks: Vec<&'a Task>,
}

/// The column a task belongs to under the given dimension.
///
/// Unrecognized or absent values map to the taxonomy fallback, so the
/// result always names a real column.
#[must_use]
pub fn column_id_for<'t>(taxonomy: &'t Taxonomy, dimension: GroupDimension, task: &Task) -> &'t str {
    let value = match dimension {
        GroupDimension::Status => task.status.as_str(),
        GroupDimension::Priority => task.priority.label(),
    };
    taxonomy
        .get(value)
        .map_or(taxonomy.fallback_id(), |c| c.id.as_str())
}

/// Partitions the visible task set into ordered columns.
///
/// In order: soft-deleted tasks are dropped, equality filters AND-combine,
/// the search needle matches title or description case-insensitively, and
/// on the priority board tasks whose status is in `terminal_statuses` are
/// hidden. Each task then lands in exactly one column of `taxonomy`, and
/// columns sort locally: terminal columns newest-updated first, the rest
/// by deadline ascending with undated tasks last, ties broken by id
/// descending.
#[must_use]
pub fn visible_columns<'a>(
    tasks: &'a [Task],
    taxonomy: &Taxonomy,
    dimension: GroupDimension,
    terminal_statuses: &[&str],
    filters: &FilterState,
    search: &str,
) -> Vec<ColumnTasks<'a>> {
    let needle = search.trim().to_lowercase();
    let mut columns: Vec<ColumnTasks<'a>> = taxonomy
        .columns()
        .iter()
        .map(|c| ColumnTasks {
            id: c.id.clone(),
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        if task.deleted || !filters.matches(task) || !matches_search(task, &needle) {
            continue;
        }
        if dimension == GroupDimension::Priority
            && terminal_statuses.contains(&task.status.as_str())
        {
            continue;
        }
        let id = column_id_for(taxonomy, dimension, task);
        if let Some(column) = columns.iter_mut().find(|c| c.id == id) {
            column.tasks.push(task);
        }
    }

    for column in &mut columns {
        if taxonomy.is_terminal(&column.id) {
            column.tasks.sort_by(|a, b| cmp_recent_first(a, b));
        } else {
            column.tasks.sort_by(|a, b| cmp_deadline_first(a, b));
        }
    }
    columns
}

fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

/// Terminal-column order: last update descending, never-updated last.
fn cmp_recent_first(a: &Task, b: &Task) -> Ordering {
    match (a.updated_at, b.updated_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.id.cmp(&a.id))
}

/// Active-column order: deadline ascending, undated last.
fn cmp_deadline_first(a: &Task, b: &Task) -> Ordering {
    match (a.deadline, b.deadline) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.id.cmp(&a.id))
}
