//! The board view-model.
//!
//! A structured, render-backend-agnostic description of the board: one
//! column per taxonomy entry in order, each with its header metadata and
//! ordered card views. The engine stops here; markup is someone else's
//! problem.

use chrono::{DateTime, Utc};

use kanri_config::GroupDimension;
use kanri_protocol::{Task, TaskId, initials};

use crate::filter::visible_columns;
use crate::state::AppState;

/// Longest project label rendered on a card before truncation.
const PROJECT_LABEL_MAX: usize = 10;

/// Avatars shown per card before collapsing into an overflow count.
const AVATAR_MAX: usize = 3;

/// Neutral badge color for values without their own display color.
const NEUTRAL_BADGE_COLOR: &str = "#6b7280";

/// The whole board, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    /// Columns in taxonomy order.
    pub columns: Vec<ColumnView>,
    /// Total visible cards across all columns, collapsed ones included.
    pub total: usize,
}

/// One column of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    /// Column id (the stored grouping value).
    pub id: String,
    /// Header label.
    pub label: String,
    /// Header accent color.
    pub color: String,
    /// Whether the column is collapsed.
    pub collapsed: bool,
    /// Card count for the header; suppressed while collapsed.
    pub count: Option<usize>,
    /// Cards in column-local order; empty while collapsed.
    pub cards: Vec<CardView>,
    /// Whether the add-card affordance is shown.
    pub can_add: bool,
    /// Whether to render the empty-column placeholder.
    pub empty: bool,
}

/// A colored label chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Chip text.
    pub label: String,
    /// Chip color.
    pub color: String,
}

/// The project chip: truncated for display, full for hover text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectBadge {
    /// Possibly truncated display text.
    pub display: String,
    /// The full project name.
    pub full: String,
}

/// An assignee avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    /// Up to two uppercased initials.
    pub initials: String,
    /// Full name for hover text; `"Unknown"` for dangling references.
    pub name: String,
}

/// A card's deadline chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineView {
    /// The deadline itself.
    pub date: DateTime<Utc>,
    /// Whether the deadline is strictly past render time.
    pub overdue: bool,
}

/// One card on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    /// The task's row id.
    pub id: TaskId,
    /// Card title.
    pub title: String,
    /// Priority chip; suppressed when grouping by priority.
    pub priority: Option<Badge>,
    /// Project chip, when the task has a project.
    pub project: Option<ProjectBadge>,
    /// Status chip; suppressed when grouping by status.
    pub status: Option<Badge>,
    /// Type chip, when the task has a type.
    pub kind: Option<Badge>,
    /// Up to three assignee avatars.
    pub avatars: Vec<Avatar>,
    /// How many further assignees the avatars omit.
    pub avatar_overflow: usize,
    /// Deadline chip, when the task has a deadline.
    pub deadline: Option<DeadlineView>,
    /// Accent color from the active dimension's column.
    pub accent: String,
    /// Whether this card is the selection.
    pub selected: bool,
}

/// Builds the board view-model from the current state.
///
/// `now` anchors overdue highlighting; `read_only` suppresses the add
/// affordances.
#[must_use]
pub fn board_view(state: &AppState, read_only: bool, now: DateTime<Utc>) -> BoardView {
    let taxonomy = state.active_taxonomy();
    let terminal_statuses = state.status_taxonomy.terminal_ids();
    let partition = visible_columns(
        &state.tasks,
        taxonomy,
        state.group_by,
        &terminal_statuses,
        &state.filters,
        &state.search,
    );

    let total = partition.iter().map(|c| c.tasks.len()).sum();
    // The partition is in taxonomy order, one bucket per column.
    let columns = taxonomy
        .columns()
        .iter()
        .zip(partition)
        .map(|(column, bucket)| {
            let collapsed = state.collapsed.contains(&bucket.id);
            let cards = if collapsed {
                Vec::new()
            } else {
                bucket
                    .tasks
                    .iter()
                    .map(|task| card_view(state, task, &column.color, now))
                    .collect()
            };
            ColumnView {
                empty: bucket.tasks.is_empty(),
                count: (!collapsed).then_some(bucket.tasks.len()),
                can_add: !collapsed && !read_only,
                id: column.id.clone(),
                label: column.label.clone(),
                color: column.color.clone(),
                collapsed,
                cards,
            }
        })
        .collect();

    BoardView { columns, total }
}

fn card_view(state: &AppState, task: &Task, accent: &str, now: DateTime<Utc>) -> CardView {
    let priority = (state.group_by != GroupDimension::Priority).then(|| Badge {
        label: task.priority.label().to_string(),
        color: task.priority.color().to_string(),
    });

    let status = (state.group_by != GroupDimension::Status && !task.status.is_empty()).then(|| {
        Badge {
            label: task.status.clone(),
            color: state
                .status_taxonomy
                .get(&task.status)
                .map_or(NEUTRAL_BADGE_COLOR, |c| c.color.as_str())
                .to_string(),
        }
    });

    let kind = (!task.kind.is_empty()).then(|| Badge {
        label: task.kind.clone(),
        color: NEUTRAL_BADGE_COLOR.to_string(),
    });

    let project = task.project.map(|id| {
        let full = state.project_name(id).to_string();
        ProjectBadge {
            display: truncate_label(&full, PROJECT_LABEL_MAX),
            full,
        }
    });

    let avatars = task
        .assignees
        .iter()
        .take(AVATAR_MAX)
        .map(|id| {
            let name = state
                .assignee(*id)
                .map_or("Unknown", |a| a.name.as_str())
                .to_string();
            Avatar {
                initials: initials(&name),
                name,
            }
        })
        .collect();

    CardView {
        id: task.id,
        title: task.title.clone(),
        priority,
        project,
        status,
        kind,
        avatars,
        avatar_overflow: task.assignees.len().saturating_sub(AVATAR_MAX),
        deadline: task.deadline.map(|date| DeadlineView {
            date,
            overdue: now > date,
        }),
        accent: accent.to_string(),
        selected: state.selected == Some(task.id),
    }
}

fn truncate_label(label: &str, max: usize) -> String {
    let mut chars = label.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use kanri_config::{FieldMap, WidgetConfig, resolve_taxonomy, resolve_types};
    use kanri_protocol::{Assignee, Priority, Project};

    fn state() -> AppState {
        let config = WidgetConfig::new(FieldMap::named("Tasks"));
        AppState::new(
            resolve_taxonomy(GroupDimension::Status, None, &config),
            resolve_types(None, &config),
        )
    }

    fn task(id: i64, status: &str) -> Task {
        let mut task = Task::new(id, format!("task {id}"));
        task.status = status.to_string();
        task
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_board_renders_placeholders_only() {
        let view = board_view(&state(), false, now());
        assert_eq!(view.total, 0);
        assert_eq!(view.columns.len(), 6);
        for column in &view.columns {
            assert!(column.empty);
            assert!(column.cards.is_empty());
            assert_eq!(column.count, Some(0));
        }
    }

    #[test]
    fn collapsed_column_suppresses_count_cards_and_add() {
        let mut state = state();
        state.tasks = vec![task(1, "To Do")];
        state.collapsed.insert("To Do".to_string());

        let view = board_view(&state, false, now());
        let column = view.columns.iter().find(|c| c.id == "To Do").unwrap();
        assert!(column.collapsed);
        assert_eq!(column.count, None);
        assert!(column.cards.is_empty());
        assert!(!column.can_add);

        // The hidden card still counts toward the board total.
        assert_eq!(view.total, 1);
    }

    #[test]
    fn read_only_board_has_no_add_affordance() {
        let view = board_view(&state(), true, now());
        assert!(view.columns.iter().all(|c| !c.can_add));
    }

    #[test]
    fn priority_badge_is_suppressed_on_the_priority_board() {
        let mut state = state();
        let mut t = task(1, "To Do");
        t.priority = Priority::High;
        state.tasks = vec![t];

        let view = board_view(&state, false, now());
        let card = &view.columns.iter().find(|c| c.id == "To Do").unwrap().cards[0];
        assert!(card.priority.is_some());
        assert!(card.status.is_none());

        state.group_by = GroupDimension::Priority;
        let view = board_view(&state, false, now());
        let card = &view.columns.iter().find(|c| c.id == "High").unwrap().cards[0];
        assert!(card.priority.is_none());
        assert_eq!(card.status.as_ref().unwrap().label, "To Do");
    }

    #[test]
    fn project_badge_truncates_but_keeps_the_full_name() {
        let mut state = state();
        state.projects = vec![Project {
            id: 3,
            name: "Accessibility Program".to_string(),
        }];
        let mut t = task(1, "To Do");
        t.project = Some(3);
        state.tasks = vec![t];

        let view = board_view(&state, false, now());
        let card = &view.columns.iter().find(|c| c.id == "To Do").unwrap().cards[0];
        let badge = card.project.as_ref().unwrap();
        assert_eq!(badge.display, "Accessibil…");
        assert_eq!(badge.full, "Accessibility Program");
    }

    #[test]
    fn avatars_cap_at_three_with_overflow() {
        let mut state = state();
        state.assignees = (1..=5)
            .map(|id| Assignee {
                id,
                name: format!("Person {id}"),
            })
            .collect();
        let mut t = task(1, "To Do");
        t.assignees = vec![1, 2, 3, 4, 5];
        state.tasks = vec![t];

        let view = board_view(&state, false, now());
        let card = &view.columns.iter().find(|c| c.id == "To Do").unwrap().cards[0];
        assert_eq!(card.avatars.len(), 3);
        assert_eq!(card.avatar_overflow, 2);
        assert_eq!(card.avatars[0].initials, "P1");
    }

    #[test]
    fn dangling_assignee_renders_unknown() {
        let mut state = state();
        let mut t = task(1, "To Do");
        t.assignees = vec![42];
        state.tasks = vec![t];

        let view = board_view(&state, false, now());
        let card = &view.columns.iter().find(|c| c.id == "To Do").unwrap().cards[0];
        assert_eq!(card.avatars[0].name, "Unknown");
        assert_eq!(card.avatars[0].initials, "U");
    }

    #[test]
    fn overdue_is_strictly_past_render_time() {
        let mut state = state();
        let mut due = task(1, "To Do");
        due.deadline = Some(now() - Duration::hours(1));
        let mut exact = task(2, "To Do");
        exact.deadline = Some(now());
        state.tasks = vec![due, exact];

        let view = board_view(&state, false, now());
        let cards = &view.columns.iter().find(|c| c.id == "To Do").unwrap().cards;
        let by_id = |id: i64| cards.iter().find(|c| c.id == id).unwrap();
        assert!(by_id(1).deadline.unwrap().overdue);
        assert!(!by_id(2).deadline.unwrap().overdue);
    }

    #[test]
    fn selection_highlights_exactly_one_card() {
        let mut state = state();
        state.tasks = vec![task(1, "To Do"), task(2, "To Do")];
        state.selected = Some(2);

        let view = board_view(&state, false, now());
        let cards = &view.columns.iter().find(|c| c.id == "To Do").unwrap().cards;
        assert_eq!(cards.iter().filter(|c| c.selected).count(), 1);
        assert!(cards.iter().find(|c| c.id == 2).unwrap().selected);
    }

    #[test]
    fn accent_comes_from_the_active_column() {
        let mut state = state();
        state.tasks = vec![task(1, "To Do")];
        let color = state.status_taxonomy.get("To Do").unwrap().color.clone();

        let view = board_view(&state, false, now());
        let card = &view.columns.iter().find(|c| c.id == "To Do").unwrap().cards[0];
        assert_eq!(card.accent, color);
    }

    #[test]
    fn truncate_label_is_char_aware() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("ééééééééééé", 10), "éééééééééé…");
    }
}
