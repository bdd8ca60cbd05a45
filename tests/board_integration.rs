//! End-to-end tests: controller against the in-memory host, through the
//! real read path (columnar payloads, field mapping, taxonomy resolution).

use serde_json::json;
use tempfile::TempDir;

use kanri_board::{BoardController, DragOutcome, FilterState, NoticeKind};
use kanri_config::{FieldMap, GroupDimension, Schema, SessionStore, WidgetConfig};
use kanri_host::MemoryHost;
use kanri_protocol::{Priority, sample};

fn sample_host() -> MemoryHost {
    MemoryHost::new(Schema::default())
        .with_table("Tasks", sample::tasks())
        .with_table("Projects", sample::projects())
        .with_table("Crew", sample::crew())
}

fn config() -> WidgetConfig {
    WidgetConfig::new(FieldMap::sample())
}

async fn connect(dir: &TempDir) -> BoardController<MemoryHost> {
    BoardController::connect(sample_host(), config(), SessionStore::at(dir.path()))
        .await
        .expect("connect should succeed")
}

#[tokio::test]
async fn board_totals_match_the_visible_task_set() {
    let dir = TempDir::new().unwrap();
    let controller = connect(&dir).await;

    let view = controller.view(chrono::Utc::now());
    // Six sample rows, one soft-deleted.
    assert_eq!(view.total, 5);
    assert_eq!(view.columns.len(), 6);

    let done = view.columns.iter().find(|c| c.id == "Done").unwrap();
    assert_eq!(done.count, Some(1));
}

#[tokio::test]
async fn create_round_trips_through_the_host() {
    let dir = TempDir::new().unwrap();
    let mut controller = connect(&dir).await;

    controller.open_create(Some("Waiting"));
    {
        let draft = controller.editor_mut().unwrap();
        draft.title = "Order new door closers".to_string();
        draft.project = Some(1);
        draft.assignees = vec![2];
    }
    assert!(controller.save_editor().await);
    assert!(controller.editor().is_none());

    // The refresh after the save picked up the host-allocated row.
    let created = controller
        .state()
        .tasks
        .iter()
        .find(|t| t.title == "Order new door closers")
        .expect("created task should be fetched back");
    assert_eq!(created.status, "Waiting");
    assert_eq!(created.project, Some(1));
    assert_eq!(created.assignees, vec![2]);
    assert!(created.start_date.is_some());
}

#[tokio::test]
async fn validation_blocks_the_save_without_a_remote_call() {
    let dir = TempDir::new().unwrap();
    let mut controller = connect(&dir).await;
    let before = controller.state().tasks.len();

    controller.open_create(None);
    assert!(!controller.save_editor().await);
    assert!(controller.editor().is_some());

    let notices = controller.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Warning);
    assert_eq!(controller.state().tasks.len(), before);
}

#[tokio::test]
async fn drag_moves_the_card_and_mutates_one_field() {
    let dir = TempDir::new().unwrap();
    let mut controller = connect(&dir).await;
    let before = controller.state().task(1).unwrap().clone();

    let outcome = controller.drop_card(1, "Done").await;
    assert_eq!(outcome, DragOutcome::Committed { celebrate: true });

    let after = controller.state().task(1).unwrap();
    assert_eq!(after.status, "Done");
    assert_eq!(after.priority, before.priority);
    assert_eq!(after.title, before.title);

    let notices = controller.take_notices();
    assert_eq!(notices[0].kind, NoticeKind::Success);
}

#[tokio::test]
async fn priority_board_drops_route_to_the_priority_field() {
    let dir = TempDir::new().unwrap();
    let mut controller = connect(&dir).await;
    controller.set_group_by(GroupDimension::Priority);

    // Task 3 is Low priority and in "Waiting".
    let outcome = controller.drop_card(3, "High").await;
    assert_eq!(outcome, DragOutcome::Committed { celebrate: false });

    let task = controller.state().task(3).unwrap();
    assert_eq!(task.priority, Priority::High);
    // The status field was untouched.
    assert_eq!(task.status, "Waiting");
}

#[tokio::test]
async fn failed_drop_reverts_through_the_refresh() {
    let dir = TempDir::new().unwrap();
    let host = sample_host();
    host.fail_next("update rejected");
    let mut controller = BoardController::connect(host, config(), SessionStore::at(dir.path()))
        .await
        .unwrap();

    let outcome = controller.drop_card(1, "Done").await;
    assert_eq!(outcome, DragOutcome::Reverted);

    // The optimistic move was reconciled away by the authoritative fetch.
    assert_eq!(controller.state().task(1).unwrap().status, "To Do");
    let notices = controller.take_notices();
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert!(notices[0].message.contains("update rejected"));
}

#[tokio::test]
async fn delete_is_a_soft_delete_and_needs_confirmation() {
    let dir = TempDir::new().unwrap();
    let host = sample_host();
    let mut controller = BoardController::connect(host, config(), SessionStore::at(dir.path()))
        .await
        .unwrap();

    controller.delete_task(2, false).await;
    assert!(controller.state().task(2).is_some());

    controller.delete_task(2, true).await;
    assert!(controller.state().task(2).is_none());
}

#[tokio::test]
async fn deleted_rows_stay_in_the_host_table() {
    let dir = TempDir::new().unwrap();
    let mut controller = connect(&dir).await;

    controller.delete_task(2, true).await;
    // Five visible sample tasks minus the deleted one.
    assert_eq!(controller.state().tasks.len(), 4);
    let view = controller.view(chrono::Utc::now());
    assert_eq!(view.total, 4);
}

#[tokio::test]
async fn overdue_sweep_promotes_in_one_batch() {
    let dir = TempDir::new().unwrap();
    let mut controller = connect(&dir).await;

    // Sample task 2 is Medium priority with a deadline two days past.
    controller.sweep_overdue().await;
    assert_eq!(
        controller.state().task(2).unwrap().priority,
        Priority::High
    );

    let notices = controller.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);

    // Idempotent: nothing left to promote, so no further notice.
    controller.sweep_overdue().await;
    assert!(controller.take_notices().is_empty());
}

#[tokio::test]
async fn filters_survive_a_reconnect() {
    let dir = TempDir::new().unwrap();
    {
        let mut controller = connect(&dir).await;
        controller.set_filters(FilterState {
            project: Some(1),
            ..FilterState::default()
        });
        controller.set_group_by(GroupDimension::Priority);
        controller.toggle_collapsed("Low");
    }

    let controller = connect(&dir).await;
    assert_eq!(controller.state().filters.project, Some(1));
    assert_eq!(controller.state().group_by, GroupDimension::Priority);
    assert!(controller.state().collapsed.contains("Low"));
}

#[tokio::test]
async fn schema_choices_drive_the_status_columns() {
    let dir = TempDir::new().unwrap();
    let schema: Schema = serde_json::from_value(json!({
        "tables": {
            "Tasks": {
                "columns": [{
                    "id": "Status",
                    "widgetOptions": {"choices": ["Inbox", "Doing", "Done"]},
                }],
            },
        },
    }))
    .unwrap();
    let host = MemoryHost::new(schema)
        .with_table("Tasks", sample::tasks())
        .with_table("Projects", sample::projects())
        .with_table("Crew", sample::crew());

    let controller = BoardController::connect(host, config(), SessionStore::at(dir.path()))
        .await
        .unwrap();
    let view = controller.view(chrono::Utc::now());
    let labels: Vec<_> = view.columns.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Inbox", "Doing", "Done"]);

    // Sample statuses outside the schema's choices route to the fallback.
    let inbox = view.columns.iter().find(|c| c.id == "Inbox").unwrap();
    assert_eq!(inbox.count, Some(4));
}
