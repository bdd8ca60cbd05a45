//! kanri - a kanban-board engine for spreadsheet-hosted widgets.
//!
//! This demo binary wires an in-memory host loaded with sample tables to
//! the board controller and prints the resulting board to stdout.

use kanri_board::BoardController;
use kanri_config::{FieldMap, Schema, SessionStore, WidgetConfig};
use kanri_host::MemoryHost;
use kanri_protocol::sample;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let schema = sample_schema()?;
    let host = MemoryHost::new(schema)
        .with_table("Tasks", sample::tasks())
        .with_table("Projects", sample::projects())
        .with_table("Crew", sample::crew());

    let config = WidgetConfig::new(FieldMap::sample());
    let session = SessionStore::open_default()?;
    let controller = BoardController::connect(host, config, session).await?;

    let view = controller.view(chrono::Utc::now());
    println!("kanri board — {} task(s)\n", view.total);
    for column in &view.columns {
        match column.count {
            Some(count) => println!("── {} ({count})", column.label),
            None => println!("── {} (collapsed)", column.label),
        }
        for card in &column.cards {
            let priority = card
                .priority
                .as_ref()
                .map(|b| format!(" [{}]", b.label))
                .unwrap_or_default();
            let deadline = card
                .deadline
                .map(|d| {
                    let flag = if d.overdue { " OVERDUE" } else { "" };
                    format!(" (due {}{flag})", d.date.format("%Y-%m-%d"))
                })
                .unwrap_or_default();
            let crew: Vec<&str> = card.avatars.iter().map(|a| a.initials.as_str()).collect();
            let crew = if crew.is_empty() {
                String::new()
            } else {
                format!(" — {}", crew.join(", "))
            };
            println!("   • #{} {}{priority}{deadline}{crew}", card.id, card.title);
        }
        if column.empty {
            println!("   (empty)");
        }
        println!();
    }

    Ok(())
}

/// A schema exposing choice lists for the sample status and type columns.
fn sample_schema() -> anyhow::Result<Schema> {
    let schema = serde_json::from_value(serde_json::json!({
        "tables": {
            "Tasks": {
                "columns": [
                    {
                        "id": "Status",
                        "widgetOptions": {
                            "choices": [
                                "Not Started",
                                "To Do",
                                "In Progress",
                                "Waiting",
                                "Done",
                            ],
                        },
                    },
                    {
                        "id": "Kind",
                        "widgetOptions": {
                            "choices": ["Build", "Meeting", "Review", "Outreach"],
                        },
                    },
                ],
            },
        },
    }))?;
    Ok(schema)
}
