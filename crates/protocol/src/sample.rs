//! Sample table data for testing and demonstration.
//!
//! This module generates a small set of realistic host records (tasks,
//! projects, and crew members) used by the demo binary and by tests that
//! exercise the full read path. Column names follow the sample field
//! mapping documented on [`tasks`].

use chrono::{Duration, Utc};
use serde_json::Value;

use crate::record::Record;

/// A builder for sample task records, to cut down on literal noise.
struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    fn new(id: i64, title: &str) -> Self {
        let mut record = Record::new();
        record.insert("id".to_string(), Value::from(id));
        record.insert("Title".to_string(), Value::from(title));
        record.insert("Removed".to_string(), Value::Bool(false));
        Self { record }
    }

    fn field(mut self, name: &str, value: Value) -> Self {
        self.record.insert(name.to_string(), value);
        self
    }

    fn build(self) -> Record {
        self.record
    }
}

/// Generates the sample task table.
///
/// Columns: `id`, `Title`, `Notes`, `Status`, `Priority`, `Kind`, `Due`,
/// `Start`, `Project`, `Crew`, `Folder`, `Removed`, `Updated`. Statuses are
/// drawn from the default taxonomy, and one record is soft-deleted to
/// exercise the exclusion invariant.
#[must_use]
pub fn tasks() -> Vec<Record> {
    let now = Utc::now();
    let days = |n: i64| Value::from((now + Duration::days(n)).timestamp());

    vec![
        RecordBuilder::new(1, "Draft the quarterly report")
            .field("Notes", Value::from("Gather figures from every team first."))
            .field("Status", Value::from("To Do"))
            .field("Priority", Value::from("High"))
            .field("Kind", Value::from("Build"))
            .field("Due", days(3))
            .field("Project", Value::from(1))
            .field("Crew", serde_json::json!(["L", 1, 2]))
            .build(),
        RecordBuilder::new(2, "Review onboarding checklist")
            .field("Notes", Value::from("The new starters arrive Monday."))
            .field("Status", Value::from("In Progress"))
            .field("Priority", Value::from("Medium"))
            .field("Kind", Value::from("Review"))
            .field("Due", days(-2))
            .field("Project", Value::from(2))
            .field("Crew", serde_json::json!(["L", 3]))
            .build(),
        RecordBuilder::new(3, "Book venue for retrospective")
            .field("Status", Value::from("Waiting"))
            .field("Priority", Value::from("Low"))
            .field("Kind", Value::from("Meeting"))
            .field("Project", Value::from(1))
            .field("Folder", Value::from("2026"))
            .build(),
        RecordBuilder::new(4, "Publish release notes")
            .field("Status", Value::from("Done"))
            .field("Priority", Value::from("Medium"))
            .field("Kind", Value::from("Outreach"))
            .field("Project", Value::from(2))
            .field("Updated", days(-1))
            .build(),
        RecordBuilder::new(5, "Migrate legacy spreadsheet")
            .field("Status", Value::from("Not Started"))
            .field("Priority", Value::from("High"))
            .field("Kind", Value::from("Build"))
            .field("Due", days(10))
            .field("Start", days(1))
            .field("Project", Value::from(1))
            .field("Crew", serde_json::json!(["L", 1, 2, 3, 4]))
            .build(),
        RecordBuilder::new(6, "Stale cleanup item")
            .field("Status", Value::from("To Do"))
            .field("Removed", Value::Bool(true))
            .build(),
    ]
}

/// Generates the sample project table (`id`, `Name`).
#[must_use]
pub fn projects() -> Vec<Record> {
    [(1, "Platform Revamp"), (2, "Customer Success")]
        .into_iter()
        .map(|(id, name)| {
            let mut record = Record::new();
            record.insert("id".to_string(), Value::from(id));
            record.insert("Name".to_string(), Value::from(name));
            record
        })
        .collect()
}

/// Generates the sample crew table (`id`, `Name`).
#[must_use]
pub fn crew() -> Vec<Record> {
    [
        (1, "Ada Lovelace"),
        (2, "Grace Hopper"),
        (3, "Alan Turing"),
        (4, "Katherine Johnson"),
    ]
    .into_iter()
    .map(|(id, name)| {
        let mut record = Record::new();
        record.insert("id".to_string(), Value::from(id));
        record.insert("Name".to_string(), Value::from(name));
        record
    })
    .collect()
}
