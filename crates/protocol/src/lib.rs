//! Shared protocol types for the kanri widget engine.
//!
//! This crate defines the core types used across all kanri components,
//! including tasks, reference entities, the record adapter, and error types.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`task`]: Task identifiers, priorities, and the `Task` struct
//! - [`record`]: Adapter from host record payloads to uniform row records
//! - [`sample`]: Sample tables for demos and tests
//! - [`error`]: Error types for protocol operations
//!
//! # Examples
//!
//! Adapting a columnar host payload into typed records:
//!
//! ```
//! use kanri_protocol::RecordPayload;
//! use serde_json::json;
//!
//! let payload: RecordPayload = serde_json::from_value(json!({
//!     "id": [1, 2],
//!     "Title": ["Write report", "Call back"],
//! })).unwrap();
//!
//! let records = payload.into_records();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1]["Title"], json!("Call back"));
//! ```

pub mod error;
pub mod record;
pub mod sample;
pub mod task;

// Re-export primary types at crate root for convenience
pub use error::{ProtocolError, Result};
pub use record::{
    Record, RecordPayload, decode_epoch_date, decode_reference_list, encode_epoch_date,
    encode_reference_list, row_id,
};
pub use task::{Assignee, AssigneeId, Priority, Project, ProjectId, RowId, Task, TaskId, initials};
