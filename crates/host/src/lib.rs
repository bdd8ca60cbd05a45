//! Host platform interface for kanri.
//!
//! This crate defines the boundary between the kanban widget and the
//! spreadsheet host it is embedded in: the [`HostApi`] trait covering
//! schema introspection, table fetches, user-action application, option
//! storage, and the row-selection sink; the [`UserAction`] wire format for
//! mutations; and [`MemoryHost`], an in-memory host used by the demo
//! binary and by tests.

mod action;
mod api;
mod error;
mod memory;

pub use action::{ActionVerb, UserAction};
pub use api::HostApi;
pub use error::{HostError, Result};
pub use memory::MemoryHost;
