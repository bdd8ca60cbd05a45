//! Board engine for kanri.
//!
//! Turns host task records into a render-ready kanban board and writes user
//! edits back through the host: filtering and grouping into taxonomy
//! columns, a structured view-model, drag reconciliation with optimistic
//! apply and authoritative refresh, a modal edit session, and the
//! [`BoardController`] tying it all to a host handle and a session store.

mod controller;
mod debounce;
mod drag;
mod editor;
mod error;
mod filter;
mod notice;
mod state;
mod view;

pub use controller::BoardController;
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use drag::{DragOutcome, apply_drop, drop_field, drop_payload};
pub use editor::{EditError, EditSession};
pub use error::{BoardError, Result};
pub use filter::{ColumnTasks, column_id_for, visible_columns};
pub use notice::{Notice, NoticeKind};
pub use state::{AppState, FilterState};
pub use view::{
    Avatar, Badge, BoardView, CardView, ColumnView, DeadlineView, ProjectBadge, board_view,
};
