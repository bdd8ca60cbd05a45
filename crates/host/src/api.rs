//! The abstract host platform API.
//!
//! The widget consumes the host exclusively through this trait: schema
//! introspection, table fetches, user-action application, widget-option
//! storage, and the row-selection sink. Everything else about the host
//! (transport, authentication, persistence) is its own business.

use serde_json::Value;

use kanri_config::Schema;
use kanri_protocol::{RecordPayload, RowId};

use crate::action::UserAction;
use crate::error::Result;

/// Operations the host platform provides to the widget.
///
/// All calls are remote-call boundaries: the caller suspends, and failures
/// surface as [`HostError`](crate::HostError) values carrying the host's
/// message. There is no cancellation; a stale response simply arrives late.
#[allow(async_fn_in_trait)]
pub trait HostApi {
    /// Fetches the document schema.
    ///
    /// # Errors
    ///
    /// Fails when the host is unreachable or rejects the request. At
    /// startup this failure is fatal to the widget.
    async fn get_schema(&self) -> Result<Schema>;

    /// Fetches a table's records, in whichever orientation the host uses.
    ///
    /// # Errors
    ///
    /// Fails when the table is unknown or the host rejects the request.
    async fn fetch_table(&self, name: &str) -> Result<RecordPayload>;

    /// Applies an ordered list of user actions atomically.
    ///
    /// # Errors
    ///
    /// Fails when the host rejects any action; no partial application is
    /// assumed either way — callers re-fetch authoritative state after
    /// every attempt.
    async fn apply_user_actions(&self, actions: &[UserAction]) -> Result<()>;

    /// Persists a widget option under a fixed key.
    ///
    /// # Errors
    ///
    /// Fails when the host rejects the write.
    async fn set_option(&self, key: &str, value: Value) -> Result<()>;

    /// Reports the active row to the host's row-selection sink.
    ///
    /// Best-effort: callers log failures and move on.
    ///
    /// # Errors
    ///
    /// Fails when the host rejects the notification.
    async fn set_selected_row(&self, row: Option<RowId>) -> Result<()>;
}
