//! The board controller.
//!
//! One `BoardController` owns the host handle, the widget configuration,
//! the session store, and the whole application state. The embedding shell
//! calls its operations (refresh, search, filters, drag drops, edit-session
//! save) and renders the view-model it produces; the controller is the only
//! thing that talks to the host.
//!
//! Remote failures are caught at the call site: a notice is queued and,
//! after any mutation attempt, authoritative state is re-fetched so an
//! optimistic edit is never left unreconciled. Overlapping calls are
//! accepted with last-write-wins semantics.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use kanri_config::{
    COLLAPSED_KEY, FILTERS_KEY, GROUP_BY_KEY, GroupDimension, Schema, SessionStore, WidgetConfig,
    resolve_taxonomy, resolve_types,
};
use kanri_host::{HostApi, UserAction};
use kanri_protocol::{Priority, Record, RowId, TaskId};

use crate::debounce::Debouncer;
use crate::drag::{DragOutcome, apply_drop, drop_payload};
use crate::editor::EditSession;
use crate::error::Result;
use crate::filter::column_id_for;
use crate::notice::Notice;
use crate::state::{AppState, FilterState};
use crate::view::{BoardView, board_view};

/// Widget-option key under which the columns override blob is stored.
const COLUMNS_OPTION_KEY: &str = "columns";

/// Owns the board state and mediates every host interaction.
pub struct BoardController<H: HostApi> {
    host: H,
    config: WidgetConfig,
    session: SessionStore,
    schema: Schema,
    state: AppState,
    editor: Option<EditSession>,
    search_debounce: Debouncer,
}

impl<H: HostApi> BoardController<H> {
    /// Connects to the host and performs the initial load.
    ///
    /// Session state (filters, grouping dimension, collapse flags) is
    /// restored fail-soft; a missing or stale entry just means defaults.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the host cannot serve the
    /// schema or the initial fetch. Startup failures are fatal: there is no
    /// board to show without them.
    pub async fn connect(host: H, config: WidgetConfig, session: SessionStore) -> Result<Self> {
        config.validate()?;
        let schema = host.get_schema().await?;

        let mut state = AppState::new(
            resolve_taxonomy(GroupDimension::Status, Some(&schema), &config),
            resolve_types(Some(&schema), &config),
        );
        if let Some(filters) = session.get::<FilterState>(FILTERS_KEY) {
            state.filters = filters;
        }
        if let Some(group_by) = session.get::<GroupDimension>(GROUP_BY_KEY) {
            state.group_by = group_by;
        }
        if let Some(collapsed) = session.get::<Vec<String>>(COLLAPSED_KEY) {
            state.collapsed = collapsed.into_iter().collect();
        }

        let mut controller = Self {
            host,
            config,
            session,
            schema,
            state,
            editor: None,
            search_debounce: Debouncer::default(),
        };
        controller.refresh().await?;
        Ok(controller)
    }

    /// The current application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The active widget configuration.
    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// The open edit session, if any.
    #[must_use]
    pub fn editor(&self) -> Option<&EditSession> {
        self.editor.as_ref()
    }

    /// Mutable access to the open edit session, for field input.
    pub fn editor_mut(&mut self) -> Option<&mut EditSession> {
        self.editor.as_mut()
    }

    /// Drains pending notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.take_notices()
    }

    /// Builds the board view-model at `now`.
    #[must_use]
    pub fn view(&self, now: DateTime<Utc>) -> BoardView {
        board_view(&self.state, self.config.read_only, now)
    }

    /// Re-fetches all tables from the host and reconciles local state.
    ///
    /// # Errors
    ///
    /// Fails when any fetch fails; state keeps its pre-call contents.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<()> {
        self.state.loading = true;
        let result = self.fetch_all().await;
        self.state.loading = false;
        result?;
        self.state.reconcile_selection();
        Ok(())
    }

    async fn fetch_all(&mut self) -> Result<()> {
        let fields = &self.config.fields;

        let payload = self.host.fetch_table(&fields.table).await?;
        let mut tasks = Vec::new();
        for record in payload.into_records() {
            match fields.task_from_record(&record) {
                Ok(task) if !task.deleted => tasks.push(task),
                Ok(_) => {}
                Err(error) => warn!(%error, "skipping undecodable task record"),
            }
        }

        let projects = self
            .host
            .fetch_table(&fields.project_table)
            .await?
            .into_records()
            .iter()
            .filter_map(|r| fields.project_from_record(r))
            .collect();
        let assignees = self
            .host
            .fetch_table(&fields.assignee_table)
            .await?
            .into_records()
            .iter()
            .filter_map(|r| fields.assignee_from_record(r))
            .collect();

        debug!(tasks = tasks.len(), "refreshed from host");
        self.state.tasks = tasks;
        self.state.projects = projects;
        self.state.assignees = assignees;
        Ok(())
    }

    /// Records a search keystroke at `now`; the value applies after the
    /// debounce quiet period via [`poll_search`](Self::poll_search).
    pub fn set_search(&mut self, input: impl Into<String>, now: Instant) {
        self.search_debounce.push(input, now);
    }

    /// Applies the debounced search value if its quiet period has elapsed.
    /// Returns `true` when the visible set may have changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search_debounce.poll(now) {
            Some(value) => {
                self.state.search = value;
                true
            }
            None => false,
        }
    }

    /// Replaces the equality filters and persists them.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.state.filters = filters;
        self.persist(FILTERS_KEY, &self.state.filters);
    }

    /// Switches the grouping dimension, re-resolves the taxonomy, and
    /// persists the choice.
    pub fn set_group_by(&mut self, dimension: GroupDimension) {
        self.state.group_by = dimension;
        self.state.status_taxonomy =
            resolve_taxonomy(GroupDimension::Status, Some(&self.schema), &self.config);
        self.persist(GROUP_BY_KEY, &dimension);
    }

    /// Flips a column's collapse flag and persists the set. Returns the new
    /// state.
    pub fn toggle_collapsed(&mut self, column_id: &str) -> bool {
        let collapsed = self.state.toggle_collapsed(column_id);
        let ids: Vec<&String> = self.state.collapsed.iter().collect();
        self.persist(COLLAPSED_KEY, &ids);
        collapsed
    }

    /// Selects a task (or clears the selection) and reports it to the
    /// host's row-selection sink, best-effort.
    pub async fn select_task(&mut self, id: Option<TaskId>) {
        self.state.selected = id;
        if let Err(error) = self.host.set_selected_row(id).await {
            warn!(%error, "failed to report row selection");
        }
    }

    /// Handles a card dropped into `target_column`.
    ///
    /// Same-column drops write nothing. Otherwise the grouping field is
    /// mutated optimistically, the update goes to the host, and
    /// authoritative state is re-fetched whether it succeeded or not.
    #[instrument(skip(self))]
    pub async fn drop_card(&mut self, task_id: TaskId, target_column: &str) -> DragOutcome {
        if self.config.read_only {
            self.state
                .push_notice(Notice::warning("The board is read-only."));
            return DragOutcome::Reverted;
        }
        let dimension = self.state.group_by;
        let Some(task) = self.state.task(task_id) else {
            return DragOutcome::Reverted;
        };
        let taxonomy = self.state.active_taxonomy();
        if column_id_for(taxonomy, dimension, task) == target_column {
            return DragOutcome::SameColumn;
        }
        let celebrate = dimension == GroupDimension::Status
            && taxonomy.get(target_column).is_some_and(|c| c.celebrate);

        let payload = drop_payload(dimension, &self.config.fields, target_column);
        let action = UserAction::update(self.config.fields.table.clone(), task_id, payload);
        if let Some(task) = self.state.tasks.iter_mut().find(|t| t.id == task_id) {
            apply_drop(task, dimension, target_column);
        }

        let outcome = match self.host.apply_user_actions(&[action]).await {
            Ok(()) => {
                self.state
                    .push_notice(Notice::success(format!("Moved to {target_column}.")));
                DragOutcome::Committed { celebrate }
            }
            Err(error) => {
                self.state.push_notice(Notice::error(error.to_string()));
                DragOutcome::Reverted
            }
        };
        self.refresh_or_notice().await;
        outcome
    }

    /// Opens a create session, optionally seeded from a column's add
    /// affordance.
    pub fn open_create(&mut self, target_column: Option<&str>) {
        self.editor = Some(EditSession::create(
            &self.state.status_taxonomy,
            &self.state.types,
            self.state.group_by,
            target_column,
            Utc::now(),
        ));
    }

    /// Opens an edit session for a task. Returns `false` when the task is
    /// not in the current state.
    pub fn open_edit(&mut self, task_id: TaskId) -> bool {
        match self.state.task(task_id) {
            Some(task) => {
                self.editor = Some(EditSession::edit(
                    task,
                    &self.state.status_taxonomy,
                    &self.state.types,
                ));
                true
            }
            None => false,
        }
    }

    /// Discards the open edit session.
    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Submits the open edit session.
    ///
    /// A validation failure queues a warning and keeps the session open
    /// without any remote call. On success the session closes and state
    /// refreshes; a remote failure keeps the session open for another try.
    /// Returns `true` when the session closed.
    pub async fn save_editor(&mut self) -> bool {
        if self.config.read_only {
            self.state
                .push_notice(Notice::warning("The board is read-only."));
            return false;
        }
        let Some(session) = self.editor.clone() else {
            return false;
        };
        if let Err(error) = session.validate() {
            self.state.push_notice(Notice::warning(error.to_string()));
            return false;
        }

        let payload = session.payload(&self.config.fields);
        let table = self.config.fields.table.clone();
        let action = match session.task_id {
            Some(id) => UserAction::update(table, id, payload),
            None => UserAction::add(table, payload),
        };
        match self.host.apply_user_actions(&[action]).await {
            Ok(()) => {
                self.editor = None;
                self.state.push_notice(Notice::success(if session.is_create() {
                    "Task created."
                } else {
                    "Task updated."
                }));
                self.refresh_or_notice().await;
                true
            }
            Err(error) => {
                self.state.push_notice(Notice::error(error.to_string()));
                false
            }
        }
    }

    /// Soft-deletes a task after explicit confirmation.
    ///
    /// Without `confirmed` this is a no-op; deletion is a flag mutation,
    /// never a row removal.
    pub async fn delete_task(&mut self, task_id: TaskId, confirmed: bool) {
        if !confirmed {
            return;
        }
        if self.config.read_only {
            self.state
                .push_notice(Notice::warning("The board is read-only."));
            return;
        }
        let mut fields = Record::new();
        fields.insert(self.config.fields.deleted.clone(), Value::Bool(true));
        let action = UserAction::update(self.config.fields.table.clone(), task_id, fields);

        match self.host.apply_user_actions(&[action]).await {
            Ok(()) => {
                self.editor = None;
                self.state.push_notice(Notice::success("Task deleted."));
            }
            Err(error) => self.state.push_notice(Notice::error(error.to_string())),
        }
        self.refresh_or_notice().await;
    }

    /// Promotes every non-High task with a deadline strictly in the past to
    /// High priority, as one batched update.
    ///
    /// Reports a single notice for the whole batch; a failure is reported
    /// once and never retried.
    pub async fn sweep_overdue(&mut self) {
        if self.config.read_only {
            return;
        }
        let now = Utc::now();
        let table = self.config.fields.table.clone();
        let priority_field = self.config.fields.priority.clone();
        let actions: Vec<UserAction> = self
            .state
            .tasks
            .iter()
            .filter(|t| t.priority != Priority::High && t.is_overdue(now))
            .map(|t| {
                let mut fields = Record::new();
                fields.insert(priority_field.clone(), Value::from(Priority::High.label()));
                UserAction::update(table.clone(), t.id, fields)
            })
            .collect();
        if actions.is_empty() {
            return;
        }

        let count = actions.len();
        match self.host.apply_user_actions(&actions).await {
            Ok(()) => {
                let message = if count == 1 {
                    "Raised 1 overdue task to High priority.".to_string()
                } else {
                    format!("Raised {count} overdue tasks to High priority.")
                };
                self.state.push_notice(Notice::success(message));
            }
            Err(error) => self.state.push_notice(Notice::error(error.to_string())),
        }
        self.refresh_or_notice().await;
    }

    /// Replaces the columns override blob, re-resolves the taxonomy, and
    /// stores the blob as a widget option on the host.
    ///
    /// A malformed blob degrades to the next taxonomy source with a logged
    /// warning; it is stored regardless so the user can keep editing it.
    pub async fn save_columns_override(&mut self, blob: Option<String>) {
        self.config.columns_json = blob.clone();
        self.state.status_taxonomy =
            resolve_taxonomy(GroupDimension::Status, Some(&self.schema), &self.config);
        let value = blob.map_or(Value::Null, Value::from);
        if let Err(error) = self.host.set_option(COLUMNS_OPTION_KEY, value).await {
            self.state.push_notice(Notice::error(error.to_string()));
        }
    }

    /// Host push: the record set changed behind our back.
    pub async fn on_records_changed(&mut self) {
        self.refresh_or_notice().await;
    }

    /// Host push: another view selected a row.
    pub fn on_record_selected(&mut self, row: Option<RowId>) {
        self.state.selected = row;
        self.state.reconcile_selection();
    }

    /// Host push: the widget options changed.
    ///
    /// An invalid replacement configuration is rejected with a warning; the
    /// previous configuration stays active.
    pub async fn on_options_changed(&mut self, config: WidgetConfig) {
        if let Err(error) = config.validate() {
            warn!(%error, "ignoring invalid replacement configuration");
            self.state.push_notice(Notice::warning(error.to_string()));
            return;
        }
        self.config = config;
        self.state.status_taxonomy =
            resolve_taxonomy(GroupDimension::Status, Some(&self.schema), &self.config);
        self.state.types = resolve_types(Some(&self.schema), &self.config);
        self.refresh_or_notice().await;
    }

    async fn refresh_or_notice(&mut self) {
        if let Err(error) = self.refresh().await {
            self.state.push_notice(Notice::error(error.to_string()));
        }
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(error) = self.session.set(key, value) {
            warn!(key, %error, "failed to persist session state");
        }
    }
}
