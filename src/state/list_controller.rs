//! Composition root of the windowed list.
//!
//! Owns the query cache, the active identity, the search debouncer, the
//! selection and the viewport, and turns user intent into fetch requests.
//! Requests are queued in an outbox; the shell drains them with
//! [`ListController::take_requests`] and feeds results back through
//! [`ListController::apply_completion`]. Nothing here blocks or spawns.

use super::debounce::Debouncer;
use super::fetch_cursor::{CompletionOutcome, FetchCursor, FetchStatus};
use super::query_cache::QueryCache;
use super::scroll_trigger::{ScrollTrigger, ViewportMetrics};
use super::selection::{SelectionSet, ViewMode};
use crate::model::{
    FetchCompletion, FetchError, FetchRequest, QueryIdentity, Record, RecordId, SaveError,
    SortSpec, ID_FIELD,
};
use crate::source::SelectionSink;
use crate::view_state::virtual_window::clamp_scroll;
use crate::view_state::{Extent, MaterializedRow, RowExtent, VirtualWindow, WindowParams};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tunables of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    /// Rows rendered beyond each viewport edge.
    pub overscan_rows: usize,
    /// Remaining scroll distance below which the next page is requested.
    pub scroll_threshold: Extent,
    /// Quiet period before a search edit becomes a query.
    pub debounce: Duration,
    /// Fixed extent of every row.
    pub row_extent: RowExtent,
    /// Field the search text filters on initially.
    pub filter_field: String,
    /// Fields the user can cycle through. Always contains `filter_field`.
    pub filter_fields: Vec<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            overscan_rows: 10,
            scroll_threshold: Extent::new(100),
            debounce: Duration::from_millis(300),
            row_extent: RowExtent::STANDARD,
            filter_field: ID_FIELD.to_string(),
            filter_fields: vec![ID_FIELD.to_string()],
        }
    }
}

/// What the list area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListBody {
    /// First page outstanding.
    Loading,
    /// Query finished with no rows ("No results...").
    Empty,
    /// Rows are available (possibly none yet after a failure).
    Rows,
}

/// Display summary of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDisplay {
    /// Body state.
    pub body: ListBody,
    /// Undismissed fetch failure.
    pub failure: Option<FetchError>,
    /// A further page is outstanding while rows are shown.
    pub fetching_more: bool,
    /// Rows in the current view.
    pub row_count: usize,
    /// Server total of the active query, once known.
    pub total_count: Option<usize>,
    /// Number of selected records.
    pub selected_count: usize,
    /// Current view mode.
    pub view_mode: ViewMode,
}

/// One-shot messages for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Selection handed to the save collaborator.
    Saved {
        /// Number of records saved.
        count: usize,
    },
    /// Save collaborator failed; the session stays open.
    SaveFailed(String),
}

/// Lifecycle of the editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Editing.
    #[default]
    Open,
    /// Selection committed.
    Saved,
    /// Selection discarded.
    Cancelled,
}

impl SessionState {
    /// Whether the session has ended.
    pub fn is_closed(self) -> bool {
        !matches!(self, Self::Open)
    }
}

/// Scroll position and focus of one view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Viewport {
    scroll_offset: Extent,
    focus: usize,
}

/// Windowed incremental list controller.
#[derive(Debug)]
pub struct ListController {
    config: ListConfig,
    trigger: ScrollTrigger,
    cache: QueryCache,
    identity: QueryIdentity,
    search: Debouncer<String>,
    selection: SelectionSet,
    // Selected-only row order under the active sort
    selected_order: Vec<RecordId>,
    view_mode: ViewMode,
    all_rows: Viewport,
    selected_rows: Viewport,
    viewport_extent: Extent,
    error_dismissed: bool,
    outbox: Vec<FetchRequest>,
    notifications: Vec<Notification>,
    session: SessionState,
}

impl ListController {
    /// Mount the list: seed the selection and request the first page.
    pub fn new(mut config: ListConfig, selection: SelectionSet) -> Self {
        if !config.filter_fields.contains(&config.filter_field) {
            config.filter_fields.insert(0, config.filter_field.clone());
        }
        let identity = QueryIdentity::new(config.filter_field.clone());

        let mut controller = Self {
            trigger: ScrollTrigger::new(config.scroll_threshold),
            search: Debouncer::new(config.debounce),
            config,
            cache: QueryCache::new(),
            identity,
            selection,
            selected_order: Vec::new(),
            view_mode: ViewMode::All,
            all_rows: Viewport::default(),
            selected_rows: Viewport::default(),
            viewport_extent: Extent::ZERO,
            error_dismissed: false,
            outbox: Vec::new(),
            notifications: Vec::new(),
            session: SessionState::Open,
        };
        controller.refresh_selected_order();
        controller.ensure_active_cursor();

        info!(
            identity = %controller.identity,
            selected = controller.selection.len(),
            "List mounted"
        );
        controller
    }

    // ===== Accessors =====

    /// Configuration in effect.
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Active query identity.
    pub fn identity(&self) -> &QueryIdentity {
        &self.identity
    }

    /// Cursor of the active identity, if one is live.
    pub fn cursor(&self) -> Option<&FetchCursor> {
        self.cache.get(&self.identity)
    }

    /// The query cache.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Current view mode.
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Session lifecycle state.
    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Search text waiting out the debounce.
    pub fn pending_search(&self) -> Option<&str> {
        self.search.pending().map(String::as_str)
    }

    /// Visible extent of the viewport.
    pub fn viewport_extent(&self) -> Extent {
        self.viewport_extent
    }

    /// Scroll offset of the current view mode.
    pub fn scroll_offset(&self) -> Extent {
        self.viewport().scroll_offset
    }

    /// Rows in the current view mode.
    pub fn row_count(&self) -> usize {
        match self.view_mode {
            ViewMode::All => self.cursor().map_or(0, FetchCursor::loaded_count),
            ViewMode::SelectedOnly => self.selection.len(),
        }
    }

    /// Record at `index` in the current view mode.
    pub fn row(&self, index: usize) -> Option<&Record> {
        match self.view_mode {
            ViewMode::All => self.cursor()?.row(index),
            ViewMode::SelectedOnly => self
                .selected_order
                .get(index)
                .and_then(|id| self.selection.get(id)),
        }
    }

    /// Focused row index, `None` when the view is empty.
    pub fn focused_index(&self) -> Option<usize> {
        let count = self.row_count();
        (count > 0).then(|| self.viewport().focus.min(count - 1))
    }

    /// Focused record.
    pub fn focused(&self) -> Option<&Record> {
        self.row(self.focused_index()?)
    }

    /// Whether a record is selected.
    pub fn is_selected(&self, record: &Record) -> bool {
        self.selection.is_selected(record)
    }

    /// Render window for the current geometry.
    pub fn window(&self) -> VirtualWindow {
        VirtualWindow::compute(WindowParams {
            row_count: self.row_count(),
            row_extent: self.config.row_extent,
            overscan: self.config.overscan_rows,
            viewport_extent: self.viewport_extent,
            scroll_offset: self.scroll_offset(),
        })
    }

    /// Records of the materialized rows.
    pub fn visible_rows(&self) -> Vec<MaterializedRow<&Record>> {
        let window = self.window();
        match self.view_mode {
            ViewMode::All => match self.cursor() {
                Some(cursor) => window.materialize(|index| cursor.row(index)),
                None => Vec::new(),
            },
            ViewMode::SelectedOnly => window.materialize(|index| self.row(index)),
        }
    }

    /// What the shell must show.
    pub fn display(&self) -> ListDisplay {
        let row_count = self.row_count();
        let cursor = self.cursor();

        let (body, failure, fetching_more) = match self.view_mode {
            ViewMode::SelectedOnly => {
                let body = if row_count == 0 {
                    ListBody::Empty
                } else {
                    ListBody::Rows
                };
                (body, None, false)
            }
            ViewMode::All => {
                let status = cursor.map(FetchCursor::status);
                let body = match status {
                    _ if row_count > 0 => ListBody::Rows,
                    None | Some(FetchStatus::Idle | FetchStatus::Fetching { .. }) => {
                        ListBody::Loading
                    }
                    Some(FetchStatus::Fetched) => ListBody::Empty,
                    Some(FetchStatus::Error(_)) => ListBody::Rows,
                };
                let failure = cursor
                    .and_then(FetchCursor::error)
                    .filter(|_| !self.error_dismissed)
                    .cloned();
                let fetching_more = row_count > 0 && cursor.is_some_and(FetchCursor::is_fetching);
                (body, failure, fetching_more)
            }
        };

        ListDisplay {
            body,
            failure,
            fetching_more,
            row_count,
            total_count: cursor.and_then(FetchCursor::total_count),
            selected_count: self.selection.len(),
            view_mode: self.view_mode,
        }
    }

    // ===== Query =====

    /// Record a search edit. It becomes a query once it survives the debounce.
    pub fn set_search_text(&mut self, text: impl Into<String>, now: Instant) {
        self.search.push(text.into(), now);
    }

    /// Advance time. Applies a due search edit; returns whether the identity
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(text) => {
                let next = self.identity.clone().with_search(text);
                self.apply_identity(next)
            }
            None => false,
        }
    }

    /// When [`tick`](Self::tick) next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.next_deadline()
    }

    /// Drop any pending edit and apply the empty search immediately.
    pub fn clear_search(&mut self) -> bool {
        self.search.cancel();
        let next = self.identity.clone().with_search(String::new());
        self.apply_identity(next)
    }

    /// Search on another field. Applies immediately.
    pub fn set_filter_field(&mut self, field: impl Into<String>) -> bool {
        let mut next = self.identity.clone();
        next.filter_field = field.into();
        self.apply_identity(next)
    }

    /// Move to the next configured filter field, wrapping around.
    pub fn cycle_filter_field(&mut self) -> bool {
        let fields = &self.config.filter_fields;
        let next = fields
            .iter()
            .position(|field| *field == self.identity.filter_field)
            .map_or(0, |i| (i + 1) % fields.len());
        match fields.get(next).cloned() {
            Some(field) => self.set_filter_field(field),
            None => false,
        }
    }

    /// Replace the sort. Applies immediately.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> bool {
        let next = self.identity.clone().with_sort(sort);
        self.apply_identity(next)
    }

    /// Cycle the sort on the filter field: none → asc → desc → none.
    pub fn cycle_sort(&mut self) -> bool {
        let sort = SortSpec::cycle(self.identity.sort.as_ref(), &self.identity.filter_field);
        self.set_sort(sort)
    }

    fn apply_identity(&mut self, next: QueryIdentity) -> bool {
        if next == self.identity {
            return false;
        }
        debug!(from = %self.identity, to = %next, "Query identity changed");

        self.cache.evict(&self.identity);
        self.identity = next;
        self.refresh_selected_order();
        self.all_rows = Viewport::default();
        self.error_dismissed = false;
        self.ensure_active_cursor();
        true
    }

    /// Make sure the active identity has a cursor. No-op in selected-only mode.
    fn ensure_active_cursor(&mut self) {
        if self.view_mode != ViewMode::All {
            return;
        }
        let (_, request) = self.cache.ensure_fetched(&self.identity);
        self.outbox.extend(request);
        self.run_trigger();
    }

    // ===== Viewport =====

    /// Scroll to an absolute offset, clamped to the content.
    pub fn scroll_to(&mut self, offset: Extent) {
        let clamped = self.clamp(offset);
        self.viewport_mut().scroll_offset = clamped;
        self.run_trigger();
    }

    /// Scroll by a signed delta.
    pub fn scroll_by(&mut self, delta: i64) {
        let current = self.scroll_offset();
        let magnitude = Extent::new(delta.unsigned_abs());
        let target = if delta < 0 {
            current.saturating_sub(magnitude)
        } else {
            current.saturating_add(magnitude)
        };
        self.scroll_to(target);
    }

    /// Set the viewport extent.
    pub fn resize(&mut self, viewport_extent: Extent) {
        self.viewport_extent = viewport_extent;
        let clamped = self.clamp(self.scroll_offset());
        self.viewport_mut().scroll_offset = clamped;
        self.run_trigger();
    }

    /// Move focus by `delta` rows and scroll it into view.
    pub fn move_focus(&mut self, delta: isize) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let current = self.focused_index().unwrap_or(0);
        let target = current.saturating_add_signed(delta).min(count - 1);
        self.focus(target);
    }

    /// Move focus up by one viewport.
    pub fn page_up(&mut self) {
        let rows = self.rows_per_page();
        self.move_focus(-rows);
    }

    /// Move focus down by one viewport.
    pub fn page_down(&mut self) {
        let rows = self.rows_per_page();
        self.move_focus(rows);
    }

    /// Focus the first row.
    pub fn focus_first(&mut self) {
        if self.row_count() > 0 {
            self.focus(0);
        }
    }

    /// Focus the last loaded row.
    pub fn focus_last(&mut self) {
        if let Some(last) = self.row_count().checked_sub(1) {
            self.focus(last);
        }
    }

    fn focus(&mut self, index: usize) {
        let row_extent = self.config.row_extent;
        let top = row_extent * index;
        let bottom = top + row_extent.extent();
        let viewport = self.viewport_extent;

        let current = self.scroll_offset();
        let scroll = if top < current {
            top
        } else if bottom > current + viewport {
            bottom.saturating_sub(viewport)
        } else {
            current
        };

        let clamped = self.clamp(scroll);
        let state = self.viewport_mut();
        state.focus = index;
        state.scroll_offset = clamped;
        self.run_trigger();
    }

    fn rows_per_page(&self) -> isize {
        let rows = self.viewport_extent.get() / self.config.row_extent.get();
        isize::try_from(rows.max(1)).unwrap_or(isize::MAX)
    }

    fn clamp(&self, offset: Extent) -> Extent {
        clamp_scroll(
            offset,
            self.row_count(),
            self.config.row_extent,
            self.viewport_extent,
        )
    }

    fn viewport(&self) -> &Viewport {
        match self.view_mode {
            ViewMode::All => &self.all_rows,
            ViewMode::SelectedOnly => &self.selected_rows,
        }
    }

    fn viewport_mut(&mut self) -> &mut Viewport {
        match self.view_mode {
            ViewMode::All => &mut self.all_rows,
            ViewMode::SelectedOnly => &mut self.selected_rows,
        }
    }

    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_offset: self.scroll_offset(),
            viewport_extent: self.viewport_extent,
            scroll_extent: self.config.row_extent * self.row_count(),
        }
    }

    /// Evaluate the scroll trigger against the active cursor.
    fn run_trigger(&mut self) {
        if self.view_mode != ViewMode::All {
            return;
        }
        let metrics = self.metrics();
        if let Some(cursor) = self.cache.get_mut(&self.identity) {
            if let Some(request) = self.trigger.maybe_fetch_more(&metrics, cursor) {
                self.outbox.push(request);
            }
        }
    }

    // ===== Fetch plumbing =====

    /// Drain queued fetch requests.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Apply a fetch result.
    pub fn apply_completion(&mut self, completion: FetchCompletion) -> CompletionOutcome {
        let outcome = self.cache.complete(completion);
        match &outcome {
            CompletionOutcome::Applied { .. } => self.run_trigger(),
            CompletionOutcome::Failed(err) => {
                warn!(identity = %self.identity, error = %err, "Page fetch failed");
                self.error_dismissed = false;
            }
            CompletionOutcome::Stale(reason) => {
                debug!(?reason, "Discarded stale completion");
            }
        }
        outcome
    }

    /// Re-request the failed page. Returns whether a request was queued.
    pub fn retry(&mut self) -> bool {
        if self.view_mode != ViewMode::All {
            return false;
        }
        let Some(cursor) = self.cache.get_mut(&self.identity) else {
            return false;
        };
        if cursor.error().is_none() {
            return false;
        }
        match cursor.fetch_next_page() {
            Some(request) => {
                debug!(offset = request.offset(), "Retrying fetch");
                self.outbox.push(request);
                self.error_dismissed = false;
                true
            }
            None => false,
        }
    }

    /// Hide the failure banner. The cursor stays in `Error`.
    pub fn dismiss_error(&mut self) {
        self.error_dismissed = true;
    }

    // ===== Selection =====

    /// Toggle a record. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, record: &Record) -> bool {
        let selected = self.selection.toggle(record);
        self.refresh_selected_order();
        if self.view_mode == ViewMode::SelectedOnly {
            // The row may have left the view
            let clamped = self.clamp(self.scroll_offset());
            self.viewport_mut().scroll_offset = clamped;
        }
        selected
    }

    fn refresh_selected_order(&mut self) {
        self.selected_order = self.selection.ordered_ids(self.identity.sort.as_ref());
    }

    /// Toggle the focused row.
    pub fn toggle_focused(&mut self) -> Option<bool> {
        let record = self.focused()?.clone();
        Some(self.toggle(&record))
    }

    /// Replace the selection.
    pub fn replace_selection(&mut self, records: impl IntoIterator<Item = Record>) {
        self.selection.replace_all(records);
        self.refresh_selected_order();
        self.selected_rows = Viewport::default();
    }

    /// Switch between all rows and selected rows.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.view_mode {
            return;
        }
        debug!(?mode, "View mode changed");
        self.view_mode = mode;
        let clamped = self.clamp(self.scroll_offset());
        self.viewport_mut().scroll_offset = clamped;
        self.ensure_active_cursor();
    }

    /// Flip the view mode.
    pub fn toggle_view_mode(&mut self) {
        self.set_view_mode(self.view_mode.toggled());
    }

    // ===== Session =====

    /// Hand the selection to `sink` and close the session.
    ///
    /// A failing save keeps the session open so the user can try again.
    pub fn save(&mut self, sink: &dyn SelectionSink) -> Result<usize, SaveError> {
        let records = self.selection.records();
        match sink.save_selection(&records) {
            Ok(()) => {
                info!(count = records.len(), "Selection saved");
                self.notifications.push(Notification::Saved {
                    count: records.len(),
                });
                self.session = SessionState::Saved;
                Ok(records.len())
            }
            Err(err) => {
                warn!(error = %err, "Saving selection failed");
                self.notifications.push(Notification::SaveFailed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Discard the selection without saving and close the session.
    pub fn cancel(&mut self) {
        info!(discarded = self.selection.len(), "Selection cancelled");
        self.selection = SelectionSet::new();
        self.selected_order.clear();
        self.session = SessionState::Cancelled;
    }

    /// Release every cached page (view unmounted).
    pub fn detach(&mut self) {
        debug!(cursors = self.cache.len(), "Detaching list");
        self.cache.clear();
        self.search.cancel();
        self.outbox.clear();
    }

    /// Drain one-shot notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
#[path = "list_controller_tests.rs"]
mod tests;
