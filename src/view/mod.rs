//! TUI rendering and terminal management (impure shell)
//!
//! The shell owns the terminal, the fetch worker and the save sink. Each loop
//! iteration it feeds finished fetches into the controller, advances the
//! search debounce, dispatches queued requests and redraws.

pub mod constants;
pub mod layout;
pub mod list;
mod search_input;
pub mod status_bar;
pub mod styles;


pub use layout::AppLayout;
pub use list::RecordList;
pub use search_input::SearchBar;
pub use status_bar::StatusBar;
pub use styles::{ColorConfig, ListStyles};

use crate::config::KeyBindings;
use crate::model::{AppError, FetchCompletion, FetchError, KeyAction};
use crate::source::{FetchWorker, RecordSource, SelectionSink};
use crate::state::search_input::{
    clear_input, handle_backspace, handle_char_input, handle_cursor_left, handle_cursor_right,
    handle_delete, handle_end, handle_home,
};
use crate::state::{ListController, Notification, SearchInput, SessionState};
use crate::view_state::RowRenderer;
use constants::{BUSY_POLL_MS, CHECKBOX_WIDTH, IDLE_POLL_MS, TOAST_DURATION_MS, WHEEL_ROWS};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Everything a selection session needs besides the terminal.
pub struct SessionParts {
    /// List state, seeded with the initial selection.
    pub controller: ListController,
    /// Record → cells mapping.
    pub renderer: Box<dyn RowRenderer>,
    /// Receives the selection on save.
    pub sink: Box<dyn SelectionSink>,
    /// Paginated fetch collaborator.
    pub source: Arc<dyn RecordSource>,
    /// Title of the list block.
    pub title: String,
}

/// Which widget receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Search,
}

/// A status bar message with an expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Toast {
    message: String,
    expires: Instant,
}

/// How fetch requests are executed.
enum Fetcher {
    /// On the background thread; completions are polled.
    Worker(FetchWorker),
    /// Synchronously on dispatch.
    #[cfg_attr(not(test), allow(dead_code))]
    Inline(Arc<dyn RecordSource>),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    controller: ListController,
    key_bindings: KeyBindings,
    renderer: Box<dyn RowRenderer>,
    sink: Box<dyn SelectionSink>,
    fetcher: Fetcher,
    search_input: SearchInput,
    focus: Focus,
    toast: Option<Toast>,
    styles: ListStyles,
    title: String,
    layout: AppLayout,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and starts the
    /// fetch worker.
    pub fn new(parts: SessionParts) -> Result<Self, TuiError> {
        let worker = FetchWorker::spawn(Arc::clone(&parts.source))?;

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Self::with_fetcher(terminal, parts, Fetcher::Worker(worker))
    }

    /// Run the main event loop
    ///
    /// Returns once the session is saved or cancelled.
    pub fn run(&mut self) -> Result<SessionState, TuiError> {
        self.pump(Instant::now());
        self.draw()?;

        loop {
            let timeout = self.poll_timeout(Instant::now());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        self.handle_key(key, Instant::now());
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                        self.sync_viewport()?;
                    }
                    _ => {}
                }
            }

            self.pump(Instant::now());

            let session = self.controller.session();
            if session.is_closed() {
                info!(?session, "Session closed");
                self.controller.detach();
                return Ok(session);
            }

            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    fn with_fetcher(
        terminal: Terminal<B>,
        parts: SessionParts,
        fetcher: Fetcher,
    ) -> Result<Self, TuiError> {
        let SessionParts {
            controller,
            renderer,
            sink,
            source: _,
            title,
        } = parts;

        let mut app = Self {
            terminal,
            controller,
            key_bindings: KeyBindings::default(),
            renderer,
            sink,
            fetcher,
            search_input: SearchInput::new(),
            focus: Focus::List,
            toast: None,
            styles: ListStyles::default(),
            title,
            layout: AppLayout::compute(Rect::default()),
        };
        app.sync_viewport()?;
        Ok(app)
    }

    /// Recompute the layout and hand the list body extent to the controller.
    fn sync_viewport(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let layout = AppLayout::compute(Rect::new(0, 0, size.width, size.height));
        if layout != self.layout {
            self.layout = layout;
            let viewport = self.controller.config().row_extent * usize::from(layout.list_rows());
            self.controller.resize(viewport);
        }
        Ok(())
    }

    /// How long the loop may block waiting for input.
    fn poll_timeout(&self, now: Instant) -> Duration {
        let in_flight = matches!(self.fetcher, Fetcher::Worker(_))
            && self.controller.cursor().is_some_and(|c| c.is_fetching());
        let ceiling = Duration::from_millis(if in_flight { BUSY_POLL_MS } else { IDLE_POLL_MS });

        [
            self.controller.next_deadline(),
            self.toast.as_ref().map(|toast| toast.expires),
        ]
        .into_iter()
        .flatten()
        .map(|deadline| deadline.saturating_duration_since(now))
        .fold(ceiling, Duration::min)
    }

    /// Apply finished fetches, due search edits and queued requests.
    fn pump(&mut self, now: Instant) {
        if let Fetcher::Worker(worker) = &self.fetcher {
            for completion in worker.drain() {
                self.controller.apply_completion(completion);
            }
        }

        self.controller.tick(now);
        self.dispatch_requests();

        for notification in self.controller.take_notifications() {
            let message = match notification {
                Notification::Saved { count } => format!("Saved {count} records"),
                Notification::SaveFailed(reason) => format!("Save failed: {reason}"),
            };
            self.toast = Some(Toast {
                message,
                expires: now + Duration::from_millis(TOAST_DURATION_MS),
            });
        }

        if self.toast.as_ref().is_some_and(|toast| toast.expires <= now) {
            self.toast = None;
        }
    }

    fn dispatch_requests(&mut self) {
        loop {
            let requests = self.controller.take_requests();
            if requests.is_empty() {
                return;
            }
            for request in requests {
                match &self.fetcher {
                    Fetcher::Worker(worker) => {
                        let ticket = request.ticket;
                        if !worker.dispatch(request) {
                            let error =
                                FetchError::transport(ticket.offset, "fetch worker stopped");
                            self.controller
                                .apply_completion(FetchCompletion::failure(ticket, error));
                        }
                    }
                    Fetcher::Inline(source) => {
                        let result = source.fetch(request.offset(), &request.params);
                        self.controller.apply_completion(FetchCompletion {
                            ticket: request.ticket,
                            result,
                        });
                    }
                }
            }
        }
    }

    /// Handle a single keyboard event
    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always cancels, whichever widget has focus
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.controller.cancel();
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key, now),
            Focus::List => {
                if let Some(action) = self.key_bindings.get(key) {
                    self.handle_action(action);
                }
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        let input = std::mem::take(&mut self.search_input);

        // Ctrl+U and Esc empty the box and apply the empty search at once
        let ctrl_u =
            key.code == KeyCode::Char('u') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_u || key.code == KeyCode::Esc {
            self.search_input = clear_input(input);
            self.controller.clear_search();
            if key.code == KeyCode::Esc {
                self.focus = Focus::List;
            }
            return;
        }

        let before = input.text().to_string();

        self.search_input = match key.code {
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                self.focus = Focus::List;
                input
            }
            KeyCode::Char(ch) => handle_char_input(input, ch),
            KeyCode::Backspace => handle_backspace(input),
            KeyCode::Delete => handle_delete(input),
            KeyCode::Left => handle_cursor_left(input),
            KeyCode::Right => handle_cursor_right(input),
            KeyCode::Home => handle_home(input),
            KeyCode::End => handle_end(input),
            _ => input,
        };

        if self.search_input.text() != before {
            self.controller.set_search_text(self.search_input.text(), now);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::MoveUp => self.controller.move_focus(-1),
            KeyAction::MoveDown => self.controller.move_focus(1),
            KeyAction::PageUp => self.controller.page_up(),
            KeyAction::PageDown => self.controller.page_down(),
            KeyAction::ScrollToTop => self.controller.focus_first(),
            KeyAction::ScrollToBottom => self.controller.focus_last(),
            KeyAction::ToggleSelected => {
                self.controller.toggle_focused();
            }
            KeyAction::ToggleShowSelected => self.controller.toggle_view_mode(),
            KeyAction::FocusSearch => self.focus = Focus::Search,
            KeyAction::CycleFilterField => {
                self.controller.cycle_filter_field();
            }
            KeyAction::CycleSort => {
                self.controller.cycle_sort();
            }
            KeyAction::Retry => {
                self.controller.retry();
            }
            KeyAction::DismissError => self.controller.dismiss_error(),
            KeyAction::Save => {
                // Failures surface as a notification; the session stays open
                if let Err(err) = self.controller.save(self.sink.as_ref()) {
                    debug!(error = %err, "Save rejected");
                }
            }
            KeyAction::Cancel => self.controller.cancel(),
        }
    }

    /// Handle a single mouse event
    ///
    /// The wheel scrolls the list; a click focuses the row under it and a
    /// click on its checkbox also toggles it.
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let row_extent = self.controller.config().row_extent;
        let notch = i64::try_from(row_extent.get())
            .unwrap_or(i64::MAX)
            .saturating_mul(WHEEL_ROWS);

        match mouse.kind {
            MouseEventKind::ScrollDown => self.controller.scroll_by(notch),
            MouseEventKind::ScrollUp => self.controller.scroll_by(-notch),
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(line) = self.layout.body_line_at(mouse.column, mouse.row) else {
                    return;
                };
                let first = self.controller.scroll_offset().get() / row_extent.get();
                let Ok(index) = usize::try_from(first + u64::from(line)) else {
                    return;
                };
                if index >= self.controller.row_count() {
                    return;
                }

                self.focus = Focus::List;
                let current = self.controller.focused_index().unwrap_or(0);
                let delta = isize::try_from(index).unwrap_or(isize::MAX)
                    - isize::try_from(current).unwrap_or(isize::MAX);
                self.controller.move_focus(delta);

                let on_checkbox = mouse.column < self.layout.list.x + 1 + CHECKBOX_WIDTH;
                if on_checkbox {
                    self.controller.toggle_focused();
                }
            }
            _ => {}
        }
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        self.sync_viewport()?;

        let layout = self.layout;
        let display = self.controller.display();
        let notice = self.toast.as_ref().map(|toast| toast.message.as_str());
        let list_focused = self.focus == Focus::List;

        self.terminal.draw(|frame| {
            let identity = self.controller.identity();
            frame.render_widget(
                SearchBar::new(&self.search_input, &identity.filter_field, self.styles)
                    .sort(identity.sort.as_ref())
                    .focused(!list_focused),
                layout.search,
            );
            frame.render_widget(
                RecordList::new(&self.controller, self.renderer.as_ref(), self.styles)
                    .title(&self.title)
                    .focused(list_focused),
                layout.list,
            );
            frame.render_widget(
                StatusBar::new(&display, self.styles).notice(notice),
                layout.status,
            );
        })?;

        Ok(())
    }
}

// ===== Test Helpers =====

#[cfg(test)]
impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Create TuiApp for testing with fetches answered synchronously.
    pub(crate) fn new_for_test(terminal: Terminal<B>, parts: SessionParts) -> Self {
        let source = Arc::clone(&parts.source);
        match Self::with_fetcher(terminal, parts, Fetcher::Inline(source)) {
            Ok(app) => app,
            Err(err) => panic!("test terminal failed: {err}"),
        }
    }

    pub(crate) fn controller(&self) -> &ListController {
        &self.controller
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub(crate) fn search_focused(&self) -> bool {
        self.focus == Focus::Search
    }

    pub(crate) fn notice(&self) -> Option<&str> {
        self.toast.as_ref().map(|toast| toast.message.as_str())
    }
}

/// Initialize and run a selection session.
///
/// Handles terminal setup, runs the event loop, and restores the terminal on
/// exit, even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_session(parts: SessionParts) -> Result<SessionState, TuiError> {
    let mut app = match TuiApp::new(parts) {
        Ok(app) => app,
        Err(err) => {
            let _ = restore_terminal();
            return Err(err);
        }
    };

    let result = app.run();
    // Join the fetch thread before handing the terminal back
    drop(app);

    if let Err(err) = restore_terminal() {
        warn!(error = %err, "Failed to restore terminal");
        return Err(err);
    }

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
