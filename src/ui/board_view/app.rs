use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, warn};

use crate::board::{Board, Card, Column, Grouping, Sorting};
use crate::error::Result;
use crate::loader::{self, DataSource};
use crate::model::Dataset;
use crate::session::Session;

use super::picker::{DisplayPanel, PanelAction};
use super::view;

const EVENT_POLL_MS: u64 = 120;
pub(crate) const MIN_COLUMN_WIDTH: u16 = 28;

enum UiMsg {
    DataLoaded(Dataset),
    LoadError(String),
}

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

#[derive(Default, Clone, Copy)]
struct Viewport {
    height: u16,
}

pub struct AppState {
    session: Session,
    pub(crate) board: Board,
    pub(crate) selected_column: usize,
    pub(crate) selected_card: usize,
    pub(crate) display: Option<DisplayPanel>,
    pub(crate) loading: bool,
    pub(crate) source_label: String,
    status_message: Option<String>,
    info_message: Option<String>,
    viewport: Viewport,
}

impl AppState {
    pub(crate) fn new(session: Session, source_label: String) -> Self {
        let board = session.board();
        Self {
            session,
            board,
            selected_column: 0,
            selected_card: 0,
            display: None,
            loading: true,
            source_label,
            status_message: None,
            info_message: None,
            viewport: Viewport::default(),
        }
    }

    fn update_viewport(&mut self, height: u16) {
        self.viewport = Viewport { height };
    }

    pub(crate) fn grouping(&self) -> Grouping {
        self.session.preferences().grouping
    }

    pub(crate) fn sorting(&self) -> Sorting {
        self.session.preferences().sorting
    }

    pub(crate) fn selected_column(&self) -> Option<&Column> {
        self.board.columns.get(self.selected_column)
    }

    pub(crate) fn selected_card(&self) -> Option<&Card> {
        self.selected_column()
            .and_then(|column| column.cards.get(self.selected_card))
    }

    /// Columns that fit side by side at the current width.
    pub(crate) fn visible_column_capacity(&self, width: u16) -> usize {
        let fit = (width / MIN_COLUMN_WIDTH).max(1) as usize;
        fit.min(self.board.column_count().max(1))
    }

    /// First visible column so the selected one stays on screen.
    pub(crate) fn column_window_start(&self, capacity: usize) -> usize {
        let total = self.board.column_count();
        if total <= capacity {
            return 0;
        }
        let half = capacity / 2;
        self.selected_column
            .saturating_sub(half)
            .min(total - capacity)
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        if self.loading {
            return Some((format!("loading {}", self.source_label), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.display.is_some() {
            return "tab switch list  j/k move  enter apply  1-3 pick  esc close".to_string();
        }
        "h/l column  j/k card  d display  esc/q quit".to_string()
    }

    pub(crate) fn board_summary(&self) -> String {
        format!(
            "grouping: {}  ordering: {}  columns: {}  tickets: {}",
            self.grouping().label(),
            self.sorting().label(),
            self.board.column_count(),
            self.board.ticket_count()
        )
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    /// Recompute the board, keeping the selected ticket when it survives.
    fn refresh_board(&mut self) {
        let previous = self.selected_card().map(|card| card.id.clone());
        self.board = self.session.board();
        self.selected_column = 0;
        self.selected_card = 0;
        if let Some(id) = previous {
            for (col_idx, column) in self.board.columns.iter().enumerate() {
                if let Some(card_idx) = column.cards.iter().position(|card| card.id == id) {
                    self.selected_column = col_idx;
                    self.selected_card = card_idx;
                    break;
                }
            }
        }
    }

    fn move_column(&mut self, delta: isize) {
        let total = self.board.column_count();
        if total == 0 {
            return;
        }
        let next = (self.selected_column as isize + delta).clamp(0, total as isize - 1);
        self.selected_column = next as usize;
        let cards = self
            .selected_column()
            .map(|column| column.cards.len())
            .unwrap_or(0);
        self.selected_card = self.selected_card.min(cards.saturating_sub(1));
    }

    fn move_card(&mut self, delta: isize) {
        let cards = self
            .selected_column()
            .map(|column| column.cards.len())
            .unwrap_or(0);
        if cards == 0 {
            self.selected_card = 0;
            return;
        }
        let next = (self.selected_card as isize + delta).clamp(0, cards as isize - 1);
        self.selected_card = next as usize;
    }

    fn card_jump(&self) -> isize {
        let height = self.viewport.height.saturating_sub(8);
        (height / view::CARD_HEIGHT).max(1) as isize
    }

    pub(crate) fn apply_loaded(&mut self, dataset: Dataset) {
        self.session.apply_loaded(dataset);
        self.loading = false;
        self.refresh_board();
    }

    pub(crate) fn apply_load_error(&mut self, err: String) {
        // The board keeps whatever it showed before.
        self.loading = false;
        self.set_error(format!("load error: {err}"));
    }

    pub(crate) fn apply_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::None => {}
            PanelAction::Close => self.display = None,
            PanelAction::ApplyGrouping(grouping) => {
                self.display = None;
                let saved = self.session.set_grouping(grouping);
                self.refresh_board();
                match saved {
                    Ok(()) => self.set_info(format!("grouping: {}", grouping.label())),
                    Err(err) => self.set_error(format!("failed to save grouping: {err}")),
                }
            }
            PanelAction::ApplySorting(sorting) => {
                self.display = None;
                let saved = self.session.set_sorting(sorting);
                self.refresh_board();
                match saved {
                    Ok(()) => self.set_info(format!("ordering: {}", sorting.label())),
                    Err(err) => self.set_error(format!("failed to save ordering: {err}")),
                }
            }
        }
    }
}

/// Open the interactive board. Data loads in the background.
pub fn run(session: Session, source: DataSource) -> Result<()> {
    let (ui_tx, ui_rx) = mpsc::channel();
    let mut app = AppState::new(session, source.origin());
    spawn_loader(source, ui_tx);
    run_terminal(&mut app, ui_rx)
}

fn spawn_loader(source: DataSource, ui_tx: Sender<UiMsg>) {
    thread::spawn(move || {
        let msg = match loader::load_data(&source) {
            Ok(dataset) => UiMsg::DataLoaded(dataset),
            Err(err) => UiMsg::LoadError(err.to_string()),
        };
        if ui_tx.send(msg).is_err() {
            debug!("board closed before data arrived");
        }
    });
}

/// Runs `restore` when dropped, on every exit path.
struct RestoreOnDrop<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreOnDrop<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        warn!(error = %err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
        warn!(error = %err, "failed to leave alternate screen");
    }
}

fn run_terminal(app: &mut AppState, ui_rx: Receiver<UiMsg>) -> Result<()> {
    enable_raw_mode()?;
    let _restore = RestoreOnDrop::new(restore_terminal);
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.update_viewport(size.height);

    let result = run_loop(&mut terminal, app, ui_rx);
    terminal.show_cursor()?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    ui_rx: Receiver<UiMsg>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            handle_ui_msg(app, msg);
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| {
                app.update_viewport(frame.size().height);
                view::render(frame, app);
            })?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, height) => {
                    app.update_viewport(height);
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_ui_msg(app: &mut AppState, msg: UiMsg) {
    match msg {
        UiMsg::DataLoaded(dataset) => app.apply_loaded(dataset),
        UiMsg::LoadError(err) => {
            warn!(error = %err, "board load failed");
            app.apply_load_error(err);
        }
    }
}

/// Returns true when the board should close.
pub(crate) fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if let Some(panel) = app.display.as_mut() {
        let action = panel.handle_key(key);
        app.apply_panel_action(action);
        return false;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Char('d') => {
            app.display = Some(DisplayPanel::new(app.session.preferences()));
        }
        KeyCode::Left | KeyCode::Char('h') => app.move_column(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_column(1),
        KeyCode::Down | KeyCode::Char('j') => app.move_card(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_card(-1),
        KeyCode::PageDown => app.move_card(app.card_jump()),
        KeyCode::PageUp => app.move_card(-app.card_jump()),
        KeyCode::Home | KeyCode::Char('g') => app.selected_card = 0,
        KeyCode::End | KeyCode::Char('G') => app.move_card(isize::MAX / 2),
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::model::{Ticket, User};
    use crate::prefs::{MemoryPreferenceStore, PreferenceStore, Preferences, GROUPING_KEY};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dataset() -> Dataset {
        let ticket = |id: &str, status: &str, priority: i64, user: &str| Ticket {
            id: id.to_string(),
            title: format!("title {id}"),
            priority,
            status: status.to_string(),
            user_id: user.to_string(),
            tag: Vec::new(),
        };
        Dataset {
            tickets: vec![
                ticket("CAM-1", "Todo", 1, "usr-1"),
                ticket("CAM-2", "Backlog", 4, "usr-2"),
                ticket("CAM-3", "Todo", 3, "usr-2"),
            ],
            users: vec![
                User {
                    id: "usr-1".to_string(),
                    name: "Anoop sharma".to_string(),
                    available: true,
                },
                User {
                    id: "usr-2".to_string(),
                    name: "Yogesh".to_string(),
                    available: true,
                },
            ],
        }
    }

    fn app_with(store: Arc<MemoryPreferenceStore>) -> AppState {
        let session = Session::open(store, Preferences::default());
        AppState::new(session, "test".to_string())
    }

    #[test]
    fn load_error_keeps_previous_board() {
        let mut app = app_with(Arc::new(MemoryPreferenceStore::new()));
        app.apply_loaded(dataset());
        let before = app.board.clone();

        app.apply_load_error("connection refused".to_string());
        assert_eq!(app.board, before);
        assert!(!app.loading);
        assert!(matches!(app.status_line(), Some((msg, StatusKind::Error)) if msg.contains("connection refused")));
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut app = app_with(Arc::new(MemoryPreferenceStore::new()));
        app.apply_loaded(dataset());
        // Backlog, Todo
        handle_key(&mut app, key(KeyCode::Char('l')));
        handle_key(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.selected_column, 1);
        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.selected_card().map(|c| c.id.as_str()), Some("CAM-1"));
        handle_key(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.selected_card().map(|c| c.id.as_str()), Some("CAM-2"));
    }

    #[test]
    fn display_panel_changes_grouping_and_persists() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let mut app = app_with(store.clone());
        app.apply_loaded(dataset());
        handle_key(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.selected_card().map(|c| c.id.as_str()), Some("CAM-3"));

        handle_key(&mut app, key(KeyCode::Char('d')));
        assert!(app.display.is_some());
        handle_key(&mut app, key(KeyCode::Char('2')));

        assert!(app.display.is_none());
        assert_eq!(app.grouping(), Grouping::User);
        assert_eq!(store.get(GROUPING_KEY).unwrap().as_deref(), Some("user"));
        // Selection follows the ticket into its new column.
        assert_eq!(app.selected_card().map(|c| c.id.as_str()), Some("CAM-3"));
        assert_eq!(app.selected_column().map(|c| c.title.as_str()), Some("Yogesh"));
    }

    #[test]
    fn quit_keys_close_board_but_not_panel() {
        let mut app = app_with(Arc::new(MemoryPreferenceStore::new()));
        handle_key(&mut app, key(KeyCode::Char('d')));
        assert!(!handle_key(&mut app, key(KeyCode::Esc)));
        assert!(app.display.is_none());
        assert!(handle_key(&mut app, key(KeyCode::Char('q'))));
    }

    #[test]
    fn restore_runs_when_setup_fails_early() {
        use std::cell::Cell;

        let restored = Cell::new(0);
        let setup = || -> Result<()> {
            let _restore = RestoreOnDrop::new(|| restored.set(restored.get() + 1));
            Err(crate::error::Error::OperationFailed("no terminal".to_string()))
        };
        assert!(setup().is_err());
        assert_eq!(restored.get(), 1);

        {
            let _restore = RestoreOnDrop::new(|| restored.set(restored.get() + 1));
        }
        assert_eq!(restored.get(), 2);
    }

    #[test]
    fn column_window_tracks_selection() {
        let mut app = app_with(Arc::new(MemoryPreferenceStore::new()));
        app.apply_loaded(dataset());
        assert_eq!(app.visible_column_capacity(MIN_COLUMN_WIDTH), 1);
        app.selected_column = 1;
        assert_eq!(app.column_window_start(1), 1);
        assert_eq!(app.column_window_start(2), 0);
    }
}
