//! Main TUI application

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tokio::sync::mpsc;

use super::input::{InputAction, InputState};
use super::theme::Theme;
use super::widgets::{
    notice_line, render_result_lines, CategoryChips, HeaderBar, HelpBar, SearchBox, StatTiles,
    EMPTY_TEXT, LOADING_TEXT,
};
use crate::dashboard::{load, CategoryFilter, DashboardState, DataSource, LoadedIndex};
use crate::Result;

/// Lines moved per arrow key or wheel notch
const SCROLL_STEP: usize = 3;

/// Scroll position after a key or wheel event, clamped at the top.
fn scrolled(offset: usize, action: &InputAction, page: usize) -> usize {
    match action {
        InputAction::ScrollUp => offset.saturating_sub(SCROLL_STEP),
        InputAction::ScrollDown => offset.saturating_add(SCROLL_STEP),
        InputAction::PageUp => offset.saturating_sub(page.max(1)),
        InputAction::PageDown => offset.saturating_add(page.max(1)),
        _ => offset,
    }
}

/// Terminal dashboard over the generated artifacts
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: DashboardState,
    input: InputState,
    /// First visible result line
    scroll_offset: usize,
    /// Height of the results pane at the last draw
    page_height: usize,
    should_quit: bool,
    load_rx: Option<mpsc::Receiver<Result<LoadedIndex>>>,
}

impl App {
    /// Take over the terminal. It is restored when the app is dropped.
    pub fn new(query: &str, filter: CategoryFilter) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, crossterm::event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let mut state = DashboardState::new();
        state.set_query(query);
        state.set_filter(filter);

        Ok(Self {
            terminal,
            state,
            input: InputState::with_text(query),
            scroll_offset: 0,
            page_height: 0,
            should_quit: false,
            load_rx: None,
        })
    }

    /// Start loading `source` in the background and run the event loop
    /// until the user quits.
    pub async fn run(&mut self, source: DataSource) -> io::Result<()> {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            let _ = tx.send(load(&source).await).await;
        });
        self.load_rx = Some(rx);

        let poll_timeout = Duration::from_millis(16);

        while !self.should_quit {
            self.check_loaded();
            self.draw()?;

            if event::poll(poll_timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::ScrollUp => self.scroll(&InputAction::ScrollUp),
                        MouseEventKind::ScrollDown => self.scroll(&InputAction::ScrollDown),
                        _ => {}
                    },
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn check_loaded(&mut self) {
        let Some(rx) = self.load_rx.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.state.apply_loaded(result);
                self.load_rx = None;
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.state.apply_loaded(Err(crate::BrainError::Fetch(
                    "loader stopped before finishing".to_string(),
                )));
                self.load_rx = None;
            }
        }
    }

    fn scroll(&mut self, action: &InputAction) {
        self.scroll_offset = scrolled(self.scroll_offset, action, self.page_height);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = self.input.handle_key(key);
        match action {
            InputAction::Quit => self.should_quit = true,
            InputAction::QueryChanged => {
                if self.state.set_query(&self.input.buffer) {
                    self.scroll_offset = 0;
                }
            }
            InputAction::NextCategory => {
                self.state.set_filter(self.state.filter().next());
                self.scroll_offset = 0;
            }
            InputAction::PrevCategory => {
                self.state.set_filter(self.state.filter().prev());
                self.scroll_offset = 0;
            }
            InputAction::ScrollUp
            | InputAction::ScrollDown
            | InputAction::PageUp
            | InputAction::PageDown => self.scroll(&action),
            InputAction::CursorMoved | InputAction::None => {}
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let state = &self.state;
        let input = &self.input;
        let scroll_offset = self.scroll_offset;

        let mut captured_page = 0;
        let mut captured_scroll = scroll_offset;

        self.terminal.draw(|f| {
            let size = f.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(2), // Header
                    Constraint::Length(3), // Search
                    Constraint::Length(1), // Chips
                    Constraint::Length(3), // Stats
                    Constraint::Min(3),    // Results
                    Constraint::Length(1), // Help
                ])
                .split(size);

            let generated_at = state.manifest.as_ref().map(|m| m.generated_at.as_str());
            f.render_widget(
                HeaderBar {
                    title: "Second Brain",
                    generated_at,
                },
                chunks[0],
            );

            f.render_widget(
                SearchBox {
                    content: &input.buffer,
                    focused: true,
                },
                chunks[1],
            );

            let chips = state.chip_counts();
            f.render_widget(
                CategoryChips {
                    chips: &chips,
                    active: state.filter(),
                },
                chunks[2],
            );

            f.render_widget(
                StatTiles {
                    total_documents: state.total_documents(),
                    viewport_target: state.viewport_target(),
                },
                chunks[3],
            );

            let (page, scroll) = Self::render_results(f, chunks[4], state, scroll_offset);
            captured_page = page;
            captured_scroll = scroll;

            f.render_widget(HelpBar, chunks[5]);

            // Cursor inside the search box border
            let cursor_x = chunks[1].x + 1 + input.cursor_display_width() as u16;
            let max_x = chunks[1].x + chunks[1].width.saturating_sub(2);
            f.set_cursor_position((cursor_x.min(max_x), chunks[1].y + 1));
        })?;

        self.page_height = captured_page;
        self.scroll_offset = captured_scroll;
        Ok(())
    }

    /// Returns (visible height, clamped scroll offset).
    fn render_results(
        f: &mut ratatui::Frame,
        area: Rect,
        state: &DashboardState,
        scroll_offset: usize,
    ) -> (usize, usize) {
        let results = state.results();
        let title = if state.loading {
            " Results ".to_string()
        } else {
            format!(" Results ({}) ", results.len())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title_top(Line::from(Span::styled(title, Theme::muted())));

        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        if state.loading {
            lines.push(notice_line(LOADING_TEXT, Theme::muted()));
        } else if results.is_empty() {
            lines.push(notice_line(EMPTY_TEXT, Theme::muted()));
            if let Some(error) = &state.load_error {
                lines.push(notice_line(error, Theme::error()));
            }
        }

        let width = inner.width as usize;
        for doc in &results {
            lines.extend(render_result_lines(doc, state.query(), width));
        }

        let visible_height = inner.height as usize;
        let max_scroll = lines.len().saturating_sub(visible_height);
        let scroll = scroll_offset.min(max_scroll);

        let visible: Vec<Line> = lines
            .into_iter()
            .skip(scroll)
            .take(visible_height)
            .collect();
        f.render_widget(Paragraph::new(visible), inner);

        (visible_height, scroll)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            crossterm::event::DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}
