//! Terminal list presentation.
//!
//! Renders the three mutually exclusive screen states — progress text,
//! problem text, populated list — and owns the key loop. Row content is built
//! by [`article_rows`], a pure function over the article slice, so row count
//! and ordering are testable without a terminal. The scroll position lives in
//! a retained [`ListState`] that survives re-renders, with ratatui's stateful
//! list doing the per-row widget reuse.
//!
//! # Keys
//!
//! - `j` / `k` / arrows: move the selection
//! - `Enter`: open the selected article in the system browser
//! - `r`: reload (starts a new load generation)
//! - `q` / `Esc`: quit

use crate::loader::{LoadCompletion, LoadState, NewsLoader, classify};
use crate::models::Article;
use crate::utils::format_publication_date;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};
use std::error::Error;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Problem text for the no-connection screen.
pub const NO_CONNECTION_MESSAGE: &str = "No internet connection.";
/// Problem text for the empty-result screen.
pub const NO_RESULTS_MESSAGE: &str = "No articles found.";
/// Progress text while a load is in flight.
pub const LOADING_MESSAGE: &str = "Loading articles...";

const TICK: Duration = Duration::from_millis(100);

/// UI-side state: the current screen plus the retained list selection.
pub struct App {
    /// Current screen state.
    pub state: LoadState,
    /// Scroll/selection state, reused across renders.
    pub selection: ListState,
}

impl App {
    /// Start on the loading screen with nothing selected.
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            selection: ListState::default(),
        }
    }

    /// Apply a finished load: pick the terminal screen state and point the
    /// selection at the first row when there is one.
    pub fn apply(&mut self, articles: Option<Vec<Article>>) {
        self.state = classify(articles);
        self.selection = ListState::default();
        if !self.articles().is_empty() {
            self.selection.select(Some(0));
        }
    }

    /// Loader reset: back to an empty populated list. Deliberately not
    /// NoResults; an empty list after a reset is a valid populated screen.
    pub fn reset(&mut self) {
        self.state = LoadState::Populated(Vec::new());
        self.selection = ListState::default();
    }

    /// The articles currently bound to the list (empty outside Populated).
    pub fn articles(&self) -> &[Article] {
        match &self.state {
            LoadState::Populated(articles) => articles,
            _ => &[],
        }
    }

    /// Move the selection down one row, stopping at the end.
    pub fn select_next(&mut self) {
        let len = self.articles().len();
        if len == 0 {
            return;
        }
        let next = match self.selection.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.selection.select(Some(next));
    }

    /// Move the selection up one row, stopping at the top.
    pub fn select_previous(&mut self) {
        if self.articles().is_empty() {
            return;
        }
        let previous = match self.selection.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.selection.select(Some(previous));
    }

    /// URL of the selected article, if any row is selected.
    pub fn selected_url(&self) -> Option<&str> {
        let index = self.selection.selected()?;
        self.articles().get(index).map(|article| article.url.as_str())
    }
}

/// Build one list row per article, in the order given.
///
/// Each row shows the title on the first line and section, kind, and the
/// reformatted publication date on the second. A date that fails to parse
/// leaves its cell empty; the row still renders.
pub fn article_rows(articles: &[Article]) -> Vec<ListItem<'static>> {
    articles
        .iter()
        .map(|article| {
            let date = format_publication_date(&article.published_at).unwrap_or_default();
            ListItem::new(vec![
                Line::styled(
                    article.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    format!("{} | {} | {}", article.section, article.kind, date),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect()
}

/// Enter the alternate screen and run the UI until the user quits.
///
/// Terminal teardown happens even when the inner loop errors, so a failure
/// doesn't leave the shell in raw mode.
pub async fn run(
    mut loader: NewsLoader,
    mut completions: mpsc::UnboundedReceiver<LoadCompletion>,
) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    loader.start_load();

    let result = event_loop(&mut terminal, &mut app, &mut loader, &mut completions).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    loader: &mut NewsLoader,
    completions: &mut mpsc::UnboundedReceiver<LoadCompletion>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        while let Ok(completion) = completions.try_recv() {
            if loader.is_current(&completion) {
                info!(generation = completion.generation, "Applying load completion");
                app.apply(completion.articles);
            }
        }

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("Quit requested");
                return Ok(());
            }
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
            KeyCode::Char('r') => {
                app.state = LoadState::Loading;
                app.selection = ListState::default();
                loader.start_load();
            }
            KeyCode::Enter => open_selected(app),
            _ => {}
        }
    }
}

/// Open the selected article in the platform's default browser.
fn open_selected(app: &App) {
    let Some(url) = app.selected_url() else {
        warn!("Enter pressed with no selection");
        return;
    };
    info!(%url, "Opening article in browser");
    if let Err(e) = open::that(url) {
        error!(%url, error = %e, "Failed to open browser");
    }
}

fn draw(frame: &mut Frame, app: &mut App) {
    let [main, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let block = Block::bordered().title(" newswire ");

    match &app.state {
        LoadState::Loading => {
            let paragraph = Paragraph::new(LOADING_MESSAGE)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, main);
        }
        LoadState::NoConnection => {
            let paragraph = Paragraph::new(NO_CONNECTION_MESSAGE)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, main);
        }
        LoadState::NoResults => {
            let paragraph = Paragraph::new(NO_RESULTS_MESSAGE)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, main);
        }
        LoadState::Populated(articles) => {
            let list = List::new(article_rows(articles))
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, main, &mut app.selection);
        }
    }

    let hints = Paragraph::new("j/k move  Enter open  r reload  q quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, footer);
}
