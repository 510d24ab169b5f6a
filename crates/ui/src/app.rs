use crate::components::{Footer, Header, MessageList, ProgressView, StatsBar};
use crate::event_handler::{EventHandler, KeyAction};
use crate::layout::TuiLayout;
use crate::state::{AppState, ParseEvent, ViewPhase};
use crate::theme::Theme;

use chatlens_core::{Config, TranscriptParser};
use crossterm::event::Event;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Alignment, widgets::Paragraph};
use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;

/// Main TUI application
///
/// Owns the viewer state and the background parse plumbing. Parsing runs in
/// a spawned task that reports progress over a channel; each load request
/// gets a fresh generation and events from superseded generations are
/// discarded, so a stale parse can never overwrite a newer one.
pub struct App {
    state: AppState,
    config: Config,
    source_path: PathBuf,
    events_tx: UnboundedSender<ParseEvent>,
    events_rx: UnboundedReceiver<ParseEvent>,
    cancel: Option<CancellationToken>,
}

impl App {
    /// Create an application for one transcript file
    pub fn new(config: Config, source_path: PathBuf) -> Self {
        let file_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source_path.display().to_string());
        let state = AppState::new(&config, file_name);
        let (events_tx, events_rx) = unbounded_channel();

        Self { state, config, source_path, events_tx, events_rx, cancel: None }
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a mutable reference to the application state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Run the TUI application until the user quits
    pub async fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        self.start_parse();
        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
        loop {
            self.drain_parse_events();
            self.draw(terminal)?;

            if let Some(event) = EventHandler::read()? {
                match event {
                    Event::Key(key) => match EventHandler::handle_key_event(key, &mut self.state) {
                        Some(KeyAction::Quit) => return Ok(()),
                        Some(KeyAction::Reload) => self.start_parse(),
                        Some(KeyAction::Scrolled) | Some(KeyAction::SearchChanged) | None => {}
                    },
                    // The viewport is re-measured on the next draw.
                    Event::Resize(..) => {}
                    _ => {}
                }
            }
        }
    }

    /// Apply any queued parse events to the state.
    fn drain_parse_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                ParseEvent::Progress { generation, percent, status } => {
                    self.state.apply_progress(generation, percent, status);
                }
                ParseEvent::Finished { generation, outcome } => {
                    self.state.apply_outcome(generation, outcome);
                }
            }
        }
    }

    /// Read the source file and parse it in a background task.
    ///
    /// A parse still in flight is cancelled; its events would be dropped by
    /// the generation check regardless.
    fn start_parse(&mut self) {
        let generation = self.state.begin_load();

        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        let path = self.source_path.clone();
        let tx = self.events_tx.clone();
        let batch_size = self.config.parser.batch_size;

        tokio::spawn(async move {
            let text = match tokio::fs::read(&path).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    let _ = tx.send(ParseEvent::Finished { generation, outcome: Err(err.into()) });
                    return;
                }
            };

            let progress_tx = tx.clone();
            let parser = TranscriptParser::new()
                .with_batch_size(batch_size)
                .with_progress(move |percent, status| {
                    let _ = progress_tx.send(ParseEvent::Progress {
                        generation,
                        percent,
                        status: status.to_string(),
                    });
                });

            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(generation, "parse task superseded");
                }
                outcome = parser.parse(&text) => {
                    let _ = tx.send(ParseEvent::Finished { generation, outcome });
                }
            }
        });
    }

    /// Draw the UI
    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();

            if let ViewPhase::Loading { percent, status } = &self.state.phase {
                ProgressView::new(*percent, status).render(frame, area);
                return;
            }

            let layout = TuiLayout::calculate(area, self.state.stats.is_some() && self.state.error.is_none());

            self.state.set_viewport_rows(layout.list.height as usize);
            self.state.refresh_range();

            Header::new(&self.state).render(frame, layout.header);

            if let (Some(stats_area), Some(stats)) = (layout.stats, self.state.stats.as_ref()) {
                StatsBar::new(stats).render(frame, stats_area);
            }

            if let Some(error) = &self.state.error {
                let msg = Paragraph::new(format!("\n{error}\n\npress r to retry, q to quit"))
                    .alignment(Alignment::Center)
                    .style(Theme::error());
                frame.render_widget(msg, layout.list);
            } else {
                MessageList::new(&self.state).render(frame, layout.list);
            }

            Footer::new(&self.state).render(frame, layout.footer);
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn wait_for_viewing(app: &mut App) {
        for _ in 0..200 {
            app.drain_parse_events();
            if app.state().phase == ViewPhase::Viewing {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("parse did not finish");
    }

    #[tokio::test]
    async fn test_parse_task_feeds_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.txt");
        std::fs::write(
            &path,
            "[2024/3/7, 9:41:05 PM] Alice: hello\n[2024/3/7, 9:41:30 PM] Bob: hi",
        )
        .unwrap();

        let mut app = App::new(Config::default(), path);
        app.start_parse();
        wait_for_viewing(&mut app).await;

        assert_eq!(app.state().messages.len(), 2);
        assert!(app.state().error.is_none());
        assert_eq!(app.state().file_name, "chat.txt");
    }

    #[tokio::test]
    async fn test_missing_file_surfaces_error() {
        let mut app = App::new(Config::default(), PathBuf::from("/nonexistent/chat.txt"));
        app.start_parse();
        wait_for_viewing(&mut app).await;

        assert!(app.state().error.is_some());
        assert!(app.state().messages.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_file_surfaces_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "no transcript lines in here").unwrap();

        let mut app = App::new(Config::default(), path);
        app.start_parse();
        wait_for_viewing(&mut app).await;

        assert!(app.state().error.as_deref().unwrap_or("").contains("no messages"));
    }

    #[tokio::test]
    async fn test_reload_supersedes_previous_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.txt");
        std::fs::write(&path, "[2024/3/7, 9:41:05 PM] Alice: hello").unwrap();

        let mut app = App::new(Config::default(), path);
        app.start_parse();
        let first_generation = app.state().generation();
        app.start_parse();

        assert_eq!(app.state().generation(), first_generation + 1);
        wait_for_viewing(&mut app).await;

        // Only the newest generation's result landed.
        assert_eq!(app.state().messages.len(), 1);
    }
}
