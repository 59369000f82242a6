use super::app::App;
use super::view;
use aether_cli::config::{Config, FilePreferences, MemoryPreferences, PreferenceStore};
use aether_cli::session::SessionGateway;
use aether_cli::shell::{ShellOptions, default_user_agent};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{info, warn};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use reqwest::Url;
use std::io;
use std::time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct TuiOptions {
    pub base_url: String,
    pub user_agent: Option<String>,
    pub liveness_interval: Duration,
    pub persist_preferences: bool,
}

/// Raw mode and the alternate screen, restored on drop so early errors and
/// panics leave a usable terminal
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

fn open_preferences(persist: bool) -> Box<dyn PreferenceStore> {
    if !persist {
        return Box::new(MemoryPreferences::default());
    }
    match Config::get_preferences_path() {
        Ok(path) => Box::new(FilePreferences::open(path)),
        Err(e) => {
            warn!("Preferences will not be saved: {:#}", e);
            Box::new(MemoryPreferences::default())
        }
    }
}

pub async fn launch(gateway: SessionGateway, options: TuiOptions) -> Result<()> {
    let shell_options = ShellOptions {
        user_agent: options.user_agent.unwrap_or_else(default_user_agent),
        liveness_interval: options.liveness_interval,
    };
    let origin = Url::parse(&options.base_url).ok();
    let mut app = App::new(gateway, open_preferences(options.persist_preferences), shell_options, origin);
    app.start();
    info!("TUI started");

    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run(&mut terminal, &mut app).await;
    drop(guard);

    info!("TUI stopped");
    result
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !app.handle_key(key) {
                    return Ok(());
                }
            }
        }

        app.tick(frame_start);
        terminal.draw(|frame| view::render(frame, app))?;

        if let Some(remaining) = FRAME_INTERVAL.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }
}
