//! Terminal front end.

mod app;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tracing::{error, info, instrument};

pub use app::{App, Flow, FormState, GameOverDialog, Overlay};

use crate::config::AppConfig;
use crate::db::GameRepository;
use crate::leaderboard::LeaderboardService;
use crate::persistence::SnapshotStore;
use crate::session::GameSession;

/// Input poll interval; also bounds notification latency.
const TICK: Duration = Duration::from_millis(50);

/// Runs the game until the player quits.
///
/// Tracing goes to the configured log file so it does not fight the UI for
/// the terminal.
pub fn run_tui(config: &AppConfig) -> Result<()> {
    init_file_logging(config)?;
    info!(db_path = %config.db_path(), "Starting 2048");

    let repository = GameRepository::new(config.db_path().clone())?;
    let store = SnapshotStore::new(repository.clone());
    let leaderboard = LeaderboardService::new(repository);

    let rng = match config.seed() {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_entropy(),
    };
    let delay = Duration::from_millis(*config.notification_delay_ms());
    let (session, source) = GameSession::open(store, rng, delay, Instant::now())?;
    info!(%source, "Game ready");

    let mut app = App::new(session, leaderboard, *config.swipe_threshold());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

#[instrument(skip_all)]
fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if app.handle_key(key, Instant::now()) == Flow::Quit {
                    info!("Leaving game loop");
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
            _ => {}
        }
    }
}

fn init_file_logging(config: &AppConfig) -> Result<()> {
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,game2048=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized
    Ok(())
}
