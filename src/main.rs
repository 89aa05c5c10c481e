mod app;
mod cache;
mod config;
mod events;
mod mixer;
mod spotify;
mod ui;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{app::App, cache::Cache, config::Config};

async fn connect_cache(redis_url: &str) -> Cache {
    match Cache::new(redis_url) {
        Ok(c) if c.ping().await => {
            info!("Redis connected at {redis_url}");
            c
        }
        Ok(_) => {
            warn!("Redis not reachable, token caching disabled");
            Cache::disabled()
        }
        Err(e) => {
            warn!("Redis unavailable ({e}), running without token cache");
            Cache::disabled()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load()?;

    // ── Logging setup ────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moodmix=info"));
    // Logs go to a file so they don't corrupt the TUI
    if let Ok(file) = std::fs::File::create(&config.log_path) {
        fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    }

    // ── Redis is optional ────────────────────────────────────────────────────
    let cache = Arc::new(connect_cache(&config.redis_url).await);
    if !cache.is_enabled() {
        info!("Login will not be remembered across restarts");
    }
    let log_path = config.log_path.clone();

    // ── Terminal setup ────────────────────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        disable_raw_mode().ok();
        execute!(io::stdout(), LeaveAlternateScreen).ok();
        original_hook(panic_info);
    }));

    // ── Run the app ──────────────────────────────────────────────────────────
    let result = {
        let mut app = App::new(config, cache);
        app.run(&mut terminal).await
    };

    // ── Restore terminal ─────────────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        error!("App error: {e:?}");
        eprintln!("\n\x1b[31mmoodmix stopped:\x1b[0m {e:#}");
        eprintln!("Check {log_path} for details");
    }

    Ok(())
}
