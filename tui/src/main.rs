use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

// Error tracing
use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use client::{ApiClient, FileStore, HyperTransport, Router, SessionStore};
use shared::config::load_config_or_default;
use shared::types::client_config::API_URL_ENV;

mod app;
mod event;
mod input;
mod ui;

use app::App;
use event::EventHandler;

/// Terminal client for the EduHub assignment service.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file. A missing file means defaults.
    #[arg(short, long, default_value = "eduhub.toml")]
    config: String,

    /// Backend base URL, overriding the config file and the environment.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Where the session credential is stored.
    #[arg(long, value_name = "PATH")]
    session_file: Option<PathBuf>,

    /// Log destination; the terminal itself is owned by the UI.
    #[arg(long, value_name = "PATH", default_value = "eduhub.log")]
    log_file: PathBuf,

    /// Initial client route, e.g. `/login` or `/teacher`.
    #[arg(long, value_name = "PATH", default_value = "/")]
    start: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let config = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    let base_url = args
        .base_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .map(|url| config.api.base_url_with_override(Some(url)))
        .unwrap_or_else(|| config.api.resolved_base_url());

    if !base_url.starts_with("http://") {
        anyhow::bail!(
            "Base URL {} must use http:// (from --base-url or {})",
            base_url,
            API_URL_ENV
        );
    }

    let store_path = args
        .session_file
        .clone()
        .unwrap_or_else(|| config.session.resolved_store_path());

    info!(
        "Starting EduHub client against {} (session at {})",
        base_url,
        store_path.display()
    );

    let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(store_path));
    let transport = HyperTransport::new(config.api.timeout());
    let api = ApiClient::new(base_url, transport, Arc::clone(&store));
    let router = Router::new(store, &args.start);

    let mut terminal = setup_terminal().context("Failed to prepare the terminal")?;
    let result = run(&mut terminal, router, api, config.ui).await;
    restore_terminal(&mut terminal).context("Failed to restore the terminal")?;

    if let Err(e) = &result {
        error!("Client stopped with an error: {:#}", e);
    }
    info!("EduHub client closed");
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    router: Router,
    api: ApiClient<HyperTransport>,
    ui_config: shared::types::UiConfig,
) -> Result<()> {
    let mut events = EventHandler::new(ui_config.tick_rate());
    let mut app = App::new(router, api, ui_config, events.sender());

    while !app.should_quit {
        terminal
            .draw(|frame| ui::render(frame, &app))
            .context("Failed to draw frame")?;

        let Some(event) = events.next().await else {
            break;
        };
        app.handle_event(event);
    }

    Ok(())
}

fn init_tracing(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
