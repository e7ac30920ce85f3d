use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use incidex::api::IncidexClient;
use incidex::app::{App, DetailArgs};
use incidex::config::Config;
use incidex::{events, logging};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "incidex", version, about = "Terminal client for the Incidex ticket tracker")]
struct Args {
    /// Config file (defaults to ~/.config/incidex/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the ticket creation wizard (default)
    Create,
    /// Change the status or assignee of an existing ticket
    Detail {
        id: i64,
        /// Current status id
        #[arg(long)]
        status: Option<i64>,
        /// Current assignee id
        #[arg(long)]
        assignee: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    logging::init(&config)?;

    let client = IncidexClient::new(&config.server, config.settings.api_timeout)
        .context("Failed to build HTTP client")?;
    let detail = match args.command {
        Some(Command::Detail { id, status, assignee }) => Some(DetailArgs {
            ticket_id: id,
            status,
            assignee,
        }),
        Some(Command::Create) | None => None,
    };
    info!(base_url = %client.base_url, detail = ?detail, "starting");

    // Setup panic hook for clean terminal restore
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, client, detail);
    let res = events::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "exited with error");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}
