//! Terminal UI and one-shot command line for binday bin collection lookups.

mod app;
mod input;
mod ui;

use std::{
    io::{self, Write as _},
    sync::Arc,
    time::Duration as StdDuration,
};

use anyhow::Result;
use binday_core::{LookupRequest, render_json, render_text, service::BinDayService};
use binday_provider_belfast::{BASE_URL, PortalConfig};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::input::Action;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Look up bin collection days. Without a postcode the terminal UI starts.
#[derive(Debug, Parser)]
#[command(name = "binday", version, about)]
struct Cli {
    /// Postcode to search for
    postcode: Option<String>,

    /// Optional address fragment used to pick one address
    address: Option<String>,

    /// Output format of a one-shot lookup
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log each navigation step and attach the trace to failures
    #[arg(short, long)]
    verbose: bool,

    /// Landing page of the portal
    #[arg(long, env = "BINDAY_BASE_URL", default_value = BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "BINDAY_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn portal_config(&self) -> PortalConfig {
        let config = PortalConfig::default().with_base_url(self.base_url.clone());
        match self.timeout_secs {
            Some(secs) => config.with_timeout(StdDuration::from_secs(secs)),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let port = binday_provider_belfast::provider(cli.portal_config());
    let service = Arc::new(BinDayService::new(port));

    match cli.postcode.clone() {
        Some(postcode) => run_once(&cli, &service, postcode).await,
        None => run_tui(service, cli.verbose).await,
    }
}

async fn run_once(cli: &Cli, service: &BinDayService, postcode: String) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let request = LookupRequest::new(postcode, cli.address.clone()).with_debug(cli.verbose);
    let result = service.lookup(request).await?;

    let rendered = match cli.format {
        OutputFormat::Text => render_text(&result, service.council()),
        OutputFormat::Json => render_json(&result)?,
    };
    writeln!(io::stdout().lock(), "{rendered}")?;

    Ok(())
}

async fn run_tui(service: Arc<BinDayService>, debug: bool) -> Result<()> {
    // App state
    let app = App::new(service, debug);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Lookup => {
                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.service.lookup(app.request()).await;

                    app.is_loading = false;
                    match res {
                        Ok(result) => app.show_schedule(result),
                        Err(err) => app.show_error(format!("Lookup failed: {err}")),
                    }
                }
            }
        }
    }

    Ok(())
}
