use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use review_lens::ai::OpenAiClient;
use review_lens::app::App;
use review_lens::error::Result;
use review_lens::tui::{draw, handle_key_event};
use review_lens::ReviewDesk;

mod cli;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    cli::execute(cli.command.unwrap_or(Commands::Tui), config).await
}

pub async fn run_tui(desk: ReviewDesk<OpenAiClient>) -> Result<()> {
    let mut app = App::new(desk);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) =
                        handle_key_event(key, app.product_input_active, app.show_help)
                    {
                        // Network actions block; show what we're waiting on first
                        app.busy = App::busy_message(&action);
                        if app.busy.is_some() {
                            terminal.draw(|frame| draw(frame, app))?;
                        }

                        let should_quit = app.handle_action(action).await?;
                        app.busy = None;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
