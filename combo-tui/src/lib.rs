//! Entre combo builder TUI and scripting CLI.
//!
//! Runs the interactive builder by default; `quote` and `catalog` exist for
//! shells and scripts.

pub mod app;
pub mod cli;
pub mod quote;
pub mod ui;
pub mod widgets;

use anyhow::{Context, Result};
use cli::{Cli, Command};
use combo_core::catalog::{self, Catalog};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

pub fn run(cli: &Cli) -> Result<()> {
    combo_core::logging::init_with(cli.log_file.clone());

    let loaded;
    let catalog: &Catalog = match &cli.catalog {
        Some(path) => {
            let doc = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog file {}", path.display()))?;
            loaded = catalog::parse_catalog_toml(&doc)?;
            log::info!("loaded catalog from {}", path.display());
            &loaded
        }
        None => catalog::builtin(),
    };

    match &cli.command {
        Some(Command::Quote(args)) => quote::run(catalog, args),
        Some(Command::Catalog) => quote::list_catalog(catalog),
        None if cli.dump_tui => {
            ui::dump_all_steps(catalog);
            Ok(())
        }
        None => run_tui(catalog),
    }
}

fn run_tui(catalog: &Catalog) -> Result<()> {
    use std::io::IsTerminal;

    if !std::io::stdout().is_terminal() {
        anyhow::bail!(
            "No TTY detected. The TUI requires an interactive terminal.\n\
             Use `combo quote` for scripting, or `combo --dump-tui` to inspect the screens."
        );
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = app::App::new(catalog);
    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut app::App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match app.handle_input(key) {
                    app::InputResult::Quit => return Ok(()),
                    app::InputResult::Continue => {}
                }
            }
        }
    }
}
