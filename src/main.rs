mod config;
mod error;
mod ops;
mod todo;

use crate::config::{Cli, Config};
use crate::error::AppError;
use crate::ops::kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use crate::todo::{Coordinator, Presenter, TaskStore, run_app};
use clap::Parser;
use ratatui::crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io;
use std::rc::Rc;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    let config = Config::from_cli(Cli::parse());
    config.ensure_data_dir()?;
    init_logging(&config);

    let storage: Box<dyn KeyValueStore> = if config.ephemeral {
        tracing::info!("running without persistence");
        Box::new(MemoryKeyValueStore::new())
    } else {
        let storage = FileKeyValueStore::open(&config.storage_path);
        tracing::info!(path = %storage.path().display(), "using storage file");
        Box::new(storage)
    };

    let presenter = Rc::new(Presenter::new());
    let coordinator = Coordinator::new(TaskStore::load(storage), presenter.clone());

    // Terminal setup
    enable_raw_mode()?;
    let restore = OnDrop::new(restore_terminal);
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &presenter);
    drop(restore);

    tracing::info!(
        count = coordinator.store().borrow().tasks().len(),
        "shutting down"
    );
    res.map_err(AppError::from)
}

/// Runs a closure once when dropped, so early returns and panics still run it.
struct OnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> OnDrop<F> {
    fn new(f: F) -> Self {
        OnDrop(Some(f))
    }
}

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

/// Leaves the alternate screen and raw mode, ignoring errors.
fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}

/// Logs go to a file in the data directory; the terminal belongs to the UI.
fn init_logging(config: &Config) {
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    {
        Ok(file) => file,
        Err(err) => {
            eprintln!("logging disabled, cannot open {}: {err}", config.log_path.display());
            return;
        }
    };
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
