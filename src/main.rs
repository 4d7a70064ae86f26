//! Binary entry point: resolve settings, start file logging, load the catalog,
//! and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use library_catalog::config::Cli;
use library_catalog::{logging, run_app, App, Catalog, FileStore};

/// Returning a `Result` bubbles fatal start-up problems (an unreadable or
/// malformed catalog file, for example) to the terminal instead of opening a
/// UI over a half-loaded catalog.
fn main() -> anyhow::Result<()> {
    let settings = Cli::parse().resolve()?;
    let _log_guard = logging::init(&settings.log_dir, &settings.log_level)?;
    tracing::info!(file = %settings.data_file.display(), "starting library catalog");

    let store = FileStore::json(&settings.data_file);
    let catalog = Catalog::open(store)
        .with_context(|| format!("failed to load {}", settings.data_file.display()))?;

    let mut app = App::new(catalog);
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!(error = ?err, "terminal session failed");
    }
    result
}
