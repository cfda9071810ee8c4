//! Binary entry point: resolve the data directory, start file logging, make
//! sure the schema exists, and drive the Ratatui event loop until the user
//! exits.
use anyhow::Context;
use log::info;
use workout_log::config::AppPaths;
use workout_log::logging::init_file_logger;
use workout_log::{run_app, App, NavigationController, WorkoutStore};

/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable data directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    paths.ensure_dir()?;
    init_file_logger(&paths.log_path())?;
    info!("starting with data in {}", paths.data_dir.display());

    let store = WorkoutStore::new(paths.db_path());
    store
        .create_tables()
        .context("failed to initialise the workout database")?;
    let controller =
        NavigationController::new(store).context("failed to load the calendar")?;

    let mut app = App::new(controller);
    let result = run_app(&mut app);
    info!("shutting down");
    result
}
