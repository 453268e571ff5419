//! Binary entry point: resolve configuration, start file logging, load the
//! data file if one exists, and drive the Ratatui event loop until the user
//! quits.
use grade_manager::store::read_store_or_default;
use grade_manager::ui::StatusKind;
use grade_manager::{logging, run_app, App, Config, Store};
use log::error;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Logging is best effort; the app is still usable without it.
    let _logger = match logging::init_logging(&config) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("logging disabled: {err:#}");
            None
        }
    };

    let (store, load_error) = match read_store_or_default(&config.data_file) {
        Ok(store) => (store, None),
        Err(err) => {
            error!("startup load of {} failed: {err}", config.data_file.display());
            (Store::new(), Some(err))
        }
    };

    let mut app = App::new(store, config.data_file);
    if let Some(err) = load_error {
        app.notify(
            format!("Could not load data file ({err}). Started empty."),
            StatusKind::Error,
        );
    }
    run_app(&mut app)
}
