mod check;
mod serve;
mod tools;

pub use check::check;
pub use serve::serve;
pub use tools::print_tools;

use roster_core::{RecordStore, StoreConfig};

use crate::errors::CliError;
use crate::ui;

/// Opens the store described by `config`, reporting configuration problems.
fn open_store(config: &StoreConfig) -> Result<RecordStore, CliError> {
    RecordStore::from_config(config).map_err(|e| {
        ui::error_with_details("Invalid store configuration", &e.to_string());
        CliError::ConfigError
    })
}
