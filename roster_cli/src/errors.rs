/// Errors the CLI reports through its exit code.
///
/// Details are printed with [`crate::ui`] where the error occurs.
#[derive(Debug, PartialEq)]
pub enum CliError {
    ConfigError,
    StoreError,
    ServerError,
    OutputError,
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ConfigError => 2,
            CliError::StoreError => 3,
            CliError::ServerError => 4,
            CliError::OutputError => 5,
        }
    }
}
