use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file '{0}' not found. Create it or provide one with the --config option.")]
    MissingFileError(String),

    #[error("Error opening the config file: {0}")]
    FileOpenError(String),

    #[error("Error parsing the config file: {0}")]
    ParseError(String),

    #[error("Invalid address for '{field}': {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Invalid start date '{0}'. Format must be: RFC2822(Fri, 14 Jul 2022 02:40:00 -0400), RFC3339(2022-02-25T13:00:00Z), or UNIX timestamp.")]
    InvalidStartDate(String),

    #[error("Invalid poll settings: {0}")]
    InvalidPollSettings(String),
}
