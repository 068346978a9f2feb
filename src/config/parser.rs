use std::{fs::File, path::Path};

use crate::config::data::*;
use crate::config::errors::*;

/// Reads `config.json` and validates every address in it.
pub fn load_config(config_file: &str) -> Result<MintConfig, ConfigError> {
    let config_data = load_config_data(config_file)?;
    MintConfig::try_from(config_data)
}

pub fn load_config_data(config_file: &str) -> Result<ConfigData, ConfigError> {
    if !Path::new(config_file).exists() {
        return Err(ConfigError::MissingFileError(config_file.to_string()));
    }

    let file = File::open(config_file)
        .map_err(|err| ConfigError::FileOpenError(format!("{}: {}", config_file, err)))?;

    let config: ConfigData = match serde_json::from_reader(file) {
        Ok(config) => config,
        Err(err) => {
            let error = ConfigError::ParseError(err.to_string());
            tracing::error!("{:?}", error);
            return Err(error);
        }
    };

    Ok(config)
}
