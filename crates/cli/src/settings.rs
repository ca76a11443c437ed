use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/scontrino.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for the env filter.
    pub level: String,
    /// Currency assumed for drafts that do not carry one.
    pub currency: String,
    /// Default rendering for `split` (table or json).
    pub format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            currency: "EUR".to_string(),
            format: "table".to_string(),
        }
    }
}

pub fn load(config_path: Option<&str>) -> Result<Settings> {
    let config_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SCONTRINO"));
    let settings: Settings = builder.build()?.try_deserialize()?;
    Ok(settings)
}
