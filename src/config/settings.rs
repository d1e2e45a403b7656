use crate::utils::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Optional TOML settings file. Anything set here can be overridden on the
/// command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub state: Option<String>,
    pub verbose: Option<bool>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(toml::from_str(&data)?)
    }
}
