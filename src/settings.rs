use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Run settings from an optional `licensing.toml` plus `LICENSING_*`
/// environment variables. CLI flags override both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Worker threads for the batch runner; rayon's default when unset.
    #[serde(default)]
    pub workers: Option<usize>,
}

fn default_output() -> PathBuf {
    PathBuf::from("all_licenses.json")
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output: default_output(),
            workers: None,
        }
    }
}

pub fn load() -> Result<Settings> {
    Config::builder()
        .add_source(File::with_name("licensing").required(false))
        .add_source(Environment::with_prefix("LICENSING").try_parsing(true))
        .build()
        .context("failed to read settings")?
        .try_deserialize()
        .context("invalid settings")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_source() {
        let settings: Settings = Config::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output, PathBuf::from("all_licenses.json"));
    }

    #[test]
    fn explicit_values() {
        let settings: Settings = Config::builder()
            .set_override("output", "out/licenses.json")
            .unwrap()
            .set_override("workers", 4)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.output, PathBuf::from("out/licenses.json"));
        assert_eq!(settings.workers, Some(4));
    }
}
