//! Web server configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the `serve` command, loadable from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Address to bind, e.g. `127.0.0.1:3000`.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Serialized model artifact.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Training CSV, used when the model needs (re)training.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// `nb` or `svm`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Holdout fraction used when training at startup.
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model.msgpack")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/vn_names.csv")
}

fn default_algorithm() -> String {
    "nb".to_string()
}

fn default_test_ratio() -> f64 {
    0.2
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            bind: default_bind(),
            model_path: default_model_path(),
            dataset_path: default_dataset_path(),
            algorithm: default_algorithm(),
            test_ratio: default_test_ratio(),
        }
    }
}

impl ServeConfig {
    /// Load config from a file, or fall back to defaults when no path is
    /// given. A path that was passed explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(ServeConfig::default()),
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("config file not found: {}", path.display()),
                    )));
                }
                let content = std::fs::read_to_string(path)?;
                Ok(toml::from_str(&content)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ServeConfig::default();
        assert_eq!(config.bind, "127.0.0.1:3000");
        assert_eq!(config.algorithm, "nb");
        assert!(config.test_ratio > 0.0 && config.test_ratio < 1.0);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: ServeConfig = toml::from_str("bind = \"0.0.0.0:8080\"").unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.model_path, PathBuf::from("model.msgpack"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = ServeConfig {
            bind: "127.0.0.1:4000".to_string(),
            model_path: PathBuf::from("svm.msgpack"),
            dataset_path: PathBuf::from("names.csv"),
            algorithm: "svm".to_string(),
            test_ratio: 0.1,
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: ServeConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.bind, config.bind);
        assert_eq!(deserialized.algorithm, config.algorithm);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        assert!(ServeConfig::load(Some(Path::new("/nonexistent/gioitinh.toml"))).is_err());
        assert!(ServeConfig::load(None).is_ok());
    }
}
