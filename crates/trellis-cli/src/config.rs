//! Discovery and loading of the TOML configuration.
//!
//! Candidates, first match wins:
//!
//! | Source   | Location                                   |
//! |----------|--------------------------------------------|
//! | explicit | `--config FILE` (must exist)               |
//! | local    | `trellis/config.toml` in the working dir   |
//! | platform | `config.toml` in the platform config dir   |
//!
//! Without any match the built-in defaults apply.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use trellis::{TrellisError, config::AppConfig};

const LOCAL_CONFIG: &str = "trellis/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for TrellisError {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::MissingFile(_) => io::ErrorKind::NotFound,
            ConfigError::Parse { .. } => io::ErrorKind::InvalidData,
        };
        TrellisError::Io(io::Error::new(kind, err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    Local,
    Platform,
}

/// Places searched when no explicit path is given, in priority order.
fn search_paths() -> Vec<(ConfigSource, PathBuf)> {
    let mut paths = vec![(ConfigSource::Local, PathBuf::from(LOCAL_CONFIG))];
    match ProjectDirs::from("com", "trellis", "trellis") {
        Some(dirs) => paths.push((ConfigSource::Platform, dirs.config_dir().join("config.toml"))),
        None => debug!("Could not determine platform-specific config directory"),
    }
    paths
}

/// Loads the configuration for one run.
///
/// # Errors
///
/// Fails if the explicit path does not exist, or if the chosen file is not
/// a valid configuration.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TrellisError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        info!(path:? = path; "Loading configuration from explicit path");
        return read_config(path);
    }

    for (source, path) in search_paths() {
        if path.exists() {
            info!(path:? = path, source:? = source; "Loading configuration");
            return read_config(&path);
        }
        debug!(path:? = path, source:? = source; "No configuration file");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn read_config(path: &Path) -> Result<AppConfig, TrellisError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[render]\nmargin = 2.0\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.render().margin(), 2.0);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
        assert!(matches!(err, TrellisError::Io(ref io) if io.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[render\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_search_paths_start_local() {
        let paths = search_paths();
        assert_eq!(paths[0], (ConfigSource::Local, PathBuf::from(LOCAL_CONFIG)));
    }
}
