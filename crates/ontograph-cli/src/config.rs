//! The `.ontograph/config.json` file.
//!
//! Holds a `SessionConfig`: the `filter`, `layout` and `impact`
//! sections. Every field has a default, so a partial file is valid and a
//! missing file means "all defaults".

use ontograph_view::SessionConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_DIR: &str = ".ontograph";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Where the config lives under a project root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Reads the config at `path`, or the defaults if there is none.
pub fn load(path: &Path) -> Result<SessionConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", path.display());
            return Ok(SessionConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `config` to `path`, creating the directory if needed.
pub fn save(path: &Path, config: &SessionConfig) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    let text = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_graph::NodeSize;

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&config_path(dir.path())).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(dir.path());

        let mut config = SessionConfig::default();
        config.filter.node_size = NodeSize::Large;
        config.layout.charge = -120.0;
        config.impact.sample_pairs = 50;
        save(&path, &config).unwrap();

        assert!(dir.path().join(CONFIG_DIR).is_dir());
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"filter": {"minConnections": 2, "nodeSize": "small"}, "layout": {"linkDistance": 80}}"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.filter.min_connections, 2);
        assert_eq!(config.filter.node_size, NodeSize::Small);
        assert_eq!(config.filter.max_connections, 100);
        assert_eq!(config.layout.link_distance, 80.0);
        assert_eq!(config.layout.charge, -300.0);
        assert_eq!(config.impact, Default::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ filter: ").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }
}
