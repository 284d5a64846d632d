use std::path::PathBuf;

use config::{Config, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::search::Search;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The configuration file does not exist: {0:?}")]
    FileNotFound(PathBuf),

    #[error("Unable to read the configuration file: {0}")]
    UnableToReadConfig(#[from] config::ConfigError),
}

/// Configuration for the engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Depth of the full-width search, in half-moves
    pub search_depth: u16,

    /// Maximum number of plies the quiescence search extends past the search depth
    pub quiescence_depth: u16,

    /// Seed of the Zobrist keys. A random table is used when absent.
    pub zobrist_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            search_depth: Search::DEFAULT_DEPTH,
            quiescence_depth: Search::DEFAULT_QUIESCENCE_DEPTH,
            zobrist_seed: None,
        }
    }
}

/// Loads the configuration of the engine.
///
/// Without a path the defaults are used. Missing keys in the file keep their default value.
pub fn load(path: Option<PathBuf>) -> Result<EngineConfig, ConfigError> {
    let Some(path) = path else {
        debug!("no configuration file given, using the defaults");
        return Ok(EngineConfig::default());
    };

    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path));
    }

    let settings = Config::builder().add_source(File::from(path.clone())).build()?;
    let config: EngineConfig = settings.try_deserialize()?;
    info!(?path, ?config, "configuration loaded");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("quietmove-{}-{}.toml", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = load(None).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.search_depth, 3);
        assert_eq!(config.quiescence_depth, 8);
        assert_eq!(config.zobrist_seed, None);
    }

    #[test]
    fn test_load_file() {
        let path = write_config("full", "search_depth = 5\nquiescence_depth = 4\nzobrist_seed = 42\n");
        let config = load(Some(path.clone())).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(config, EngineConfig { search_depth: 5, quiescence_depth: 4, zobrist_seed: Some(42) });
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = write_config("partial", "search_depth = 2\n");
        let config = load(Some(path.clone())).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(config.search_depth, 2);
        assert_eq!(config.quiescence_depth, Search::DEFAULT_QUIESCENCE_DEPTH);
        assert_eq!(config.zobrist_seed, None);
    }

    #[test]
    fn test_load_missing_file() {
        let path = PathBuf::from("/this/file/does/not/exist.toml");
        assert!(matches!(load(Some(path)), Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_file() {
        let path = write_config("invalid", "search_depth = \"deep\"\n");
        let result = load(Some(path.clone()));
        std::fs::remove_file(path).unwrap();

        assert!(matches!(result, Err(ConfigError::UnableToReadConfig(_))));
    }
}
