use crate::core::config::data::path_display;
use directories::ProjectDirs;
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Errors raised while reading, writing or addressing the configuration.
///
/// `Read`, `Parse` and `InvalidRoot` are recovered by [`ConfigStore::load`]
/// (defaults are substituted); the remaining variants propagate to the caller.
///
/// [`ConfigStore::load`]: crate::core::config::ConfigStore::load
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        /// Path to the configuration file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The configuration file parsed, but its top level is not an object.
    InvalidRoot { path: PathBuf },

    /// Failed to write the configuration (or an export) to disk.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The in-memory tree could not be rendered as JSON.
    Serialize(serde_json::Error),

    /// A dotted key was empty or contained an empty segment.
    InvalidKey(String),

    /// An import source does not exist.
    Missing { path: PathBuf },
}

impl ConfigError {
    fn display_path(path: &Path) -> String {
        path_display(path)
    }

    /// True for the failures `load` recovers from by substituting defaults.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConfigError::Read { .. } | ConfigError::Parse { .. } | ConfigError::InvalidRoot { .. }
        )
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => write!(
                f,
                "Failed to read config at {}: {}",
                Self::display_path(path),
                source
            ),
            ConfigError::Parse { path, source } => write!(
                f,
                "Failed to parse config at {}: {}",
                Self::display_path(path),
                source
            ),
            ConfigError::InvalidRoot { path } => write!(
                f,
                "Config at {} must contain a JSON object",
                Self::display_path(path)
            ),
            ConfigError::Write { path, source } => write!(
                f,
                "Failed to write config to {}: {}",
                Self::display_path(path),
                source
            ),
            ConfigError::Serialize(source) => write!(f, "Failed to serialize config: {source}"),
            ConfigError::InvalidKey(key) => write!(f, "Invalid config key: '{key}'"),
            ConfigError::Missing { path } => {
                write!(f, "Config file not found: {}", Self::display_path(path))
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } | ConfigError::Write { source, .. } => Some(source),
            ConfigError::Parse { source, .. } | ConfigError::Serialize(source) => Some(source),
            ConfigError::InvalidRoot { .. }
            | ConfigError::InvalidKey(_)
            | ConfigError::Missing { .. } => None,
        }
    }
}

/// Reads a configuration tree from `path`.
///
/// Returns `Ok(None)` when no file exists.
pub fn read_tree(path: &Path) -> Result<Option<Map<String, Value>>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(tree) => Ok(Some(tree)),
        _ => Err(ConfigError::InvalidRoot {
            path: path.to_path_buf(),
        }),
    }
}

/// Writes `tree` to `path` through a temp file in the same directory.
///
/// The rename is atomic, so an interrupted write leaves the previous file intact.
pub fn write_tree(path: &Path, tree: &Map<String, Value>) -> Result<(), ConfigError> {
    let write_err = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(write_err)?;
    }

    let mut contents = serde_json::to_string_pretty(tree).map_err(ConfigError::Serialize)?;
    contents.push('\n');

    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new_in("."),
    }
    .map_err(write_err)?;

    temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
    temp_file.as_file_mut().sync_all().map_err(write_err)?;
    temp_file
        .persist(path)
        .map_err(|err| write_err(err.error))?;
    Ok(())
}

/// Per-user configuration location, or `None` when no home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "codemate", "codemate")
        .map(|dirs| dirs.config_dir().join("config.json"))
}
