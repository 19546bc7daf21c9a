use crate::core::config::data::Configuration;
use crate::core::config::defaults::{AUTH_TOKEN_TYPE, TOKEN_ENV_VAR};
use crate::core::config::io::{self, ConfigError};
use chrono::Utc;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where the active authentication token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    File,
}

/// Owns the configuration tree and the file it is persisted to.
///
/// Every mutation rewrites the whole file before the in-memory tree is
/// updated, so a failed write leaves both unchanged.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Configuration,
    token_var: String,
}

impl ConfigStore {
    /// Loads the configuration at `path`, merging it over the defaults.
    ///
    /// A missing file yields defaults without touching disk. An unreadable or
    /// malformed file is replaced by defaults. In both of the other cases the
    /// file is rewritten so the on-disk schema stays current; a failure of
    /// that write is returned.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = match io::read_tree(&path) {
            Ok(None) => {
                debug!(path = %path.display(), "no config file yet, using defaults");
                return Ok(Self::with_config(path, Configuration::default()));
            }
            Ok(Some(loaded)) => Configuration::merged_over_defaults(loaded),
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "falling back to default configuration");
                Configuration::default()
            }
            Err(err) => return Err(err),
        };

        let store = Self::with_config(path, config);
        store.persist()?;
        Ok(store)
    }

    fn with_config(path: PathBuf, config: Configuration) -> Self {
        Self {
            path,
            config,
            token_var: TOKEN_ENV_VAR.to_string(),
        }
    }

    /// Reads the override token from `var` instead of [`TOKEN_ENV_VAR`].
    pub fn with_token_var(mut self, var: impl Into<String>) -> Self {
        self.token_var = var.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token_var(&self) -> &str {
        &self.token_var
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.config.get(key).cloned().unwrap_or(default)
    }

    /// Stores `value` at the dotted `key` and rewrites the file.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        let value = value.into();
        self.mutate(|config| config.set(key, value))
    }

    /// Applies `mutator` to a copy of the tree, persists it, then commits it.
    pub(crate) fn mutate<F, T>(&mut self, mutator: F) -> Result<T, ConfigError>
    where
        F: FnOnce(&mut Configuration) -> Result<T, ConfigError>,
    {
        let mut working = self.config.clone();
        let result = mutator(&mut working)?;
        io::write_tree(&self.path, working.tree())?;
        self.config = working;
        Ok(result)
    }

    fn persist(&self) -> Result<(), ConfigError> {
        io::write_tree(&self.path, self.config.tree())
    }

    /// Returns the active token: the environment override first, then `auth.token`.
    pub fn get_token(&self) -> Option<String> {
        self.token_with_source().map(|(token, _)| token)
    }

    pub fn token_source(&self) -> Option<TokenSource> {
        self.token_with_source().map(|(_, source)| source)
    }

    fn token_with_source(&self) -> Option<(String, TokenSource)> {
        if let Ok(token) = std::env::var(&self.token_var) {
            if !token.is_empty() {
                return Some((token, TokenSource::Environment));
            }
        }
        self.config
            .get_str("auth.token")
            .filter(|token| !token.is_empty())
            .map(|token| (token.to_string(), TokenSource::File))
    }

    /// Stores or clears `auth.token`. The environment override is never touched.
    pub fn set_token(&mut self, token: Option<&str>) -> Result<(), ConfigError> {
        match token {
            None => self.set("auth.token", Value::Null),
            Some(token) => {
                let token = token.to_string();
                let stamped_at = Utc::now().to_rfc3339();
                self.mutate(|config| {
                    config.set("auth.token", Value::String(token))?;
                    config.set("auth.token_type", Value::from(AUTH_TOKEN_TYPE))?;
                    config.set("auth.authenticated_at", Value::String(stamped_at))
                })
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.get_token().is_some()
    }

    /// Restores the compiled-in defaults and persists them.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.mutate(|config| {
            *config = Configuration::default();
            Ok(())
        })
    }

    /// Writes the current tree to `destination`.
    pub fn export(&self, destination: &Path) -> Result<(), ConfigError> {
        io::write_tree(destination, self.config.tree())
    }

    /// Deep-merges the tree stored at `source` over the current one and persists.
    pub fn import(&mut self, source: &Path) -> Result<(), ConfigError> {
        let imported = io::read_tree(source)?.ok_or_else(|| ConfigError::Missing {
            path: source.to_path_buf(),
        })?;
        self.mutate(|config| {
            config.merge(imported);
            Ok(())
        })
    }
}
