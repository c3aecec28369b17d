//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests and embedders use [`Env::mock()`] backed by a `HashMap`, so the
//! global lookup and [`get_env_bool`] never need `unsafe` calls to
//! [`std::env::set_var`] / [`std::env::remove_var`].

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::value;

/// Environment variable reader.
///
/// Wraps lookups so that production code hits `std::env` while tests
/// can supply a controlled set of values.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// The home directory named by `$HOME`, if set and non-empty.
    ///
    /// Never touches the filesystem.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.var(crate::constants::ENV_HOME)
            .ok()
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

/// Read `name` from the environment and coerce it like a config boolean.
///
/// Independent of any [`ConfigStore`](crate::store::ConfigStore).
pub fn get_env_bool(env: &Env, name: &str) -> Result<bool, ConfigError> {
    let raw = env.var(name).map_err(|_| ConfigError::EnvNotSet {
        name: name.to_string(),
    })?;

    value::parse_bool(Some(&raw)).map_err(|e| ConfigError::invalid_type(name, e))
}
