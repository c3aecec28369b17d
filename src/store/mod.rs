//! The layered configuration store.
//!
//! A [`ConfigStore`] owns an ordered set of backends, highest priority
//! first. Reads and writes go to the highest-priority backend only; a key
//! missing there is reported missing even if a lower layer has it.
//! [`ConfigStore::foreach`] is the one operation that visits every layer.

use std::ops::ControlFlow;
use std::path::Path;

use crate::backend::{Backend, FileBackend};
use crate::constants::{DEFAULT_PRIORITY, ENV_HOME, GLOBAL_CONFIG_FILENAME};
use crate::env::Env;
use crate::error::ConfigError;
use crate::value;

/// A registered backend and its priority.
struct BackendEntry {
    backend: Box<dyn Backend>,
    priority: i32,
}

/// Ordered collection of configuration backends.
///
/// Dropping the store drops every backend in priority order.
#[derive(Default)]
pub struct ConfigStore {
    backends: Vec<BackendEntry>,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("priorities", &self.priorities().collect::<Vec<_>>())
            .finish()
    }
}

impl ConfigStore {
    /// Create a store with no backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a single config file.
    ///
    /// The file backend is registered with [`DEFAULT_PRIORITY`] and opened.
    /// On failure nothing is returned; the partially built store is dropped.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut store = Self::new();
        store.add_backend(Box::new(FileBackend::new(path)), DEFAULT_PRIORITY)?;
        store.backends[0].backend.open()?;
        Ok(store)
    }

    /// Open the user's global config file (`$HOME/.gitconfig`).
    ///
    /// Fails with [`ConfigError::GlobalNotFound`] when `$HOME` is unset,
    /// without touching the filesystem.
    pub fn open_global(env: &Env) -> Result<Self, ConfigError> {
        let home = env
            .home_dir()
            .ok_or(ConfigError::GlobalNotFound { var: ENV_HOME })?;
        Self::open_path(home.join(GLOBAL_CONFIG_FILENAME))
    }

    /// Register `backend` with `priority`. Higher priorities sort first.
    ///
    /// The store takes ownership. If space for the new entry cannot be
    /// reserved the existing backends are left untouched. The relative order
    /// of backends sharing a priority is unspecified.
    pub fn add_backend(&mut self, backend: Box<dyn Backend>, priority: i32) -> Result<(), ConfigError> {
        self.backends
            .try_reserve(1)
            .map_err(|_| ConfigError::OutOfMemory)?;
        self.backends.push(BackendEntry { backend, priority });
        self.backends.sort_by(|a, b| b.priority.cmp(&a.priority));

        tracing::debug!(priority, backends = self.backends.len(), "registered config backend");
        Ok(())
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Priorities of the registered backends, in lookup order.
    pub fn priorities(&self) -> impl Iterator<Item = i32> + '_ {
        self.backends.iter().map(|e| e.priority)
    }

    /// Files backing the registered backends, in lookup order.
    pub fn origins(&self) -> impl Iterator<Item = Option<&Path>> + '_ {
        self.backends.iter().map(|e| e.backend.origin())
    }

    /// Visit every variable of every backend, highest priority first.
    ///
    /// The first `Break` stops the whole walk, including the remaining
    /// backends, and is returned unchanged.
    pub fn foreach<B>(
        &self,
        mut visitor: impl FnMut(&str, Option<&str>) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        let mut stopped = None;
        for entry in &self.backends {
            let flow = entry.backend.foreach(&mut |name, value| match visitor(name, value) {
                ControlFlow::Continue(()) => ControlFlow::Continue(()),
                ControlFlow::Break(b) => {
                    stopped = Some(b);
                    ControlFlow::Break(())
                }
            });
            if let ControlFlow::Break(()) = flow {
                if let Some(b) = stopped.take() {
                    return ControlFlow::Break(b);
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Raw value of `name` in the top backend; `None` for a valueless key.
    pub fn get_raw(&self, name: &str) -> Result<Option<&str>, ConfigError> {
        let value = self.top("get")?.get(name)?;
        tracing::trace!(name, found = value.is_some(), "config lookup");
        Ok(value)
    }

    /// String value of `name` in the top backend.
    ///
    /// A key present without a value reads as the empty string.
    pub fn get_string(&self, name: &str) -> Result<&str, ConfigError> {
        Ok(self.get_raw(name)?.unwrap_or(""))
    }

    /// Integer value of `name`, honouring `k`/`m`/`g` suffixes.
    pub fn get_long(&self, name: &str) -> Result<i64, ConfigError> {
        let raw = self.get_string(name)?;
        value::parse_integer(raw).map_err(|e| ConfigError::invalid_type(name, e))
    }

    /// Like [`get_long`](Self::get_long), narrowed to 32 bits.
    pub fn get_int(&self, name: &str) -> Result<i32, ConfigError> {
        let raw = self.get_string(name)?;
        value::parse_int(raw).map_err(|e| ConfigError::invalid_type(name, e))
    }

    /// Boolean value of `name`. A valueless key is `true`.
    pub fn get_bool(&self, name: &str) -> Result<bool, ConfigError> {
        let raw = self.get_raw(name)?;
        value::parse_bool(raw).map_err(|e| ConfigError::invalid_type(name, e))
    }

    /// Write `value` to the top backend.
    pub fn set_string(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.top_mut("set")?.set(name, value)?;
        tracing::trace!(name, "config write");
        Ok(())
    }

    pub fn set_long(&mut self, name: &str, value: i64) -> Result<(), ConfigError> {
        self.set_string(name, &value::format_integer(value))
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> Result<(), ConfigError> {
        self.set_long(name, i64::from(value))
    }

    /// Write `"true"` or `"false"`.
    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<(), ConfigError> {
        self.set_string(name, value::format_bool(value))
    }

    fn top(&self, operation: &'static str) -> Result<&dyn Backend, ConfigError> {
        match self.backends.first() {
            Some(entry) => Ok(entry.backend.as_ref()),
            None => Err(ConfigError::NoBackends { operation }),
        }
    }

    fn top_mut(&mut self, operation: &'static str) -> Result<&mut dyn Backend, ConfigError> {
        match self.backends.first_mut() {
            Some(entry) => Ok(entry.backend.as_mut()),
            None => Err(ConfigError::NoBackends { operation }),
        }
    }
}
