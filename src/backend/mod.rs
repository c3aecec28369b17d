//! Backend trait and the concrete backends shipped with the crate.
//!
//! A backend is one physical or logical source of configuration pairs.
//! [`ConfigStore`](crate::store::ConfigStore) owns a set of them and decides
//! which one a read or write touches; the backend itself only knows its own
//! keys.

pub mod file;
pub mod memory;

use std::ops::ControlFlow;
use std::path::Path;

use crate::error::ConfigError;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Callback handed to [`Backend::foreach`].
///
/// Receives each variable name and its raw value (`None` for a key present
/// without a value). Returning `Break` stops the iteration.
pub type Visitor<'a> = dyn FnMut(&str, Option<&str>) -> ControlFlow<()> + 'a;

/// One source of configuration pairs.
///
/// Resources are released on `Drop`.
pub trait Backend {
    /// Load the persisted representation into memory.
    ///
    /// Called once, before the first read or write.
    fn open(&mut self) -> Result<(), ConfigError>;

    /// Look up one value in this backend only.
    ///
    /// Returns `Ok(None)` for a key that is present without a value and
    /// [`ConfigError::NotFound`] when the key is absent.
    fn get(&self, name: &str) -> Result<Option<&str>, ConfigError>;

    /// Persist or update one value in this backend only.
    fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError>;

    /// Visit every stored key, stopping early on the first `Break`.
    fn foreach(&self, visitor: &mut Visitor<'_>) -> ControlFlow<()>;

    /// File this backend reads from, if it has one.
    fn origin(&self) -> Option<&Path> {
        None
    }
}
