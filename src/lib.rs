//! cfgstack — layered configuration store (library crate).
//!
//! Resolves named variables against an ordered set of backends and exposes
//! typed accessors over the raw string values. Re-exports public modules for
//! integration tests and embedders.

pub mod backend;
pub mod constants;
pub mod env;
pub mod error;
pub mod store;
pub mod value;

pub use backend::{Backend, FileBackend, MemoryBackend};
pub use env::{Env, get_env_bool};
pub use error::{ConfigError, ErrorKind};
pub use store::ConfigStore;
