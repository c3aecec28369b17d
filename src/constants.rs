//! App-wide constants.
//!
//! Centralises the tool name, config filenames, environment variable names,
//! and the conventional scope priorities so a rename only requires changing
//! this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "cfgstack";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filename joined onto the home directory by [`ConfigStore::open_global`].
///
/// [`ConfigStore::open_global`]: crate::store::ConfigStore::open_global
pub const GLOBAL_CONFIG_FILENAME: &str = ".gitconfig";

/// Priority given to the single backend registered by `open_from_path`.
pub const DEFAULT_PRIORITY: i32 = 1;

// ── Scope priorities ────────────────────────────────────────────────

pub const PRIORITY_SYSTEM: i32 = 1;
pub const PRIORITY_GLOBAL: i32 = 2;
pub const PRIORITY_LOCAL: i32 = 3;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_HOME: &str = "HOME";
pub const ENV_LOG: &str = "CFGSTACK_LOG";
pub const ENV_CONFIG_FILE: &str = "CFGSTACK_CONFIG";
