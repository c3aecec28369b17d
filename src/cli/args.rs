//! Clap argument types.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Read and write layered configuration files.
#[derive(Parser, Debug)]
#[command(name = "cfgstack", version = cfgstack::constants::VERSION)]
pub struct Cli {
    /// Use the given config file instead of the global one.
    #[arg(long, short = 'f', global = true, env = cfgstack::constants::ENV_CONFIG_FILE)]
    pub file: Option<PathBuf>,

    /// Use the global config file ($HOME/.gitconfig), even when a file is
    /// given. This is the default.
    #[arg(long, global = true, default_value_t = false)]
    pub global: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Config file selected for this invocation; `None` means the global one.
    pub fn selected_file(&self) -> Option<&PathBuf> {
        if self.global { None } else { self.file.as_ref() }
    }
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the value of a variable.
    Get {
        /// Variable name, e.g. `core.editor`.
        name: String,

        /// Coerce the value before printing it.
        #[arg(long = "type", short = 't', default_value = "string")]
        value_type: ValueType,
    },

    /// Set the value of a variable.
    Set {
        /// Variable name, e.g. `core.editor`.
        name: String,

        /// New value.
        value: String,

        /// Validate and canonicalise the value before writing it.
        #[arg(long = "type", short = 't', default_value = "string")]
        value_type: ValueType,
    },

    /// List every variable, highest priority backend first.
    List {
        /// Print a JSON array instead of `name=value` lines.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Read an environment variable as a config boolean.
    EnvBool {
        /// Environment variable name.
        name: String,
    },

    /// Print version information.
    Version,
}

/// Type a value is read or written as.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int,
    Bool,
}
