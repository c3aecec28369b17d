//! cfgstack — layered configuration CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cfgstack::constants;
use cfgstack::value;
use cfgstack::{ConfigStore, Env};
use cli::args::{Cli, Command, ValueType};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `CFGSTACK_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(constants::ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();

    match cli.command {
        Command::Get { ref name, value_type } => run_get(&cli, &env, name, value_type),
        Command::Set {
            ref name,
            ref value,
            value_type,
        } => run_set(&cli, &env, name, value, value_type),
        Command::List { json } => run_list(&cli, &env, json),
        Command::EnvBool { ref name } => {
            let value = cfgstack::get_env_bool(&env, name)?;
            println!("{}", value::format_bool(value));
            Ok(())
        }
        Command::Version => {
            use colored::Colorize;
            println!("{} {}", constants::APP_NAME.bold(), constants::VERSION.green().bold());
            Ok(())
        }
    }
}

/// Resolve the file the command operates on.
fn target_path(cli: &Cli, env: &Env) -> Result<PathBuf> {
    if let Some(path) = cli.selected_file() {
        return Ok(path.clone());
    }
    let home = env
        .home_dir()
        .with_context(|| format!("cannot locate global config; ${} is not set", constants::ENV_HOME))?;
    Ok(home.join(constants::GLOBAL_CONFIG_FILENAME))
}

fn open_store(cli: &Cli, env: &Env) -> Result<ConfigStore> {
    match cli.selected_file() {
        Some(path) => ConfigStore::open_path(path)
            .with_context(|| format!("failed to open {}", path.display())),
        None => ConfigStore::open_global(env).context("failed to open global config"),
    }
}

fn run_get(cli: &Cli, env: &Env, name: &str, value_type: ValueType) -> Result<()> {
    let store = open_store(cli, env)?;
    match value_type {
        ValueType::String => println!("{}", store.get_string(name)?),
        ValueType::Int => println!("{}", store.get_long(name)?),
        ValueType::Bool => println!("{}", value::format_bool(store.get_bool(name)?)),
    }
    Ok(())
}

fn run_set(cli: &Cli, env: &Env, name: &str, raw: &str, value_type: ValueType) -> Result<()> {
    // Writing to a file that does not exist yet creates it.
    let path = target_path(cli, env)?;
    if !path.exists() {
        std::fs::write(&path, "").with_context(|| format!("failed to create {}", path.display()))?;
    }

    let mut store = ConfigStore::open_path(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    match value_type {
        ValueType::String => store.set_string(name, raw)?,
        ValueType::Int => {
            let n = value::parse_integer(raw).with_context(|| format!("invalid integer for {name}"))?;
            store.set_long(name, n)?;
        }
        ValueType::Bool => {
            let b = value::parse_bool(Some(raw)).with_context(|| format!("invalid boolean for {name}"))?;
            store.set_bool(name, b)?;
        }
    }
    Ok(())
}

/// One row of `list --json`.
#[derive(Debug, Serialize)]
struct ListEntry {
    name: String,
    value: Option<String>,
}

fn run_list(cli: &Cli, env: &Env, json: bool) -> Result<()> {
    let store = open_store(cli, env)?;

    let mut entries = Vec::new();
    let _ = store.foreach(|name, value| {
        entries.push(ListEntry {
            name: name.to_string(),
            value: value.map(str::to_string),
        });
        ControlFlow::<()>::Continue(())
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    use colored::Colorize;
    for entry in &entries {
        match entry.value {
            Some(ref v) => println!("{}={v}", entry.name.bold()),
            None => println!("{}", entry.name.bold()),
        }
    }
    Ok(())
}
