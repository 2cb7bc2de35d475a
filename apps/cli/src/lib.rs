//! # kvfs CLI
//!
//! Wires configuration, logging and the selected store backend into a [`Kvfs`] instance
//! and runs one command against it.

pub mod handlers;
pub mod models;
pub mod store;

use crate::models::args::Cli;
use crate::models::config::CliConfig;
use crate::store::AnyStore;
use anyhow::{Context, Result};
use kvfs::Kvfs;
use kvfs_logger::{Logger, parse_level};
use std::io::Write;

/// Installs the logger described by `config`, raised by the `-v` count.
///
/// # Errors
///
/// Returns an error if the level is unknown or the subscriber cannot be installed.
pub fn init_logger(config: &CliConfig, verbosity: u8) -> Result<Logger> {
    let level = parse_level(&config.log.level)?;
    let builder = Logger::builder().name("kvfs").level(level).verbosity(verbosity);

    let logger = match &config.log.dir {
        Some(dir) if config.log.json => builder.dir(dir).json().init()?,
        Some(dir) => builder.dir(dir).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

/// Opens the configured store under the configured prefix.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the prefix is empty.
pub async fn open(config: &CliConfig) -> Result<Kvfs<AnyStore>> {
    let store = AnyStore::open(&config.store)
        .await
        .with_context(|| format!("Failed to open store in {}", config.store.data_dir.display()))?;

    Ok(Kvfs::new(store, config.prefix.as_str())?)
}

/// Runs the parsed command line with an already-loaded configuration.
///
/// # Errors
///
/// Returns the failure of opening the store or of the command itself.
pub async fn run<W: Write>(cli: Cli, config: &CliConfig, out: &mut W) -> Result<()> {
    let fs = open(config).await?;
    handlers::execute(&fs, cli.command, out).await
}
