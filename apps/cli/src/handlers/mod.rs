//! Command handlers. Each writes its result to the given sink, one item per line or a
//! single JSON document, and leaves diagnostics to the logger.

pub mod mutate;
pub mod query;

use crate::models::args::Command;
use anyhow::Result;
use kvfs::{KeyValueStore, Kvfs};
use std::io::Write;

/// Runs one command against `fs`.
///
/// # Errors
///
/// Returns any failure of the command, with context naming what was attempted.
pub async fn execute<S, W>(fs: &Kvfs<S>, command: Command, out: &mut W) -> Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Ls { spec } => query::list(fs, spec.as_deref(), out).await,
        Command::Cat { path } => query::cat(fs, &path, out).await,
        Command::Dump { spec } => query::dump(fs, &spec, out).await,
        Command::Put { path, json } => mutate::put(fs, &path, &json).await,
        Command::Import { base, file } => mutate::import(fs, base.as_deref(), &file, out).await,
        Command::Rm { path } => mutate::remove(fs, &path).await,
        Command::RmGlob { spec } => mutate::remove_matching(fs, &spec, out).await,
        Command::RmMany { paths } => mutate::remove_many(fs, &paths).await,
        Command::Purge { yes } => mutate::purge(fs, yes, out).await,
    }
}
