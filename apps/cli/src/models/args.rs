//! # CLI Argument Definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "kvfs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Browse and edit a kvfs namespace with wildcard paths")]
pub struct Cli {
    /// Configuration file (TOML). Defaults to ./kvfs.toml when present
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Namespace prefix every path is stored under
    #[arg(short, long, global = true)]
    pub prefix: Option<String>,

    /// Directory of the disk store
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List paths matching a wildcard spec (all paths by default)
    Ls { spec: Option<String> },
    /// Print the JSON value stored at a path
    Cat { path: String },
    /// Print every path matching a spec with its value, as a JSON array
    Dump { spec: String },
    /// Store a JSON value at a path
    Put {
        path: String,
        /// The value, as JSON text (quote strings: '"text"')
        json: String,
    },
    /// Store every member of a JSON object file, keyed by path, in one batch
    Import {
        /// Prepended to every path in the file
        #[arg(short, long)]
        base: Option<String>,
        file: PathBuf,
    },
    /// Remove the value at a literal path
    Rm { path: String },
    /// Remove every path matching a wildcard spec
    RmGlob { spec: String },
    /// Remove several literal paths in one batch
    RmMany {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Remove everything under the namespace prefix
    Purge {
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
}
