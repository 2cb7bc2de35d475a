use anyhow::Context;
use clap::Parser;
use kvfs_cli::models::args::Cli;
use kvfs_cli::models::config::load_config;
use kvfs_cli::{init_logger, run};
use std::io;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = load_config(cli.config.as_deref())
        .context("Critical: Configuration is malformed")?
        .with_flags(&cli);

    // Logging is shaped by the loaded [log] section.
    let _log = init_logger(&cfg, cli.verbose)?;
    debug!(
        file = ?cli.config,
        prefix = %cfg.prefix,
        backend = ?cfg.store.backend,
        data_dir = %cfg.store.data_dir.display(),
        "Configuration loaded"
    );

    run(cli, &cfg, &mut io::stdout().lock()).await
}
