use crate::models::args::Cli;
use config::{Config, Environment, File, FileFormat};
use kvfs::Compression;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Loaded when `--config` is not given; its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "kvfs.toml";
/// Environment overrides look like `KVFS__STORE__DATA_DIR=/var/lib/kvfs`.
pub const ENV_PREFIX: &str = "KVFS";

#[kvfs_derive::kvfs_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Disk,
    /// Process-local; contents vanish when the command exits.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub compression: Compression,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Enables rolling log files in this directory.
    pub dir: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub prefix: String,
    pub store: StoreConfig,
    pub log: LogConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Disk,
            data_dir: PathBuf::from(".kvfs"),
            compression: Compression::None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "warn".to_owned(), dir: None, json: false }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self { prefix: "/kvfs".to_owned(), store: StoreConfig::default(), log: LogConfig::default() }
    }
}

impl CliConfig {
    /// Applies the command-line flags, which win over file and environment.
    #[must_use]
    pub fn with_flags(mut self, cli: &Cli) -> Self {
        if let Some(prefix) = &cli.prefix {
            self.prefix.clone_from(prefix);
        }
        if let Some(dir) = &cli.data_dir {
            self.store.data_dir.clone_from(dir);
        }
        self
    }
}

/// Loads [`CliConfig`] from a TOML file overlaid with `KVFS__*` environment variables.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] is read if it is
/// present in the working directory.
///
/// # Errors
///
/// Returns [`ConfigError::Config`] if an explicit file is missing, a file or variable is
/// malformed, or a value has the wrong type.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    let (file, required) =
        path.map_or_else(|| (PathBuf::from(DEFAULT_CONFIG_FILE), false), |p| (p.to_path_buf(), true));

    let config = Config::builder()
        .add_source(File::from(file.as_path()).format(FileFormat::Toml).required(required))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context(format!("Failed to read {}", file.display()))?
        .try_deserialize::<CliConfig>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_defaults() {
        let cfg = CliConfig::default();
        assert_eq!(cfg.prefix, "/kvfs");
        assert_eq!(cfg.store.backend, Backend::Disk);
        assert_eq!(cfg.store.data_dir, PathBuf::from(".kvfs"));
        assert_eq!(cfg.store.compression, Compression::None);
        assert_eq!(cfg.log.level, "warn");
        assert!(cfg.log.dir.is_none());
    }

    #[test]
    #[serial]
    fn test_file_values_fill_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "prefix = \"app:\"\n[store]\ncompression = \"lz4\"\n").unwrap();

        let cfg = load_config(Some(&path)).unwrap();

        assert_eq!(cfg.prefix, "app:");
        assert_eq!(cfg.store.compression, Compression::Lz4);
        assert_eq!(cfg.store.backend, Backend::Disk);
        assert_eq!(cfg.store.data_dir, PathBuf::from(".kvfs"));
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Config { .. })));
    }

    #[test]
    #[serial]
    fn test_unknown_backend_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[store]\nbackend = \"s3\"\n").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_flags_override_loaded_values() {
        let cli = Cli::parse_from(["kvfs", "--prefix", "/p", "--data-dir", "/tmp/d", "ls"]);
        let cfg = CliConfig::default().with_flags(&cli);

        assert_eq!(cfg.prefix, "/p");
        assert_eq!(cfg.store.data_dir, PathBuf::from("/tmp/d"));

        let cli = Cli::parse_from(["kvfs", "ls"]);
        assert_eq!(CliConfig::default().with_flags(&cli).prefix, "/kvfs");
    }
}
