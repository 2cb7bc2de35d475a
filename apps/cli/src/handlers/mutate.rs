use anyhow::{Context, Result, bail};
use kvfs::{Entry, KeyValueStore, Kvfs};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Stores the JSON text `json` at `path`.
///
/// # Errors
///
/// Returns an error if `json` does not parse or the write fails.
pub async fn put<S: KeyValueStore>(fs: &Kvfs<S>, path: &str, json: &str) -> Result<()> {
    let value: Value =
        serde_json::from_str(json).with_context(|| format!("Value for {path} is not JSON"))?;

    fs.write(path, &value).await.with_context(|| format!("Failed to write {path}"))?;
    Ok(())
}

/// Writes every member of the JSON object in `file` as `base + key`, in one batch,
/// and prints the number of entries written.
///
/// # Errors
///
/// Returns an error if the file is unreadable, is not a JSON object, or the write fails.
pub async fn import<S: KeyValueStore, W: Write>(
    fs: &Kvfs<S>,
    base: Option<&str>,
    file: &Path,
    out: &mut W,
) -> Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let object: Map<String, Value> = serde_json::from_str(&text)
        .with_context(|| format!("{} must hold a JSON object of path to value", file.display()))?;

    let entries: Vec<Entry<Value>> =
        object.into_iter().map(|(path, value)| Entry::new(path, value)).collect();

    fs.write_multi(base, &entries).await.context("Failed to import entries")?;

    info!(file = %file.display(), count = entries.len(), "Imported entries");
    writeln!(out, "{}", entries.len())?;
    Ok(())
}

/// # Errors
///
/// Returns an error if the removal fails.
pub async fn remove<S: KeyValueStore>(fs: &Kvfs<S>, path: &str) -> Result<()> {
    fs.remove(path).await.with_context(|| format!("Failed to remove {path}"))?;
    Ok(())
}

/// Removes every match of `spec` and prints how many paths were removed.
///
/// # Errors
///
/// Returns an error if `spec` is empty or the removal fails.
pub async fn remove_matching<S: KeyValueStore, W: Write>(
    fs: &Kvfs<S>,
    spec: &str,
    out: &mut W,
) -> Result<()> {
    let removed =
        fs.remove_matching(spec).await.with_context(|| format!("Failed to remove {spec}"))?;

    writeln!(out, "{removed}")?;
    Ok(())
}

/// # Errors
///
/// Returns an error if any path is empty or the removal fails.
pub async fn remove_many<S: KeyValueStore>(fs: &Kvfs<S>, paths: &[String]) -> Result<()> {
    fs.remove_multi(paths).await.context("Failed to remove paths")?;
    Ok(())
}

/// Removes the whole namespace and prints how many keys were removed.
///
/// # Errors
///
/// Returns an error unless `confirmed`, or if the removal fails.
pub async fn purge<S: KeyValueStore, W: Write>(
    fs: &Kvfs<S>,
    confirmed: bool,
    out: &mut W,
) -> Result<()> {
    if !confirmed {
        bail!("Refusing to purge {} without --yes", fs.prefix());
    }

    let removed = fs.remove_all_force().await.context("Failed to purge namespace")?;

    writeln!(out, "{removed}")?;
    Ok(())
}
