use anyhow::{Context, Result, bail};
use kvfs::{KeyValueStore, Kvfs};
use std::io::Write;

/// Prints matching paths, one per line.
///
/// # Errors
///
/// Returns an error if listing fails or the sink cannot be written.
pub async fn list<S: KeyValueStore, W: Write>(
    fs: &Kvfs<S>,
    spec: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let paths = fs.list(spec).await.context("Failed to list paths")?;
    for path in paths {
        writeln!(out, "{path}")?;
    }
    Ok(())
}

/// Prints the value at `path` as pretty JSON.
///
/// # Errors
///
/// Returns an error if nothing is stored at `path` or the read fails.
pub async fn cat<S: KeyValueStore, W: Write>(fs: &Kvfs<S>, path: &str, out: &mut W) -> Result<()> {
    let Some(value) = fs.read(path).await.with_context(|| format!("Failed to read {path}"))?
    else {
        bail!("Nothing stored at {path}");
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

/// Prints every match of `spec` as a JSON array of `{ "path", "value" }` objects.
///
/// # Errors
///
/// Returns an error if the read fails or the sink cannot be written.
pub async fn dump<S: KeyValueStore, W: Write>(fs: &Kvfs<S>, spec: &str, out: &mut W) -> Result<()> {
    let found = fs.read_multi(spec).await.with_context(|| format!("Failed to read {spec}"))?;

    writeln!(out, "{}", serde_json::to_string_pretty(&found)?)?;
    Ok(())
}
