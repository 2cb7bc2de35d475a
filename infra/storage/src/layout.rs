//! Mapping between store keys and files on disk.
//!
//! Each key becomes one file whose name is the lowercase hex encoding of the key bytes.
//! Hex names contain no separators, so a key can never address anything outside the
//! store root. Files are sharded into `<root>/<aa>/<bb>/<name>` using the first four hex
//! digits of the name to keep directory sizes bounded.

use crate::error::StorageError;
use std::path::{Path, PathBuf};

/// Marker embedded in the names of in-flight temporary files.
pub(crate) const TMP_MARKER: &str = ".kvfstmp.";

/// Longest hex file name we produce, leaving room for the temp suffix under the
/// common 255-byte file name limit.
const MAX_ENCODED_LEN: usize = 200;

/// Largest key (in bytes) the disk store accepts.
pub const MAX_KEY_LEN: usize = MAX_ENCODED_LEN / 2;

pub(crate) fn key_to_path(root: &Path, key: &str) -> Result<PathBuf, StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey {
            message: "EMPTY".into(),
            context: Some("Disk store keys cannot be empty".into()),
        });
    }
    if key.len() > MAX_KEY_LEN {
        return Err(StorageError::InvalidKey {
            message: format!("{} bytes", key.len()).into(),
            context: Some(format!("Disk store keys are limited to {MAX_KEY_LEN} bytes").into()),
        });
    }

    let name = hex::encode(key.as_bytes());
    let mut path = root.to_path_buf();
    if name.len() >= 4 {
        path.push(&name[0..2]);
        path.push(&name[2..4]);
    }
    path.push(name);
    Ok(path)
}

/// Recovers the key a data file stands for. Temp files and foreign files yield `None`.
pub(crate) fn path_to_key(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if name.contains(TMP_MARKER) {
        return None;
    }
    let bytes = hex::decode(name).ok()?;
    String::from_utf8(bytes).ok().filter(|k| !k.is_empty())
}
