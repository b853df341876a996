use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// Read a JSON document, or `None` when the file is missing or unparseable.
pub(crate) fn read(path: &Path) -> Option<Value> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("⚠️  Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("⚠️  Ignoring corrupt {}: {}", path.display(), e);
            None
        }
    }
}

/// Overwrite `path` with the pretty-printed document.
///
/// The content lands in a sibling temp file first and is renamed over the
/// target, so readers see either the old or the new record.
pub(crate) fn write<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(|source| io_error(&tmp, source))?;
    fs::rename(&tmp, path).map_err(|source| io_error(path, source))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
