//! YAML codec for flow documents.
//!
//! `serde_yaml` only ever builds data, so loading a document cannot run code.
//! Documents are written block-style with fields in declaration order.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::LoadError;

/// Read and decode a YAML document from `path`
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, LoadError> {
    let path = path.as_ref();
    let context = || format!("Failed to load YAML from {}", path.display());

    let text = fs::read_to_string(path).map_err(|err| LoadError::wrap(context(), err))?;
    let value = serde_yaml::from_str(&text).map_err(|err| LoadError::wrap(context(), err))?;

    debug!(path = %path.display(), "Loaded YAML document");
    Ok(value)
}

/// Encode `value` as YAML and write it to `path`, creating parent directories
pub fn save_yaml<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    let context = || format!("Failed to save YAML to {}", path.display());

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| LoadError::wrap(context(), err))?;
    }

    let text = serde_yaml::to_string(value).map_err(|err| LoadError::wrap(context(), err))?;
    fs::write(path, text).map_err(|err| LoadError::wrap(context(), err))?;

    debug!(path = %path.display(), "Saved YAML document");
    Ok(())
}
