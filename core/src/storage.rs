use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, WalkError};

/// Leser JSON fra disk. Feil rapporteres med sti til feltet (serde_path_to_error).
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| WalkError::io(path, e))?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    let value = serde_path_to_error::deserialize(de).map_err(|e| WalkError::Json {
        path: path.to_path_buf(),
        field: e.path().to_string(),
        message: e.inner().to_string(),
    })?;
    debug!("📂 JSON lastet fra {}", path.display());
    Ok(value)
}

/// Lagrer som JSON (pretty-print). Oppretter mappen ved behov.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| WalkError::io(dir, e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| WalkError::io(path, e))?;
    debug!("✅ JSON lagret til {}", path.display());
    Ok(())
}
