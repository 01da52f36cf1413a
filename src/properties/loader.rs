//! Loading of operator override files.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::merge::PropertyMap;
use crate::core::BootstrapError;

/// Load `directory/filename` as a [`PropertyMap`].
///
/// A missing file is the common case (no override supplied) and yields an empty map.
/// An existing file is parsed with [`PropertyMap::parse`]: blank lines are dropped and
/// the last line for a repeated key wins.
///
/// # Errors
///
/// Returns [`BootstrapError::FileRead`] if the file exists but cannot be read.
pub fn load_properties(directory: &Path, filename: &str) -> Result<PropertyMap, BootstrapError> {
    let path = directory.join(filename);
    if !path.exists() {
        debug!("No override file at {}", path.display());
        return Ok(PropertyMap::new());
    }

    let text = fs::read_to_string(&path).map_err(|e| BootstrapError::FileRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let properties = PropertyMap::parse(&text);
    debug!("Loaded {} override(s) from {}", properties.len(), path.display());
    Ok(properties)
}
