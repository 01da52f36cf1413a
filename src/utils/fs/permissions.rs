//! Permission handling and verbatim copies for files placed in the config directories.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::utils::fs::dirs::ensure_dir;

/// Apply the output file mode to `path`.
///
/// Every file in the config and catalog directories is world-readable and executable
/// (`0o755`), matching what the image has always shipped. No-op on non-Unix platforms.
#[cfg(unix)]
pub fn set_output_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let perms = fs::Permissions::from_mode(crate::constants::OUTPUT_FILE_MODE);
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
pub fn set_output_mode(_path: &Path) -> Result<()> {
    Ok(())
}

/// Copy `source` to `target` byte-for-byte and apply the output file mode.
///
/// The target's parent directory is created if missing. No templating is applied.
pub fn copy_with_output_mode(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    fs::copy(source, target).with_context(|| {
        format!("Failed to copy {} to {}", source.display(), target.display())
    })?;

    set_output_mode(target)
}
