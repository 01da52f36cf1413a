//! Atomic file write operations using temp-and-rename strategy.
//!
//! The launcher may be restarted by the orchestrator at any moment, so rendered files are
//! never left half-written: content goes to a sibling temp file, is synced, gets its final
//! permissions and is then renamed over the target.

use crate::utils::fs::dirs::ensure_dir;
use crate::utils::fs::permissions::set_output_mode;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`].
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// 1. Creates the parent directory if needed
/// 2. Writes content to `<name>.tmp` next to the target and syncs it
/// 3. Applies the output file mode (`0o755` on Unix)
/// 4. Renames the temporary file onto the target path
///
/// An existing target is replaced unconditionally.
///
/// # Examples
///
/// ```rust,no_run
/// use presto_bootstrap::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("/etc/presto/node.properties"), b"node.environment=production")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, content)
        .and_then(|()| set_output_mode(&temp_path))
        .and_then(|()| {
            fs::rename(&temp_path, path)
                .with_context(|| format!("Failed to rename temp file to: {}", path.display()))
        });

    if result.is_err() {
        // Never leave a partial file next to the rendered ones
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp(temp_path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    let mut file = fs::File::create(temp_path).with_context(|| {
        format!(
            "Failed to create temp file: {}\n\nCheck file permissions and that directory exists",
            temp_path.display()
        )
    })?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

    file.sync_all().with_context(|| "Failed to sync file to disk")
}

/// `config.properties` -> `config.properties.tmp`, so the temp file never matches a
/// `*.properties` glob in the same directory.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
