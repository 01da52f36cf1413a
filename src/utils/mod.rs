//! Filesystem helpers used by the renderer and the bootstrapper.
//!
//! - [`fs`] - atomic writes, directory creation and output permissions

pub mod fs;

pub use fs::{atomic_write, copy_with_output_mode, ensure_dir, safe_write};
