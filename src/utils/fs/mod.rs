//! File system utilities for writing the node's configuration
//!
//! # Key Features
//!
//! - **Atomic operations**: rendered files are written via temp-and-rename
//! - **Output mode**: every written or copied file gets mode `0o755` on Unix
//!
//! # Examples
//!
//! ```rust,no_run
//! use presto_bootstrap::utils::fs::{copy_with_output_mode, ensure_dir, safe_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("/etc/presto/catalog"))?;
//! safe_write(Path::new("/etc/presto/node.properties"), "node.environment=production")?;
//! copy_with_output_mode(
//!     Path::new("/templates/default/jvm.config"),
//!     Path::new("/etc/presto/jvm.config"),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod permissions;

pub use atomic::{atomic_write, safe_write};
pub use dirs::ensure_dir;
pub use permissions::{copy_with_output_mode, set_output_mode};
