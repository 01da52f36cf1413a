//! Test utilities
//!
//! Helpers shared by unit and integration tests: one-time logging setup and a
//! [`TestLayout`] sandbox that mirrors the directory layout of the container image.
//!
//! ```rust,no_run
//! use presto_bootstrap::test_utils::TestLayout;
//!
//! let layout = TestLayout::new().unwrap();
//! layout.write_default("jvm.config", "-server").unwrap();
//! let env = layout.env(&[("POD_NAME", "presto-0")]);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::constants::{
    ENV_CATALOG_DIR, ENV_CONFIGS_DIR, ENV_DATA_DIR, ENV_PRESTO_HOME, ENV_TEMPLATE_CATALOG_DIR,
    ENV_TEMPLATE_CUSTOM_DIR, ENV_TEMPLATE_DEFAULT_DIR, ENV_TEMPLATE_DIR,
};
use crate::settings::{EnvSnapshot, Layout};

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` if given, else `RUST_LOG` if set, else stays silent.
///
/// ```bash
/// RUST_LOG=presto_bootstrap=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// A temporary Presto install plus template tree.
///
/// Template directories are created up front; output directories are not, so tests
/// also cover their creation.
pub struct TestLayout {
    _temp: TempDir,
    layout: Layout,
}

impl TestLayout {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp dir")?;
        let root = temp.path();
        let presto_home = root.join("usr/lib/presto");
        let template_dir = root.join("templates");

        let layout = Layout {
            configs_dir: presto_home.join("etc"),
            catalog_dir: presto_home.join("etc/catalog"),
            presto_home,
            data_dir: root.join("var/lib/presto"),
            template_default_dir: template_dir.join("default"),
            template_custom_dir: template_dir.join("custom"),
            template_catalog_dir: template_dir.join("catalog"),
            template_dir,
        };

        for dir in [
            &layout.template_default_dir,
            &layout.template_custom_dir,
            &layout.template_catalog_dir,
        ] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        Ok(Self {
            _temp: temp,
            layout,
        })
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The eight location variables, in the form the entrypoint reads them.
    #[must_use]
    pub fn env_vars(&self) -> Vec<(String, String)> {
        let l = &self.layout;
        [
            (ENV_PRESTO_HOME, &l.presto_home),
            (ENV_CONFIGS_DIR, &l.configs_dir),
            (ENV_CATALOG_DIR, &l.catalog_dir),
            (ENV_DATA_DIR, &l.data_dir),
            (ENV_TEMPLATE_DIR, &l.template_dir),
            (ENV_TEMPLATE_DEFAULT_DIR, &l.template_default_dir),
            (ENV_TEMPLATE_CUSTOM_DIR, &l.template_custom_dir),
            (ENV_TEMPLATE_CATALOG_DIR, &l.template_catalog_dir),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), path.display().to_string()))
        .collect()
    }

    /// Snapshot with the location variables plus `extra`.
    #[must_use]
    pub fn env(&self, extra: &[(&str, &str)]) -> EnvSnapshot {
        self.env_vars()
            .into_iter()
            .chain(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .collect()
    }

    pub fn write_default(&self, name: &str, contents: &str) -> Result<PathBuf> {
        write(&self.layout.template_default_dir, name, contents)
    }

    pub fn write_custom(&self, name: &str, contents: &str) -> Result<PathBuf> {
        write(&self.layout.template_custom_dir, name, contents)
    }

    pub fn write_catalog(&self, name: &str, contents: &str) -> Result<PathBuf> {
        write(&self.layout.template_catalog_dir, name, contents)
    }

    /// Contents of a rendered file in the config directory.
    pub fn read_config(&self, name: &str) -> Result<String> {
        read(&self.layout.configs_dir.join(name))
    }

    /// Contents of a rendered file in the catalog directory.
    pub fn read_catalog(&self, name: &str) -> Result<String> {
        read(&self.layout.catalog_dir.join(name))
    }
}

fn write(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
