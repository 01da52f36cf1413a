//! The bootstrap sequence that produces every configuration file before launch.
//!
//! Phases run in a fixed order and the first failing file aborts the whole run:
//!
//! 1. `jvm.config` is copied verbatim (custom override if present, else the default)
//! 2. `TEMPLATE_DEFAULT_DIR/*.properties.jinja2` are rendered into `PRESTO_CONFIGS_DIR`,
//!    with `TEMPLATE_CUSTOM_DIR` consulted for overrides
//! 3. `TEMPLATE_CATALOG_DIR/*.properties` are rendered into `PRESTO_CATALOG_DIR`,
//!    without overrides
//!
//! Within a phase files are independent of each other and are processed in glob order.

use std::path::{Path, PathBuf};

use tera::Context as TeraContext;
use tracing::{debug, info};

use crate::constants::{CATALOG_TEMPLATE_GLOB, DEFAULT_TEMPLATE_GLOB, JVM_CONFIG_FILE};
use crate::core::BootstrapError;
use crate::render::{ConfigRenderer, RenderedConfig};
use crate::settings::Layout;
use crate::templating::TemplateResolver;
use crate::utils::fs::copy_with_output_mode;

/// What a bootstrap run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Where `jvm.config` was copied from
    pub jvm_config_source: PathBuf,
    /// Where `jvm.config` was copied to
    pub jvm_config: PathBuf,
    /// Rendered node configuration files
    pub configs: Vec<RenderedConfig>,
    /// Rendered catalog files
    pub catalogs: Vec<RenderedConfig>,
}

/// Runs the bootstrap phases against one [`Layout`].
pub struct Bootstrapper<'a> {
    layout: &'a Layout,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
        }
    }

    /// Run all phases.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; files written before it are left in place.
    pub fn run(
        &self,
        resolver: &mut TemplateResolver,
        variables: &TeraContext,
    ) -> Result<BootstrapReport, BootstrapError> {
        let (jvm_config_source, jvm_config) = self.install_jvm_config()?;

        let mut renderer = ConfigRenderer::new(resolver, variables);

        println!("\n--- Bootstrapping Configuration Files ---");
        let configs = self.render_matching(
            &mut renderer,
            &self.layout.template_default_dir,
            DEFAULT_TEMPLATE_GLOB,
            &self.layout.configs_dir,
            Some(&self.layout.template_custom_dir),
        )?;

        println!("\n--- Bootstrapping Catalog Files ---");
        let catalogs = self.render_matching(
            &mut renderer,
            &self.layout.template_catalog_dir,
            CATALOG_TEMPLATE_GLOB,
            &self.layout.catalog_dir,
            None,
        )?;

        info!(
            configs = configs.len(),
            catalogs = catalogs.len(),
            "Bootstrap complete"
        );

        Ok(BootstrapReport {
            jvm_config_source,
            jvm_config,
            configs,
            catalogs,
        })
    }

    /// Copy `jvm.config` into the config directory without any substitution.
    ///
    /// Returns `(source, target)`.
    pub fn install_jvm_config(&self) -> Result<(PathBuf, PathBuf), BootstrapError> {
        let custom = self.layout.template_custom_dir.join(JVM_CONFIG_FILE);
        let default = self.layout.template_default_dir.join(JVM_CONFIG_FILE);

        let source = if custom.exists() {
            custom
        } else if default.exists() {
            default
        } else {
            return Err(BootstrapError::TemplateNotFound {
                name: JVM_CONFIG_FILE.to_string(),
                path: format!("{} or {}", custom.display(), default.display()),
            });
        };

        let target = self.layout.configs_dir.join(JVM_CONFIG_FILE);
        copy_with_output_mode(&source, &target).map_err(|e| BootstrapError::FileWrite {
            path: target.display().to_string(),
            reason: format!("{e:#}"),
        })?;

        info!(source = %source.display(), target = %target.display(), "Installed jvm.config");
        println!("\n[ADDED]: {} from {}", JVM_CONFIG_FILE, source.display());

        Ok((source, target))
    }

    fn render_matching(
        &self,
        renderer: &mut ConfigRenderer<'_>,
        template_dir: &Path,
        pattern: &str,
        output_dir: &Path,
        custom_dir: Option<&Path>,
    ) -> Result<Vec<RenderedConfig>, BootstrapError> {
        let mut rendered = Vec::new();
        for path in find_templates(template_dir, pattern)? {
            let descriptor = renderer.descriptor_for(&path)?;
            rendered.push(renderer.render(&descriptor, output_dir, custom_dir)?);
        }
        Ok(rendered)
    }
}

/// Files in `dir` matching the glob `pattern`.
///
/// A missing directory matches nothing. Hidden files are skipped.
pub fn find_templates(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, BootstrapError> {
    let dir_str = dir.to_str().ok_or_else(|| BootstrapError::FileRead {
        path: dir.display().to_string(),
        reason: "path is not valid UTF-8".to_string(),
    })?;
    let full_pattern = format!("{}/{}", glob::Pattern::escape(dir_str), pattern);
    debug!("Searching for templates matching {}", full_pattern);

    // Dot-prefixed files are never templates
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };
    let entries = glob::glob_with(&full_pattern, options).map_err(|e| BootstrapError::FileRead {
        path: full_pattern.clone(),
        reason: e.to_string(),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BootstrapError::FileRead {
            path: e.path().display().to_string(),
            reason: e.error().to_string(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    Ok(paths)
}
