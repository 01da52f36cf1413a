//! Rendering of one configuration file.
//!
//! A template is not opaque text here: its rendered output must itself be `key=value`
//! lines. Those lines become the defaults, the operator's override file with the same
//! name is layered on top, and the merged map is written sorted by key.

use std::path::{Path, PathBuf};

use tera::Context as TeraContext;
use tracing::info;

use crate::core::BootstrapError;
use crate::properties::{PropertyMap, load_properties, merge};
use crate::templating::{TemplateDescriptor, TemplateResolver};
use crate::utils::fs::safe_write;

/// Result of rendering one configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    /// Path the file was written to
    pub path: PathBuf,
    /// Merged properties, as written
    pub properties: PropertyMap,
}

impl RenderedConfig {
    /// File contents exactly as written to disk.
    #[must_use]
    pub fn contents(&self) -> String {
        self.properties.serialize()
    }
}

/// Renders templates into merged, sorted properties files.
///
/// Borrows the run's [`TemplateResolver`] and variable context so that every file in a
/// bootstrap run sees the same settings.
pub struct ConfigRenderer<'a> {
    resolver: &'a mut TemplateResolver,
    variables: &'a TeraContext,
}

impl<'a> ConfigRenderer<'a> {
    pub fn new(resolver: &'a mut TemplateResolver, variables: &'a TeraContext) -> Self {
        Self {
            resolver,
            variables,
        }
    }

    /// Template root of the underlying resolver.
    #[must_use]
    pub fn template_root(&self) -> &Path {
        self.resolver.root()
    }

    /// Describe a template file discovered on disk.
    pub fn descriptor_for(&self, path: &Path) -> Result<TemplateDescriptor, BootstrapError> {
        self.resolver.descriptor_for(path)
    }

    /// Render `descriptor` into `output_dir`.
    ///
    /// 1. Render the template and parse its non-blank lines as the defaults
    /// 2. Load `custom_dir/<output filename>` as overrides when `custom_dir` is given
    /// 3. Merge (override wins) and write sorted `key=value` lines with mode `0o755`
    /// 4. Print the path and contents for the deployment logs
    ///
    /// # Errors
    ///
    /// Missing templates, render failures, unreadable override files and write
    /// failures are all returned; none of them are recoverable.
    pub fn render(
        &mut self,
        descriptor: &TemplateDescriptor,
        output_dir: &Path,
        custom_dir: Option<&Path>,
    ) -> Result<RenderedConfig, BootstrapError> {
        let filename = descriptor.output_filename();

        let rendered = self.resolver.render(descriptor, self.variables)?;
        let defaults = PropertyMap::parse(rendered.trim());

        let custom = match custom_dir {
            Some(dir) => load_properties(dir, filename)?,
            None => PropertyMap::new(),
        };

        let properties = merge(defaults, &custom);
        let output = properties.serialize();

        let path = output_dir.join(filename);
        safe_write(&path, &output).map_err(|e| BootstrapError::FileWrite {
            path: path.display().to_string(),
            reason: format!("{e:#}"),
        })?;

        info!(
            path = %path.display(),
            keys = properties.len(),
            overrides = custom.len(),
            "Rendered {}",
            descriptor
        );
        println!("\n[RENDERED]: {}", path.display());
        println!("{}", indent(&output, "  "));

        Ok(RenderedConfig {
            path,
            properties,
        })
    }
}

/// Prefix every non-blank line of `text` with `prefix`.
pub(crate) fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
