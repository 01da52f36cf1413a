//! Template identity and output naming.

use std::path::{Component, Path};

use crate::constants::TEMPLATE_SUFFIX;
use crate::core::BootstrapError;

/// Identifies a template by its `/`-separated path relative to the template root.
///
/// The descriptor also fixes the name of the file the template renders to: the base
/// name with the `.jinja2` suffix stripped, so `default/config.properties.jinja2`
/// renders to `config.properties` and `catalog/hive.properties` keeps its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateDescriptor {
    name: String,
}

impl TemplateDescriptor {
    /// Create a descriptor from a root-relative name such as `default/node.properties.jinja2`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
        }
    }

    /// Create a descriptor for a template file discovered on disk under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::TemplateOutsideRoot`] if `path` is not below `root`,
    /// including paths that climb back out through `..`.
    pub fn from_path(root: &Path, path: &Path) -> Result<Self, BootstrapError> {
        let relative = path.strip_prefix(root).map_err(|_| BootstrapError::TemplateOutsideRoot {
            path: path.display().to_string(),
            root: root.display().to_string(),
        })?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                // `root/../elsewhere` only looks like it is under the root
                _ => {
                    return Err(BootstrapError::TemplateOutsideRoot {
                        path: path.display().to_string(),
                        root: root.display().to_string(),
                    });
                }
            }
        }
        let name = parts.join("/");

        Ok(Self::new(name))
    }

    /// Root-relative template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the file this template renders to.
    #[must_use]
    pub fn output_filename(&self) -> &str {
        let base = self.name.rsplit('/').next().unwrap_or(&self.name);
        base.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(base)
    }
}

impl std::fmt::Display for TemplateDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
