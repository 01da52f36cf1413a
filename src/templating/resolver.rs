//! Template resolution and rendering with Tera.
//!
//! A [`TemplateResolver`] is created once per bootstrap run with the template root and
//! passed by reference to every render. Templates are read from disk the first time
//! they are requested and kept for the lifetime of the resolver.

use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::descriptor::TemplateDescriptor;
use super::error::{ErrorLocation, TemplateError};
use crate::core::BootstrapError;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Loads templates from a root directory and renders them against a context.
///
/// Syntax is Jinja2-compatible (Tera). Autoescaping is disabled since the output is
/// properties text, not markup. Referencing a variable that is not in the context is
/// an error rather than an empty string.
pub struct TemplateResolver {
    root: PathBuf,
    tera: Tera,
    loaded: HashSet<String>,
}

impl TemplateResolver {
    /// Create a resolver for templates under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        Self {
            root: root.into(),
            tera,
            loaded: HashSet::new(),
        }
    }

    /// Template root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Describe a template file found on disk under the root.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::TemplateOutsideRoot`] if `path` is not below the root.
    pub fn descriptor_for(&self, path: &Path) -> Result<TemplateDescriptor, BootstrapError> {
        TemplateDescriptor::from_path(&self.root, path)
    }

    /// Render a template against `context`.
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::TemplateNotFound`] if the file does not exist
    /// - [`BootstrapError::FileRead`] if it exists but cannot be read
    /// - [`BootstrapError::TemplateRender`] on syntax errors or undefined variables
    pub fn render(
        &mut self,
        descriptor: &TemplateDescriptor,
        context: &TeraContext,
    ) -> Result<String, BootstrapError> {
        self.ensure_loaded(descriptor)?;

        tracing::debug!("Rendering template {}", descriptor);
        Self::log_context_as_kv(context);

        self.tera.render(descriptor.name(), context).map_err(|e| {
            let error = Self::parse_tera_error(&e, descriptor, context);
            BootstrapError::TemplateRender {
                name: descriptor.name().to_string(),
                reason: error.format_with_context(),
            }
        })
    }

    /// Load `descriptor` and every template it pulls in through `include`, `extends`
    /// or `import`, so shared fragments under the root resolve like top-level templates.
    fn ensure_loaded(&mut self, descriptor: &TemplateDescriptor) -> Result<(), BootstrapError> {
        if self.loaded.contains(descriptor.name()) {
            return Ok(());
        }

        let path = self.root.join(descriptor.name());
        if !path.is_file() {
            return Err(BootstrapError::TemplateNotFound {
                name: descriptor.name().to_string(),
                path: path.display().to_string(),
            });
        }

        let mut pending = vec![descriptor.name().to_string()];
        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        while let Some(name) = pending.pop() {
            if self.loaded.contains(&name) || !seen.insert(name.clone()) {
                continue;
            }
            // Unresolvable references are left for Tera to report
            let Some(path) = self.path_under_root(&name) else {
                continue;
            };

            let source = fs::read_to_string(&path).map_err(|e| BootstrapError::FileRead {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            pending.extend(Self::referenced_templates(&source));
            sources.push((name, source));
        }

        // Added together so `extends` parents are present when inheritance is built
        self.tera
            .add_raw_templates(sources.iter().map(|(name, source)| (name.as_str(), source.as_str())))
            .map_err(|e| {
                let error = TemplateError::SyntaxError {
                    message: Self::format_tera_error(&e),
                    location: Box::new(ErrorLocation {
                        template: descriptor.name().to_string(),
                        line_number: Self::extract_line_from_tera_error(&e),
                    }),
                };
                BootstrapError::TemplateRender {
                    name: descriptor.name().to_string(),
                    reason: error.format_with_context(),
                }
            })?;

        for (name, _) in sources {
            tracing::debug!("Loaded template {} from {}", name, self.root.join(&name).display());
            self.loaded.insert(name);
        }
        Ok(())
    }

    /// Existing file for a root-relative template name, refusing names that climb out.
    fn path_under_root(&self, name: &str) -> Option<PathBuf> {
        if Path::new(name).components().any(|c| !matches!(c, Component::Normal(_))) {
            return None;
        }
        let path = self.root.join(name);
        path.is_file().then_some(path)
    }

    /// Template names referenced by `include`, `extends` and `import` tags.
    fn referenced_templates(source: &str) -> Vec<String> {
        let (Ok(tag), Ok(quoted)) = (
            Regex::new(r"\{%-?\s*(?:include|extends|import)\s+([^%]*)-?%\}"),
            Regex::new(r#""([^"]+)"|'([^']+)'"#),
        ) else {
            return Vec::new();
        };

        tag.captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .flat_map(|args| {
                quoted
                    .captures_iter(args.as_str())
                    .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
                    .map(|m| m.as_str().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Parse a Tera error into a structured TemplateError
    fn parse_tera_error(
        error: &tera::Error,
        descriptor: &TemplateDescriptor,
        context: &TeraContext,
    ) -> TemplateError {
        let location = Box::new(ErrorLocation {
            template: descriptor.name().to_string(),
            line_number: Self::extract_line_from_tera_error(error),
        });

        // The undefined-variable message sits somewhere in the source chain
        if let Some(variable) = Self::error_chain(error).iter().find_map(|msg| Self::extract_variable_name(msg)) {
            let available_variables = Self::extract_available_variables(context);
            let suggestions = Self::find_similar_variables(&variable, &available_variables);
            return TemplateError::VariableNotFound {
                variable,
                available_variables: Box::new(available_variables),
                suggestions: Box::new(suggestions),
                location,
            };
        }

        TemplateError::SyntaxError {
            message: Self::format_tera_error(error),
            location,
        }
    }

    fn error_chain(error: &tera::Error) -> Vec<String> {
        use std::error::Error;

        let mut messages = vec![error.to_string()];
        let mut current: Option<&dyn Error> = error.source();
        while let Some(err) = current {
            messages.push(err.to_string());
            current = err.source();
        }
        messages
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        let re = Regex::new(r"Variable `([^`]+)` not found").ok()?;
        re.captures(error_msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
    }

    /// Top-level variable names in the context, sorted.
    fn extract_available_variables(context: &TeraContext) -> Vec<String> {
        match context.clone().into_json() {
            serde_json::Value::Object(map) => {
                let mut vars: Vec<String> = map.keys().cloned().collect();
                vars.sort();
                vars
            }
            _ => Vec::new(),
        }
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> =
            available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Tera reports positions as `line:column` in parse errors.
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let error_msg = Self::error_chain(error).join("\n");
        let re = Regex::new(r"(\d+):(\d+)").ok()?;
        re.captures(&error_msg)
            .and_then(|caps| caps.get(1))
            .and_then(|line| line.as_str().parse::<usize>().ok())
    }

    /// Join the whole Tera error chain into one readable message.
    pub fn format_tera_error(error: &tera::Error) -> String {
        let messages: Vec<String> = Self::error_chain(error)
            .into_iter()
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty())
            .collect();

        if messages.is_empty() {
            "Template syntax error".to_string()
        } else {
            messages.join("\n  -> ")
        }
    }

    /// Log the template context as key-value pairs at trace level.
    fn log_context_as_kv(context: &TeraContext) {
        if let serde_json::Value::Object(map) = context.clone().into_json() {
            for (key, value) in map {
                tracing::trace!("  {} = {}", key, value);
            }
        }
    }
}
