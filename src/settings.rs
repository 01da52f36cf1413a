//! Run settings assembled from the environment and the command line.
//!
//! The process environment is read exactly once into an [`EnvSnapshot`]. Everything
//! downstream works from that snapshot and the parsed flags, so
//! [`Settings::resolve`] is a pure function that tests can drive directly.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tera::Context as TeraContext;

use crate::cli::NodeArgs;
use crate::constants::{
    CAPTURED_ENV_PREFIXES, ENV_CATALOG_DIR, ENV_CONFIGS_DIR, ENV_DATA_DIR, ENV_POD_NAME,
    ENV_PRESTO_HOME, ENV_TEMPLATE_CATALOG_DIR, ENV_TEMPLATE_CUSTOM_DIR, ENV_TEMPLATE_DEFAULT_DIR,
    ENV_TEMPLATE_DIR, SECRET_ENV_PREFIX,
};
use crate::core::BootstrapError;

/// Immutable copy of the environment variables relevant to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Look up a variable that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::MissingEnvironment`] if the variable is not set.
    pub fn require(&self, name: &str) -> Result<&str, BootstrapError> {
        self.get(name).ok_or_else(|| BootstrapError::MissingEnvironment {
            name: name.to_string(),
        })
    }

    /// Variables whose name starts with any of `prefixes`.
    #[must_use]
    pub fn with_prefixes(&self, prefixes: &[&str]) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .filter(|(key, _)| prefixes.iter().any(|prefix| key.starts_with(prefix)))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Directory locations baked into the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub presto_home: PathBuf,
    /// Rendered node configuration (`node.properties`, `jvm.config`, ...)
    pub configs_dir: PathBuf,
    /// Rendered catalog files
    pub catalog_dir: PathBuf,
    pub data_dir: PathBuf,
    /// Root every template name is relative to
    pub template_dir: PathBuf,
    /// Built-in `*.properties.jinja2` templates and the default `jvm.config`
    pub template_default_dir: PathBuf,
    /// Operator overrides, keyed by output filename
    pub template_custom_dir: PathBuf,
    /// Catalog `*.properties` templates
    pub template_catalog_dir: PathBuf,
}

impl Layout {
    /// Read every directory location from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::MissingEnvironment`] for the first missing variable.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self, BootstrapError> {
        let dir = |name: &str| env.require(name).map(PathBuf::from);

        Ok(Self {
            presto_home: dir(ENV_PRESTO_HOME)?,
            configs_dir: dir(ENV_CONFIGS_DIR)?,
            catalog_dir: dir(ENV_CATALOG_DIR)?,
            data_dir: dir(ENV_DATA_DIR)?,
            template_dir: dir(ENV_TEMPLATE_DIR)?,
            template_default_dir: dir(ENV_TEMPLATE_DEFAULT_DIR)?,
            template_custom_dir: dir(ENV_TEMPLATE_CUSTOM_DIR)?,
            template_catalog_dir: dir(ENV_TEMPLATE_CATALOG_DIR)?,
        })
    }
}

/// Source of fresh node identifiers.
pub trait IdProvider {
    fn generate(&self) -> String;
}

/// Random UUID v4 node identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Always returns the same identifier.
#[derive(Debug, Clone)]
pub struct FixedId(pub String);

impl IdProvider for FixedId {
    fn generate(&self) -> String {
        self.0.clone()
    }
}

/// Everything a bootstrap run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub layout: Layout,
    pub coordinator: bool,
    pub node_id: String,
    pub log_level: String,
    pub environment: String,
    pub discovery_uri: String,
    pub discovery_port: String,
    pub dry_run: bool,
    /// `PRESTO_*`, `TEMPLATE_*`, `SECRET_*` and `USER_*` variables, exposed to templates
    pub captured_env: BTreeMap<String, String>,
}

impl Settings {
    /// Build the settings for one run.
    ///
    /// The node id is taken from `--node-id`, else a non-empty `POD_NAME`, else a fresh
    /// id from `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::MissingEnvironment`] if a directory location is unset.
    pub fn resolve(
        env: &EnvSnapshot,
        args: &NodeArgs,
        ids: &dyn IdProvider,
    ) -> Result<Self, BootstrapError> {
        let layout = Layout::from_env(env)?;

        let node_id = args
            .node_id
            .clone()
            .or_else(|| env.get(ENV_POD_NAME).filter(|name| !name.is_empty()).map(str::to_string))
            .unwrap_or_else(|| ids.generate());

        Ok(Self {
            layout,
            coordinator: args.coordinator,
            node_id,
            log_level: args.log_level.clone(),
            environment: args.environment.clone(),
            discovery_uri: args.discovery_uri.clone(),
            discovery_port: args.discovery_port.clone(),
            dry_run: args.dry_run,
            captured_env: env.with_prefixes(&CAPTURED_ENV_PREFIXES),
        })
    }

    /// Variables available to every template.
    ///
    /// Captured environment variables come first so that a flag always wins over an
    /// environment variable of the same name. Boolean flags stay booleans so templates
    /// can branch on them.
    #[must_use]
    pub fn template_context(&self) -> TeraContext {
        let mut context = TeraContext::new();
        for (key, value) in &self.captured_env {
            context.insert(key.as_str(), value);
        }
        context.insert("coordinator", &self.coordinator);
        context.insert("node_id", &self.node_id);
        context.insert("log_level", &self.log_level);
        context.insert("environment", &self.environment);
        context.insert("discovery_uri", &self.discovery_uri);
        context.insert("discovery_port", &self.discovery_port);
        context.insert("dry_run", &self.dry_run);
        context
    }

    /// Sorted `(name, value)` pairs for the settings banner, with secrets masked.
    #[must_use]
    pub fn display_entries(&self) -> Vec<(String, String)> {
        let mut entries: BTreeMap<String, String> = self
            .captured_env
            .iter()
            .map(|(key, value)| {
                let shown = if key.starts_with(SECRET_ENV_PREFIX) {
                    "********".to_string()
                } else {
                    value.clone()
                };
                (key.clone(), shown)
            })
            .collect();

        entries.insert("coordinator".to_string(), self.coordinator.to_string());
        entries.insert("node_id".to_string(), self.node_id.clone());
        entries.insert("log_level".to_string(), self.log_level.clone());
        entries.insert("environment".to_string(), self.environment.clone());
        entries.insert("discovery_uri".to_string(), self.discovery_uri.clone());
        entries.insert("discovery_port".to_string(), self.discovery_port.clone());
        entries.insert("dry_run".to_string(), self.dry_run.to_string());

        entries.into_iter().collect()
    }
}
