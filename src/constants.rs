//! Fixed names used throughout the entrypoint.
//!
//! Environment variable names, file naming conventions and the launch contract
//! are defined here so that the image build, the templates and this binary agree
//! on a single set of names.

/// Presto installation root.
pub const ENV_PRESTO_HOME: &str = "PRESTO_HOME";

/// Directory the rendered node configuration is written to.
pub const ENV_CONFIGS_DIR: &str = "PRESTO_CONFIGS_DIR";

/// Directory the rendered catalog files are written to.
pub const ENV_CATALOG_DIR: &str = "PRESTO_CATALOG_DIR";

/// Presto data directory.
pub const ENV_DATA_DIR: &str = "PRESTO_DATA_DIR";

/// Root of every template. Template names are relative to this directory.
pub const ENV_TEMPLATE_DIR: &str = "TEMPLATE_DIR";

/// Built-in default templates shipped with the image.
pub const ENV_TEMPLATE_DEFAULT_DIR: &str = "TEMPLATE_DEFAULT_DIR";

/// Operator-supplied overrides (usually a mounted ConfigMap).
pub const ENV_TEMPLATE_CUSTOM_DIR: &str = "TEMPLATE_CUSTOM_DIR";

/// Catalog templates.
pub const ENV_TEMPLATE_CATALOG_DIR: &str = "TEMPLATE_CATALOG_DIR";

/// Pod name injected by the orchestrator; used as the default node id.
pub const ENV_POD_NAME: &str = "POD_NAME";

/// Environment variables starting with one of these prefixes are exposed to templates.
pub const CAPTURED_ENV_PREFIXES: [&str; 4] = ["PRESTO_", "TEMPLATE_", "SECRET_", "USER_"];

/// Prefix of environment variables whose values are masked when settings are printed.
pub const SECRET_ENV_PREFIX: &str = "SECRET_";

/// Suffix carried by renderable templates and stripped from output filenames.
pub const TEMPLATE_SUFFIX: &str = ".jinja2";

/// Glob (relative to the default template directory) selecting node property templates.
pub const DEFAULT_TEMPLATE_GLOB: &str = "*.properties.jinja2";

/// Glob (relative to the catalog template directory) selecting catalog files.
pub const CATALOG_TEMPLATE_GLOB: &str = "*.properties";

/// JVM options file, copied verbatim rather than rendered.
pub const JVM_CONFIG_FILE: &str = "jvm.config";

/// Node properties file passed to the launcher.
pub const NODE_PROPERTIES_FILE: &str = "node.properties";

/// Main engine configuration passed to the launcher.
pub const CONFIG_PROPERTIES_FILE: &str = "config.properties";

/// Log levels file passed to the launcher.
pub const LOG_PROPERTIES_FILE: &str = "log.properties";

/// Program invoked to start the node.
pub const LAUNCHER_PROGRAM: &str = "launcher";

/// Permission bits applied to every file written into the config directories.
#[cfg(unix)]
pub const OUTPUT_FILE_MODE: u32 = 0o755;
