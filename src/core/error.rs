//! Error handling for the Presto entrypoint
//!
//! Every failure in the bootstrap sequence is fatal: the container must not start a node
//! with partial configuration. The error system therefore focuses on explaining *what*
//! is misconfigured so the operator can fix the image or the mounted overrides.
//!
//! # Architecture
//!
//! - [`BootstrapError`] - enumerated failure cases
//! - [`ErrorContext`] - wrapper adding details and a suggestion for display
//! - [`user_friendly_error`] - maps any [`anyhow::Error`] to an [`ErrorContext`]
//!
//! A missing override file is deliberately *not* represented here; absence of operator
//! overrides is the common case and yields an empty mapping.
//!
//! # Examples
//!
//! ```rust,no_run
//! use presto_bootstrap::core::{BootstrapError, ErrorContext};
//!
//! let context = ErrorContext::new(BootstrapError::MissingEnvironment {
//!     name: "PRESTO_CONFIGS_DIR".to_string(),
//! })
//! .with_suggestion("Set PRESTO_CONFIGS_DIR in the image");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for bootstrap operations.
#[derive(Error, Debug, Clone)]
pub enum BootstrapError {
    /// A required directory-location environment variable is not set.
    ///
    /// These variables are baked into the image at build time, so their absence
    /// means the binary is running outside the image it was built for.
    #[error("Required environment variable '{name}' is not set")]
    MissingEnvironment {
        /// Name of the missing variable
        name: String,
    },

    /// A template could not be found on disk.
    #[error("Template '{name}' not found at {path}")]
    TemplateNotFound {
        /// Template name relative to the template root
        name: String,
        /// Path that was looked up
        path: String,
    },

    /// A template failed to parse or render.
    #[error("Failed to render template '{name}': {reason}")]
    TemplateRender {
        /// Template name relative to the template root
        name: String,
        /// Formatted rendering failure
        reason: String,
    },

    /// A discovered template does not live under the template root.
    #[error("Template {path} is not located under the template root {root}")]
    TemplateOutsideRoot {
        /// Path of the template file
        path: String,
        /// Template root directory
        root: String,
    },

    /// Writing a rendered or copied file failed.
    #[error("Failed to write {path}: {reason}")]
    FileWrite {
        /// Target path
        path: String,
        /// Underlying I/O failure
        reason: String,
    },

    /// Reading an existing file failed.
    #[error("Failed to read {path}: {reason}")]
    FileRead {
        /// Source path
        path: String,
        /// Underlying I/O failure
        reason: String,
    },

    /// The launcher process could not be started.
    #[error("Failed to start '{program}': {reason}")]
    LaunchFailed {
        /// Program that was spawned
        program: String,
        /// Underlying spawn failure
        reason: String,
    },

    /// Any other failure, carrying its full error chain.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying bootstrap error
    pub error: BootstrapError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without details or suggestion.
    #[must_use]
    pub const fn new(error: BootstrapError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Known [`BootstrapError`]s anywhere in the chain get tailored suggestions. I/O errors
/// are classified by kind. Everything else is reported with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(bootstrap_error) =
        error.chain().find_map(|cause| cause.downcast_ref::<BootstrapError>())
    {
        return create_error_context(bootstrap_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(BootstrapError::Other {
                    message: format_chain(&error),
                })
                .with_suggestion(
                    "Check that the container user owns the Presto config and catalog directories",
                )
                .with_details("The entrypoint must be able to write every rendered file");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(BootstrapError::Other {
                    message: format_chain(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    ErrorContext::new(BootstrapError::Other {
        message: format_chain(&error),
    })
}

/// Render an error and its causes as one message.
fn format_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: BootstrapError) -> ErrorContext {
    match &error {
        BootstrapError::MissingEnvironment {
            name,
        } => {
            let suggestion = format!(
                "Set {name} (normally defined by the image's Dockerfile) before starting the container"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Directory locations are read from the environment at startup and none of them are optional")
        }

        BootstrapError::TemplateNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the template exists under TEMPLATE_DIR and that TEMPLATE_DEFAULT_DIR, TEMPLATE_CUSTOM_DIR and TEMPLATE_CATALOG_DIR point inside it")
            .with_details("Bootstrapping aborts on the first missing template so no node starts with partial configuration"),

        BootstrapError::TemplateRender {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "Check template syntax: variables use {{ var }}, comments use {# #}, control flow uses {% %}. \
                 Every variable must be a CLI setting or a PRESTO_, TEMPLATE_, SECRET_ or USER_ environment variable",
            )
            .with_details("Undefined variables are errors; use {% if var is defined %} for optional values"),

        BootstrapError::TemplateOutsideRoot {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Place the default, custom and catalog template directories under TEMPLATE_DIR"),

        BootstrapError::FileWrite {
            ..
        }
        | BootstrapError::FileRead {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the directory exists and is writable by the container user")
            .with_details("Rendered files are written to PRESTO_CONFIGS_DIR and PRESTO_CATALOG_DIR"),

        BootstrapError::LaunchFailed {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the Presto 'launcher' script is installed and on PATH")
            .with_details("Use --dry-run to render configuration without starting the node"),

        BootstrapError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
