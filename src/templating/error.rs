//! Structured template errors
//!
//! Tera reports failures as a chain of plain messages. This module turns them into a
//! small set of cases with enough context (template name, line, the variables that
//! *were* available) to fix a broken template or a missing environment variable.

/// Template errors with detailed context
#[derive(Debug, Clone)]
pub enum TemplateError {
    /// The template references a variable that is not in the context.
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    /// The template failed to parse, or rendering failed for another reason.
    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },
}

/// Location information for template errors
#[derive(Debug, Clone)]
pub struct ErrorLocation {
    /// Template name relative to the template root
    pub template: String,
    /// Line number if Tera reported one
    pub line_number: Option<usize>,
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::VariableNotFound {
                variable,
                ..
            } => {
                write!(f, "Template variable not found: '{}'", variable)
            }
            TemplateError::SyntaxError {
                message,
                ..
            } => {
                write!(f, "Template syntax error: {}", message)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl TemplateError {
    /// Generate user-friendly error message with context and suggestions
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                location,
            } => format_variable_not_found_error(
                variable,
                available_variables,
                suggestions,
                location,
            ),
            TemplateError::SyntaxError {
                message,
                location,
            } => format_syntax_error(message, location),
        }
    }
}

fn format_variable_not_found_error(
    variable: &str,
    available_variables: &[String],
    suggestions: &[String],
    location: &ErrorLocation,
) -> String {
    let mut msg = String::new();

    msg.push_str(&format!("variable '{}' is not defined\n", variable));
    msg.push_str(&format!("Template: {}\n", location.template));

    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions.iter() {
            msg.push_str(&format!("  - {}\n", suggestion));
        }
    }

    if !available_variables.is_empty() {
        // Prefixed environment variables can be numerous; group them.
        let (captured, settings): (Vec<&String>, Vec<&String>) =
            available_variables.iter().partition(|var| is_environment_name(var));

        msg.push_str("Available variables:\n");
        for var in settings {
            msg.push_str(&format!("  {}\n", var));
        }
        if captured.len() <= 5 {
            for var in captured {
                msg.push_str(&format!("  {}\n", var));
            }
        } else {
            msg.push_str(&format!("  ... and {} environment variables\n", captured.len()));
        }
    }

    msg.trim_end().to_string()
}

fn is_environment_name(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn format_syntax_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str(&format!("{}\n", message));
    msg.push_str(&format!("Template: {}\n", location.template));

    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }

    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - Invalid filter names\n");
    msg.push_str("  - Missing quotes around string values");

    msg
}
