//! Template loading and rendering.
//!
//! - [`TemplateDescriptor`] - a template's root-relative name and output filename
//! - [`TemplateResolver`] - per-run Tera instance rooted at `TEMPLATE_DIR`
//! - [`TemplateError`] - structured rendering failures

pub mod descriptor;
pub mod error;
pub mod resolver;

pub use descriptor::TemplateDescriptor;
pub use error::{ErrorLocation, TemplateError};
pub use resolver::TemplateResolver;
