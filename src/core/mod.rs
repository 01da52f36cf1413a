//! Core types shared by every stage of the bootstrap.
//!
//! - [`error`] - [`BootstrapError`], [`ErrorContext`] and [`user_friendly_error`]

pub mod error;

pub use error::{BootstrapError, ErrorContext, user_friendly_error};
