//! Java-style properties handling for Presto configuration files.
//!
//! Presto reads its node, engine, logging and catalog configuration from flat
//! `key=value` files. This module covers the three operations the bootstrap needs:
//!
//! - [`PropertyLine::parse`] - split one line at the first `=`
//! - [`load_properties`] - read an optional override file
//! - [`merge`] - override-wins combination of defaults and overrides
//!
//! [`PropertyMap`] always serializes sorted by key.

pub mod line;
pub mod loader;
pub mod merge;

pub use line::PropertyLine;
pub use loader::load_properties;
pub use merge::{PropertyMap, merge};
