//! Container entrypoint support for Presto nodes.
//!
//! Before the Presto server starts, every node needs a `node.properties`,
//! `config.properties`, `log.properties`, a `jvm.config` and one properties file per
//! catalog. This crate produces them from Jinja2 templates baked into the image:
//!
//! 1. [`settings`] captures the environment and flags into one [`settings::Settings`]
//! 2. [`bootstrap`] copies `jvm.config` and renders every template through
//!    [`render::ConfigRenderer`], layering operator overrides on top via [`properties`]
//! 3. [`launcher`] execs `launcher run` against the rendered files
//!
//! The `presto-entrypoint` binary wires these together; see [`cli`].

pub mod bootstrap;
pub mod cli;
pub mod constants;
pub mod core;
pub mod launcher;
pub mod properties;
pub mod render;
pub mod settings;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
