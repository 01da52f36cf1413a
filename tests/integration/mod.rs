//! Integration test suite for the Presto entrypoint
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **bootstrap**: full bootstrap runs through the library API
//! - **entrypoint**: the `presto-entrypoint` binary, including launch hand-off

#[path = "../common/mod.rs"]
mod common;

mod bootstrap;
mod entrypoint;
