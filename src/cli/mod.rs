//! Command-line interface for the Presto container entrypoint.
//!
//! The entrypoint takes no subcommands. Every flag either feeds the templates
//! (`--coordinator`, `--node-id`, `--log-level`, `--environment`, `--discovery-uri`,
//! `--discovery-port`) or changes how the run behaves (`--dry-run`, `--verbose`).
//!
//! ```bash
//! # Worker with a generated node id
//! presto-entrypoint --discovery-uri coordinator.presto.svc --discovery-port 8080
//!
//! # Coordinator, render only
//! presto-entrypoint --coordinator --dry-run
//! ```
//!
//! A run prints three banners to stdout, in order: the resolved settings, the
//! bootstrap of configuration files and the launch.

use anyhow::{Context, Result};
use clap::{Args, Parser};
use tracing_subscriber::EnvFilter;

use crate::bootstrap::Bootstrapper;
use crate::launcher::Launcher;
use crate::settings::{EnvSnapshot, IdProvider, Settings, UuidProvider};
use crate::templating::TemplateResolver;

/// Flags that become template variables.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct NodeArgs {
    /// Run this node as the coordinator
    #[arg(long)]
    pub coordinator: bool,

    /// Node identifier [default: $POD_NAME, else a random UUID]
    #[arg(long, value_name = "ID")]
    pub node_id: Option<String>,

    /// Log level for the Presto server
    #[arg(long, value_name = "LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Deployment environment name
    #[arg(long, value_name = "NAME", default_value = "production")]
    pub environment: String,

    /// Host of the discovery service
    #[arg(long, value_name = "URI", default_value = "127.0.0.1")]
    pub discovery_uri: String,

    /// Port of the discovery service
    #[arg(long, value_name = "PORT", default_value = "80")]
    pub discovery_port: String,

    /// Render every file but do not start Presto
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for NodeArgs {
    fn default() -> Self {
        Self {
            coordinator: false,
            node_id: None,
            log_level: "INFO".to_string(),
            environment: "production".to_string(),
            discovery_uri: "127.0.0.1".to_string(),
            discovery_port: "80".to_string(),
            dry_run: false,
        }
    }
}

/// Presto container entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "presto-entrypoint",
    about = "Render Presto configuration from templates and start the server",
    version,
    long_about = "Renders node, catalog and JVM configuration from Jinja2 templates, merges \
                  operator overrides on top, then hands off to the Presto launcher."
)]
pub struct Cli {
    #[command(flatten)]
    pub node: NodeArgs,

    /// Debug-level logging for the entrypoint itself (ignored when `RUST_LOG` is set)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run against the real process environment.
    ///
    /// Returns the exit code the process should terminate with.
    pub async fn execute(self) -> Result<i32> {
        self.init_logging();
        self.execute_with(&EnvSnapshot::from_process(), &UuidProvider).await
    }

    /// Run against an explicit environment and id source.
    ///
    /// Does not install a tracing subscriber.
    pub async fn execute_with(self, env: &EnvSnapshot, ids: &dyn IdProvider) -> Result<i32> {
        let settings = Settings::resolve(env, &self.node, ids)
            .context("Failed to resolve entrypoint settings")?;

        print_settings(&settings);

        println!("\n============== BOOTSTRAPPING ==============");
        let mut resolver = TemplateResolver::new(&settings.layout.template_dir);
        let variables = settings.template_context();
        Bootstrapper::new(&settings.layout)
            .run(&mut resolver, &variables)
            .context("Failed to bootstrap configuration files")?;

        println!("\n============== LAUNCHING ==============");
        let outcome = Launcher::new(&settings.layout.configs_dir)
            .launch(settings.dry_run)
            .await
            .context("Failed to launch Presto")?;

        Ok(outcome.exit_code())
    }

    /// Filter for the entrypoint's own diagnostics.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if self.verbose {
                "debug"
            } else {
                "info"
            })
        })
    }

    fn init_logging(&self) {
        // stdout carries the operator banners; diagnostics go to stderr
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

fn print_settings(settings: &Settings) {
    println!("============== SETTINGS ==============");
    for (key, value) in settings.display_entries() {
        println!("  * {key}: {value}");
    }
}
