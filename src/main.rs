//! `presto-entrypoint`: renders Presto configuration and starts the server.
//!
//! Exits with the launcher's exit code, or 1 if anything fails before launch.

use clap::Parser;
use presto_bootstrap::cli::Cli;
use presto_bootstrap::core::user_friendly_error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
