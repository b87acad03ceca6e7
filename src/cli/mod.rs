//! CLI module for Customer Gate

pub mod serve;

use clap::{Parser, Subcommand};

/// Customer Gate - customer records behind per-identity API keys
#[derive(Parser)]
#[command(name = "customer-gate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["customer-gate", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["customer-gate", "ui"]).is_err());
    }
}
