//! CLI module for the data gateway
//!
//! - `serve`: run the HTTP gateway (default)
//! - `issue-key`: create one API key and print it

pub mod issue_key;
pub mod serve;

use clap::{Parser, Subcommand};

/// Data Gateway - quota and rate limited access to a JSON dataset
#[derive(Parser)]
#[command(name = "data-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP gateway
    Serve,

    /// Issue a new API key with the configured default quota
    IssueKey,
}
