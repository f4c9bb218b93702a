//! CLI for the Cardlink service
//!
//! Subcommands:
//! - `serve`: run the HTTP server
//! - `create-admin`: bootstrap an admin account

pub mod admin;
pub mod serve;

use clap::{Parser, Subcommand};

/// Cardlink - social card service
#[derive(Parser)]
#[command(name = "cardlink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Create a verified admin account
    CreateAdmin(admin::CreateAdminArgs),
}
