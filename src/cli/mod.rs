//! CLI module - Command-line interface for Watchlist
//!
//! Administrative commands that seed the schema, demo data and the owner
//! account, plus `serve` to start the web server.

mod commands;

use clap::{Parser, Subcommand};

/// Watchlist - a personal movie watchlist
#[derive(Parser)]
#[command(name = "watchlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "run")]
    Serve,

    /// Create the database schema
    Initdb {
        /// Drop all tables before creating them
        #[arg(long)]
        drop: bool,
    },

    /// Fill the database with demo data
    Forge,

    /// Create or update the admin account
    Admin {
        /// The username used to login
        #[arg(long)]
        username: Option<String>,
        /// The password used to login (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
