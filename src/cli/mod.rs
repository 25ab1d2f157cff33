//! Command-line interface, parsed with clap.

mod commands;

use clap::{Parser, Subcommand};

/// Filmlist - a personal, ordered film list served over htmx
#[derive(Parser)]
#[command(name = "filmlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create a user account without going through the register form
    CreateUser {
        /// Username
        username: String,
        /// Password for the new account
        #[arg(long)]
        password: String,
    },

    /// Print a user's film list in order
    #[command(alias = "ls")]
    Films {
        /// Username whose list to print
        username: String,
    },
}

pub use commands::*;
