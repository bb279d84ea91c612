//! CLI module for Fountain Gateway
//!
//! - `serve`: HTTP API (plus the built frontend in production)
//! - `seed`: pre-warm the search cache

pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

/// Fountain Gateway - cached drinking water and place search API
#[derive(Parser)]
#[command(name = "fountain-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Pre-warm the search cache with short alphabetic prefixes
    Seed(seed::SeedArgs),
}
