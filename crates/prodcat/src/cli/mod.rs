//! Command-line interface for prodcat.
//!
//! This module provides the CLI structure for the `prodcat` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, GetCommand, ListCommand, ServeCommand,
    UpdateCommand,
};

use crate::config::Config;
use crate::logging::Verbosity;

/// prodcat - Manage a product catalog stored in a JSON file
///
/// Add, update, delete and look up products from the command line, or serve
/// the catalog over HTTP.
#[derive(Debug, Parser)]
#[command(name = "prodcat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the products file (overrides configuration)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the catalog over HTTP
    Serve(ServeCommand),

    /// List products
    List(ListCommand),

    /// Show one product
    Get(GetCommand),

    /// Add a product
    Add(AddCommand),

    /// Update fields of a product
    Update(UpdateCommand),

    /// Delete a product
    Delete(DeleteCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }

    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(file) = &self.file {
            config.storage.products_path = Some(file.clone());
        }
        if let Command::Serve(serve) = &self.command {
            if let Some(bind) = &serve.bind {
                config.server.bind_address.clone_from(bind);
            }
            if let Some(port) = serve.port {
                config.server.port = port;
            }
        }
    }
}
