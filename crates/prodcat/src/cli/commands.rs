//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::product::{NewProduct, ProductPatch};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind (overrides configuration)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Maximum number of products to show (0 for all)
    #[arg(short, long, default_value = "0")]
    pub limit: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Get command arguments.
#[derive(Debug, Args)]
pub struct GetCommand {
    /// Product id
    pub id: u64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Product title
    #[arg(long)]
    pub title: String,

    /// Unique product code
    #[arg(long)]
    pub code: String,

    /// Unit price
    #[arg(long)]
    pub price: f64,

    /// Units in stock
    #[arg(long)]
    pub stock: i64,

    /// Product description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Thumbnail label
    #[arg(long, default_value = "")]
    pub thumbnail: String,
}

impl From<AddCommand> for NewProduct {
    fn from(cmd: AddCommand) -> Self {
        NewProduct::new(cmd.title, cmd.code, cmd.price, cmd.stock)
            .with_description(cmd.description)
            .with_thumbnail(cmd.thumbnail)
    }
}

/// Update command arguments.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Product id
    pub id: u64,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New unit price
    #[arg(long)]
    pub price: Option<f64>,

    /// New thumbnail label
    #[arg(long)]
    pub thumbnail: Option<String>,

    /// New product code
    #[arg(long)]
    pub code: Option<String>,

    /// New stock count
    #[arg(long)]
    pub stock: Option<i64>,
}

impl UpdateCommand {
    /// The fields to change, as a patch.
    #[must_use]
    pub fn patch(&self) -> ProductPatch {
        ProductPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            thumbnail: self.thumbnail.clone(),
            code: self.code.clone(),
            stock: self.stock,
        }
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Product id
    pub id: u64,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Configuration file to validate (defaults to the standard location)
        file: Option<PathBuf>,
    },
}
