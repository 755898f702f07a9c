//! `prodcat` - CLI for the product catalog
//!
//! This binary manages the products file from the command line and serves
//! the catalog over HTTP.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use prodcat::cli::{Cli, Command, ConfigCommand};
use prodcat::{init_logging, CatalogManager, Config, JsonFileStore, Product};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone();
    let mut config = Config::load_from(config_path).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    init_logging(cli.verbosity(), config.logging.format);

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Serve(_) => {
            let catalog = open_catalog(&config).await?;
            prodcat::server::serve(&config.server_address(), Arc::new(catalog)).await?;
            Ok(())
        }
        Command::List(cmd) => {
            let catalog = open_catalog(&config).await?;
            let products = catalog.list(cmd.limit).await;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&products)?);
            } else if products.is_empty() {
                println!("No products.");
            } else {
                print_table(&products);
            }
            Ok(())
        }
        Command::Get(cmd) => {
            let catalog = open_catalog(&config).await?;
            let product = catalog
                .get_by_id(cmd.id)
                .await
                .ok_or(prodcat::Error::not_found(cmd.id))?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&product)?);
            } else {
                print_product(&product);
            }
            Ok(())
        }
        Command::Add(cmd) => {
            let catalog = open_catalog(&config).await?;
            let product = catalog.add(cmd.into()).await?;
            println!("Added product {} ({})", product.id, product.code);
            Ok(())
        }
        Command::Update(cmd) => {
            let catalog = open_catalog(&config).await?;
            let product = catalog.update(cmd.id, cmd.patch()).await?;
            println!("Updated product {} ({})", product.id, product.code);
            Ok(())
        }
        Command::Delete(cmd) => {
            let catalog = open_catalog(&config).await?;
            let product = catalog.delete(cmd.id).await?;
            println!("Deleted product {} ({})", product.id, product.code);
            Ok(())
        }
    }
}

async fn open_catalog(config: &Config) -> Result<CatalogManager<JsonFileStore>> {
    let store = config.product_store();
    let path = store.path().display().to_string();
    CatalogManager::initialize(store)
        .await
        .with_context(|| format!("failed to load catalog from {path}"))
}

fn print_table(products: &[Product]) {
    println!(
        "{:>5}  {:<12}  {:<24}  {:>10}  {:>6}",
        "ID", "CODE", "TITLE", "PRICE", "STOCK"
    );
    for p in products {
        println!(
            "{:>5}  {:<12}  {:<24}  {:>10.2}  {:>6}",
            p.id, p.code, p.title, p.price, p.stock
        );
    }
}

fn print_product(product: &Product) {
    println!("ID:          {}", product.id);
    println!("Code:        {}", product.code);
    println!("Title:       {}", product.title);
    println!("Description: {}", product.description);
    println!("Price:       {:.2}", product.price);
    println!("Thumbnail:   {}", product.thumbnail);
    println!("Stock:       {}", product.stock);
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Products file:      {}", config.products_path().display());
                println!(
                    "  Create if missing:  {}",
                    config.storage.create_if_missing
                );
                println!();
                println!("[Server]");
                println!("  Address:            {}", config.server_address());
                println!();
                println!("[Logging]");
                println!("  Format:             {:?}", config.logging.format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::validate_file(&path)
                .with_context(|| format!("configuration error in {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
