//! `prodcat` - A product catalog persisted to a flat JSON file
//!
//! This library provides the catalog manager (id assignment, unique product
//! codes, full-collection persistence) and an HTTP facade over it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod product;
pub mod server;
pub mod storage;

pub use catalog::CatalogManager;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use product::{NewProduct, Product, ProductPatch};
pub use storage::{JsonFileStore, MemoryStore, ProductStore};
