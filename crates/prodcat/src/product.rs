//! Core product types for prodcat.
//!
//! This module defines the records stored in the catalog along with the
//! input shapes used to create and update them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// JSON has no encoding for NaN or infinity, so such a price would be written
/// as `null` and fail to load again.
fn check_price(price: f64) -> Result<()> {
    if price.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_product(format!(
            "price must be a finite number, got {price}"
        )))
    }
}

/// A product stored in the catalog.
///
/// The `id` is assigned by the catalog when the product is added and never
/// changes afterwards. The `code` is the caller-supplied business key and is
/// unique across the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// System-assigned identifier, starting at 1.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Free-form thumbnail label. Not validated as a path or URL.
    #[serde(default)]
    pub thumbnail: String,
    /// Business key.
    pub code: String,
    /// Units in stock.
    pub stock: i64,
}

impl Product {
    /// Check that the product can be written to and read back from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProduct`] if the price is NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        check_price(self.price)
    }
}

/// A product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Display title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Free-form thumbnail label.
    #[serde(default)]
    pub thumbnail: String,
    /// Business key.
    pub code: String,
    /// Units in stock.
    pub stock: i64,
}

impl NewProduct {
    /// Create a new product with an empty description and thumbnail.
    #[must_use]
    pub fn new(title: impl Into<String>, code: impl Into<String>, price: f64, stock: i64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            price,
            thumbnail: String::new(),
            code: code.into(),
            stock,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the thumbnail label.
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    /// Check the input before it is added to a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProduct`] if the price is NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        check_price(self.price)
    }

    /// Attach an id, producing a stored product.
    #[must_use]
    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            thumbnail: self.thumbnail,
            code: self.code,
            stock: self.stock,
        }
    }
}

/// A partial update to a product.
///
/// Fields left as `None` keep their current value. There is no `id` field, so
/// an update can never reassign a product's id; an `id` key in JSON input is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// New thumbnail label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// New business key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// New stock count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// Check if the patch sets no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check the supplied fields before they are merged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProduct`] if a new price is NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        self.price.map_or(Ok(()), check_price)
    }

    /// Merge the supplied fields over `product`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(title) = &self.title {
            product.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(thumbnail) = &self.thumbnail {
            product.thumbnail.clone_from(thumbnail);
        }
        if let Some(code) = &self.code {
            product.code.clone_from(code);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}
