//! Catalog manager: the business rules over a [`ProductStore`].
//!
//! The manager owns the in-memory collection and the id counter. Every
//! operation takes one async mutex, so mutations within a process are
//! serialized and cannot lose each other's writes. Mutations work on a copy
//! of the collection and only commit it after the store accepted the write.

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::product::{NewProduct, Product, ProductPatch};
use crate::storage::ProductStore;

#[derive(Debug)]
struct CatalogState {
    products: Vec<Product>,
    /// Next id to hand out. Only ever increases; `None` once `u64::MAX` is used.
    next_id: Option<u64>,
}

impl CatalogState {
    fn position(&self, id: u64) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    fn code_taken(&self, code: &str, except_id: Option<u64>) -> bool {
        self.products
            .iter()
            .any(|p| p.code == code && Some(p.id) != except_id)
    }
}

/// Manages the product catalog.
///
/// Construct one with [`CatalogManager::initialize`] and share it (for
/// example behind an `Arc`) with whatever needs catalog access.
#[derive(Debug)]
pub struct CatalogManager<S> {
    store: S,
    state: Mutex<CatalogState>,
}

impl<S: ProductStore> CatalogManager<S> {
    /// Load the collection from `store` and prepare the id counter.
    ///
    /// The next id is one past the largest stored id, or 1 for an empty
    /// collection. A collection already holding `u64::MAX` still loads, but
    /// every later add fails with [`Error::IdsExhausted`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be loaded.
    pub async fn initialize(store: S) -> Result<Self> {
        let products = store.load().await?;
        let next_id = match products.iter().map(|p| p.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };

        match next_id {
            Some(next_id) => info!(
                "Catalog initialized with {} products, next id {}",
                products.len(),
                next_id
            ),
            None => warn!(
                "Catalog initialized with {} products, no ids left to assign",
                products.len()
            ),
        }

        Ok(Self {
            store,
            state: Mutex::new(CatalogState { products, next_id }),
        })
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a new product and persist the collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProduct`] if the price is not finite,
    /// [`Error::DuplicateCode`] if a product with the same code exists,
    /// [`Error::IdsExhausted`] if no id is left, or a storage error if the
    /// collection cannot be saved. The catalog is unchanged on error.
    pub async fn add(&self, new: NewProduct) -> Result<Product> {
        new.validate().inspect_err(|e| warn!("Rejected product {}: {}", new.code, e))?;

        let mut state = self.state.lock().await;

        if state.code_taken(&new.code, None) {
            warn!("Rejected product with existing code {}", new.code);
            return Err(Error::duplicate_code(new.code));
        }

        let Some(id) = state.next_id else {
            warn!("Rejected product {}: no ids left", new.code);
            return Err(Error::IdsExhausted);
        };

        let product = new.into_product(id);
        let mut products = state.products.clone();
        products.push(product.clone());

        self.persist(&products).await?;
        state.products = products;
        state.next_id = id.checked_add(1);

        info!("Added product {} (code {})", product.id, product.code);
        Ok(product)
    }

    /// List products in insertion order.
    ///
    /// A `limit` of 0 returns every product; otherwise at most `limit`
    /// products are returned, starting from the first.
    pub async fn list(&self, limit: usize) -> Vec<Product> {
        let state = self.state.lock().await;
        if limit == 0 {
            state.products.clone()
        } else {
            state.products.iter().take(limit).cloned().collect()
        }
    }

    /// Look up a product by id.
    pub async fn get_by_id(&self, id: u64) -> Option<Product> {
        let state = self.state.lock().await;
        state.products.iter().find(|p| p.id == id).cloned()
    }

    /// Merge `patch` over the product with `id` and persist the collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProduct`] if the patch sets a non-finite
    /// price, [`Error::NotFound`] for an unknown id, [`Error::DuplicateCode`]
    /// if the patch sets a code held by another product, or a storage error
    /// if the collection cannot be saved. The catalog is unchanged on error.
    pub async fn update(&self, id: u64, patch: ProductPatch) -> Result<Product> {
        patch
            .validate()
            .inspect_err(|e| warn!("Cannot update product {}: {}", id, e))?;

        let mut state = self.state.lock().await;

        let Some(index) = state.position(id) else {
            warn!("Cannot update product {}: not found", id);
            return Err(Error::not_found(id));
        };

        if let Some(code) = &patch.code {
            if state.code_taken(code, Some(id)) {
                warn!("Cannot update product {}: code {} already exists", id, code);
                return Err(Error::duplicate_code(code.clone()));
            }
        }

        let mut products = state.products.clone();
        patch.apply_to(&mut products[index]);
        let updated = products[index].clone();

        self.persist(&products).await?;
        state.products = products;

        info!("Updated product {} (code {})", updated.id, updated.code);
        Ok(updated)
    }

    /// Remove the product with `id` and persist the collection.
    ///
    /// Returns the removed product. Its id is never handed out again by this
    /// manager.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or a storage error if
    /// the collection cannot be saved. The catalog is unchanged on error.
    pub async fn delete(&self, id: u64) -> Result<Product> {
        let mut state = self.state.lock().await;

        let Some(index) = state.position(id) else {
            warn!("Cannot delete product {}: not found", id);
            return Err(Error::not_found(id));
        };

        let mut products = state.products.clone();
        let removed = products.remove(index);

        self.persist(&products).await?;
        state.products = products;

        info!("Deleted product {} (code {})", removed.id, removed.code);
        Ok(removed)
    }

    /// Number of products in the catalog.
    pub async fn len(&self) -> usize {
        self.state.lock().await.products.len()
    }

    /// Check if the catalog has no products.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.products.is_empty()
    }

    /// The id the next added product will receive, or `None` if every id has
    /// been used.
    pub async fn next_id(&self) -> Option<u64> {
        self.state.lock().await.next_id
    }

    async fn persist(&self, products: &[Product]) -> Result<()> {
        self.store.save(products).await.inspect_err(|e| {
            error!("Failed to persist catalog: {}", e);
        })
    }
}
