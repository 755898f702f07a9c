//! Storage layer for prodcat.
//!
//! Products are persisted as one JSON array in a flat file. Every load reads
//! the whole file and every save rewrites it, so the file always holds the
//! complete collection. Writes are plain overwrites: a crash mid-write or a
//! second process writing the same file can leave it corrupt.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::product::Product;

/// Full-collection persistence for products.
///
/// Implementors always read and write the entire collection. Order is
/// preserved in both directions.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Read the complete product collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or parsed.
    async fn load(&self) -> Result<Vec<Product>>;

    /// Overwrite the stored collection with `products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be encoded or written.
    async fn save(&self, products: &[Product]) -> Result<()>;
}

/// Product store backed by a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Path to the products file.
    path: PathBuf,
    /// Treat a missing file as an empty collection instead of an error.
    create_if_missing: bool,
}

impl JsonFileStore {
    /// Create a store for the given file.
    ///
    /// A missing file loads as an empty collection; it is created on the
    /// first save.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create_if_missing: true,
        }
    }

    /// Choose whether a missing file loads as empty (`true`) or fails (`false`).
    #[must_use]
    pub fn create_if_missing(mut self, enabled: bool) -> Self {
        self.create_if_missing = enabled;
        self
    }

    /// Get the path to the products file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Product>> {
        debug!("Loading products from {}", self.path.display());

        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && self.create_if_missing => {
                warn!(
                    "Products file {} does not exist, starting with an empty catalog",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(source) => return Err(Error::io(&self.path, source)),
        };

        let products: Vec<Product> =
            serde_json::from_str(&data).map_err(|source| Error::Parse {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Loaded {} products from {}",
            products.len(),
            self.path.display()
        );
        Ok(products)
    }

    async fn save(&self, products: &[Product]) -> Result<()> {
        products.iter().try_for_each(Product::validate)?;
        self.ensure_parent_dir().await?;

        let data = serde_json::to_string_pretty(products).map_err(Error::Serialize)?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(|source| Error::io(&self.path, source))?;

        debug!(
            "Saved {} products to {}",
            products.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Product store kept in memory, for tests and ephemeral catalogs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an in-memory store pre-populated with `products`.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }

    /// Get a copy of what was last saved.
    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.lock().await.clone()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn load(&self) -> Result<Vec<Product>> {
        Ok(self.products.lock().await.clone())
    }

    async fn save(&self, products: &[Product]) -> Result<()> {
        *self.products.lock().await = products.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::NewProduct;

    fn sample_products() -> Vec<Product> {
        vec![
            NewProduct::new("First", "abc123", 200.0, 25).into_product(1),
            NewProduct::new("Second", "def456", 15.5, 3)
                .with_description("second product")
                .with_thumbnail("Sin imagen")
                .into_product(4),
        ]
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));

        let products = store.load().await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_errors_when_strict() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json")).create_if_missing(false);

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("products.json"));
    }

    #[tokio::test]
    async fn test_load_object_instead_of_array_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, r#"{"id": 1}"#).unwrap();

        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));

        store.save(&sample_products()).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, sample_products());
    }

    #[tokio::test]
    async fn test_save_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let store = JsonFileStore::new(&path);
        store.save(&sample_products()).await.unwrap();
        let first_bytes = std::fs::read_to_string(&path).unwrap();

        let loaded = store.load().await.unwrap();
        store.save(&loaded).await.unwrap();
        let reloaded = store.load().await.unwrap();

        assert_eq!(loaded, reloaded);
        assert_eq!(first_bytes, std::fs::read_to_string(&path).unwrap());
    }

    #[tokio::test]
    async fn test_save_writes_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        JsonFileStore::new(&path)
            .save(&sample_products())
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let array = raw.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[1]["code"], "def456");
        assert_eq!(array[1]["id"], 4);
    }

    #[tokio::test]
    async fn test_save_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let store = JsonFileStore::new(&path);

        store.save(&[]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("products.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample_products()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_to_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let err = store.save(&sample_products()).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_accepts_original_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[
  {
    "title": "producto prueba",
    "description": "Este es un producto prueba",
    "price": 20,
    "thumbnail": "Sin imagen",
    "code": "abc123",
    "stock": 50,
    "id": 1
  }
]"#,
        )
        .unwrap();

        let products = JsonFileStore::new(&path).load().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 1);
        assert_eq!(products[0].code, "abc123");
    }

    #[tokio::test]
    async fn test_save_refuses_non_finite_price() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        let store = JsonFileStore::new(&path);
        store.save(&sample_products()).await.unwrap();

        let mut products = sample_products();
        products[1].price = f64::NAN;
        let err = store.save(&products).await.unwrap_err();

        assert!(err.is_invalid_product());
        assert_eq!(store.load().await.unwrap(), sample_products());
    }

    #[test]
    fn test_path() {
        let store = JsonFileStore::new("/tmp/products.json");
        assert_eq!(store.path(), Path::new("/tmp/products.json"));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_empty());

        store.save(&sample_products()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), sample_products());
        assert_eq!(store.snapshot().await, sample_products());
    }

    #[tokio::test]
    async fn test_memory_store_with_products() {
        let store = MemoryStore::with_products(sample_products());
        assert_eq!(store.load().await.unwrap().len(), 2);
    }
}
