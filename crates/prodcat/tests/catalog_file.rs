use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use prodcat::{CatalogManager, JsonFileStore, NewProduct, Product, ProductPatch, ProductStore};
use serde_json::Value;
use tower::ServiceExt;

fn read_file(path: &std::path::Path) -> Vec<Product> {
    let raw = std::fs::read_to_string(path).expect("products file should exist");
    serde_json::from_str(&raw).expect("products file should hold a JSON array")
}

#[tokio::test]
async fn scenario_add_duplicate_update_delete_against_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("products.json");
    let catalog = CatalogManager::initialize(JsonFileStore::new(&path))
        .await
        .expect("empty catalog should initialize");

    let added = catalog
        .add(NewProduct::new("t", "abc123", 200.0, 25))
        .await
        .expect("first add should succeed");
    assert_eq!(added.id, 1);
    assert_eq!(read_file(&path), vec![added.clone()]);

    let err = catalog
        .add(NewProduct::new("t", "abc123", 200.0, 25))
        .await
        .expect_err("duplicate code should fail");
    assert!(err.is_duplicate());
    assert_eq!(read_file(&path).len(), 1);

    assert_eq!(catalog.list(0).await.len(), 1);

    let updated = catalog
        .update(
            1,
            ProductPatch {
                price: Some(250.0),
                stock: Some(20),
                ..ProductPatch::default()
            },
        )
        .await
        .expect("update should succeed");
    assert_eq!(updated.stock, 20);
    assert_eq!(updated.code, "abc123");
    assert_eq!(read_file(&path), vec![updated]);

    catalog.delete(1).await.expect("delete should succeed");
    assert!(read_file(&path).is_empty());
    assert!(catalog.get_by_id(1).await.is_none());

    assert!(catalog.delete(1).await.expect_err("second delete").is_not_found());
}

#[tokio::test]
async fn ids_survive_restart_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data").join("products.json");

    let first = CatalogManager::initialize(JsonFileStore::new(&path))
        .await
        .expect("initialize");
    for code in ["a", "b", "c"] {
        first
            .add(NewProduct::new(code, code, 1.0, 1))
            .await
            .expect("add");
    }
    first.delete(2).await.expect("delete");
    drop(first);

    let second = CatalogManager::initialize(JsonFileStore::new(&path))
        .await
        .expect("reinitialize");
    let next = second
        .add(NewProduct::new("d", "d", 1.0, 1))
        .await
        .expect("add after restart");

    assert_eq!(next.id, 4);
    let ids: Vec<u64> = second.list(0).await.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[tokio::test]
async fn reload_and_save_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("products.json");
    let store = JsonFileStore::new(&path);
    let catalog = CatalogManager::initialize(store.clone()).await.expect("initialize");
    catalog
        .add(NewProduct::new("x", "x", 3.25, 7).with_thumbnail("Sin imagen"))
        .await
        .expect("add");
    let before = std::fs::read_to_string(&path).expect("read");

    let loaded = store.load().await.expect("load");
    store.save(&loaded).await.expect("save");

    assert_eq!(store.load().await.expect("reload"), loaded);
    assert_eq!(std::fs::read_to_string(&path).expect("read"), before);
}

#[tokio::test]
async fn http_reads_products_persisted_by_file_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("products.json");
    let catalog = Arc::new(
        CatalogManager::initialize(JsonFileStore::new(&path))
            .await
            .expect("initialize"),
    );
    for i in 0..3 {
        catalog
            .add(NewProduct::new(format!("p{i}"), format!("c{i}"), 1.0, 1))
            .await
            .expect("add");
    }
    let app = prodcat::server::router(Arc::clone(&catalog));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/products?limit=2")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.expect("body"))
            .expect("json");
    assert_eq!(body["status"], 1);
    assert_eq!(body["payload"].as_array().expect("array").len(), 2);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products/42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
