//! HTTP facade over the catalog.
//!
//! Every response body is an envelope `{"status": 1, "payload": ...}` on
//! success or `{"status": 0, "payload": "<message>"}` on failure, with a
//! matching HTTP status code.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::catalog::CatalogManager;
use crate::error::{Error, Result};
use crate::product::{NewProduct, Product, ProductPatch};
use crate::storage::ProductStore;

/// Payload sent when a product id does not exist.
pub const NOT_FOUND_PAYLOAD: &str = "Not found";

/// Response wrapper used by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// 1 on success, 0 on failure.
    pub status: u8,
    /// The result, or an error message.
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Wrap a successful result.
    pub fn ok(payload: T) -> Self {
        Self { status: 1, payload }
    }
}

impl Envelope<String> {
    /// Wrap a failure message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            payload: message.into(),
        }
    }
}

/// Failure returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed query, path or body input.
    BadRequest(String),
    /// An error from the catalog.
    Catalog(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Catalog(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Catalog(Error::InvalidProduct { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Catalog(Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Catalog(Error::DuplicateCode { .. }) => StatusCode::CONFLICT,
            Self::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::Catalog(Error::NotFound { .. }) => NOT_FOUND_PAYLOAD.to_string(),
            Self::Catalog(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.message());
        } else {
            debug!("Request rejected with {}: {}", status, self.message());
        }
        (status, Json(Envelope::failure(self.message()))).into_response()
    }
}

type ApiResult<T> = std::result::Result<(StatusCode, Json<Envelope<T>>), ApiError>;

/// Query string accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Maximum number of products; empty or absent means no limit.
    pub limit: Option<String>,
}

/// Shared handler state.
#[derive(Debug)]
pub struct AppState<S> {
    catalog: Arc<CatalogManager<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

/// Build the router for the catalog endpoints.
pub fn router<S>(catalog: Arc<CatalogManager<S>>) -> Router
where
    S: ProductStore + 'static,
{
    Router::new()
        .route("/products", get(list_products::<S>).post(create_product::<S>))
        .route(
            "/products/{uid}",
            get(get_product::<S>)
                .put(update_product::<S>)
                .delete(delete_product::<S>),
        )
        .with_state(AppState { catalog })
}

/// Serve the catalog over HTTP until ctrl-c is received.
///
/// # Errors
///
/// Returns [`Error::Server`] if the address cannot be bound or the server
/// stops unexpectedly.
pub async fn serve<S>(address: &str, catalog: Arc<CatalogManager<S>>) -> Result<()>
where
    S: ProductStore + 'static,
{
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(Error::Server)?;

    info!("Catalog server listening on {}", address);

    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Server)?;

    info!("Catalog server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
    }
}

/// Parse the `limit` query value. Absent or empty means 0 (no limit).
fn parse_limit(raw: Option<&str>) -> std::result::Result<usize, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value.parse::<usize>().map_err(|_| {
            ApiError::BadRequest(format!("limit must be a non-negative integer, got '{value}'"))
        }),
    }
}

fn parse_id(raw: &str) -> std::result::Result<u64, ApiError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ApiError::BadRequest(format!("product id must be an integer, got '{raw}'")))
}

async fn list_products<S: ProductStore>(
    State(state): State<AppState<S>>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Product>> {
    let Query(query) = query?;
    let limit = parse_limit(query.limit.as_deref())?;
    let products = state.catalog.list(limit).await;
    Ok((StatusCode::OK, Json(Envelope::ok(products))))
}

async fn get_product<S: ProductStore>(
    State(state): State<AppState<S>>,
    uid: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Product> {
    let Path(uid) = uid?;
    let id = parse_id(&uid)?;
    let product = state
        .catalog
        .get_by_id(id)
        .await
        .ok_or(Error::not_found(id))?;
    Ok((StatusCode::OK, Json(Envelope::ok(product))))
}

async fn create_product<S: ProductStore>(
    State(state): State<AppState<S>>,
    body: std::result::Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<Product> {
    let Json(new) = body?;
    let product = state.catalog.add(new).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(product))))
}

async fn update_product<S: ProductStore>(
    State(state): State<AppState<S>>,
    uid: std::result::Result<Path<String>, PathRejection>,
    body: std::result::Result<Json<ProductPatch>, JsonRejection>,
) -> ApiResult<Product> {
    let Path(uid) = uid?;
    let Json(patch) = body?;
    let id = parse_id(&uid)?;
    let product = state.catalog.update(id, patch).await?;
    Ok((StatusCode::OK, Json(Envelope::ok(product))))
}

async fn delete_product<S: ProductStore>(
    State(state): State<AppState<S>>,
    uid: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Product> {
    let Path(uid) = uid?;
    let id = parse_id(&uid)?;
    let product = state.catalog.delete(id).await?;
    Ok((StatusCode::OK, Json(Envelope::ok(product))))
}
