use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use tracing::info;

use catalog_common::catalog::CatalogSource;
use product_filter::{FilterCriteria, FilterEngine, ProductResponse};

use crate::auth::{self, Claims, CredentialStore, TokenIssuer};
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub engine: FilterEngine,
    pub tokens: Arc<TokenIssuer>,
    pub credentials: Arc<dyn CredentialStore>,
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/products/filter", get(filter_products))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .merge(protected)
        .route("/auth/login", post(auth::login))
        .route("/health", get(health))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn filter_products(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<ProductResponse>, AppError> {
    info!(
        user = %claims.sub,
        min_price = ?criteria.min_price,
        max_price = ?criteria.max_price,
        size = ?criteria.size,
        highlight = ?criteria.highlight,
        "fetching products with filters"
    );

    // Bad bounds never reach the catalog source.
    criteria.validate()?;

    let catalog = state.catalog.fetch_catalog().await?;
    let response = state.engine.apply(&catalog, &criteria)?;

    info!(
        matched = response.products.len(),
        catalog = catalog.len(),
        "filtered and processed products"
    );
    Ok(Json(response))
}

async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    response
}
