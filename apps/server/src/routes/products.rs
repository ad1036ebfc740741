//! # Catalog Handlers
//!
//! Catalog edits affect future entries only. Saved records carry their own
//! copy of name, price and tax rate.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use uriage_core::catalog::{CatalogProduct, ProductDraft, DEFAULT_RECORDERS};

use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;

pub async fn list_products(State(state): State<SharedState>) -> Json<Vec<CatalogProduct>> {
    Json(state.catalog().read().await.products().to_vec())
}

/// Adds a product with id = current max + 1.
pub async fn add_product(
    State(state): State<SharedState>,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<(StatusCode, Json<CatalogProduct>)> {
    let added = state
        .edit_catalog(|catalog| catalog.add(draft).map_err(ApiError::from))
        .await?;
    info!(id = added.id, name = %added.name, "Product added");
    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn update_product(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<Json<CatalogProduct>> {
    let updated = state
        .edit_catalog(|catalog| catalog.update(id, draft).map_err(ApiError::from))
        .await?;
    info!(id, name = %updated.name, "Product updated");
    Ok(Json(updated))
}

pub async fn delete_product(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<CatalogProduct>> {
    let removed = state
        .edit_catalog(|catalog| catalog.remove(id).map_err(ApiError::from))
        .await?;
    info!(id, name = %removed.name, "Product removed");
    Ok(Json(removed))
}

/// Names offered in the recorder picker.
pub async fn list_recorders() -> Json<Vec<&'static str>> {
    Json(DEFAULT_RECORDERS.to_vec())
}
