// src/handlers.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::errors::AppError;
use crate::models::{CatalogResponse, Product};
use crate::state::AppState;

/// Read-only JSON mirror of the catalog, the shape the persistence contract
/// speaks: full product records `{id, name, description, price}`.
pub async fn list_products(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<CatalogResponse>, AppError> {
    let catalog = app_state.catalog.read().await;
    tracing::info!("GET /api/products ({} items)", catalog.len());

    Ok(Json(CatalogResponse {
        total_items: catalog.len(),
        data: catalog.products().to_vec(),
    }))
}

pub async fn get_product_details(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    let catalog = app_state.catalog.read().await;
    match catalog.get(product_id) {
        Some(product) => Ok(Json(product.clone())),
        None => {
            tracing::warn!("Product {} not found", product_id);
            Err(AppError::NotFound)
        }
    }
}
