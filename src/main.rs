// src/main.rs

use std::env;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod errors;
mod handlers;
mod htmx_handlers;
mod models;
mod persistence;
mod response;
mod session;
mod staging;
mod state;
mod storage;

use crate::handlers::{get_product_details, list_products};
use crate::htmx_handlers::*;
use crate::persistence::PersistenceClient;
use crate::state::AppState;
use crate::storage::ImageStore;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_admin_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Initializing server...");

    // --- Image storage ---
    let storage_dir = env::var("STORAGE_DIR").unwrap_or_else(|_| "storage/units".to_string());
    let image_store = ImageStore::new(&storage_dir);
    if let Err(e) = image_store.prepare().await {
        tracing::error!("Could not prepare storage directory {}: {:?}", storage_dir, e);
        std::process::exit(1);
    }
    tracing::info!("Storing uploaded images under {}", storage_dir);

    // --- External persistence ---
    let persistence_url = env::var("PERSISTENCE_URL").ok();
    match &persistence_url {
        Some(url) => tracing::info!("Persisting created products to {}", url),
        None => tracing::info!("No PERSISTENCE_URL set, running with the in-memory catalog only"),
    }
    let persistence = PersistenceClient::new(persistence_url);

    let app_state = Arc::new(AppState::new(image_store, persistence));
    let app = build_router(app_state, &storage_dir);

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    tracing::info!("Server listening on {}", bind_addr);

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Could not bind address {}: {}", bind_addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Server error: {}", e);
    }
}

fn build_router(app_state: Arc<AppState>, storage_dir: &str) -> Router {
    Router::new()
        .route("/", get(admin_page_handler))
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product_details))
        .route(
            "/htmx/admin/products",
            get(admin_products_htmx_handler).post(submit_product_htmx_handler),
        )
        .route(
            "/htmx/admin/products/new",
            get(open_create_product_htmx_handler),
        )
        .route(
            "/htmx/admin/products/{id}/edit",
            get(open_edit_product_htmx_handler),
        )
        .route(
            "/htmx/admin/products/{id}",
            delete(delete_product_htmx_handler),
        )
        .route("/htmx/admin/session/cancel", post(cancel_editor_htmx_handler))
        .route("/htmx/admin/session/images", post(stage_images_htmx_handler))
        .route(
            "/htmx/admin/session/images/{preview_id}",
            delete(remove_staged_image_htmx_handler),
        )
        .route("/previews/{preview_id}", get(preview_staged_image_handler))
        .nest_service("/storage", ServeDir::new(storage_dir))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .with_state(app_state)
}
