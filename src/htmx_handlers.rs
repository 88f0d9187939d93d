// src/htmx_handlers.rs

use std::sync::Arc;

use axum::{
    Form,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use maud::{Markup, html};
use serde_json::json;

use crate::errors::AppError;
use crate::models::{Product, ProductDraft, ProductFormData};
use crate::response::build_response;
use crate::session::{EditorMode, OpenSession};
use crate::staging::{IncomingImage, StagedImage, StagedImages};
use crate::state::AppState;

// --- RENDERING HELPERS (Maud) ---

fn render_admin_page(products: &[Product]) -> Markup {
    html! {
        div ."flex flex-col h-full" {
            header ."bg-white shadow-lg" {
                div ."max-w-7xl mx-auto px-4 py-2 sm:px-6 lg:px-8" {
                    div ."flex justify-between items-center" {
                        h1 ."text-lg font-bold" { "Products" }
                        button
                            hx-get="/htmx/admin/products/new"
                            hx-target="#modal-root"
                            hx-swap="innerHTML"
                            class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded-lg focus:outline-none"
                        {
                            "+ Add Product"
                        }
                    }
                }
            }
            main ."flex-1 overflow-y-auto" {
                div ."max-w-7xl mx-auto px-4 py-8 sm:px-6 lg:px-8" {
                    (render_product_table(products))
                }
            }
            div #modal-root {}
        }
    }
}

fn render_product_table(products: &[Product]) -> Markup {
    html! {
        div #product-table {
            @if products.is_empty() {
                p ."text-gray-600" { "No products found." }
            } @else {
                table ."w-full divide-y divide-gray-200" {
                    thead ."bg-gray-100" {
                        tr {
                            th ."px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider" { "Name" }
                            th ."px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider" { "Description" }
                            th ."px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider" { "Price" }
                            th ."px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider" { "Actions" }
                        }
                    }
                    tbody ."bg-white divide-y divide-gray-200" {
                        @for product in products {
                            (render_product_row(product))
                        }
                    }
                }
            }
        }
    }
}

fn render_product_row(product: &Product) -> Markup {
    html! {
        tr {
            td ."px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900" { (product.name) }
            td ."px-6 py-4 whitespace-nowrap text-sm text-gray-500" { (product.description) }
            td ."px-6 py-4 whitespace-nowrap text-sm text-gray-500" { "$" (product.price) }
            td ."px-6 py-4 whitespace-nowrap text-right text-sm font-medium" {
                button
                    hx-get=(format!("/htmx/admin/products/{}/edit", product.id))
                    hx-target="#modal-root"
                    hx-swap="innerHTML"
                    class="text-blue-500 hover:text-blue-600 mr-4"
                    title=(format!("Edit {}", product.name))
                {
                    "Edit"
                }
                button
                    hx-delete=(format!("/htmx/admin/products/{}", product.id))
                    hx-target="#product-table"
                    hx-swap="outerHTML"
                    class="text-red-500 hover:text-red-600"
                    title=(format!("Delete {}", product.name))
                {
                    "Delete"
                }
            }
        }
    }
}

fn render_staged_images(staging: &StagedImages) -> Markup {
    html! {
        div #staged-images ."flex flex-wrap" {
            @for image in staging.iter() {
                div ."w-1/2 sm:w-1/4 md:w-1/6 p-1" {
                    img
                        src=(format!("/previews/{}", image.preview_id))
                        alt=(image.filename)
                        class="w-full h-auto object-contain";
                    button
                        type="button"
                        hx-delete=(format!("/htmx/admin/session/images/{}", image.preview_id))
                        hx-target="#staged-images"
                        hx-swap="outerHTML"
                        class="text-red-500 hover:text-red-600 text-xs"
                        title=(format!("Remove {}", image.filename))
                    {
                        "Remove"
                    }
                }
            }
        }
    }
}

fn render_editor_modal(open: &OpenSession) -> Markup {
    let is_editing = open.is_editing();
    let modal_title = if is_editing { "Edit Product" } else { "Add Product" };
    let submit_label = if is_editing { "Save Changes" } else { "Add Product" };

    html! {
        div #editor-modal ."fixed z-50 inset-0 overflow-y-auto" {
            div ."flex items-center justify-center min-h-screen px-4 text-center" {
                div ."fixed inset-0 bg-gray-500 opacity-75" aria-hidden="true" {}
                div ."relative inline-block bg-white rounded-lg px-4 pt-5 pb-4 text-left shadow-xl sm:my-8 sm:max-w-lg sm:w-full sm:p-6" {
                    h3 ."text-lg leading-6 font-medium text-gray-900" { (modal_title) }
                    div ."mt-2" {
                        (render_staged_images(&open.staging))
                        form #image-upload-form
                            hx-post="/htmx/admin/session/images"
                            hx-encoding="multipart/form-data"
                            hx-target="#staged-images"
                            hx-swap="outerHTML"
                            hx-trigger="change from:#image-files"
                        {
                            input #image-files type="file" name="image_file" accept="image/*" multiple;
                        }
                        form hx-post="/htmx/admin/products" hx-swap="none" {
                            div ."mt-4" {
                                label for="name" ."block text-sm font-medium text-gray-700" { "Name" }
                                div ."mt-1" {
                                    input type="text" name="name" id="name"
                                        value=(open.draft.name)
                                        class="block w-full border-gray-300 rounded-md shadow-sm sm:text-sm";
                                }
                            }
                            div ."mt-4" {
                                label for="description" ."block text-sm font-medium text-gray-700" { "Description" }
                                div ."mt-1" {
                                    textarea id="description" name="description" rows="3"
                                        class="block w-full border-gray-300 rounded-md shadow-sm sm:text-sm"
                                    {
                                        (open.draft.description)
                                    }
                                }
                            }
                            div ."mt-4" {
                                label for="price" ."block text-sm font-medium text-gray-700" { "Price" }
                                div ."mt-1" {
                                    input type="number" name="price" id="price"
                                        value=(open.draft.price)
                                        class="block w-full border-gray-300 rounded-md shadow-sm sm:text-sm";
                                }
                            }
                            div ."mt-4" {
                                button type="submit"
                                    class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded-lg focus:outline-none"
                                {
                                    (submit_label)
                                }
                                button type="button"
                                    hx-post="/htmx/admin/session/cancel"
                                    hx-target="#modal-root"
                                    hx-swap="innerHTML"
                                    class="ml-4 text-gray-500 hover:text-gray-600"
                                {
                                    "Cancel"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

// --- HEADER HELPERS (htmx out-of-band signalling) ---

fn toast_headers(message: &str, kind: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let toast_payload = json!({
        "showMessage": {
            "message": message,
            "type": kind
        }
    });
    if let Ok(val) = HeaderValue::from_str(&toast_payload.to_string()) {
        headers.insert("HX-Trigger", val);
    }
    headers
}

fn redirect_to_admin_products(headers: &mut HeaderMap) {
    let location_payload = json!({
        "path": "/htmx/admin/products",
        "target": "#content",
        "swap": "innerHTML"
    });
    if let Ok(val) = HeaderValue::from_str(&location_payload.to_string()) {
        headers.insert("HX-Location", val);
    }
}

// --- HANDLERS ---

/// The admin page. Direct loads get the shell with the partial spliced in,
/// htmx swaps get the partial alone.
pub async fn admin_page_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let catalog = app_state.catalog.read().await;
    build_response(headers, render_admin_page(catalog.products())).await
}

pub async fn admin_products_htmx_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let catalog = app_state.catalog.read().await;
    Ok(render_admin_page(catalog.products()))
}

/// `Closed -> Creating`: fresh draft, empty staging, modal rendered.
pub async fn open_create_product_htmx_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let mut session = app_state.session.lock().await;
    let open = session.open_create();
    tracing::info!("Editor session opened in create mode");
    Ok(render_editor_modal(open))
}

/// `-> Editing(id)`: draft populated from the row's current fields.
pub async fn open_edit_product_htmx_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> Result<Markup, AppError> {
    // Clone the product out before touching the session lock; submit nests
    // the locks the other way around.
    let product = {
        let catalog = app_state.catalog.read().await;
        catalog.get(product_id).cloned().ok_or(AppError::NotFound)?
    };

    let mut session = app_state.session.lock().await;
    let open = session.open_edit(&product);
    tracing::info!("Editor session opened for product {}", product_id);
    Ok(render_editor_modal(open))
}

/// Cancel: discard draft and staging, no list mutation.
pub async fn cancel_editor_htmx_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let mut session = app_state.session.lock().await;
    session.close();
    tracing::info!("Editor session closed without submit");
    Ok(html! {})
}

/// Stages a batch of selected image files into the open session. A batch
/// that would exceed the cap is rejected whole and surfaced as a blocking
/// notice on the client.
pub async fn stage_images_htmx_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut batch: Vec<IncomingImage> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!("Received multipart field without a name, skipping");
                continue;
            }
        };
        if field_name != "image_file" {
            tracing::debug!("Ignoring unexpected form field '{}'", field_name);
            continue;
        }
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("image-{}.jpg", batch.len() + 1));
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            tracing::warn!("Received empty file field '{}', skipping", filename);
            continue;
        }
        batch.push(IncomingImage {
            filename,
            content_type,
            bytes,
        });
    }

    if batch.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No image files were selected".to_string(),
        ));
    }

    let mut session = app_state.session.lock().await;
    let open = session
        .as_open_mut()
        .ok_or_else(|| AppError::Conflict("No editor session is open".to_string()))?;

    open.staging.stage_batch(batch)?;
    tracing::info!("{} image(s) staged in total", open.staging.len());

    Ok(render_staged_images(&open.staging))
}

/// Removes one staged image, releasing its preview handle.
pub async fn remove_staged_image_htmx_handler(
    State(app_state): State<Arc<AppState>>,
    Path(preview_id): Path<u64>,
) -> Result<Markup, AppError> {
    let mut session = app_state.session.lock().await;
    let open = session
        .as_open_mut()
        .ok_or_else(|| AppError::Conflict("No editor session is open".to_string()))?;

    let removed = open.staging.remove(preview_id).ok_or(AppError::NotFound)?;
    tracing::info!(
        "Removed staged image '{}' (preview {})",
        removed.filename,
        preview_id
    );

    Ok(render_staged_images(&open.staging))
}

/// Serves the bytes behind a live preview handle. Handles die with their
/// staged image, so this resolves iff the file is still staged.
pub async fn preview_staged_image_handler(
    State(app_state): State<Arc<AppState>>,
    Path(preview_id): Path<u64>,
) -> Result<Response, AppError> {
    let session = app_state.session.lock().await;
    let open = session.as_open().ok_or(AppError::NotFound)?;
    let image = open.staging.preview(preview_id).ok_or(AppError::NotFound)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.content_type.clone())
        .body(Body::from(image.bytes.clone()))
        .map_err(|e| {
            tracing::error!("Could not build preview response: {}", e);
            AppError::InternalServerError("Could not serve image preview".to_string())
        })
}

/// Submit: replace-in-place when editing, append-with-new-id when creating.
/// For creation both external side effects are awaited before the catalog is
/// touched; on failure the session stays open and nothing is appended.
pub async fn submit_product_htmx_handler(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<ProductFormData>,
) -> Result<(StatusCode, HeaderMap), AppError> {
    let mut session = app_state.session.lock().await;
    let open = session
        .as_open_mut()
        .ok_or_else(|| AppError::Conflict("No editor session is open".to_string()))?;

    // The submitted fields replace the session draft wholesale.
    open.draft = ProductDraft::from(form);

    let (status, message) = match open.mode {
        EditorMode::Editing(product_id) => {
            let mut catalog = app_state.catalog.write().await;
            if !catalog.replace_by_id(product_id, &open.draft) {
                tracing::warn!(
                    "Edited product {} no longer exists, nothing replaced",
                    product_id
                );
            }
            (StatusCode::OK, "Product updated.")
        }
        EditorMode::Creating => {
            // The exclusive session serializes id assignment, so the id read
            // here is still fresh when the append happens below.
            let new_id = app_state.catalog.read().await.next_id();
            let product = open.draft.clone().into_product(new_id);

            app_state.persistence.persist_product(&product).await?;
            let staged: Vec<StagedImage> = open.staging.iter().cloned().collect();
            app_state.image_store.store_all(&staged).await?;

            app_state.catalog.write().await.add(product);
            tracing::info!("Created product {} with {} image(s)", new_id, staged.len());
            (StatusCode::CREATED, "Product added.")
        }
    };

    session.close();

    let mut headers = toast_headers(message, "success");
    redirect_to_admin_products(&mut headers);
    Ok((status, headers))
}

/// Deletes a row immediately: no confirmation, no undo, absent ids are a
/// no-op.
pub async fn delete_product_htmx_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> Result<(HeaderMap, Markup), AppError> {
    let mut catalog = app_state.catalog.write().await;

    let headers = if catalog.remove_by_id(product_id) {
        tracing::info!("Deleted product {}", product_id);
        toast_headers("Product deleted.", "success")
    } else {
        tracing::warn!("Delete of absent product {} ignored", product_id);
        HeaderMap::new()
    };

    Ok((headers, render_product_table(catalog.products())))
}
