// src/response.rs

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use lol_html::{HtmlRewriter, Settings, element};
use maud::Markup;
use tokio::fs;
use tokio_util::bytes::Bytes;

use crate::errors::AppError;

/// Loads the shell and splices the rendered content into its `#content`
/// slot. The slot's htmx attributes are removed so the client does not fetch
/// the partial a second time after load.
async fn serve_full_page(content_markup: Markup) -> Result<Response, AppError> {
    let shell_content = match fs::read("static/index.html").await {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            tracing::error!("Could not read shell template static/index.html: {}", e);
            return Err(AppError::InternalServerError(
                "Could not load the page shell".to_string(),
            ));
        }
    };

    let content_string = content_markup.into_string();
    let mut response_body = Vec::new();

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("#content", |el| {
                el.set_inner_content(&content_string, lol_html::html_content::ContentType::Html);
                el.remove_attribute("hx-trigger");
                el.remove_attribute("hx-get");
                Ok(())
            })],
            ..Settings::default()
        },
        |c: &[u8]| response_body.extend_from_slice(c),
    );

    rewriter.write(&shell_content).map_err(|e| {
        tracing::error!("Shell rewriting failed: {}", e);
        AppError::InternalServerError("Could not render the page shell".to_string())
    })?;
    rewriter.end().map_err(|e| {
        tracing::error!("Shell rewriting failed: {}", e);
        AppError::InternalServerError("Could not render the page shell".to_string())
    })?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(response_body))
        .unwrap())
}

/// htmx requests get the fragment alone; a full refresh (F5) gets the whole
/// document built around it.
pub async fn build_response(
    headers: HeaderMap,
    page_content: Markup,
) -> Result<Response, AppError> {
    if headers.contains_key("HX-Request") {
        Ok(page_content.into_response())
    } else {
        serve_full_page(page_content).await
    }
}
