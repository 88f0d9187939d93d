// src/persistence.rs

use reqwest::Client;

use crate::errors::AppError;
use crate::models::Product;

/// Client for the external product store. The store is an opaque
/// collaborator: we POST the full product record as JSON to the configured
/// endpoint and only consult the response status.
///
/// With no endpoint configured the service runs purely in-memory and
/// `persist_product` is a no-op.
#[derive(Debug, Clone)]
pub struct PersistenceClient {
    endpoint: Option<String>,
    client: Client,
}

impl PersistenceClient {
    pub fn new(endpoint: Option<String>) -> Self {
        PersistenceClient {
            endpoint,
            client: Client::new(),
        }
    }

    #[allow(dead_code)]
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Persists one product record and waits for the answer. Submit calls
    /// this before mutating the catalog, so a rejected write never leaves the
    /// table showing a product the store refused.
    pub async fn persist_product(&self, product: &Product) -> Result<(), AppError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            tracing::debug!(
                "No persistence endpoint configured, keeping product {} in-memory only",
                product.id
            );
            return Ok(());
        };

        let response = self.client.post(endpoint).json(product).send().await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    tracing::info!(
                        "Persisted product {} ('{}') to external store",
                        product.id,
                        product.name
                    );
                    Ok(())
                } else {
                    let status = resp.status();
                    let error_text = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "No error body".to_string());
                    tracing::error!(
                        "External store rejected product {}: Status={}, Body={}",
                        product.id,
                        status,
                        error_text
                    );
                    Err(AppError::PersistenceFailed(format!(
                        "External store answered with status {}",
                        status
                    )))
                }
            }
            Err(e) => {
                tracing::error!(
                    "Network error while persisting product {}: {:?}",
                    product.id,
                    e
                );
                Err(AppError::PersistenceFailed(format!(
                    "Could not reach the external store: {}",
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_products;

    #[tokio::test]
    async fn disabled_client_is_a_noop() {
        let client = PersistenceClient::new(None);
        assert!(!client.is_enabled());

        let product = seed_products().into_iter().next().unwrap();
        client.persist_product(&product).await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_a_persistence_error() {
        // Nothing listens on the discard port, the connection is refused
        // immediately.
        let client = PersistenceClient::new(Some("http://127.0.0.1:9/products".to_string()));
        assert!(client.is_enabled());

        let product = seed_products().into_iter().next().unwrap();
        let err = client.persist_product(&product).await.unwrap_err();
        assert!(matches!(err, AppError::PersistenceFailed(_)));
    }
}
