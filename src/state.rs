// src/state.rs

use tokio::sync::{Mutex, RwLock};

use crate::catalog::ProductCatalog;
use crate::persistence::PersistenceClient;
use crate::session::EditorSession;
use crate::storage::ImageStore;

/// Shared application state. The catalog sits behind an RwLock so the JSON
/// mirror can read while the admin works; the editor session is a Mutex
/// because the modal is exclusive (one session per service instance).
pub struct AppState {
    pub catalog: RwLock<ProductCatalog>,
    pub session: Mutex<EditorSession>,
    pub image_store: ImageStore,
    pub persistence: PersistenceClient,
}

impl AppState {
    pub fn new(image_store: ImageStore, persistence: PersistenceClient) -> Self {
        AppState {
            catalog: RwLock::new(ProductCatalog::seeded()),
            session: Mutex::new(EditorSession::default()),
            image_store,
            persistence,
        }
    }
}
