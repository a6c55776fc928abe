use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use flaskr_db::Database;

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    key: Key,
}

impl AppState {
    /// `Key::from` wants 64 bytes of material, so the configured secret is
    /// stretched through SHA-512 first.
    pub fn new(db: Database, secret: &str) -> Self {
        let digest = Sha512::digest(secret.as_bytes());
        Self {
            db: Arc::new(db),
            key: Key::from(digest.as_slice()),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}
