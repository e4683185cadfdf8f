use std::sync::Arc;

use crate::auth::{PasswordHasher, SessionIssuer};
use crate::store::CredentialStore;

/// Shared, read-only request context. Registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub hasher: PasswordHasher,
    pub sessions: SessionIssuer,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        sessions: SessionIssuer,
    ) -> Self {
        Self {
            store,
            hasher,
            sessions,
        }
    }
}
