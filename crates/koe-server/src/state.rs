use std::sync::Arc;

use koe_core::config::AuthConfig;

use crate::db::DbHandle;

/// Shared handler state: database actor, catalog client and auth settings.
pub struct AppState<C> {
    pub db: DbHandle,
    pub catalog: Arc<C>,
    pub auth: Arc<AuthConfig>,
}

impl<C> AppState<C> {
    pub fn new(db: DbHandle, catalog: C, auth: AuthConfig) -> Self {
        Self {
            db,
            catalog: Arc::new(catalog),
            auth: Arc::new(auth),
        }
    }
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            catalog: Arc::clone(&self.catalog),
            auth: Arc::clone(&self.auth),
        }
    }
}
