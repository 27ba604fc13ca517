use govgate_auth::{AuthProxy, ResourceGuard, SessionTokenIssuer};

use crate::storage::Storage;

/// Shared state behind the HTTP handlers.
pub struct AppState {
    pub proxy: AuthProxy,
    pub tokens: SessionTokenIssuer,
    pub guard: ResourceGuard,
    pub storage: Storage,
}

impl AppState {
    pub fn new(
        proxy: AuthProxy,
        tokens: SessionTokenIssuer,
        guard: ResourceGuard,
        storage: Storage,
    ) -> Self {
        Self {
            proxy,
            tokens,
            guard,
            storage,
        }
    }
}
