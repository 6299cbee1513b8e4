use std::sync::Arc;

use db::DBService;
use services::services::email::Notifier;
use utils_jwt::TokenVerifier;

pub mod error;
pub mod http;
pub mod routes;

#[cfg(test)]
pub mod test_support;

#[derive(Clone)]
pub struct AppState {
    db: DBService,
    notifier: Notifier,
    verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(db: DBService, notifier: Notifier, verifier: TokenVerifier) -> Self {
        Self {
            db,
            notifier,
            verifier: Arc::new(verifier),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }
}
