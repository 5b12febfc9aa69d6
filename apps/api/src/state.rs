use std::sync::Arc;

use crate::config::Config;
use crate::credentials::CredentialChain;

/// Shared application state injected into all route handlers via Axum
/// extractors. Holds only long-lived pieces: the reqwest connection pool,
/// the credential provider chain, and the config. The match engine itself
/// is constructed per request (see `matching::handlers::build_engine`).
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub credentials: Arc<CredentialChain>,
    pub config: Config,
}
