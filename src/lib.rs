//! TruthLens: claim verification over web search.
//!
//! A submitted claim is searched through Tavily and the returned links are
//! split into trusted sources (URL matches the domain allowlist) and all
//! sources. Access goes through a login gate and each session keeps its own
//! query history.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use config::Config;
use repositories::SessionRepo;
use services::{CredentialVerifier, SearchProvider, StaticCredentials, TrustClassifier, VerifyService};

#[derive(Clone)]
pub struct AppState {
    pub verify_service: VerifyService,
    pub sessions: SessionRepo,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub config: Config,
    pub start_time: Instant,
}

impl AppState {
    /// Wires the configured allowlist, credentials and session store around `provider`.
    pub fn new(config: Config, provider: Arc<dyn SearchProvider>) -> Self {
        let classifier = TrustClassifier::substring(config.trust.domains.iter().cloned());
        let verify_service =
            VerifyService::new(provider, classifier, config.search.default_max_results);

        Self {
            verify_service,
            sessions: SessionRepo::new(&config.session),
            credentials: Arc::new(StaticCredentials::from_settings(&config.auth)),
            config,
            start_time: Instant::now(),
        }
    }
}
