use chrono::Utc;
use std::sync::Arc;

use crate::models::{SearchStatus, VerifyResponse, NO_SOURCES_NOTICE, NO_TRUSTED_SOURCES_NOTICE};
use crate::services::{SearchProvider, TrustClassifier};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("query must not be empty")]
    EmptyQuery,
}

/// Search-and-classify pipeline behind the verify endpoint.
#[derive(Clone)]
pub struct VerifyService {
    provider: Arc<dyn SearchProvider>,
    classifier: TrustClassifier,
    default_limit: usize,
}

impl VerifyService {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        classifier: TrustClassifier,
        default_limit: usize,
    ) -> Self {
        Self {
            provider,
            classifier,
            default_limit,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn policy_name(&self) -> &'static str {
        self.classifier.policy_name()
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Runs one search for `query` and classifies the results.
    ///
    /// A blank query is rejected before the provider is touched. Provider
    /// failures never escape: they come back as an `Unavailable` response with
    /// empty result lists and an error notice.
    pub async fn verify(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<VerifyResponse, VerifyError> {
        if query.trim().is_empty() {
            return Err(VerifyError::EmptyQuery);
        }
        let limit = limit.unwrap_or(self.default_limit);

        let (results, status, notice) = match self.provider.search(query, limit).await {
            Ok(results) if results.is_empty() => (
                results,
                SearchStatus::NoSources,
                Some(NO_SOURCES_NOTICE.to_string()),
            ),
            Ok(results) => (results, SearchStatus::Found, None),
            Err(e) => {
                tracing::error!(provider = self.provider.name(), error = %e, "search failed");
                (
                    Vec::new(),
                    SearchStatus::Unavailable,
                    Some(format!("Error fetching sources: {}", e)),
                )
            }
        };

        let partition = self.classifier.partition(&results);
        tracing::info!(
            limit,
            total = partition.all.len(),
            trusted = partition.trusted.len(),
            status = ?status,
            "verification completed"
        );

        Ok(VerifyResponse {
            query: query.to_string(),
            status,
            notice,
            trusted_notice: partition
                .trusted
                .is_empty()
                .then(|| NO_TRUSTED_SOURCES_NOTICE.to_string()),
            trusted_count: partition.trusted.len(),
            total_count: partition.all.len(),
            trusted: partition.trusted,
            all: partition.all,
            timestamp: Utc::now(),
        })
    }
}
