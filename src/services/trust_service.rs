use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::SearchResult;

/// Decides whether a single URL counts as a trusted source.
pub trait TrustPolicy: Send + Sync {
    fn is_trusted(&self, url: &str) -> bool;

    fn name(&self) -> &'static str;
}

/// A URL is trusted iff any allowlist token occurs anywhere in it.
///
/// This is a raw substring test: `http://evil-bbc.com.attacker.net` matches the
/// token `bbc.com`. Callers that need host or suffix matching must supply a
/// different policy rather than change this one.
#[derive(Debug, Clone, Default)]
pub struct SubstringDomainMatch {
    tokens: Vec<String>,
}

impl SubstringDomainMatch {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl TrustPolicy for SubstringDomainMatch {
    fn is_trusted(&self, url: &str) -> bool {
        self.tokens.iter().any(|token| url.contains(token.as_str()))
    }

    fn name(&self) -> &'static str {
        "substring_domain_match"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedResult {
    pub title: String,
    pub url: String,
    pub trusted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub trusted: Vec<SearchResult>,
    pub all: Vec<ClassifiedResult>,
}

#[derive(Clone)]
pub struct TrustClassifier {
    policy: Arc<dyn TrustPolicy>,
}

impl TrustClassifier {
    pub fn new(policy: Arc<dyn TrustPolicy>) -> Self {
        Self { policy }
    }

    pub fn substring<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Arc::new(SubstringDomainMatch::new(tokens)))
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Splits `results` into the trusted subsequence and the full tagged list, keeping input order.
    pub fn partition(&self, results: &[SearchResult]) -> Partition {
        let mut partition = Partition {
            trusted: Vec::new(),
            all: Vec::with_capacity(results.len()),
        };

        for result in results {
            let trusted = self.policy.is_trusted(&result.url);
            if trusted {
                partition.trusted.push(result.clone());
            }
            partition.all.push(ClassifiedResult {
                title: result.title.clone(),
                url: result.url.clone(),
                trusted,
            });
        }

        partition
    }
}
