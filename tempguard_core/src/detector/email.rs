//! Disposable email domain detector

use crate::config::DetectorConfig;
use crate::domain::{domain_chain, extract_domain, normalize_domain};
use crate::fetch::{HttpFetcher, ListFetcher};
use crate::list::{EntryKind, ListCache, RefreshOutcome};
use crate::patterns::SafePatterns;
use crate::refresh::Refreshable;
use crate::snapshot::{SnapshotFormat, SnapshotStore};
use crate::source::{defaults, Source};
use async_trait::async_trait;
use std::sync::Arc;

/// Email domains; weak-source entries must match a safe pattern
pub struct DomainEntries {
    patterns: Arc<SafePatterns>,
}

impl DomainEntries {
    pub fn new(patterns: Arc<SafePatterns>) -> Self {
        Self { patterns }
    }
}

impl EntryKind for DomainEntries {
    fn label(&self) -> &'static str {
        "email-domains"
    }

    fn normalize(&self, raw: &str) -> Option<String> {
        normalize_domain(raw)
    }

    fn admit_weak(&self, entry: &str) -> bool {
        self.patterns.is_match(entry)
    }
}

/// Why an address was (or was not) considered disposable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailVerdict {
    /// Not a single-`@` address with a valid domain
    Invalid,
    /// A domain of the chain is on the list
    Listed { domain: String },
    /// A domain of the chain matches a safe pattern
    PatternMatch { domain: String, rule: String },
    /// Nothing matched
    Clean,
}

impl EmailVerdict {
    pub fn is_disposable(&self) -> bool {
        matches!(self, EmailVerdict::Listed { .. } | EmailVerdict::PatternMatch { .. })
    }
}

pub struct EmailDetector {
    cache: ListCache<DomainEntries>,
    patterns: Arc<SafePatterns>,
}

impl EmailDetector {
    pub fn new(
        fetcher: Arc<dyn ListFetcher>,
        sources: Vec<Source>,
        patterns: Arc<SafePatterns>,
        store: SnapshotStore,
        min_entries: usize,
    ) -> Self {
        let kind = DomainEntries::new(patterns.clone());
        Self {
            cache: ListCache::new(kind, sources, fetcher, store, min_entries),
            patterns,
        }
    }

    /// Detector over the public sources with the built-in patterns
    pub fn from_config(config: &DetectorConfig) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(config.email_fetch_timeout)?;
        Ok(Self::new(
            Arc::new(fetcher),
            defaults::email_sources(),
            SafePatterns::builtin(),
            SnapshotStore::new(config.email_snapshot_path(), SnapshotFormat::Lines),
            config.email_min_entries,
        ))
    }

    pub fn cache(&self) -> &ListCache<DomainEntries> {
        &self.cache
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.cache.refresh().await
    }

    /// Classify an email address.
    ///
    /// Malformed input is rejected before the cache is consulted, so it never
    /// triggers a refresh.
    pub async fn check_email(&self, email: &str) -> EmailVerdict {
        let Some(domain) = extract_domain(email) else {
            return EmailVerdict::Invalid;
        };

        self.cache.ensure_ready().await;
        let listed = self.cache.entries();

        for candidate in domain_chain(&domain) {
            if listed.contains(&candidate) {
                return EmailVerdict::Listed { domain: candidate };
            }
            if let Some(rule) = self.patterns.matching(&candidate) {
                return EmailVerdict::PatternMatch {
                    rule: rule.name().to_string(),
                    domain: candidate,
                };
            }
        }

        EmailVerdict::Clean
    }

    /// Whether the address belongs to a disposable provider; `false` when unsure
    pub async fn is_disposable_email(&self, email: &str) -> bool {
        self.check_email(email).await.is_disposable()
    }
}

#[async_trait]
impl Refreshable for EmailDetector {
    fn name(&self) -> &'static str {
        self.cache.kind().label()
    }

    async fn refresh(&self) -> RefreshOutcome {
        self.cache.refresh().await
    }
}
