//! Temporary phone number detector

use crate::config::DetectorConfig;
use crate::constants;
use crate::fetch::{HttpFetcher, ListFetcher};
use crate::list::{EntryKind, ListCache, RefreshOutcome};
use crate::phone::{normalize_phone, structurally_suspicious};
use crate::refresh::Refreshable;
use crate::snapshot::{SnapshotFormat, SnapshotStore};
use crate::source::{defaults, Source};
use async_trait::async_trait;
use std::sync::Arc;

/// Canonical national-form phone numbers
pub struct PhoneEntries;

impl EntryKind for PhoneEntries {
    fn label(&self) -> &'static str {
        "phone-numbers"
    }

    fn normalize(&self, raw: &str) -> Option<String> {
        normalize_phone(raw)
    }

    // Snapshots already hold canonical forms; normalizing them again would
    // strip a second country code.
    fn restore(&self, stored: &str) -> Option<String> {
        let stored = stored.trim();
        (!stored.is_empty() && stored.chars().all(|c| c.is_ascii_digit())).then(|| stored.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneVerdict {
    /// Not a plausible phone number
    Invalid,
    /// Canonical form is on a strong list
    Listed { number: String },
    /// Not listed; `structurally_suspicious` is informational only
    Clean {
        number: String,
        structurally_suspicious: bool,
    },
}

impl PhoneVerdict {
    pub fn is_temp(&self) -> bool {
        matches!(self, PhoneVerdict::Listed { .. })
    }
}

pub struct PhoneDetector {
    cache: ListCache<PhoneEntries>,
}

impl PhoneDetector {
    pub fn new(fetcher: Arc<dyn ListFetcher>, sources: Vec<Source>, store: SnapshotStore) -> Self {
        Self {
            cache: ListCache::new(
                PhoneEntries,
                sources,
                fetcher,
                store,
                constants::PHONE_MIN_ENTRIES,
            ),
        }
    }

    /// Detector over the public source
    pub fn from_config(config: &DetectorConfig) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(config.phone_fetch_timeout)?;
        Ok(Self::new(
            Arc::new(fetcher),
            defaults::phone_sources(),
            SnapshotStore::new(config.phone_snapshot_path(), SnapshotFormat::JsonRecord),
        ))
    }

    pub fn cache(&self) -> &ListCache<PhoneEntries> {
        &self.cache
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.cache.refresh().await
    }

    /// Classify a phone number.
    ///
    /// Only list membership makes a number temporary. The structural check is
    /// recorded for diagnostics and never changes the verdict.
    pub async fn check_phone(&self, phone: &str) -> PhoneVerdict {
        let Some(number) = normalize_phone(phone) else {
            return PhoneVerdict::Invalid;
        };

        self.cache.ensure_ready().await;
        if self.cache.contains(&number) {
            return PhoneVerdict::Listed { number };
        }

        let suspicious = structurally_suspicious(&number);
        if suspicious {
            tracing::debug!("{} looks structurally suspicious but is not listed", number);
        }

        PhoneVerdict::Clean {
            number,
            structurally_suspicious: suspicious,
        }
    }

    /// Whether the number is a known temporary number; `false` when unsure
    pub async fn is_temp_phone(&self, phone: &str) -> bool {
        self.check_phone(phone).await.is_temp()
    }
}

#[async_trait]
impl Refreshable for PhoneDetector {
    fn name(&self) -> &'static str {
        self.cache.kind().label()
    }

    async fn refresh(&self) -> RefreshOutcome {
        self.cache.refresh().await
    }
}
