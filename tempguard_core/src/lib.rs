//! Tempguard Core - disposable email and phone number detection
//!
//! This crate contains the self-refreshing list caches used to decide whether
//! an email address or a phone number belongs to a throwaway provider:
//! - Remote list acquisition with per-source trust levels
//! - Acceptance policy with a durable snapshot fallback
//! - Domain and phone normalization
//! - Domain-chain matching with brand-pattern rules
//!
//! Queries never fail: anything ambiguous resolves to "not disposable".

pub mod config;
pub mod detector;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod list;
pub mod patterns;
pub mod phone;
pub mod refresh;
pub mod snapshot;
pub mod source;

pub use config::{ConfigError, DetectorConfig};
pub use detector::{EmailDetector, EmailVerdict, PhoneDetector, PhoneVerdict};
pub use error::{SnapshotError, SourceError};
pub use fetch::{HttpFetcher, ListFetcher, StaticFetcher};
pub use list::{EntryKind, ListCache, RefreshOutcome};
pub use patterns::SafePatterns;
pub use refresh::{RefreshSupervisor, Refreshable};
pub use snapshot::{SnapshotFormat, SnapshotStore};
pub use source::{Source, SourceFormat, Trust};

/// Constants shared by the detectors
pub mod constants {
    /// Recurring refresh period (6 hours)
    pub const REFRESH_INTERVAL_SECONDS: u64 = 6 * 60 * 60;

    /// Candidate domain sets must be strictly larger than this to be promoted
    pub const EMAIL_MIN_ENTRIES: usize = 1000;

    /// Any non-empty candidate phone set is promoted
    pub const PHONE_MIN_ENTRIES: usize = 0;

    /// Request timeout for email domain list sources
    pub const EMAIL_FETCH_TIMEOUT_SECONDS: u64 = 15;

    /// Request timeout for phone number list sources
    pub const PHONE_FETCH_TIMEOUT_SECONDS: u64 = 10;

    /// Default directory for snapshot files, relative to the working directory
    pub const DEFAULT_DATA_DIR: &str = "data";

    /// Snapshot file for the email domain detector
    pub const EMAIL_SNAPSHOT_FILE: &str = "disposable-email-domains.txt";

    /// Snapshot file for the phone number detector
    pub const PHONE_SNAPSHOT_FILE: &str = "tempphone-store.json";

    /// User agent sent to list sources
    pub const USER_AGENT: &str = concat!("tempguard/", env!("CARGO_PKG_VERSION"));
}
