//! Remote list sources and their payload formats

use crate::error::SourceError;
use serde_json::{Map, Value};

/// How far a source is trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trust {
    /// Curated list: every entry is admitted
    Strong,
    /// Crowd-sourced list: entries need independent corroboration
    Weak,
}

impl Trust {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trust::Strong => "strong",
            Trust::Weak => "weak",
        }
    }
}

/// Payload shape served by a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Newline-delimited plain text, one entry per line
    Lines,
    /// JSON object whose keys are the raw entries
    JsonKeys,
}

impl SourceFormat {
    /// Split a payload into raw (not yet normalized) entries
    pub fn raw_entries(&self, url: &str, body: &str) -> Result<Vec<String>, SourceError> {
        match self {
            SourceFormat::Lines => Ok(body.lines().map(str::to_string).collect()),
            SourceFormat::JsonKeys => {
                let object: Map<String, Value> =
                    serde_json::from_str(body).map_err(|source| SourceError::Decode {
                        url: url.to_string(),
                        source,
                    })?;
                Ok(object.into_iter().map(|(key, _)| key).collect())
            }
        }
    }
}

/// A remote list endpoint
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub trust: Trust,
    pub format: SourceFormat,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>, trust: Trust, format: SourceFormat) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            trust,
            format,
        }
    }

    pub fn strong(name: impl Into<String>, url: impl Into<String>, format: SourceFormat) -> Self {
        Self::new(name, url, Trust::Strong, format)
    }

    pub fn weak(name: impl Into<String>, url: impl Into<String>, format: SourceFormat) -> Self {
        Self::new(name, url, Trust::Weak, format)
    }
}

/// Default public sources
pub mod defaults {
    use super::{Source, SourceFormat};

    pub fn email_sources() -> Vec<Source> {
        vec![
            Source::strong(
                "disposable",
                "https://raw.githubusercontent.com/disposable/disposable-email-domains/master/domains.txt",
                SourceFormat::Lines,
            ),
            Source::strong(
                "martenson",
                "https://raw.githubusercontent.com/martenson/disposable-email-domains/master/disposable_email_blocklist.conf",
                SourceFormat::Lines,
            ),
            Source::weak(
                "fakefilter",
                "https://raw.githubusercontent.com/7c/fakefilter/main/txt/data.txt",
                SourceFormat::Lines,
            ),
        ]
    }

    pub fn phone_sources() -> Vec<Source> {
        vec![Source::strong(
            "iP1SMS",
            "https://raw.githubusercontent.com/iP1SMS/disposable-phone-numbers/master/number-list.json",
            SourceFormat::JsonKeys,
        )]
    }
}
