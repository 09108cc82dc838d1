//! Domain normalization and parent-suffix chains

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters/digits/hyphen/dot labels ending in an alphabetic label of length >= 2
static DOMAIN_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9.-]+\.[a-z]{2,}$").expect("domain shape regex"));

/// Normalize a raw domain: trimmed, lowercase, one trailing dot removed.
///
/// Returns `None` when the result does not look like a domain.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let domain = lowered.strip_suffix('.').unwrap_or(&lowered);

    if DOMAIN_SHAPE.is_match(domain) {
        Some(domain.to_string())
    } else {
        None
    }
}

/// Extract and normalize the domain of an address with exactly one `@`
pub fn extract_domain(email: &str) -> Option<String> {
    let mut parts = email.split('@');
    let (_local, domain) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    normalize_domain(domain)
}

/// Progressively shorter suffixes of a domain, most specific first.
///
/// `a.b.example.com` yields `a.b.example.com`, `b.example.com`, `example.com`.
/// The bare top-level label is never part of the chain.
pub fn domain_chain(domain: &str) -> Vec<String> {
    let labels: Vec<&str> = domain.split('.').collect();
    (0..labels.len().saturating_sub(1))
        .map(|i| labels[i..].join("."))
        .collect()
}
