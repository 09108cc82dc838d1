//! Brand-anchored safe pattern rules
//!
//! A safe pattern identifies a known disposable provider by name fragment,
//! independently of list membership. The rule table is data: matching code
//! never changes when a rule is added.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

/// Built-in rules: (name, case-insensitive pattern)
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("mailinator", "mailinator"),
    ("guerrillamail", "guerrillamail"),
    ("sharklasers", "sharklasers"),
    ("10minutemail", "10minutemail"),
    ("tempmail", "tempmail"),
    ("mail.tm", r"mail\.tm$"),
];

static BUILTIN: Lazy<Arc<SafePatterns>> = Lazy::new(|| {
    Arc::new(SafePatterns::from_rules(BUILTIN_RULES.iter().copied()).expect("built-in safe patterns"))
});

/// A single named rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
}

impl PatternRule {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Immutable table of safe pattern rules
#[derive(Debug, Clone)]
pub struct SafePatterns {
    rules: Vec<PatternRule>,
}

impl SafePatterns {
    /// Shared built-in rule table, compiled once per process
    pub fn builtin() -> Arc<SafePatterns> {
        BUILTIN.clone()
    }

    /// Table with no rules (matches nothing)
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Compile a rule table from `(name, pattern)` pairs
    pub fn from_rules<'a, I>(rules: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let rules = rules
            .into_iter()
            .map(|(name, pattern)| {
                let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
                Ok(PatternRule {
                    name: name.to_string(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { rules })
    }

    /// First rule matching the domain, if any
    pub fn matching(&self, domain: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|rule| rule.regex.is_match(domain))
    }

    pub fn is_match(&self, domain: &str) -> bool {
        self.matching(domain).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_brands() {
        let patterns = SafePatterns::builtin();
        assert_eq!(patterns.len(), BUILTIN_RULES.len());
        assert_eq!(patterns.matching("mailinator.com").map(|r| r.name()), Some("mailinator"));
        assert!(patterns.is_match("eu.GuerrillaMail.org"));
        assert!(patterns.is_match("sharklasers.com"));
        assert!(patterns.is_match("my10minutemail.net"));
        assert!(patterns.is_match("tempmail.dev"));
        assert!(patterns.is_match("mail.tm"));
    }

    #[test]
    fn test_builtin_rejects_legitimate() {
        let patterns = SafePatterns::builtin();
        assert!(!patterns.is_match("gmail.com"));
        assert!(!patterns.is_match("outlook.com"));
        // anchored at the end
        assert!(!patterns.is_match("mail.tm.example.com"));
    }

    #[test]
    fn test_custom_rules() {
        let patterns = SafePatterns::from_rules([("burner", r"^burner\.")]).unwrap();
        assert!(patterns.is_match("burner.io"));
        assert!(!patterns.is_match("myburner.io"));
        assert!(SafePatterns::from_rules([("bad", "(")]).is_err());
        assert!(!SafePatterns::empty().is_match("mailinator.com"));
    }
}
