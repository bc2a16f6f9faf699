//! Home brand identification
//!
//! Brokerage names arrive in many spellings ("Russ Lyon Sotheby's
//! International Realty", "RLSIR", "Russ Lyon"). [`HomeBrandMatcher`] folds
//! every alias onto one canonical display name. It holds only compiled
//! patterns, so one matcher can be shared across parsing threads.

use crate::config::HomeBrandConfig;
use crate::constants::HOME_BRAND_PATTERNS;
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};

/// Ordered, case-insensitive alias patterns for the home brand
#[derive(Debug, Clone)]
pub struct HomeBrandMatcher {
    patterns: Vec<Regex>,
    display_name: String,
}

impl HomeBrandMatcher {
    /// Build a matcher from configuration
    ///
    /// Built-in aliases come first, configured extras are appended after them.
    pub fn new(config: &HomeBrandConfig) -> Result<Self> {
        let display_name = config.display_name.trim();
        if display_name.is_empty() {
            return Err(Error::configuration(
                "Home brand display name must not be empty",
            ));
        }

        let mut patterns = Vec::with_capacity(HOME_BRAND_PATTERNS.len() + config.extra_aliases.len());
        for pattern in HOME_BRAND_PATTERNS
            .iter()
            .copied()
            .chain(config.extra_aliases.iter().map(String::as_str))
        {
            patterns.push(compile_alias(pattern)?);
        }

        Ok(Self {
            patterns,
            display_name: display_name.to_string(),
        })
    }

    /// Matcher with the built-in aliases and display name
    pub fn with_defaults() -> Result<Self> {
        Self::new(&HomeBrandConfig::default())
    }

    /// True when any alias pattern matches; first match wins
    pub fn is_home_brand(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }

    /// Canonical display name for home brand aliases, trimmed input otherwise
    pub fn canonicalize(&self, name: &str) -> String {
        if self.is_home_brand(name) {
            self.display_name.clone()
        } else {
            name.trim().to_string()
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

fn compile_alias(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            Error::configuration(format!(
                "Invalid home brand alias pattern '{}': {}",
                pattern, e
            ))
        })
}
