use crate::cache::DEFAULT_CAPACITY;
use crate::ts::{lang, SupportLang};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    #[serde(default)]
    pub cache: CacheSettings,
    /// Per-dialect settings keyed by language name (`rust`, `go`, ...)
    #[serde(default)]
    pub dialects: BTreeMap<String, DialectSettings>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DialectSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Overrides the dialect's own edge-pick policy when set
    #[serde(default)]
    pub pick_at_edge: Option<bool>,
}

impl Default for DialectSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            pick_at_edge: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl LookupConfig {
    /// Settings for `language`, defaults when not configured.
    pub fn dialect(&self, language: SupportLang) -> DialectSettings {
        self.dialects
            .iter()
            .find(|(name, _)| lang::from_name(name) == Some(language))
            .map(|(_, settings)| settings.clone())
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.cache.capacity == 0 {
            issues.push(ValidationIssue::ZeroCapacity);
        }

        for name in self.dialects.keys() {
            if lang::from_name(name).is_none() {
                issues.push(ValidationIssue::UnknownDialect { name: name.clone() });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    ZeroCapacity,
    UnknownDialect { name: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.issues.iter().map(|issue| issue.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::ZeroCapacity => write!(f, "cache.capacity must be greater than 0"),
            ValidationIssue::UnknownDialect { name } => {
                let known: Vec<&str> = lang::SUPPORTED.iter().map(|l| lang::name(*l)).collect();
                write!(f, "unknown dialect '{}' (known: {})", name, known.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}
