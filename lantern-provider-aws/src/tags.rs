//! Tag filtering
//!
//! Tags read from AWS pass through two filters before they reach the
//! projected attribute set: keys reserved by AWS itself (`aws:` prefix) are
//! always dropped, then keys matched by the provider's `ignore_tags`
//! configuration are dropped.

use std::collections::{BTreeSet, HashMap};

use aws_sdk_lightsail::types::Tag;

/// Prefix of tag keys managed by AWS
pub const RESERVED_TAG_PREFIX: &str = "aws:";

/// Tag keys the caller wants hidden from every data source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreTagsConfig {
    /// Exact keys to ignore
    pub keys: BTreeSet<String>,
    /// Key prefixes to ignore
    pub key_prefixes: BTreeSet<String>,
}

impl IgnoreTagsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefixes.insert(prefix.into());
        self
    }

    /// Returns true if the key is matched by an ignore rule
    pub fn ignores(&self, key: &str) -> bool {
        self.keys.contains(key) || self.key_prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }

    /// Merge another configuration into this one
    pub fn merge(&mut self, other: IgnoreTagsConfig) {
        self.keys.extend(other.keys);
        self.key_prefixes.extend(other.key_prefixes);
    }
}

/// Returns true if the key is reserved by AWS
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(RESERVED_TAG_PREFIX)
}

/// Drop reserved keys, then keys matched by `ignore`
pub fn filter_tags(
    raw: &HashMap<String, String>,
    ignore: &IgnoreTagsConfig,
) -> HashMap<String, String> {
    raw.iter()
        .filter(|(key, _)| !is_reserved_key(key))
        .filter(|(key, _)| !ignore.ignores(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Convert Lightsail SDK tags into a key/value map
///
/// Tags without a key are skipped; a missing value becomes an empty string.
pub fn tags_from_sdk(tags: &[Tag]) -> HashMap<String, String> {
    tags.iter()
        .filter_map(|tag| {
            tag.key()
                .map(|key| (key.to_string(), tag.value().unwrap_or_default().to_string()))
        })
        .collect()
}
