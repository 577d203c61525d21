//! Provider configuration
//!
//! The host passes provider settings as an attribute map, e.g.
//!
//! ```text
//! provider aws {
//!   region      = aws.Region.us_east_1
//!   ignore_tags = { keys = ["Owner"], key_prefixes = ["kubernetes.io/"] }
//! }
//! ```

use std::collections::{BTreeSet, HashMap};

use lantern_core::resource::Value;
use thiserror::Error;

use crate::tags::IgnoreTagsConfig;

/// Regions where Lightsail is available
///
/// Lightsail launches in new regions from time to time; a region missing
/// here is rejected until it is added.
const LIGHTSAIL_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-2",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ca-central-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
];

/// Errors in provider configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Attribute '{key}' must be {expected}")]
    InvalidType { key: String, expected: &'static str },

    #[error(
        "Unsupported region '{0}', expected one of: {regions}",
        regions = LIGHTSAIL_REGIONS.join(", ")
    )]
    UnsupportedRegion(String),

    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),
}

/// AWS provider settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Region in AWS format (e.g., "us-east-1"); `None` defers to the
    /// SDK's environment/profile resolution
    pub region: Option<String>,
    pub ignore_tags: IgnoreTagsConfig,
}

impl ProviderConfig {
    /// Build from a provider block's attributes
    pub fn from_attributes(attributes: &HashMap<String, Value>) -> Result<Self, ConfigError> {
        let mut config = ProviderConfig::default();

        for (key, value) in attributes {
            match key.as_str() {
                "region" => {
                    let region = value.as_str().ok_or_else(|| ConfigError::InvalidType {
                        key: key.clone(),
                        expected: "a string",
                    })?;
                    config = config.with_region(region)?;
                }
                "ignore_tags" => {
                    config.ignore_tags = ignore_tags_from_value(value)?;
                }
                _ => return Err(ConfigError::UnknownAttribute(key.clone())),
            }
        }

        Ok(config)
    }

    /// Set the region, accepting DSL (`aws.Region.us_east_1`) or AWS format
    pub fn with_region(mut self, region: &str) -> Result<Self, ConfigError> {
        let normalized = normalize_region(region);
        if !LIGHTSAIL_REGIONS.contains(&normalized.as_str()) {
            return Err(ConfigError::UnsupportedRegion(region.to_string()));
        }
        self.region = Some(normalized);
        Ok(self)
    }
}

fn ignore_tags_from_value(value: &Value) -> Result<IgnoreTagsConfig, ConfigError> {
    let Value::Map(map) = value else {
        return Err(ConfigError::InvalidType {
            key: "ignore_tags".to_string(),
            expected: "a map",
        });
    };

    let mut ignore_tags = IgnoreTagsConfig::default();
    for (key, value) in map {
        match key.as_str() {
            "keys" => ignore_tags.keys = string_set(key, value)?,
            "key_prefixes" => ignore_tags.key_prefixes = string_set(key, value)?,
            _ => return Err(ConfigError::UnknownAttribute(format!("ignore_tags.{}", key))),
        }
    }
    Ok(ignore_tags)
}

fn string_set(key: &str, value: &Value) -> Result<BTreeSet<String>, ConfigError> {
    let invalid = || ConfigError::InvalidType {
        key: format!("ignore_tags.{}", key),
        expected: "a list of strings",
    };

    let Value::List(items) = value else {
        return Err(invalid());
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

/// Normalize region string to AWS format (hyphens)
/// - "aws.Region.ap_northeast_1" -> "ap-northeast-1"
/// - "ap_northeast_1" -> "ap-northeast-1"
/// - "ap-northeast-1" -> "ap-northeast-1"
pub fn normalize_region(s: &str) -> String {
    let region_part = if s.contains('.') {
        s.split('.').next_back().unwrap_or(s)
    } else {
        s
    };
    region_part.replace('_', "-")
}
