//! Provider configuration

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::convert_enum_value;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse provider config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tags applied to every taggable resource by default
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefaultTagsConfig {
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Tags the provider never reports or manages
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IgnoreTagsConfig {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub key_prefixes: Vec<String>,
}

impl IgnoreTagsConfig {
    pub fn ignores(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
            || self.key_prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

/// AWS provider settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    pub region: String,
    /// Overrides the partition derived from the region
    #[serde(default)]
    pub partition: Option<String>,
    #[serde(default)]
    pub default_tags: Option<DefaultTagsConfig>,
    #[serde(default)]
    pub ignore_tags: Option<IgnoreTagsConfig>,
}

impl ProviderConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            partition: None,
            default_tags: None,
            ignore_tags: None,
        }
    }

    pub fn with_default_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.default_tags = Some(DefaultTagsConfig { tags });
        self
    }

    pub fn with_ignore_tags(mut self, ignore: IgnoreTagsConfig) -> Self {
        self.ignore_tags = Some(ignore);
        self
    }

    /// Partition the region belongs to, unless explicitly configured
    pub fn partition(&self) -> &str {
        match &self.partition {
            Some(p) => p.as_str(),
            None => partition_for_region(&self.region),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: ProviderConfig = serde_json::from_str(json)?;
        config.region = convert_enum_value(&config.region);
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }
}

/// AWS partition for a region name
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else if region.starts_with("us-isob-") {
        "aws-iso-b"
    } else if region.starts_with("us-iso-") {
        "aws-iso"
    } else {
        "aws"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_from_region() {
        assert_eq!(partition_for_region("ap-northeast-1"), "aws");
        assert_eq!(partition_for_region("cn-north-1"), "aws-cn");
        assert_eq!(partition_for_region("us-gov-west-1"), "aws-us-gov");
        assert_eq!(partition_for_region("us-iso-east-1"), "aws-iso");
        assert_eq!(partition_for_region("us-isob-east-1"), "aws-iso-b");
    }

    #[test]
    fn explicit_partition_wins() {
        let mut config = ProviderConfig::new("us-east-1");
        assert_eq!(config.partition(), "aws");
        config.partition = Some("aws-test".to_string());
        assert_eq!(config.partition(), "aws-test");
    }

    #[test]
    fn parse_json_config() {
        let config = ProviderConfig::from_json_str(
            r#"{
                "region": "aws.Region.ap_northeast_1",
                "default_tags": { "tags": { "Environment": "prod" } },
                "ignore_tags": { "key_prefixes": ["kubernetes.io/"] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(
            config.default_tags.unwrap().tags.get("Environment").map(String::as_str),
            Some("prod")
        );
        let ignore = config.ignore_tags.unwrap();
        assert!(ignore.keys.is_empty());
        assert!(ignore.ignores("kubernetes.io/cluster/main"));
    }

    #[test]
    fn parse_json_requires_region() {
        let err = ProviderConfig::from_json_str("{}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
