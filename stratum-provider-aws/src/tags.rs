//! Key-value tag filtering

use std::collections::{BTreeMap, HashMap};

use stratum_core::resource::Value;

use crate::config::IgnoreTagsConfig;

/// Tag keys with this prefix are reserved by AWS
pub const AWS_TAG_KEY_PREFIX: &str = "aws:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueTags(BTreeMap<String, String>);

impl KeyValueTags {
    pub fn new(tags: BTreeMap<String, String>) -> Self {
        Self(tags)
    }

    /// Drop AWS-reserved tags
    pub fn ignore_aws(self) -> Self {
        Self(
            self.0
                .into_iter()
                .filter(|(k, _)| !k.starts_with(AWS_TAG_KEY_PREFIX))
                .collect(),
        )
    }

    /// Drop tags matched by the provider's ignore_tags settings
    pub fn ignore_config(self, config: Option<&IgnoreTagsConfig>) -> Self {
        let Some(config) = config else {
            return self;
        };
        Self(
            self.0
                .into_iter()
                .filter(|(k, _)| !config.ignores(k))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// DSL representation: a map of string values
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<HashMap<_, _>>(),
        )
    }
}

impl From<BTreeMap<String, String>> for KeyValueTags {
    fn from(tags: BTreeMap<String, String>) -> Self {
        Self::new(tags)
    }
}
