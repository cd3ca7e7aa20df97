//! Default tags data source (`default_tags`)

use std::collections::HashMap;

use stratum_core::provider::ProviderResult;
use stratum_core::resource::{ResourceId, State};

use crate::AwsProvider;
use crate::tags::KeyValueTags;

pub const RESOURCE_TYPE: &str = "default_tags";

impl AwsProvider {
    /// Default tags as the provider would apply them
    pub(crate) async fn read_default_tags(&self, id: ResourceId) -> ProviderResult<State> {
        let tags = self
            .config
            .default_tags
            .as_ref()
            .map(|d| KeyValueTags::new(d.tags.clone()))
            .unwrap_or_default()
            .ignore_aws()
            .ignore_config(self.config.ignore_tags.as_ref());

        log::debug!("default tags: {} after filtering", tags.len());

        let mut attributes = HashMap::new();
        attributes.insert("tags".to_string(), tags.to_value());

        Ok(State::existing(id, attributes).with_identifier(self.config.partition()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use stratum_core::resource::Value;

    use crate::config::{IgnoreTagsConfig, ProviderConfig};
    use crate::testing::InMemoryS3;

    fn provider(config: ProviderConfig) -> AwsProvider {
        AwsProvider::with_client(config, Arc::new(InMemoryS3::default()))
    }

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn empty_when_not_configured() {
        let provider = provider(ProviderConfig::new("us-east-1"));
        let id = ResourceId::new(RESOURCE_TYPE, "current");

        let state = provider.read_default_tags(id).await.unwrap();

        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("aws"));
        assert_eq!(state.attributes["tags"], Value::Map(HashMap::new()));
    }

    #[tokio::test]
    async fn filters_reserved_and_ignored_keys() {
        let config = ProviderConfig::new("cn-north-1")
            .with_default_tags(tags(&[
                ("Environment", "prod"),
                ("aws:createdBy", "someone"),
                ("Owner", "team-a"),
                ("kubernetes.io/cluster/main", "owned"),
            ]))
            .with_ignore_tags(IgnoreTagsConfig {
                keys: vec!["Owner".to_string()],
                key_prefixes: vec!["kubernetes.io/".to_string()],
            });
        let provider = provider(config);
        let id = ResourceId::new(RESOURCE_TYPE, "current");

        let state = provider.read_default_tags(id).await.unwrap();

        assert_eq!(state.identifier.as_deref(), Some("aws-cn"));
        let map = state.attributes["tags"].as_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["Environment"], Value::String("prod".to_string()));
    }
}
