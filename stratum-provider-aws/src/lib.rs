//! Stratum AWS Provider
//!
//! AWS Provider implementation

pub mod bucket_acl;
pub mod config;
pub mod default_tags;
pub mod retry;
pub mod s3;
pub mod schemas;
pub mod tags;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use aws_config::Region;
use aws_sdk_s3::Client as S3Client;
use stratum_core::provider::{BoxFuture, Provider, ProviderError, ProviderResult, ResourceType};
use stratum_core::resource::{Resource, ResourceId, State};
use stratum_core::schema::ResourceSchema;

use crate::config::ProviderConfig;
use crate::retry::RetryPolicy;
use crate::s3::BucketAclApi;

/// S3 Bucket ACL resource type
pub struct BucketAclType;

impl ResourceType for BucketAclType {
    fn name(&self) -> &'static str {
        bucket_acl::RESOURCE_TYPE
    }

    fn schema(&self) -> ResourceSchema {
        schemas::s3::bucket_acl_schema()
    }
}

/// Default tags data source
pub struct DefaultTagsType;

impl ResourceType for DefaultTagsType {
    fn name(&self) -> &'static str {
        default_tags::RESOURCE_TYPE
    }

    fn schema(&self) -> ResourceSchema {
        schemas::default_tags::default_tags_schema()
    }

    fn is_data_source(&self) -> bool {
        true
    }
}

/// AWS Provider
pub struct AwsProvider {
    s3: Arc<dyn BucketAclApi>,
    config: ProviderConfig,
    retry: RetryPolicy,
}

impl AwsProvider {
    /// Create a new AWS Provider
    pub async fn new(config: ProviderConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self::with_client(config, Arc::new(S3Client::new(&sdk_config)))
    }

    /// Create with a specific S3 client (for testing)
    pub fn with_client(config: ProviderConfig, s3: Arc<dyn BucketAclApi>) -> Self {
        Self {
            s3,
            config,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn unknown_resource_type(id: &ResourceId) -> ProviderError {
    ProviderError::new(format!("Unknown resource type: {}", id.resource_type))
        .for_resource(id.clone())
}

fn read_only(id: &ResourceId) -> ProviderError {
    ProviderError::new(format!("{} is a read-only data source", id.resource_type))
        .for_resource(id.clone())
}

impl Provider for AwsProvider {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        vec![Box::new(BucketAclType), Box::new(DefaultTagsType)]
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(String::from);
        Box::pin(async move {
            match id.resource_type.as_str() {
                bucket_acl::RESOURCE_TYPE => match identifier {
                    Some(identifier) => self.read_bucket_acl(id, &identifier, false).await,
                    // Never created or imported
                    None => Ok(State::not_found(id)),
                },
                default_tags::RESOURCE_TYPE => self.read_default_tags(id).await,
                _ => Err(unknown_resource_type(&id)),
            }
        })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move {
            match resource.id.resource_type.as_str() {
                bucket_acl::RESOURCE_TYPE => self.create_bucket_acl(resource).await,
                default_tags::RESOURCE_TYPE => Err(read_only(&resource.id)),
                _ => Err(unknown_resource_type(&resource.id)),
            }
        })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move {
            match id.resource_type.as_str() {
                bucket_acl::RESOURCE_TYPE => {
                    self.update_bucket_acl(id, &identifier, from, to).await
                }
                default_tags::RESOURCE_TYPE => Err(read_only(&id)),
                _ => Err(unknown_resource_type(&id)),
            }
        })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move {
            match id.resource_type.as_str() {
                bucket_acl::RESOURCE_TYPE => {
                    // S3 has no DeleteBucketAcl; the bucket keeps its last ACL
                    log::debug!("S3 bucket ACL ({}) removed from state only", identifier);
                    Ok(())
                }
                default_tags::RESOURCE_TYPE => Err(read_only(&id)),
                _ => Err(unknown_resource_type(&id)),
            }
        })
    }
}

/// Convert DSL enum value (provider.TypeName.value_name) to AWS SDK format (value-name)
/// Handles patterns like:
/// - aws.Region.ap_northeast_1 -> ap-northeast-1
/// - aws.BucketCannedAcl.public_read -> public-read
/// - Region.ap_northeast_1 -> ap-northeast-1
pub(crate) fn convert_enum_value(value: &str) -> String {
    let parts: Vec<&str> = value.split('.').collect();

    let raw_value = match parts.as_slice() {
        // TypeName.value pattern
        [type_name, raw] if type_name.chars().next().is_some_and(|c| c.is_uppercase()) => raw,
        // provider.TypeName.value pattern
        [provider, type_name, raw]
            if provider.chars().all(|c| c.is_lowercase())
                && type_name.chars().next().is_some_and(|c| c.is_uppercase()) =>
        {
            raw
        }
        _ => return value.to_string(),
    };

    raw_value.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use stratum_core::resource::Value;

    use crate::testing::InMemoryS3;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn provider(s3: Arc<InMemoryS3>) -> AwsProvider {
        AwsProvider::with_client(ProviderConfig::new("ap-northeast-1"), s3).with_retry_policy(
            RetryPolicy::new(Duration::from_millis(20), Duration::from_millis(1)),
        )
    }

    #[test]
    fn test_convert_enum_value() {
        // Region
        assert_eq!(
            convert_enum_value("aws.Region.ap_northeast_1"),
            "ap-northeast-1"
        );
        assert_eq!(convert_enum_value("aws.Region.us_east_1"), "us-east-1");
        // Canned ACL
        assert_eq!(
            convert_enum_value("aws.BucketCannedAcl.bucket_owner_full_control"),
            "bucket-owner-full-control"
        );
        // TypeName.value pattern
        assert_eq!(
            convert_enum_value("Region.ap_northeast_1"),
            "ap-northeast-1"
        );
        // Already in AWS format (no conversion needed)
        assert_eq!(convert_enum_value("eu-west-1"), "eu-west-1");
        assert_eq!(convert_enum_value("public-read"), "public-read");
        assert_eq!(convert_enum_value("my.bucket"), "my.bucket");
    }

    #[test]
    fn test_resource_types() {
        let provider = provider(Arc::new(InMemoryS3::default()));
        let types = provider.resource_types();
        let names: Vec<_> = types.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["s3.bucket_acl", "default_tags"]);
        assert!(!types[0].is_data_source());
        assert!(types[1].is_data_source());
        assert_eq!(types[0].schema().resource_type, "s3.bucket_acl");
    }

    #[tokio::test]
    async fn create_and_read_through_provider() {
        let s3 = Arc::new(InMemoryS3::default().with_bucket("logs"));
        let provider = provider(s3);
        let resource = Resource::new("s3.bucket_acl", "logs")
            .with_attribute("bucket", s("logs"))
            .with_attribute("acl", s("aws.BucketCannedAcl.log_delivery_write"));

        let created = provider.create(&resource).await.unwrap();
        assert_eq!(created.identifier.as_deref(), Some("logs/log-delivery-write"));

        let read = provider
            .read(&resource.id, created.identifier.as_deref())
            .await
            .unwrap();
        assert_eq!(read, created);
    }

    #[tokio::test]
    async fn import_reads_existing_acl() {
        let s3 = Arc::new(InMemoryS3::default().with_bucket("my-bucket"));
        let provider = provider(s3);
        let id = ResourceId::new("s3.bucket_acl", "imported");

        let state = provider
            .read(&id, Some("my-bucket,123456789012"))
            .await
            .unwrap();

        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("my-bucket,123456789012"));
        assert_eq!(state.attributes["expected_bucket_owner"], s("123456789012"));
        assert!(state.attributes.contains_key("access_control_policy"));
    }

    #[tokio::test]
    async fn read_without_identifier_is_not_found() {
        let provider = provider(Arc::new(InMemoryS3::default()));
        let id = ResourceId::new("s3.bucket_acl", "main");
        let state = provider.read(&id, None).await.unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn delete_leaves_bucket_untouched() {
        let s3 = Arc::new(InMemoryS3::default().with_bucket("my-bucket"));
        let provider = provider(s3.clone());
        let id = ResourceId::new("s3.bucket_acl", "main");

        provider.delete(&id, "my-bucket/private").await.unwrap();

        assert!(s3.puts().is_empty());
        let state = provider.read(&id, Some("my-bucket")).await.unwrap();
        assert!(state.exists);
    }

    #[tokio::test]
    async fn default_tags_is_read_only() {
        let provider = provider(Arc::new(InMemoryS3::default()));
        let resource = Resource::new("default_tags", "current").with_read_only(true);

        let state = provider.read(&resource.id, None).await.unwrap();
        assert_eq!(state.identifier.as_deref(), Some("aws"));

        let err = provider.create(&resource).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "[default_tags.current] default_tags is a read-only data source"
        );
        assert!(provider.delete(&resource.id, "aws").await.is_err());
    }

    #[tokio::test]
    async fn unknown_resource_type_is_rejected() {
        let provider = provider(Arc::new(InMemoryS3::default()));
        let resource = Resource::new("s3.bucket", "main");

        let err = provider.create(&resource).await.unwrap_err();
        assert_eq!(err.message, "Unknown resource type: s3.bucket");
        assert!(provider.read(&resource.id, Some("main")).await.is_err());
        let from = State::not_found(resource.id.clone());
        assert!(
            provider
                .update(&resource.id, "main", &from, &resource)
                .await
                .is_err()
        );
    }
}
