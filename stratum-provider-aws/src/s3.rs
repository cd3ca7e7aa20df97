//! S3 bucket ACL API
//!
//! The handlers talk to S3 through `BucketAclApi` so they only see the
//! plain request/response model from `bucket_acl::policy`.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types;
use thiserror::Error;

use crate::bucket_acl::policy::{AccessControlPolicy, Grant, Grantee, Owner};

/// Error code S3 returns for a bucket that does not exist (yet)
pub const NO_SUCH_BUCKET: &str = "NoSuchBucket";

/// Errors returned by the S3 API
#[derive(Debug, Error)]
pub enum S3Error {
    /// The bucket does not exist or is not visible yet
    #[error("NoSuchBucket: {0}")]
    NoSuchBucket(String),

    /// Any other service error
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The request could not be built from the given input
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport, timeout or other SDK failure
    #[error("{0}")]
    Sdk(String),
}

impl S3Error {
    pub fn is_no_such_bucket(&self) -> bool {
        matches!(self, S3Error::NoSuchBucket(_))
    }

    fn from_sdk<E, R>(err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        if let Some(service_err) = err.as_service_error() {
            let message = service_err.message().unwrap_or_default().to_string();
            match service_err.code() {
                Some(NO_SUCH_BUCKET) => return S3Error::NoSuchBucket(message),
                Some(code) => {
                    return S3Error::Service {
                        code: code.to_string(),
                        message,
                    };
                }
                None => {}
            }
        }
        S3Error::Sdk(DisplayErrorContext(&err).to_string())
    }
}

/// PutBucketAcl request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutBucketAclInput {
    pub bucket: String,
    /// Canned ACL (e.g., "private")
    pub acl: Option<String>,
    pub expected_bucket_owner: Option<String>,
    pub access_control_policy: Option<AccessControlPolicy>,
}

impl PutBucketAclInput {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }
}

/// Bucket ACL operations used by the resource handlers
#[async_trait]
pub trait BucketAclApi: Send + Sync {
    async fn put_bucket_acl(&self, input: &PutBucketAclInput) -> Result<(), S3Error>;

    async fn get_bucket_acl(
        &self,
        bucket: &str,
        expected_bucket_owner: Option<&str>,
    ) -> Result<AccessControlPolicy, S3Error>;
}

#[async_trait]
impl BucketAclApi for S3Client {
    async fn put_bucket_acl(&self, input: &PutBucketAclInput) -> Result<(), S3Error> {
        let policy = input
            .access_control_policy
            .as_ref()
            .map(to_sdk_policy)
            .transpose()?;

        self.put_bucket_acl()
            .bucket(&input.bucket)
            .set_acl(input.acl.as_deref().map(types::BucketCannedAcl::from))
            .set_expected_bucket_owner(input.expected_bucket_owner.clone())
            .set_access_control_policy(policy)
            .send()
            .await
            .map_err(S3Error::from_sdk)?;

        Ok(())
    }

    async fn get_bucket_acl(
        &self,
        bucket: &str,
        expected_bucket_owner: Option<&str>,
    ) -> Result<AccessControlPolicy, S3Error> {
        let output = self
            .get_bucket_acl()
            .bucket(bucket)
            .set_expected_bucket_owner(expected_bucket_owner.map(str::to_string))
            .send()
            .await
            .map_err(S3Error::from_sdk)?;

        Ok(AccessControlPolicy {
            owner: output.owner().map(from_sdk_owner),
            grants: output.grants().iter().map(from_sdk_grant).collect(),
        })
    }
}

fn to_sdk_policy(policy: &AccessControlPolicy) -> Result<types::AccessControlPolicy, S3Error> {
    let mut grants = Vec::with_capacity(policy.grants.len());
    for grant in &policy.grants {
        let grantee = grant.grantee.as_ref().map(to_sdk_grantee).transpose()?;
        grants.push(
            types::Grant::builder()
                .set_grantee(grantee)
                .set_permission(grant.permission.as_deref().map(types::Permission::from))
                .build(),
        );
    }

    let owner = policy.owner.as_ref().map(|owner| {
        types::Owner::builder()
            .set_id(owner.id.clone())
            .set_display_name(owner.display_name.clone())
            .build()
    });

    Ok(types::AccessControlPolicy::builder()
        .set_grants(Some(grants))
        .set_owner(owner)
        .build())
}

fn to_sdk_grantee(grantee: &Grantee) -> Result<types::Grantee, S3Error> {
    types::Grantee::builder()
        .set_type(grantee.grantee_type.as_deref().map(types::Type::from))
        .set_id(grantee.id.clone())
        .set_email_address(grantee.email_address.clone())
        .set_uri(grantee.uri.clone())
        .build()
        .map_err(|e| S3Error::InvalidRequest(e.to_string()))
}

fn from_sdk_owner(owner: &types::Owner) -> Owner {
    Owner {
        id: owner.id().map(str::to_string),
        display_name: owner.display_name().map(str::to_string),
    }
}

fn from_sdk_grant(grant: &types::Grant) -> Grant {
    Grant {
        grantee: grant.grantee().map(|g| Grantee {
            display_name: g.display_name().map(str::to_string),
            email_address: g.email_address().map(str::to_string),
            id: g.id().map(str::to_string),
            grantee_type: Some(g.r#type().as_str().to_string()),
            uri: g.uri().map(str::to_string),
        }),
        permission: grant.permission().map(|p| p.as_str().to_string()),
    }
}
