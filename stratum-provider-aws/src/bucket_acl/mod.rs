//! S3 bucket ACL resource (`s3.bucket_acl`)
//!
//! The resource is identified by a [`BucketAclId`] string. Deleting it only
//! stops tracking; the bucket keeps whatever ACL it last had.

pub mod id;
pub mod policy;

use std::collections::HashMap;

use stratum_core::provider::{ProviderError, ProviderResult};
use stratum_core::resource::{Resource, ResourceId, State, Value};

use crate::retry::retry_while;
use crate::s3::{PutBucketAclInput, S3Error};
use crate::{AwsProvider, convert_enum_value};

pub use id::{BucketAclId, ResourceIdError, create_resource_id, parse_resource_id};
use policy::{expand_access_control_policy, flatten_access_control_policy};

pub const RESOURCE_TYPE: &str = "s3.bucket_acl";

fn parse_identifier(id: &ResourceId, identifier: &str) -> ProviderResult<BucketAclId> {
    BucketAclId::parse(identifier).map_err(|e| ProviderError::from_cause(e).for_resource(id.clone()))
}

impl AwsProvider {
    /// Read a bucket ACL
    ///
    /// A bucket that vanished is reported as not found, except right after
    /// creation where S3 may still be catching up.
    pub(crate) async fn read_bucket_acl(
        &self,
        id: ResourceId,
        identifier: &str,
        is_new: bool,
    ) -> ProviderResult<State> {
        let acl_id = parse_identifier(&id, identifier)?;

        let policy = match self
            .s3
            .get_bucket_acl(&acl_id.bucket, acl_id.expected_bucket_owner())
            .await
        {
            Ok(policy) => policy,
            Err(err) if !is_new && err.is_no_such_bucket() => {
                log::warn!(
                    "S3 Bucket ACL ({}) not found, removing from state",
                    identifier
                );
                return Ok(State::not_found(id));
            }
            Err(err) => {
                return Err(ProviderError::new(format!(
                    "error getting S3 bucket ACL ({}): {}",
                    identifier, err
                ))
                .with_cause(err)
                .for_resource(id));
            }
        };

        let mut attributes = HashMap::new();
        attributes.insert("bucket".to_string(), Value::String(acl_id.bucket.clone()));
        if let Some(owner) = acl_id.expected_bucket_owner() {
            attributes.insert(
                "expected_bucket_owner".to_string(),
                Value::String(owner.to_string()),
            );
        }
        if let Some(acl) = acl_id.acl() {
            attributes.insert("acl".to_string(), Value::String(acl.to_string()));
        }
        attributes.insert(
            "access_control_policy".to_string(),
            flatten_access_control_policy(&policy),
        );

        Ok(State::existing(id, attributes).with_identifier(identifier))
    }

    /// Apply the declared ACL to an existing bucket
    pub(crate) async fn create_bucket_acl(&self, resource: Resource) -> ProviderResult<State> {
        let bucket = resource
            .get_string("bucket")
            .ok_or_else(|| {
                ProviderError::new("Bucket name is required").for_resource(resource.id.clone())
            })?
            .to_string();
        let expected_bucket_owner = resource.get_string("expected_bucket_owner").map(String::from);
        let acl = resource.get_string("acl").map(convert_enum_value);

        let input = PutBucketAclInput {
            bucket: bucket.clone(),
            acl: acl.clone(),
            expected_bucket_owner: expected_bucket_owner.clone(),
            access_control_policy: resource
                .attributes
                .get("access_control_policy")
                .and_then(expand_access_control_policy),
        };

        // A freshly created bucket may not be visible to the ACL API yet
        let s3 = &self.s3;
        let request = &input;
        retry_while(self.retry, S3Error::is_no_such_bucket, move || {
            s3.put_bucket_acl(request)
        })
        .await
        .map_err(|e| {
            ProviderError::new(format!("error creating S3 bucket ACL for {}: {}", bucket, e))
                .with_cause(e)
                .for_resource(resource.id.clone())
        })?;

        let identifier = BucketAclId {
            bucket,
            expected_bucket_owner,
            acl,
        }
        .to_string();
        log::debug!("created S3 bucket ACL ({})", identifier);

        self.read_bucket_acl(resource.id, &identifier, true).await
    }

    /// Update the ACL; a changed canned ACL is re-encoded into the identifier
    pub(crate) async fn update_bucket_acl(
        &self,
        id: ResourceId,
        identifier: &str,
        from: State,
        to: Resource,
    ) -> ProviderResult<State> {
        let mut acl_id = parse_identifier(&id, identifier)?;

        let mut input = PutBucketAclInput::new(acl_id.bucket.clone());
        input.expected_bucket_owner = acl_id.expected_bucket_owner.clone();

        // The policy is computed; only send it when the configuration declares it
        if to.attributes.contains_key("access_control_policy")
            && from.has_change(&to, "access_control_policy")
        {
            input.access_control_policy = to
                .attributes
                .get("access_control_policy")
                .and_then(expand_access_control_policy);
        }

        let acl_changed = from.has_change(&to, "acl");
        if acl_changed {
            let acl = to.get_string("acl").map(convert_enum_value);
            input.acl = acl.clone();
            acl_id = acl_id.with_acl(acl.unwrap_or_default());
        }

        if input.acl.is_none() && input.access_control_policy.is_none() {
            log::debug!("S3 bucket ACL ({}) has nothing to update", identifier);
        } else {
            self.s3.put_bucket_acl(&input).await.map_err(|e| {
                ProviderError::new(format!(
                    "error updating S3 bucket ACL ({}): {}",
                    identifier, e
                ))
                .with_cause(e)
                .for_resource(id.clone())
            })?;
        }

        let identifier = if acl_changed {
            acl_id.to_string()
        } else {
            identifier.to_string()
        };

        self.read_bucket_acl(id, &identifier, false).await
    }
}
