//! In-memory S3 used by the provider tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::bucket_acl::policy::{AccessControlPolicy, Grant, Grantee, Owner};
use crate::s3::{BucketAclApi, PutBucketAclInput, S3Error};

pub const OWNER_ID: &str = "canonical-owner-id";
pub const ALL_USERS: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

#[derive(Default)]
pub struct InMemoryS3 {
    buckets: Mutex<HashMap<String, AccessControlPolicy>>,
    puts: Mutex<Vec<PutBucketAclInput>>,
    put_failures: Mutex<VecDeque<S3Error>>,
    get_failures: Mutex<VecDeque<S3Error>>,
}

impl InMemoryS3 {
    pub fn with_bucket(self, bucket: &str) -> Self {
        self.buckets
            .lock()
            .unwrap()
            .insert(bucket.to_string(), canned_policy("private"));
        self
    }

    /// Queue errors returned by the next PutBucketAcl calls
    pub fn fail_puts(self, errors: Vec<S3Error>) -> Self {
        self.put_failures.lock().unwrap().extend(errors);
        self
    }

    /// Queue errors returned by the next GetBucketAcl calls
    pub fn fail_gets(self, errors: Vec<S3Error>) -> Self {
        self.get_failures.lock().unwrap().extend(errors);
        self
    }

    pub fn remove_bucket(&self, bucket: &str) {
        self.buckets.lock().unwrap().remove(bucket);
    }

    pub fn puts(&self) -> Vec<PutBucketAclInput> {
        self.puts.lock().unwrap().clone()
    }
}

/// Policy S3 reports after applying a canned ACL
pub fn canned_policy(acl: &str) -> AccessControlPolicy {
    let owner_grant = Grant {
        grantee: Some(Grantee {
            id: Some(OWNER_ID.to_string()),
            grantee_type: Some("CanonicalUser".to_string()),
            ..Default::default()
        }),
        permission: Some("FULL_CONTROL".to_string()),
    };

    let mut grants = vec![owner_grant];
    if acl == "public-read" {
        grants.push(Grant {
            grantee: Some(Grantee {
                grantee_type: Some("Group".to_string()),
                uri: Some(ALL_USERS.to_string()),
                ..Default::default()
            }),
            permission: Some("READ".to_string()),
        });
    }

    AccessControlPolicy {
        owner: Some(Owner {
            id: Some(OWNER_ID.to_string()),
            display_name: None,
        }),
        grants,
    }
}

fn no_such_bucket(bucket: &str) -> S3Error {
    S3Error::NoSuchBucket(format!("The specified bucket does not exist: {}", bucket))
}

#[async_trait]
impl BucketAclApi for InMemoryS3 {
    async fn put_bucket_acl(&self, input: &PutBucketAclInput) -> Result<(), S3Error> {
        if let Some(err) = self.put_failures.lock().unwrap().pop_front() {
            return Err(err);
        }

        let mut buckets = self.buckets.lock().unwrap();
        let current = buckets
            .get_mut(&input.bucket)
            .ok_or_else(|| no_such_bucket(&input.bucket))?;

        if let Some(policy) = &input.access_control_policy {
            *current = policy.clone();
        } else if let Some(acl) = &input.acl {
            *current = canned_policy(acl);
        }

        self.puts.lock().unwrap().push(input.clone());
        Ok(())
    }

    async fn get_bucket_acl(
        &self,
        bucket: &str,
        _expected_bucket_owner: Option<&str>,
    ) -> Result<AccessControlPolicy, S3Error> {
        if let Some(err) = self.get_failures.lock().unwrap().pop_front() {
            return Err(err);
        }

        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .cloned()
            .ok_or_else(|| no_such_bucket(bucket))
    }
}
