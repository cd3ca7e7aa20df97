//! Bucket ACL resource identifier
//!
//! The identifier packs the bucket name, an optional expected bucket owner and
//! an optional canned ACL into one string:
//!
//! - `BUCKET`
//! - `BUCKET,EXPECTED_BUCKET_OWNER`
//! - `BUCKET/ACL`
//! - `BUCKET,EXPECTED_BUCKET_OWNER/ACL`
//!
//! Field values containing `,` or `/` do not round-trip.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Separates the bucket (or bucket and owner) from the canned ACL
pub const BUCKET_ACL_SEPARATOR: char = '/';

/// Separates the bucket from the expected bucket owner
pub const BUCKET_AND_EXPECTED_BUCKET_OWNER_SEPARATOR: char = ',';

/// Errors produced while parsing a bucket ACL identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
    #[error(
        "unexpected format for ID ({id}), expected BUCKET or BUCKET{q}EXPECTED_BUCKET_OWNER or BUCKET{a}ACL or BUCKET{q}EXPECTED_BUCKET_OWNER{a}ACL",
        q = BUCKET_AND_EXPECTED_BUCKET_OWNER_SEPARATOR,
        a = BUCKET_ACL_SEPARATOR
    )]
    MalformedIdentifier { id: String },
}

/// Decoded bucket ACL identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketAclId {
    pub bucket: String,
    pub expected_bucket_owner: Option<String>,
    pub acl: Option<String>,
}

impl BucketAclId {
    /// Empty owner or ACL strings are treated as absent.
    pub fn new(
        bucket: impl Into<String>,
        expected_bucket_owner: impl Into<String>,
        acl: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            expected_bucket_owner: non_empty(expected_bucket_owner.into()),
            acl: non_empty(acl.into()),
        }
    }

    /// Same identifier with a different canned ACL
    pub fn with_acl(mut self, acl: impl Into<String>) -> Self {
        self.acl = non_empty(acl.into());
        self
    }

    pub fn expected_bucket_owner(&self) -> Option<&str> {
        self.expected_bucket_owner.as_deref()
    }

    pub fn acl(&self) -> Option<&str> {
        self.acl.as_deref()
    }

    /// Parse an identifier string
    pub fn parse(id: &str) -> Result<Self, ResourceIdError> {
        let malformed = || ResourceIdError::MalformedIdentifier { id: id.to_string() };

        let parts: Vec<&str> = id
            .split(BUCKET_AND_EXPECTED_BUCKET_OWNER_SEPARATOR)
            .collect();

        match parts.as_slice() {
            [bucket] if !bucket.is_empty() => {
                let with_acl: Vec<&str> = bucket.split(BUCKET_ACL_SEPARATOR).collect();
                match with_acl.as_slice() {
                    [bucket] => Ok(Self::new(*bucket, "", "")),
                    [bucket, acl] if !bucket.is_empty() && !acl.is_empty() => {
                        Ok(Self::new(*bucket, "", *acl))
                    }
                    _ => Err(malformed()),
                }
            }
            [bucket, rest] if !bucket.is_empty() && !rest.is_empty() => {
                let with_acl: Vec<&str> = rest.split(BUCKET_ACL_SEPARATOR).collect();
                match with_acl.as_slice() {
                    [owner] => Ok(Self::new(*bucket, *owner, "")),
                    [owner, acl] if !owner.is_empty() && !acl.is_empty() => {
                        Ok(Self::new(*bucket, *owner, *acl))
                    }
                    _ => Err(malformed()),
                }
            }
            _ => Err(malformed()),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

impl fmt::Display for BucketAclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bucket)?;
        if let Some(owner) = &self.expected_bucket_owner {
            write!(f, "{}{}", BUCKET_AND_EXPECTED_BUCKET_OWNER_SEPARATOR, owner)?;
        }
        if let Some(acl) = &self.acl {
            write!(f, "{}{}", BUCKET_ACL_SEPARATOR, acl)?;
        }
        Ok(())
    }
}

impl FromStr for BucketAclId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Build the identifier string; empty owner or ACL mean "absent"
pub fn create_resource_id(bucket: &str, expected_bucket_owner: &str, acl: &str) -> String {
    BucketAclId::new(bucket, expected_bucket_owner, acl).to_string()
}

/// Parse an identifier into `(bucket, expected_bucket_owner, acl)`,
/// using empty strings for absent fields
pub fn parse_resource_id(id: &str) -> Result<(String, String, String), ResourceIdError> {
    let parsed = BucketAclId::parse(id)?;
    Ok((
        parsed.bucket,
        parsed.expected_bucket_owner.unwrap_or_default(),
        parsed.acl.unwrap_or_default(),
    ))
}
