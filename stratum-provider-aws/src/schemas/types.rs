//! AWS-specific type definitions

use std::sync::LazyLock;

use regex::Regex;
use stratum_core::resource::Value;
use stratum_core::schema::AttributeType;

use crate::convert_enum_value;

/// Canned ACLs accepted by PutBucketAcl
pub const BUCKET_CANNED_ACLS: &[&str] = &[
    "private",
    "public-read",
    "public-read-write",
    "authenticated-read",
    "aws-exec-read",
    "bucket-owner-read",
    "bucket-owner-full-control",
    "log-delivery-write",
];

pub const GRANTEE_TYPES: &[&str] = &["CanonicalUser", "AmazonCustomerByEmail", "Group"];

pub const PERMISSIONS: &[&str] = &["FULL_CONTROL", "WRITE", "WRITE_ACP", "READ", "READ_ACP"];

static ACCOUNT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{12}$").expect("account id pattern is valid")
});

fn enum_of(values: &[&str]) -> AttributeType {
    AttributeType::Enum(values.iter().map(|v| v.to_string()).collect())
}

/// Canned bucket ACL (e.g., "private", "aws.BucketCannedAcl.bucket_owner_full_control")
pub fn bucket_canned_acl() -> AttributeType {
    AttributeType::Custom {
        name: "BucketCannedAcl".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            if let Value::String(s) = value {
                let normalized = convert_enum_value(s);
                if BUCKET_CANNED_ACLS.contains(&normalized.as_str()) {
                    Ok(())
                } else {
                    Err(format!(
                        "Invalid canned ACL '{}', expected one of: {} or DSL format like aws.BucketCannedAcl.public_read",
                        s,
                        BUCKET_CANNED_ACLS.join(", ")
                    ))
                }
            } else {
                Err("Expected string".to_string())
            }
        },
    }
}

/// Grantee type of an ACL grant
pub fn grantee_type() -> AttributeType {
    enum_of(GRANTEE_TYPES)
}

/// Permission of an ACL grant
pub fn permission() -> AttributeType {
    enum_of(PERMISSIONS)
}

/// Bucket name as accepted by the ACL APIs (1-63 characters)
pub fn bucket_name() -> AttributeType {
    AttributeType::Custom {
        name: "BucketName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            if let Value::String(s) = value {
                let len = s.chars().count();
                if (1..=63).contains(&len) {
                    Ok(())
                } else {
                    Err(format!(
                        "Invalid bucket name '{}': expected length between 1 and 63, got {}",
                        s, len
                    ))
                }
            } else {
                Err("Expected string".to_string())
            }
        },
    }
}

/// 12-digit AWS account ID
pub fn account_id() -> AttributeType {
    AttributeType::Custom {
        name: "AccountId".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            if let Value::String(s) = value {
                if ACCOUNT_ID.is_match(s) {
                    Ok(())
                } else {
                    Err(format!(
                        "Invalid account ID '{}': expected 12 digits",
                        s
                    ))
                }
            } else {
                Err("Expected string".to_string())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn canned_acl_accepts_all_values() {
        let acl = bucket_canned_acl();
        for value in BUCKET_CANNED_ACLS {
            assert!(acl.validate(&s(value)).is_ok(), "{} should be valid", value);
        }
    }

    #[test]
    fn canned_acl_accepts_dsl_form() {
        let acl = bucket_canned_acl();
        assert!(acl.validate(&s("aws.BucketCannedAcl.log_delivery_write")).is_ok());
        assert!(acl.validate(&s("BucketCannedAcl.public_read")).is_ok());
        assert!(acl.validate(&s("aws.BucketCannedAcl.everyone")).is_err());
    }

    #[test]
    fn canned_acl_rejects_unknown() {
        let acl = bucket_canned_acl();
        assert!(acl.validate(&s("public")).is_err());
        assert!(acl.validate(&s("PRIVATE")).is_err());
        assert!(acl.validate(&Value::Bool(true)).is_err());
    }

    #[test]
    fn permission_and_grantee_type() {
        assert!(permission().validate(&s("READ_ACP")).is_ok());
        assert!(permission().validate(&s("read")).is_err());
        assert!(grantee_type().validate(&s("Group")).is_ok());
        assert!(grantee_type().validate(&s("User")).is_err());
    }

    #[test]
    fn bucket_name_length() {
        let name = bucket_name();
        assert!(name.validate(&s("a")).is_ok());
        assert!(name.validate(&s(&"b".repeat(63))).is_ok());
        assert!(name.validate(&s("")).is_err());

        let err = name.validate(&s(&"b".repeat(64))).unwrap_err();
        assert!(err.to_string().contains("got 64"));
    }

    #[test]
    fn account_id_requires_twelve_digits() {
        let id = account_id();
        assert!(id.validate(&s("123456789012")).is_ok());
        assert!(id.validate(&s("12345678901")).is_err());
        assert!(id.validate(&s("1234567890123")).is_err());
        assert!(id.validate(&s("12345678901a")).is_err());
        assert!(id.validate(&Value::Int(123456789012)).is_err());
    }
}
