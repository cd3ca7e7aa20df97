//! S3 bucket ACL schema definition

use stratum_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::types;

fn grantee_schema() -> AttributeType {
    AttributeType::Struct {
        name: "Grantee".to_string(),
        fields: vec![
            AttributeSchema::new("email_address", AttributeType::String)
                .with_description("Email address of an AmazonCustomerByEmail grantee"),
            AttributeSchema::new("display_name", AttributeType::String).computed(),
            AttributeSchema::new("id", AttributeType::String)
                .with_description("Canonical user ID of a CanonicalUser grantee"),
            AttributeSchema::new("type", types::grantee_type()).required(),
            AttributeSchema::new("uri", AttributeType::String)
                .with_description("URI of a Group grantee"),
        ],
    }
}

fn grant_schema() -> AttributeType {
    AttributeType::Struct {
        name: "Grant".to_string(),
        fields: vec![
            AttributeSchema::new("grantee", grantee_schema()),
            AttributeSchema::new("permission", types::permission()).required(),
        ],
    }
}

fn owner_schema() -> AttributeType {
    AttributeType::Struct {
        name: "Owner".to_string(),
        fields: vec![
            AttributeSchema::new("display_name", AttributeType::String).computed(),
            AttributeSchema::new("id", AttributeType::String).required(),
        ],
    }
}

fn access_control_policy_schema() -> AttributeType {
    AttributeType::Struct {
        name: "AccessControlPolicy".to_string(),
        fields: vec![
            AttributeSchema::new("grant", AttributeType::List(Box::new(grant_schema()))),
            AttributeSchema::new("owner", owner_schema()).required(),
        ],
    }
}

/// Returns the schema for S3 bucket ACLs
pub fn bucket_acl_schema() -> ResourceSchema {
    ResourceSchema::new("s3.bucket_acl")
        .with_description("The access control list of an existing S3 bucket")
        .attribute(
            AttributeSchema::new("bucket", types::bucket_name())
                .required()
                .force_new()
                .with_description("Name of the bucket"),
        )
        .attribute(
            AttributeSchema::new("expected_bucket_owner", types::account_id())
                .force_new()
                .with_description("Account ID of the expected bucket owner"),
        )
        .attribute(
            AttributeSchema::new("acl", types::bucket_canned_acl())
                .conflicts_with("access_control_policy")
                .with_description("The canned ACL to apply to the bucket"),
        )
        .attribute(
            AttributeSchema::new("access_control_policy", access_control_policy_schema())
                .computed()
                .conflicts_with("acl")
                .with_description("Explicit grants and owner of the bucket ACL"),
        )
}

/// Returns all S3-related schemas
pub fn schemas() -> Vec<ResourceSchema> {
    vec![bucket_acl_schema()]
}
