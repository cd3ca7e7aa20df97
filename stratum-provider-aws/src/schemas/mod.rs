//! AWS resource schema definitions

pub mod default_tags;
pub mod s3;
pub mod types;

use stratum_core::schema::ResourceSchema;

/// Returns all AWS schemas
pub fn all_schemas() -> Vec<ResourceSchema> {
    let mut schemas = Vec::new();
    schemas.extend(s3::schemas());
    schemas.extend(default_tags::schemas());
    schemas
}

/// Find the schema for a resource type
pub fn find_schema(resource_type: &str) -> Option<ResourceSchema> {
    all_schemas()
        .into_iter()
        .find(|s| s.resource_type == resource_type)
}
