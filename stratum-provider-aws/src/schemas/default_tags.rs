//! Default tags data source schema

use stratum_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the schema for the default tags data source
pub fn default_tags_schema() -> ResourceSchema {
    ResourceSchema::new("default_tags")
        .with_description("Tags configured on the provider for every resource")
        .attribute(
            AttributeSchema::new("tags", AttributeType::Map(Box::new(AttributeType::String)))
                .computed()
                .with_description("Default tags, without AWS-reserved and ignored keys"),
        )
}

pub fn schemas() -> Vec<ResourceSchema> {
    vec![default_tags_schema()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stratum_core::resource::Value;

    #[test]
    fn tags_must_be_strings() {
        let schema = default_tags_schema();
        let mut tags = HashMap::new();
        tags.insert("Environment".to_string(), Value::String("prod".to_string()));
        let mut attrs = HashMap::new();
        attrs.insert("tags".to_string(), Value::Map(tags.clone()));
        assert!(schema.validate(&attrs).is_ok());

        tags.insert("Replicas".to_string(), Value::Int(3));
        attrs.insert("tags".to_string(), Value::Map(tags));
        assert!(schema.validate(&attrs).is_err());
    }
}
