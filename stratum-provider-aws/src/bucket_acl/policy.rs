//! Access control policy model and its mapping to DSL values
//!
//! `expand_*` turns the declared `access_control_policy` attribute into the
//! request model, `flatten_*` turns an API response back into DSL values.
//! Empty strings and absent fields are skipped in both directions.

use std::collections::HashMap;

use stratum_core::resource::Value;

/// Bucket owner as reported or declared in an ACL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

/// Recipient of a grant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grantee {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub id: Option<String>,
    /// CanonicalUser, AmazonCustomerByEmail or Group
    pub grantee_type: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    pub grantee: Option<Grantee>,
    pub permission: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControlPolicy {
    pub owner: Option<Owner>,
    pub grants: Vec<Grant>,
}

fn string_field(map: &HashMap<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts a single map, or a list whose first element is a map
fn single_block(value: &Value) -> Option<&HashMap<String, Value>> {
    match value {
        Value::Map(map) => Some(map),
        Value::List(items) => items.first().and_then(Value::as_map),
        _ => None,
    }
}

pub fn expand_access_control_policy(value: &Value) -> Option<AccessControlPolicy> {
    let map = single_block(value)?;

    let grants = map
        .get("grant")
        .and_then(Value::as_list)
        .map(expand_grants)
        .unwrap_or_default();

    let owner = map.get("owner").and_then(expand_owner);

    Some(AccessControlPolicy { owner, grants })
}

fn expand_grants(items: &[Value]) -> Vec<Grant> {
    items
        .iter()
        .filter_map(Value::as_map)
        .map(|map| Grant {
            grantee: map.get("grantee").and_then(expand_grantee),
            permission: string_field(map, "permission"),
        })
        .collect()
}

fn expand_grantee(value: &Value) -> Option<Grantee> {
    let map = single_block(value)?;
    // display_name is computed by the service and never sent
    Some(Grantee {
        display_name: None,
        email_address: string_field(map, "email_address"),
        id: string_field(map, "id"),
        grantee_type: string_field(map, "type"),
        uri: string_field(map, "uri"),
    })
}

fn expand_owner(value: &Value) -> Option<Owner> {
    let map = single_block(value)?;
    Some(Owner {
        id: string_field(map, "id"),
        display_name: string_field(map, "display_name"),
    })
}

fn insert_opt(map: &mut HashMap<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        map.insert(key.to_string(), Value::String(v.clone()));
    }
}

pub fn flatten_access_control_policy(policy: &AccessControlPolicy) -> Value {
    let mut map = HashMap::new();

    if !policy.grants.is_empty() {
        map.insert(
            "grant".to_string(),
            Value::List(policy.grants.iter().map(flatten_grant).collect()),
        );
    }

    if let Some(owner) = &policy.owner {
        map.insert("owner".to_string(), flatten_owner(owner));
    }

    Value::Map(map)
}

fn flatten_grant(grant: &Grant) -> Value {
    let mut map = HashMap::new();
    if let Some(grantee) = &grant.grantee {
        map.insert("grantee".to_string(), flatten_grantee(grantee));
    }
    insert_opt(&mut map, "permission", &grant.permission);
    Value::Map(map)
}

fn flatten_grantee(grantee: &Grantee) -> Value {
    let mut map = HashMap::new();
    insert_opt(&mut map, "display_name", &grantee.display_name);
    insert_opt(&mut map, "email_address", &grantee.email_address);
    insert_opt(&mut map, "id", &grantee.id);
    insert_opt(&mut map, "type", &grantee.grantee_type);
    insert_opt(&mut map, "uri", &grantee.uri);
    Value::Map(map)
}

fn flatten_owner(owner: &Owner) -> Value {
    let mut map = HashMap::new();
    insert_opt(&mut map, "display_name", &owner.display_name);
    insert_opt(&mut map, "id", &owner.id);
    Value::Map(map)
}
