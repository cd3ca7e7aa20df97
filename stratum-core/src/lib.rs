//! Stratum Core
//!
//! Core library for an infrastructure provisioning tool: the resource model,
//! the provider trait and attribute schemas

pub mod provider;
pub mod resource;
pub mod schema;
