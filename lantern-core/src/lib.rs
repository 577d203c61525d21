//! Lantern Core
//!
//! Value, schema and provider model shared by Lantern data sources

pub mod provider;
pub mod resource;
pub mod schema;
