//! aws_lightsail_instance data source
//!
//! Reads a Lightsail instance by name and projects it onto the data source
//! schema. `user_data` is never returned by the API, so the caller's value is
//! echoed back as-is.

use std::collections::HashMap;
use std::sync::Arc;

use aws_sdk_lightsail::primitives::DateTimeFormat;
use aws_sdk_lightsail::types::Instance;
use lantern_core::provider::{BoxFuture, DataSource, ProviderError, ProviderResult};
use lantern_core::resource::{ResourceId, State, Value};
use lantern_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::api::LightsailApi;
use crate::tags::{IgnoreTagsConfig, filter_tags, tags_from_sdk};

pub const RESOURCE_TYPE: &str = "aws_lightsail_instance";

/// Schema of the aws_lightsail_instance data source
pub fn schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Provides details about an Amazon Lightsail instance.")
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .with_description("Name of the Lightsail instance."),
        )
        .attribute(
            AttributeSchema::new("availability_zone", AttributeType::String)
                .required()
                .with_description("Availability zone the instance runs in."),
        )
        .attribute(
            AttributeSchema::new("blueprint_id", AttributeType::String)
                .required()
                .with_description("ID of the blueprint (OS image) the instance was created from."),
        )
        .attribute(
            AttributeSchema::new("bundle_id", AttributeType::String)
                .required()
                .with_description("ID of the bundle (instance size)."),
        )
        .attribute(
            // Lightsail key pairs are a separate namespace from EC2 key pairs
            AttributeSchema::new("key_pair_name", AttributeType::String)
                .with_description("Name of the Lightsail key pair used for SSH."),
        )
        .attribute(
            AttributeSchema::new("user_data", AttributeType::String)
                .with_description("Launch script. Not readable from the API."),
        )
        .attribute(AttributeSchema::new("arn", AttributeType::String).computed())
        .attribute(
            AttributeSchema::new("created_at", AttributeType::String)
                .computed()
                .with_description("Creation timestamp (RFC 3339)."),
        )
        .attribute(AttributeSchema::new("cpu_count", AttributeType::Int).computed())
        .attribute(
            AttributeSchema::new("ram_size", AttributeType::Float)
                .computed()
                .with_description("Memory in GB."),
        )
        .attribute(
            AttributeSchema::new("ipv6_address", AttributeType::String)
                .computed()
                .deprecated("use `ipv6_addresses` attribute instead"),
        )
        .attribute(AttributeSchema::new("ipv6_addresses", types::string_list()).computed())
        .attribute(AttributeSchema::new("is_static_ip", AttributeType::Bool).computed())
        .attribute(AttributeSchema::new("private_ip_address", AttributeType::String).computed())
        .attribute(AttributeSchema::new("public_ip_address", AttributeType::String).computed())
        .attribute(AttributeSchema::new("username", AttributeType::String).computed())
        .attribute(AttributeSchema::new("tags", types::tags()).computed())
}

/// The aws_lightsail_instance data source
pub struct LightsailInstanceDataSource {
    api: Arc<dyn LightsailApi>,
    ignore_tags: IgnoreTagsConfig,
}

impl LightsailInstanceDataSource {
    pub fn new(api: Arc<dyn LightsailApi>, ignore_tags: IgnoreTagsConfig) -> Self {
        Self { api, ignore_tags }
    }
}

impl DataSource for LightsailInstanceDataSource {
    fn name(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> ResourceSchema {
        schema()
    }

    fn read<'a>(
        &'a self,
        id: &'a ResourceId,
        identifier: &'a str,
        attributes: &'a HashMap<String, Value>,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        Box::pin(lookup(
            self.api.as_ref(),
            &self.ignore_tags,
            id,
            identifier,
            attributes,
        ))
    }
}

/// Look up an instance by name and project it onto the schema
///
/// Returns `State::not_found` when Lightsail reports the instance missing.
/// Any other API failure is an error.
pub async fn lookup(
    api: &dyn LightsailApi,
    ignore_tags: &IgnoreTagsConfig,
    id: &ResourceId,
    identifier: &str,
    attributes: &HashMap<String, Value>,
) -> ProviderResult<State> {
    log::debug!("Reading Lightsail Instance ({})", identifier);

    let output = match api.get_instance(identifier).await {
        Ok(output) => output,
        Err(e) if e.is_not_found() => {
            log::warn!(
                "Lightsail Instance ({}) not found, removing from state",
                identifier
            );
            return Ok(State::not_found(id.clone()));
        }
        Err(e) => {
            return Err(ProviderError::new(format!(
                "Failed to read Lightsail Instance ({})",
                identifier
            ))
            .with_cause(e)
            .for_resource(id.clone()));
        }
    };

    let instance = output.instance().ok_or_else(|| {
        ProviderError::new(format!(
            "Failed to read Lightsail Instance ({}): empty response",
            identifier
        ))
        .for_resource(id.clone())
    })?;

    let mut projected = project_instance(instance, ignore_tags)
        .map_err(|message| ProviderError::new(message).for_resource(id.clone()))?;

    if let Some(user_data) = attributes.get("user_data") {
        projected.insert("user_data".to_string(), user_data.clone());
    }

    if let Err(errors) = schema().validate_projection(&projected) {
        let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(ProviderError::new(format!(
            "Projected attributes do not match schema: {}",
            details.join("; ")
        ))
        .for_resource(id.clone()));
    }

    let name = instance.name().unwrap_or(identifier);
    Ok(State::existing(id.clone(), projected).with_identifier(name))
}

/// Copy instance fields into an attribute map
pub fn project_instance(
    instance: &Instance,
    ignore_tags: &IgnoreTagsConfig,
) -> Result<HashMap<String, Value>, String> {
    let mut attributes = HashMap::new();

    let mut set_string = |key: &str, value: Option<&str>| {
        if let Some(v) = value {
            attributes.insert(key.to_string(), Value::String(v.to_string()));
        }
    };

    set_string("name", instance.name());
    set_string(
        "availability_zone",
        instance.location().and_then(|l| l.availability_zone()),
    );
    set_string("blueprint_id", instance.blueprint_id());
    set_string("bundle_id", instance.bundle_id());
    set_string("key_pair_name", instance.ssh_key_name());
    set_string("arn", instance.arn());
    set_string("username", instance.username());
    set_string("private_ip_address", instance.private_ip_address());
    set_string("public_ip_address", instance.public_ip_address());

    if let Some(created_at) = instance.created_at() {
        let formatted = created_at
            .fmt(DateTimeFormat::DateTime)
            .map_err(|e| format!("Failed to format created_at: {}", e))?;
        attributes.insert("created_at".to_string(), Value::String(formatted));
    }

    if let Some(hardware) = instance.hardware() {
        if let Some(cpu_count) = hardware.cpu_count() {
            attributes.insert("cpu_count".to_string(), Value::Int(cpu_count.into()));
        }
        if let Some(ram_size) = hardware.ram_size_in_gb() {
            // Widening the f32 directly would print 0.6 as 0.6000000238418579
            let ram_size = ram_size
                .to_string()
                .parse::<f64>()
                .map_err(|e| format!("Failed to convert ram_size {}: {}", ram_size, e))?;
            attributes.insert("ram_size".to_string(), Value::Float(ram_size));
        }
    }

    // Deprecated alias of the first IPv6 address
    let ipv6_addresses = instance.ipv6_addresses();
    if let Some(first) = ipv6_addresses.first() {
        attributes.insert("ipv6_address".to_string(), Value::String(first.clone()));
    }
    attributes.insert(
        "ipv6_addresses".to_string(),
        Value::List(
            ipv6_addresses
                .iter()
                .map(|addr| Value::String(addr.clone()))
                .collect(),
        ),
    );

    if let Some(is_static_ip) = instance.is_static_ip() {
        attributes.insert("is_static_ip".to_string(), Value::Bool(is_static_ip));
    }

    let tags = filter_tags(&tags_from_sdk(instance.tags()), ignore_tags);
    attributes.insert("tags".to_string(), Value::string_map(&tags));

    Ok(attributes)
}
