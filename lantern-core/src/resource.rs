//! Resource - Representing data source identity and fetched state

use std::collections::HashMap;

/// Unique identifier for a data source block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Data source type (e.g., "aws_lightsail_instance")
    pub resource_type: String,
    /// Binding name given by the caller (e.g., "test")
    pub name: String,
}

impl ResourceId {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// Attribute value of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Borrow the inner string, if this is a `Value::String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Build a `Value::Map` of strings from a string map
    pub fn string_map(map: &HashMap<String, String>) -> Self {
        Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    /// Convert a JSON value, dropping nulls
    ///
    /// Whole numbers become `Int`, other numbers `Float`.
    pub fn from_json(value: &serde_json::Value) -> Option<Value> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Int(i)),
                None => n.as_f64().map(Value::Float),
            },
            serde_json::Value::Array(items) => {
                Some(Value::List(items.iter().filter_map(Value::from_json).collect()))
            }
            serde_json::Value::Object(map) => Some(Value::Map(
                map.iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k.clone(), v)))
                    .collect(),
            )),
        }
    }

    /// Convert to a JSON value for output and state storage
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            // NaN and infinities have no JSON form
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Current state fetched from actual infrastructure
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: ResourceId,
    /// Remote identifier the state was read with (e.g., the instance name)
    pub identifier: Option<String>,
    pub attributes: HashMap<String, Value>,
    /// Whether this state exists. `false` tells the caller to drop the
    /// entity from tracked state.
    pub exists: bool,
}

impl State {
    pub fn not_found(id: ResourceId) -> Self {
        Self {
            id,
            identifier: None,
            attributes: HashMap::new(),
            exists: false,
        }
    }

    pub fn existing(id: ResourceId, attributes: HashMap<String, Value>) -> Self {
        Self {
            id,
            identifier: None,
            attributes,
            exists: true,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Attributes as a JSON object, keys sorted
    pub fn attributes_json(&self) -> serde_json::Value {
        let sorted: std::collections::BTreeMap<_, _> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(sorted.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_state_has_no_attributes() {
        let state = State::not_found(ResourceId::new("aws_lightsail_instance", "test"));
        assert!(!state.exists);
        assert!(state.attributes.is_empty());
        assert!(state.identifier.is_none());
    }

    #[test]
    fn test_existing_state_with_identifier() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("web".to_string()));
        let state = State::existing(ResourceId::new("aws_lightsail_instance", "test"), attrs)
            .with_identifier("web");
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("web"));
    }

    #[test]
    fn test_value_to_json() {
        let mut tags = HashMap::new();
        tags.insert("env".to_string(), "prod".to_string());

        let value = Value::List(vec![
            Value::String("a".to_string()),
            Value::Int(2),
            Value::Float(0.5),
            Value::Bool(true),
            Value::string_map(&tags),
        ]);
        assert_eq!(
            value.to_json(),
            serde_json::json!(["a", 2, 0.5, true, {"env": "prod"}])
        );
        assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_value_from_json() {
        let json = serde_json::json!({
            "region": "us-east-1",
            "count": 3,
            "ratio": 0.25,
            "unset": null,
            "keys": ["Owner", null, true],
        });
        let Some(Value::Map(map)) = Value::from_json(&json) else {
            panic!("Expected a map");
        };

        assert_eq!(map.len(), 4);
        assert_eq!(map["region"], Value::String("us-east-1".to_string()));
        assert_eq!(map["count"], Value::Int(3));
        assert_eq!(map["ratio"], Value::Float(0.25));
        assert_eq!(
            map["keys"],
            Value::List(vec![Value::String("Owner".to_string()), Value::Bool(true)])
        );
        assert_eq!(Value::from_json(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_resource_id_display() {
        let id = ResourceId::new("aws_lightsail_instance", "test");
        assert_eq!(id.to_string(), "aws_lightsail_instance.test");
    }
}
