//! Schema - Define type schemas for data sources
//!
//! Providers declare a schema for each data source type. The schema is used
//! twice: to check the caller's configuration before a read, and to check
//! the projected attribute set after a read.

use std::collections::HashMap;
use std::fmt;

use crate::resource::Value;

/// Attribute type
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Floating point number
    Float,
    /// Boolean
    Bool,
    /// List
    List(Box<AttributeType>),
    /// Map
    Map(Box<AttributeType>),
}

impl AttributeType {
    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            // Whole numbers are accepted where a float is declared
            (AttributeType::Float, Value::Float(_) | Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::List(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name(),
            }),
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Float => "Float".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Unknown attribute '{name}'")]
    UnknownAttribute { name: String },

    #[error("Attribute '{name}' is computed and cannot be set")]
    ComputedAttribute { name: String },

    #[error("Attribute '{name}': {inner}")]
    AttributeError { name: String, inner: Box<TypeError> },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },
}

impl Value {
    fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Float(_) => "Float".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
        }
    }
}

/// How an attribute gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    /// Must be supplied by the caller
    Required,
    /// May be supplied by the caller
    Optional,
    /// Filled in by the provider only
    Computed,
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub mode: AttributeMode,
    pub description: Option<String>,
    /// Deprecation message shown when the attribute is referenced
    pub deprecated: Option<String>,
}

impl AttributeSchema {
    /// New optional attribute
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            mode: AttributeMode::Optional,
            description: None,
            deprecated: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.mode = AttributeMode::Required;
        self
    }

    pub fn computed(mut self) -> Self {
        self.mode = AttributeMode::Computed;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.mode == AttributeMode::Required
    }

    pub fn is_computed(&self) -> bool {
        self.mode == AttributeMode::Computed
    }
}

/// Data source schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Attribute names in sorted order
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validate caller-supplied configuration
    ///
    /// Required attributes must be present. Computed attributes are not
    /// settable by the caller.
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();

        for name in self.attribute_names() {
            let schema = &self.attributes[name];
            if schema.is_required() && !attributes.contains_key(name) {
                errors.push(TypeError::MissingRequired {
                    name: name.to_string(),
                });
            }
        }

        for (name, value) in attributes {
            match self.attributes.get(name) {
                Some(schema) if schema.is_computed() => {
                    errors.push(TypeError::ComputedAttribute { name: name.clone() });
                }
                Some(schema) => {
                    if let Err(e) = schema.attr_type.validate(value) {
                        errors.push(TypeError::AttributeError {
                            name: name.clone(),
                            inner: Box::new(e),
                        });
                    }
                }
                None => errors.push(TypeError::UnknownAttribute { name: name.clone() }),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate an attribute set produced by a read
    ///
    /// Every attribute must be declared by the schema and match its type.
    /// Missing attributes are fine: unset optional and computed values are
    /// simply absent.
    pub fn validate_projection(
        &self,
        attributes: &HashMap<String, Value>,
    ) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();

        for (name, value) in attributes {
            match self.attributes.get(name) {
                Some(schema) => {
                    if let Err(e) = schema.attr_type.validate(value) {
                        errors.push(TypeError::AttributeError {
                            name: name.clone(),
                            inner: Box::new(e),
                        });
                    }
                }
                None => errors.push(TypeError::UnknownAttribute { name: name.clone() }),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Helper functions for common types
pub mod types {
    use super::*;

    /// Tags type (Terraform-style string map)
    pub fn tags() -> AttributeType {
        AttributeType::Map(Box::new(AttributeType::String))
    }

    /// List of strings
    pub fn string_list() -> AttributeType {
        AttributeType::List(Box::new(AttributeType::String))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> ResourceSchema {
        ResourceSchema::new("sample")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("note", AttributeType::String))
            .attribute(AttributeSchema::new("size", AttributeType::Float).computed())
            .attribute(AttributeSchema::new("tags", types::tags()).computed())
    }

    #[test]
    fn test_validate_string_type() {
        let t = AttributeType::String;
        assert!(t.validate(&Value::String("hello".to_string())).is_ok());
        assert!(t.validate(&Value::Int(42)).is_err());
    }

    #[test]
    fn test_validate_float_accepts_int() {
        let t = AttributeType::Float;
        assert!(t.validate(&Value::Float(0.5)).is_ok());
        assert!(t.validate(&Value::Int(2)).is_ok());
        assert!(t.validate(&Value::Bool(true)).is_err());
    }

    #[test]
    fn test_validate_nested_list() {
        let t = types::string_list();
        assert!(
            t.validate(&Value::List(vec![Value::String("a".to_string())]))
                .is_ok()
        );
        let err = t
            .validate(&Value::List(vec![
                Value::String("a".to_string()),
                Value::Int(1),
            ]))
            .unwrap_err();
        assert!(matches!(err, TypeError::ListItemError { index: 1, .. }));
    }

    #[test]
    fn test_config_missing_required_attribute() {
        let errors = sample_schema().validate(&HashMap::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Required attribute 'name' is missing");
    }

    #[test]
    fn test_config_rejects_computed_attribute() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("x".to_string()));
        attrs.insert("size".to_string(), Value::Float(1.0));
        let errors = sample_schema().validate(&attrs).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], TypeError::ComputedAttribute { name } if name == "size"));
        assert_eq!(
            errors[0].to_string(),
            "Attribute 'size' is computed and cannot be set"
        );
    }

    #[test]
    fn test_config_rejects_undeclared_attribute() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("x".to_string()));
        attrs.insert("colour".to_string(), Value::String("red".to_string()));
        let errors = sample_schema().validate(&attrs).unwrap_err();
        assert!(matches!(&errors[0], TypeError::UnknownAttribute { name } if name == "colour"));
    }

    #[test]
    fn test_config_accepts_required_and_optional() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("x".to_string()));
        attrs.insert("note".to_string(), Value::String("hi".to_string()));
        assert!(sample_schema().validate(&attrs).is_ok());
    }

    #[test]
    fn test_projection_rejects_undeclared_attribute() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("x".to_string()));
        attrs.insert("bogus".to_string(), Value::Bool(true));
        let errors = sample_schema().validate_projection(&attrs).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Unknown attribute 'bogus'");
    }

    #[test]
    fn test_projection_checks_types() {
        let mut attrs = HashMap::new();
        attrs.insert("size".to_string(), Value::String("big".to_string()));
        let errors = sample_schema().validate_projection(&attrs).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "Attribute 'size': Type mismatch: expected Float, got String"
        );
    }

    #[test]
    fn test_projection_allows_missing_attributes() {
        assert!(sample_schema().validate_projection(&HashMap::new()).is_ok());
    }

    #[test]
    fn test_attribute_names_sorted() {
        assert_eq!(
            sample_schema().attribute_names(),
            vec!["name", "note", "size", "tags"]
        );
    }
}
