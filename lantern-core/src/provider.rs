//! Provider - Traits abstracting data source reads
//!
//! A Provider groups the data sources of one infrastructure (AWS, GCP, etc.).
//! Data sources are read-only: they project remote state into attributes and
//! never modify the remote system.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::resource::{ResourceId, State, Value};
use crate::schema::ResourceSchema;

/// Error type for Provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    pub resource_id: Option<ResourceId>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.resource_id {
            write!(f, "[{}.{}] {}", id.resource_type, id.name, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource_id: None,
            cause: None,
        }
    }

    pub fn for_resource(mut self, id: ResourceId) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A read-only data source
pub trait DataSource: Send + Sync {
    /// Data source type name (e.g., "aws_lightsail_instance")
    fn name(&self) -> &'static str;

    /// Attribute schema of this data source
    fn schema(&self) -> ResourceSchema;

    /// Read the current remote state
    ///
    /// `attributes` is the caller's configuration for this block. Returns
    /// `State::not_found()` when the remote entity no longer exists.
    fn read<'a>(
        &'a self,
        id: &'a ResourceId,
        identifier: &'a str,
        attributes: &'a HashMap<String, Value>,
    ) -> BoxFuture<'a, ProviderResult<State>>;
}

/// Main Provider trait
///
/// Each infrastructure provider (AWS, GCP, etc.) implements this trait.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "aws")
    fn name(&self) -> &'static str;

    /// Data sources this Provider can read
    fn data_sources(&self) -> Vec<&dyn DataSource>;

    /// Find a data source by type name
    fn data_source(&self, resource_type: &str) -> Option<&dyn DataSource> {
        self.data_sources()
            .into_iter()
            .find(|ds| ds.name() == resource_type)
    }

    /// Read a data source by its type name
    ///
    /// The caller's configuration is checked against the data source schema
    /// before the remote call is made.
    fn read_data_source<'a>(
        &'a self,
        id: &'a ResourceId,
        identifier: &'a str,
        attributes: &'a HashMap<String, Value>,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        Box::pin(async move {
            let data_source = self.data_source(&id.resource_type).ok_or_else(|| {
                ProviderError::new(format!("Unknown data source type: {}", id.resource_type))
                    .for_resource(id.clone())
            })?;

            if let Err(errors) = data_source.schema().validate(attributes) {
                let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                return Err(ProviderError::new(format!(
                    "Invalid configuration: {}",
                    details.join("; ")
                ))
                .for_resource(id.clone()));
            }

            data_source.read(id, identifier, attributes).await
        })
    }
}

/// Provider implementation for Box<dyn Provider>
/// This enables dynamic dispatch for Providers
impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn data_sources(&self) -> Vec<&dyn DataSource> {
        (**self).data_sources()
    }

    fn read_data_source<'a>(
        &'a self,
        id: &'a ResourceId,
        identifier: &'a str,
        attributes: &'a HashMap<String, Value>,
    ) -> BoxFuture<'a, ProviderResult<State>> {
        (**self).read_data_source(id, identifier, attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeSchema, AttributeType};

    struct MockDataSource;

    impl DataSource for MockDataSource {
        fn name(&self) -> &'static str {
            "mock_thing"
        }

        fn schema(&self) -> ResourceSchema {
            ResourceSchema::new("mock_thing")
                .attribute(AttributeSchema::new("name", AttributeType::String).required())
        }

        fn read<'a>(
            &'a self,
            id: &'a ResourceId,
            identifier: &'a str,
            attributes: &'a HashMap<String, Value>,
        ) -> BoxFuture<'a, ProviderResult<State>> {
            Box::pin(async move {
                if identifier == "gone" {
                    return Ok(State::not_found(id.clone()));
                }
                Ok(State::existing(id.clone(), attributes.clone()).with_identifier(identifier))
            })
        }
    }

    // Mock Provider for testing
    struct MockProvider {
        thing: MockDataSource,
    }

    impl Provider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn data_sources(&self) -> Vec<&dyn DataSource> {
            vec![&self.thing]
        }
    }

    fn config(name: &str) -> HashMap<String, Value> {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String(name.to_string()));
        attrs
    }

    #[tokio::test]
    async fn test_read_data_source_dispatches_by_type() {
        let provider: Box<dyn Provider> = Box::new(MockProvider {
            thing: MockDataSource,
        });
        let id = ResourceId::new("mock_thing", "example");
        let attrs = config("a");
        let state = provider.read_data_source(&id, "a", &attrs).await.unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_read_data_source_not_found() {
        let provider = MockProvider {
            thing: MockDataSource,
        };
        let id = ResourceId::new("mock_thing", "example");
        let attrs = config("gone");
        let state = provider.read_data_source(&id, "gone", &attrs).await.unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn test_read_unknown_data_source_type() {
        let provider = MockProvider {
            thing: MockDataSource,
        };
        let id = ResourceId::new("other_thing", "example");
        let err = provider
            .read_data_source(&id, "a", &HashMap::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "[other_thing.example] Unknown data source type: other_thing"
        );
    }

    #[tokio::test]
    async fn test_read_rejects_invalid_configuration() {
        let provider = MockProvider {
            thing: MockDataSource,
        };
        let id = ResourceId::new("mock_thing", "example");
        let err = provider
            .read_data_source(&id, "a", &HashMap::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("Required attribute 'name' is missing"));
    }

    #[test]
    fn test_provider_error_source() {
        let io = std::io::Error::other("connection reset");
        let err = ProviderError::new("Failed to read").with_cause(io);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection reset");
    }
}
