//! Amazon Lightsail data sources

pub mod api;
pub mod instance;

pub use api::{LightsailApi, LightsailApiError, SdkLightsailApi};
pub use instance::{LightsailInstanceDataSource, lookup};
