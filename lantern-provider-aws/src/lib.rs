//! Lantern AWS Provider
//!
//! AWS data sources for Lantern.
//!
//! ## Module Structure
//!
//! - `config` - Provider settings (region, ignore_tags)
//! - `tags` - Reserved/ignored tag filtering
//! - `lightsail` - Lightsail API capability and the aws_lightsail_instance data source

pub mod config;
pub mod lightsail;
pub mod tags;

use std::sync::Arc;

use aws_config::Region;
use aws_sdk_lightsail::Client as LightsailClient;
use lantern_core::provider::{DataSource, Provider};

pub use config::{ConfigError, ProviderConfig};
pub use lightsail::{LightsailApi, LightsailApiError, LightsailInstanceDataSource, SdkLightsailApi};
pub use tags::{IgnoreTagsConfig, filter_tags};

/// AWS Provider
pub struct AwsProvider {
    lightsail_instance: LightsailInstanceDataSource,
}

impl AwsProvider {
    /// Create a new AWS Provider, loading credentials from the environment
    pub async fn new(config: ProviderConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let api = SdkLightsailApi::new(LightsailClient::new(&sdk_config));
        Self::with_api(Arc::new(api), config.ignore_tags)
    }

    /// Create with a specific Lightsail API (for testing)
    pub fn with_api(api: Arc<dyn LightsailApi>, ignore_tags: IgnoreTagsConfig) -> Self {
        Self {
            lightsail_instance: LightsailInstanceDataSource::new(api, ignore_tags),
        }
    }
}

impl Provider for AwsProvider {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn data_sources(&self) -> Vec<&dyn DataSource> {
        vec![&self.lightsail_instance]
    }
}
