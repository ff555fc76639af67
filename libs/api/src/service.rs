//! The API surface the console depends on.

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::RequestError;
use crate::models::{InstanceConfig, NavigationLevel};
use crate::{instance_config, navigation};

/// Backend operations used by the console.
///
/// Implemented for [`ApiClient`]; tests provide in-memory implementations.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Fetch a navigation level; `None` is the root.
    async fn fetch_navigation_level(
        &self,
        compartment_id: Option<&str>,
    ) -> Result<NavigationLevel, RequestError>;

    /// Fetch an instance's schedule.
    async fn fetch_instance_config(&self, instance_id: &str)
        -> Result<InstanceConfig, RequestError>;

    /// Replace an instance's schedule.
    async fn save_instance_config(
        &self,
        instance_id: &str,
        config: &InstanceConfig,
    ) -> Result<InstanceConfig, RequestError>;
}

#[async_trait]
impl ConsoleApi for ApiClient {
    async fn fetch_navigation_level(
        &self,
        compartment_id: Option<&str>,
    ) -> Result<NavigationLevel, RequestError> {
        navigation::fetch_navigation_level(self, compartment_id).await
    }

    async fn fetch_instance_config(
        &self,
        instance_id: &str,
    ) -> Result<InstanceConfig, RequestError> {
        instance_config::fetch_instance_config(self, instance_id).await
    }

    async fn save_instance_config(
        &self,
        instance_id: &str,
        config: &InstanceConfig,
    ) -> Result<InstanceConfig, RequestError> {
        instance_config::save_instance_config(self, instance_id, config).await
    }
}
