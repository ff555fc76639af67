//! Instance schedule endpoints.
//!
//! Pass-through calls: no caching and no concurrency control, the last
//! write to reach the backend wins.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::RequestError;
use crate::models::{Empty, InstanceConfig};

/// The id is encoded as one path segment.
fn config_path(instance_id: &str) -> String {
    format!(
        "/api/v1/instances/{}/config",
        urlencoding::encode(instance_id)
    )
}

/// Fetch the schedule for an instance.
///
/// A 404 means either the instance or its schedule is unknown; callers
/// decide how to treat it.
pub async fn fetch_instance_config(
    client: &ApiClient,
    instance_id: &str,
) -> Result<InstanceConfig, RequestError> {
    let config: InstanceConfig = client.get(&config_path(instance_id)).await?;
    debug!(instance_id, enabled = config.enabled, "Fetched instance config");
    Ok(config)
}

/// Replace the schedule for an instance with `config`.
pub async fn save_instance_config(
    client: &ApiClient,
    instance_id: &str,
    config: &InstanceConfig,
) -> Result<InstanceConfig, RequestError> {
    let saved: InstanceConfig = client
        .put(&config_path(instance_id), Some(config))
        .await?;
    debug!(instance_id, enabled = saved.enabled, "Saved instance config");
    Ok(saved)
}

/// Remove the schedule for an instance. Idempotent on the backend.
pub async fn delete_instance_config(
    client: &ApiClient,
    instance_id: &str,
) -> Result<Empty, RequestError> {
    let empty: Empty = client.delete(&config_path(instance_id)).await?;
    debug!(instance_id, "Deleted instance config");
    Ok(empty)
}
