//! Health endpoint.

use crate::client::ApiClient;
use crate::error::RequestError;
use crate::models::Health;

/// Path of the health endpoint.
pub const HEALTH_PATH: &str = "/api/v1/health";

/// Ask the backend whether it is up.
pub async fn check_health(client: &ApiClient) -> Result<Health, RequestError> {
    client.get(HEALTH_PATH).await
}
