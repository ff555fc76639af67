//! Navigation endpoint.

use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::RequestError;
use crate::models::NavigationLevel;

/// Path of the navigation endpoint.
pub const NAVIGATION_PATH: &str = "/api/v1/navigation";

/// Fetch one level of the compartment tree.
///
/// `None` (or an empty id) requests the root level.
pub async fn fetch_navigation_level(
    client: &ApiClient,
    compartment_id: Option<&str>,
) -> Result<NavigationLevel, RequestError> {
    let level: NavigationLevel = match compartment_id.filter(|id| !id.is_empty()) {
        Some(id) => {
            client
                .get_with_query(NAVIGATION_PATH, &[("compartment_id", id)])
                .await?
        }
        None => client.get(NAVIGATION_PATH).await?,
    };

    if !level.is_consistent() {
        warn!(
            compartment_id = compartment_id.unwrap_or("<root>"),
            breadcrumb_len = level.breadcrumb.len(),
            has_current = level.current_compartment.is_some(),
            "Navigation level breadcrumb disagrees with current compartment"
        );
    }

    debug!(
        compartment_id = compartment_id.unwrap_or("<root>"),
        children = level.child_compartments.len(),
        instances = level.instances.len(),
        "Fetched navigation level"
    );

    Ok(level)
}
