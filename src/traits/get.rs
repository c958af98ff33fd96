//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::ProcoreClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually.
/// The ID type carries whatever scoping the endpoint needs (company and
/// project ids for project-level resources).
///
/// # Example
///
/// ```ignore
/// use procore_api::{DirectCost, DirectCostKey, Get, ProcoreClient};
///
/// let client = ProcoreClient::from_env().await?;
/// let key = DirectCostKey::new(8089, 2783683, 95483758);
/// let direct_cost = DirectCost::get(&client, key).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &ProcoreClient, id: Self::Id) -> Result<Self>;
}
