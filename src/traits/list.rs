//! List trait for fetching collections of entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::ProcoreClient;
use crate::error::Result;
use crate::pagination::{fetch_all, fetch_page, ListEndpoint, Page, DEFAULT_PER_PAGE};

/// List entities with pagination support.
///
/// Implementors only describe their endpoint; the fetching itself is the
/// shared algorithm in [`crate::pagination`].
///
/// # Example
///
/// ```ignore
/// use procore_api::{List, Project, ProjectListQuery, ProcoreClient};
///
/// let client = ProcoreClient::from_env().await?;
/// let query = ProjectListQuery::new(8089);
///
/// // Fetch a single page
/// let page = Project::list_page(&client, &query, 1, 50).await?;
///
/// // Fetch all pages
/// let all_projects = Project::list_all(&client, &query).await?;
/// ```
#[async_trait]
pub trait List: DeserializeOwned + Send {
    /// Scoping for the listing (company, project).
    type Query: Send + Sync;

    /// The endpoint, fixed query params and company scope for `query`.
    fn endpoint(query: &Self::Query) -> ListEndpoint;

    /// List one page of entities.
    ///
    /// # Arguments
    ///
    /// * `client` - The Procore API client
    /// * `query` - Scoping for the listing
    /// * `page` - Page number (1-indexed)
    /// * `per_page` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &ProcoreClient,
        query: &Self::Query,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Self>> {
        let endpoint = Self::endpoint(query);
        fetch_page(client, &endpoint.page(page, per_page)).await
    }

    /// List all entities (fetches pages of [`DEFAULT_PER_PAGE`] until one
    /// comes back empty).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &ProcoreClient, query: &Self::Query) -> Result<Vec<Self>> {
        Self::list_all_with_page_size(client, query, DEFAULT_PER_PAGE).await
    }

    /// List all entities with an explicit page size.
    ///
    /// # Errors
    ///
    /// Returns an error if `per_page` is 0 or any page request fails.
    async fn list_all_with_page_size(
        client: &ProcoreClient,
        query: &Self::Query,
        per_page: u32,
    ) -> Result<Vec<Self>> {
        let endpoint = Self::endpoint(query);
        fetch_all(client, &endpoint, per_page).await
    }
}
