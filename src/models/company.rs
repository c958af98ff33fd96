//! Company model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ProcoreClient;
use crate::error::{ProcoreError, Result};
use crate::models::Identifier;
use crate::pagination::{ListEndpoint, Record};
use crate::traits::List;

const COMPANIES_PATH: &str = "rest/v1.0/companies";

/// A Procore company the authenticated app is installed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Company ID.
    pub id: u64,

    /// Company name.
    #[serde(default)]
    pub name: String,

    /// Whether the company is active.
    #[serde(default)]
    pub is_active: Option<bool>,

    /// Remaining fields as returned by the API.
    #[serde(flatten)]
    pub extra: Record,
}

/// Query parameters for listing companies.
///
/// Companies are not scoped by anything; free companies are always included.
#[derive(Debug, Clone, Default)]
pub struct CompanyListQuery;

impl Company {
    /// Find a company by id or exact name among all companies.
    ///
    /// # Errors
    ///
    /// Returns [`ProcoreError::NotFound`] if no company matches, or any error
    /// from listing.
    #[tracing::instrument(skip(client))]
    pub async fn find(client: &ProcoreClient, identifier: &Identifier) -> Result<Self> {
        Self::list_all(client, &CompanyListQuery)
            .await?
            .into_iter()
            .find(|c| identifier.matches(c.id, &c.name))
            .ok_or_else(|| ProcoreError::NotFound {
                entity_type: "Company",
                id: identifier.to_string(),
            })
    }
}

#[async_trait]
impl List for Company {
    type Query = CompanyListQuery;

    fn endpoint(_query: &Self::Query) -> ListEndpoint {
        ListEndpoint::new(COMPANIES_PATH).with_param("include_free_companies", true)
    }
}
