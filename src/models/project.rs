//! Project model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ProcoreClient;
use crate::error::{ProcoreError, Result};
use crate::models::Identifier;
use crate::pagination::{ListEndpoint, Record};
use crate::traits::List;

const PROJECTS_PATH: &str = "rest/v1.1/projects";

/// A Procore project.
///
/// Projects belong to one company; project-level tools such as direct
/// costs hang off the project id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: u64,

    /// Project name.
    #[serde(default)]
    pub name: String,

    /// Name including the project number, as shown in the Procore UI.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Project number.
    #[serde(default)]
    pub project_number: Option<String>,

    /// Whether the project is active.
    #[serde(default)]
    pub active: Option<bool>,

    /// Owning company.
    #[serde(default)]
    pub company: Option<CompanyRef>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Remaining fields as returned by the API.
    #[serde(flatten)]
    pub extra: Record,
}

/// Company reference embedded in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Query parameters for listing projects.
#[derive(Debug, Clone)]
pub struct ProjectListQuery {
    /// Company whose projects are listed.
    pub company_id: u64,
}

impl ProjectListQuery {
    pub fn new(company_id: u64) -> Self {
        Self { company_id }
    }
}

impl Project {
    /// Find a project of `company_id` by id or exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ProcoreError::NotFound`] if no project matches, or any error
    /// from listing.
    #[tracing::instrument(skip(client))]
    pub async fn find(
        client: &ProcoreClient,
        company_id: u64,
        identifier: &Identifier,
    ) -> Result<Self> {
        Self::list_all(client, &ProjectListQuery::new(company_id))
            .await?
            .into_iter()
            .find(|p| identifier.matches(p.id, &p.name))
            .ok_or_else(|| ProcoreError::NotFound {
                entity_type: "Project",
                id: identifier.to_string(),
            })
    }
}

#[async_trait]
impl List for Project {
    type Query = ProjectListQuery;

    fn endpoint(query: &Self::Query) -> ListEndpoint {
        ListEndpoint::new(PROJECTS_PATH).with_param("company_id", query.company_id)
    }
}
