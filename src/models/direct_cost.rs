//! Direct cost model and trait implementations.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{read_json, ProcoreClient};
use crate::error::{json_kind, ProcoreError, Result};
use crate::pagination::{ListEndpoint, Record};
use crate::traits::{Get, List};

/// A direct cost record (invoice, expense, payroll) on a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectCost {
    /// Direct cost ID.
    pub id: u64,

    /// Kind of cost, e.g. "Invoice", "Expense", "Payroll".
    #[serde(default)]
    pub direct_cost_type: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub invoice_number: Option<String>,

    /// Date of the cost as sent by the API (`YYYY-MM-DD`).
    #[serde(default)]
    pub direct_cost_date: Option<String>,

    #[serde(default)]
    pub vendor: Option<VendorRef>,

    /// Files already attached to this cost.
    #[serde(default)]
    pub attachments: Vec<AttachmentInfo>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Remaining fields as returned by the API.
    #[serde(flatten)]
    pub extra: Record,
}

/// Vendor reference embedded in a direct cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// An attachment as listed on a direct cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentInfo {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Query parameters for listing the direct costs of a project.
#[derive(Debug, Clone)]
pub struct DirectCostListQuery {
    /// Company owning the project, sent as `Procore-Company-Id`.
    pub company_id: u64,
    /// Project whose direct costs are listed.
    pub project_id: u64,
}

impl DirectCostListQuery {
    pub fn new(company_id: u64, project_id: u64) -> Self {
        Self {
            company_id,
            project_id,
        }
    }
}

/// Fully scoped id of one direct cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectCostKey {
    pub company_id: u64,
    pub project_id: u64,
    pub direct_cost_id: u64,
}

impl DirectCostKey {
    pub fn new(company_id: u64, project_id: u64, direct_cost_id: u64) -> Self {
        Self {
            company_id,
            project_id,
            direct_cost_id,
        }
    }
}

/// Path of a project's direct cost collection.
pub(crate) fn direct_costs_path(project_id: u64) -> String {
    format!("rest/v1.1/projects/{project_id}/direct_costs")
}

/// Path of a single direct cost.
pub(crate) fn direct_cost_path(project_id: u64, direct_cost_id: u64) -> String {
    format!("{}/{direct_cost_id}", direct_costs_path(project_id))
}

impl DirectCost {
    /// Find a direct cost by id among all direct costs of the project, then
    /// fetch its full record.
    ///
    /// # Errors
    ///
    /// Returns [`ProcoreError::NotFound`] if no listed cost has this id.
    #[tracing::instrument(skip(client))]
    pub async fn find(client: &ProcoreClient, key: DirectCostKey) -> Result<Self> {
        let query = DirectCostListQuery::new(key.company_id, key.project_id);
        let listed = Self::list_all(client, &query).await?;

        if !listed.iter().any(|dc| dc.id == key.direct_cost_id) {
            return Err(ProcoreError::NotFound {
                entity_type: "Direct cost",
                id: key.direct_cost_id.to_string(),
            });
        }

        Self::get(client, key).await
    }

    /// Create a direct cost on a project from raw field values.
    ///
    /// `item` is sent as `{"item": item}`; attach files afterwards with
    /// [`DirectCost::attach`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a JSON
    /// object.
    #[tracing::instrument(skip(client, item), fields(fields = item.len()))]
    pub async fn create(
        client: &ProcoreClient,
        company_id: u64,
        project_id: u64,
        item: &Record,
    ) -> Result<Self> {
        let body = serde_json::json!({ "item": item });
        let response = client
            .post_json(&direct_costs_path(project_id), Some(company_id), &body)
            .await?;

        let created = parse_object(read_json(response).await?)?;
        tracing::info!(direct_cost_id = created.id, "created direct cost");
        Ok(created)
    }

    /// Attach local files to this direct cost.
    ///
    /// See [`crate::attachments::upload`].
    pub async fn attach<P: AsRef<Path> + Sync>(
        client: &ProcoreClient,
        key: DirectCostKey,
        paths: &[P],
    ) -> Result<Record> {
        crate::attachments::upload(
            client,
            key.company_id,
            key.project_id,
            key.direct_cost_id,
            paths,
        )
        .await
    }
}

#[async_trait]
impl List for DirectCost {
    type Query = DirectCostListQuery;

    fn endpoint(query: &Self::Query) -> ListEndpoint {
        ListEndpoint::new(direct_costs_path(query.project_id)).company_scoped(query.company_id)
    }
}

#[async_trait]
impl Get for DirectCost {
    type Id = DirectCostKey;

    #[tracing::instrument(skip(client))]
    async fn get(client: &ProcoreClient, key: DirectCostKey) -> Result<Self> {
        let path = direct_cost_path(key.project_id, key.direct_cost_id);

        let response = match client.get(&path, Some(key.company_id)).await {
            Err(err) if err.status_code() == Some(404) => {
                return Err(ProcoreError::NotFound {
                    entity_type: "Direct cost",
                    id: key.direct_cost_id.to_string(),
                })
            }
            other => other?,
        };

        parse_object(read_json(response).await?)
    }
}

fn parse_object(value: serde_json::Value) -> Result<DirectCost> {
    match value {
        value @ serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(ProcoreError::UnexpectedShape {
            expected: "object",
            found: json_kind(&other),
        }),
    }
}
