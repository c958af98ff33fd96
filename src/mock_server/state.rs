//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Procore API server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::fixtures::DefaultScenario;
use crate::{AttachmentInfo, Company, DirectCost, Project, Record};

/// One request as seen by the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

/// One multipart part received by the attachment endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Companies in listing order.
    pub companies: Vec<Company>,

    /// Projects indexed by owning company ID.
    pub projects: HashMap<u64, Vec<Project>>,

    /// Direct costs indexed by project ID.
    pub direct_costs: HashMap<u64, Vec<DirectCost>>,

    /// If set, the token endpoint only accepts this client id and secret.
    pub client_credentials: Option<(String, String)>,

    /// Token handed out by the token endpoint.
    pub issued_token: String,

    /// Whether API requests must carry `Bearer <issued_token>`.
    pub require_token: bool,

    /// Every request received, in arrival order.
    pub requests: Vec<RecordedRequest>,

    /// Every attachment part received, in arrival order.
    pub uploads: Vec<ReceivedPart>,

    next_attachment_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            companies: Vec::new(),
            projects: HashMap::new(),
            direct_costs: HashMap::new(),
            client_credentials: None,
            issued_token: "mock-access-token".to_string(),
            require_token: true,
            requests: Vec::new(),
            uploads: Vec::new(),
            next_attachment_id: 1,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding every record of `scenario`.
    pub fn from_scenario(scenario: DefaultScenario) -> Self {
        let mut state = Self::new();
        state.companies = scenario.companies;
        for (company_id, project) in scenario.projects {
            state = state.with_project(company_id, project);
        }
        for (project_id, direct_cost) in scenario.direct_costs {
            state = state.with_direct_cost(project_id, direct_cost);
        }
        state
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a company to the state.
    pub fn with_company(mut self, company: Company) -> Self {
        self.companies.push(company);
        self
    }

    /// Add a project under a company.
    pub fn with_project(mut self, company_id: u64, project: Project) -> Self {
        self.projects.entry(company_id).or_default().push(project);
        self
    }

    /// Add a direct cost under a project.
    pub fn with_direct_cost(mut self, project_id: u64, direct_cost: DirectCost) -> Self {
        self.direct_costs
            .entry(project_id)
            .or_default()
            .push(direct_cost);
        self
    }

    /// Only accept these credentials at the token endpoint.
    pub fn with_client_credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.client_credentials = Some((client_id.to_string(), client_secret.to_string()));
        self
    }

    /// Set the token handed out (and required) by the server.
    pub fn with_issued_token(mut self, token: &str) -> Self {
        self.issued_token = token.to_string();
        self
    }

    /// Accept API requests without checking the bearer token.
    pub fn without_token_check(mut self) -> Self {
        self.require_token = false;
        self
    }

    /// Record an incoming request.
    pub fn record_request(&mut self, method: &str, path: &str, query: Option<&str>) {
        self.requests.push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            query: query.map(str::to_string),
        });
    }

    /// Number of requests received for `path`.
    pub fn request_count(&self, path: &str) -> usize {
        self.requests.iter().filter(|r| r.path == path).count()
    }

    /// Projects of a company (empty if the company has none).
    pub fn projects_of(&self, company_id: u64) -> &[Project] {
        self.projects
            .get(&company_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Direct costs of a project (empty if the project has none).
    pub fn direct_costs_of(&self, project_id: u64) -> &[DirectCost] {
        self.direct_costs
            .get(&project_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get a direct cost by project and ID.
    pub fn get_direct_cost(&self, project_id: u64, direct_cost_id: u64) -> Option<&DirectCost> {
        self.direct_costs_of(project_id)
            .iter()
            .find(|dc| dc.id == direct_cost_id)
    }

    /// Store a new direct cost built from posted fields and return it.
    ///
    /// Ids continue after the highest id held for any project.
    pub fn create_direct_cost(
        &mut self,
        project_id: u64,
        item: Record,
    ) -> serde_json::Result<DirectCost> {
        let id = self
            .direct_costs
            .values()
            .flatten()
            .map(|dc| dc.id)
            .max()
            .unwrap_or(0)
            + 1;

        let mut fields = item;
        fields.insert("id".to_string(), id.into());
        fields
            .entry("status".to_string())
            .or_insert_with(|| "draft".into());
        let direct_cost: DirectCost = serde_json::from_value(fields.into())?;

        self.direct_costs
            .entry(project_id)
            .or_default()
            .push(direct_cost.clone());
        Ok(direct_cost)
    }

    /// Attach received parts to a direct cost and return the updated version.
    pub fn attach(
        &mut self,
        project_id: u64,
        direct_cost_id: u64,
        parts: Vec<ReceivedPart>,
    ) -> Option<&DirectCost> {
        let direct_cost = self
            .direct_costs
            .get_mut(&project_id)?
            .iter_mut()
            .find(|dc| dc.id == direct_cost_id)?;

        for part in &parts {
            let id = self.next_attachment_id;
            self.next_attachment_id += 1;
            direct_cost.attachments.push(AttachmentInfo {
                id: Some(id),
                name: part.file_name.clone(),
                url: Some(format!("https://storage.procore.test/attachments/{id}")),
            });
        }
        self.uploads.extend(parts);

        self.get_direct_cost(project_id, direct_cost_id)
    }
}

/// Slice out one page of `items`; pages past the end are empty.
pub fn page_of<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let page = page.max(1) as usize;
    let per_page = per_page as usize;
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return Vec::new();
    }
    let end = (start + per_page).min(items.len());
    items[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_page_of() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(page_of(&items, 1, 2), vec![1, 2]);
        assert_eq!(page_of(&items, 3, 2), vec![5]);
        assert!(page_of(&items, 4, 2).is_empty());
        assert!(page_of(&items, 1, 0).is_empty());
    }

    #[test]
    fn test_from_default_scenario() {
        let state = MockState::from_scenario(Fixtures::default_scenario());
        assert_eq!(state.companies.len(), 2);
        assert_eq!(state.projects_of(8089).len(), 3);
        assert_eq!(state.direct_costs_of(2783683).len(), 4);
        assert!(state.projects_of(3829260).is_empty());
    }

    #[test]
    fn test_create_direct_cost_assigns_next_id() {
        let mut state = MockState::new().with_direct_cost(10, Fixtures::direct_cost(7, "Invoice"));

        let mut item = Record::new();
        item.insert("direct_cost_type".to_string(), "Expense".into());
        let created = state.create_direct_cost(11, item).unwrap();

        assert_eq!(created.id, 8);
        assert_eq!(created.status.as_deref(), Some("draft"));
        assert_eq!(state.direct_costs_of(11).len(), 1);
    }

    #[test]
    fn test_state_attach() {
        let mut state = MockState::new().with_direct_cost(10, Fixtures::direct_cost(7, "Invoice"));

        let parts = vec![ReceivedPart {
            field: "attachments[0]".to_string(),
            file_name: Some("receipt.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            size: 12,
        }];
        let updated = state.attach(10, 7, parts).unwrap();
        assert_eq!(updated.attachments.len(), 1);
        assert_eq!(updated.attachments[0].name.as_deref(), Some("receipt.pdf"));
        assert_eq!(state.uploads.len(), 1);

        assert!(state.attach(10, 8, Vec::new()).is_none());
    }
}
