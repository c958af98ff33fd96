//! Pagination for Procore list endpoints.
//!
//! Procore list endpoints return a bare JSON array per page and give no
//! total or "last page" marker. The only way to know a collection is
//! exhausted is to request the next page and get an empty array back, so
//! [`fetch_all`] always ends with one request that returns no records.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{read_json, ProcoreClient};
use crate::error::{json_kind, ProcoreError, Result};

/// Default page size for list operations.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Query parameter names owned by the paginator.
const RESERVED_PARAMS: [&str; 2] = ["page", "per_page"];

/// An untyped API record.
pub type Record = serde_json::Map<String, Value>;

/// The per-endpoint half of a paginated fetch: where to send requests and
/// which query parameters and headers stay the same on every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEndpoint {
    path: String,
    fixed_params: Vec<(String, String)>,
    company_id: Option<u64>,
}

impl ListEndpoint {
    /// An endpoint at `path`, relative to the API base URL.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fixed_params: Vec::new(),
            company_id: None,
        }
    }

    /// Add a query parameter sent with every page.
    ///
    /// Setting the same key twice keeps the last value. `page` and
    /// `per_page` belong to the paginator and are ignored here.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        if RESERVED_PARAMS.contains(&key.as_str()) {
            tracing::warn!(param = %key, "ignoring reserved pagination parameter");
            return self;
        }

        let value = value.to_string();
        match self.fixed_params.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.fixed_params.push((key, value)),
        }
        self
    }

    /// Send the `Procore-Company-Id` header with every page.
    #[must_use]
    pub fn company_scoped(mut self, company_id: u64) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn fixed_params(&self) -> &[(String, String)] {
        &self.fixed_params
    }

    pub fn company_id(&self) -> Option<u64> {
        self.company_id
    }

    /// Describe the fetch of one page of this endpoint.
    pub fn page(&self, page: u32, per_page: u32) -> PageRequest<'_> {
        PageRequest {
            endpoint: self,
            page,
            per_page,
        }
    }
}

/// One page fetch against a [`ListEndpoint`].
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub endpoint: &'a ListEndpoint,
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of records per page.
    pub per_page: u32,
}

impl PageRequest<'_> {
    /// The full query string pairs: fixed params, then `page` and `per_page`.
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = self.endpoint.fixed_params.clone();
        query.push(("page".to_string(), self.page.to_string()));
        query.push(("per_page".to_string(), self.per_page.to_string()));
        query
    }

    fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(ProcoreError::InvalidArgument(
                "page numbers start at 1".to_string(),
            ));
        }
        validate_per_page(self.per_page)
    }
}

fn validate_per_page(per_page: u32) -> Result<()> {
    if per_page == 0 {
        return Err(ProcoreError::InvalidArgument(
            "per_page must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// A page of results from the Procore API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Requested number of items per page.
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, per_page: u32) -> Self {
        Self {
            items,
            page,
            per_page,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
        }
    }

    /// Returns true if this page has no items.
    ///
    /// An empty page is the end of the collection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Fetch a single page.
///
/// # Errors
///
/// Returns an error if the request fails, the status is not a success, or
/// the body is not a JSON array of records.
#[tracing::instrument(skip(client, request), fields(path = %request.endpoint.path, page = request.page))]
pub async fn fetch_page<T: DeserializeOwned>(
    client: &ProcoreClient,
    request: &PageRequest<'_>,
) -> Result<Page<T>> {
    request.validate()?;

    let endpoint = request.endpoint;
    let response = client
        .get_with_query(endpoint.path(), endpoint.company_id(), &request.query())
        .await?;
    let items = parse_records(read_json(response).await?)?;

    tracing::debug!(records = items.len(), "fetched page");
    Ok(Page::new(items, request.page, request.per_page))
}

/// Fetch every page of `endpoint`, in order, until a page comes back empty.
///
/// A short page does not end the fetch; only an empty one does. Any error
/// aborts the fetch and the records gathered so far are dropped.
///
/// # Errors
///
/// Returns the first error from any page request.
#[tracing::instrument(skip(client, endpoint), fields(path = %endpoint.path))]
pub async fn fetch_all<T: DeserializeOwned>(
    client: &ProcoreClient,
    endpoint: &ListEndpoint,
    per_page: u32,
) -> Result<Vec<T>> {
    validate_per_page(per_page)?;

    let mut all_items = Vec::new();
    let mut page = 1;

    loop {
        let result = fetch_page::<T>(client, &endpoint.page(page, per_page)).await?;
        if result.is_empty() {
            break;
        }
        all_items.extend(result.items);
        page += 1;
    }

    tracing::debug!(requests = page, records = all_items.len(), "fetched collection");
    Ok(all_items)
}

fn parse_records<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<core::result::Result<Vec<T>, _>>()
            .map_err(ProcoreError::from),
        other => Err(ProcoreError::UnexpectedShape {
            expected: "array",
            found: json_kind(&other),
        }),
    }
}
