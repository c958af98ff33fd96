//! Procore API client library.
//!
//! A Rust library for the Procore construction-management REST API:
//! companies, projects, direct costs and direct-cost attachments. Each
//! operation (Get, List) is defined as a trait that entity types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use procore_api::{
//!     Company, CompanyListQuery, DirectCost, DirectCostKey, DirectCostListQuery, List,
//!     ProcoreClient, Project, ProjectListQuery,
//! };
//!
//! #[tokio::main]
//! async fn main() -> procore_api::Result<()> {
//!     // Exchange CLIENT_ID / CLIENT_SECRET for a token
//!     let client = ProcoreClient::from_env().await?;
//!
//!     // List all companies, following pagination to the end
//!     let companies = Company::list_all(&client, &CompanyListQuery).await?;
//!     println!("Found {} companies", companies.len());
//!
//!     // List projects and direct costs
//!     let projects = Project::list_all(&client, &ProjectListQuery::new(8089)).await?;
//!     let costs =
//!         DirectCost::list_all(&client, &DirectCostListQuery::new(8089, projects[0].id)).await?;
//!
//!     // Attach a receipt to the first cost
//!     let key = DirectCostKey::new(8089, projects[0].id, costs[0].id);
//!     DirectCost::attach(&client, key, &["receipt.pdf"]).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`TokenProvider`] - client-credentials token exchange
//! - [`ProcoreClient`] - authenticated HTTP transport
//! - [`List`] - paginated collections, backed by [`pagination::fetch_all`]
//! - [`Get`] - single entities
//! - [`attachments`] - multipart uploads onto a direct cost
//!
//! # Configuration
//!
//! - `CLIENT_ID`, `CLIENT_SECRET` (required) - app credentials
//! - `PROCORE_OAUTH_URL` (optional) - defaults to `https://login.procore.com`
//! - `PROCORE_API_URL` (optional) - defaults to `https://api.procore.com`

pub mod attachments;
mod auth;
pub mod cli;
mod client;
mod error;
mod models;
mod output;
pub mod pagination;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::{AccessToken, Credentials, TokenProvider, OOB_REDIRECT_URI};
pub use client::{ClientConfig, ProcoreClient, COMPANY_HEADER};
pub use error::{ProcoreError, Result};
pub use output::PrettyPrint;
pub use pagination::{ListEndpoint, Page, PageRequest, Record, DEFAULT_PER_PAGE};

// Re-export traits
pub use traits::{Get, List};

// Re-export models
pub use models::{
    AttachmentInfo, Company, CompanyListQuery, CompanyRef, DirectCost, DirectCostKey,
    DirectCostListQuery, Identifier, Project, ProjectListQuery, VendorRef,
};
