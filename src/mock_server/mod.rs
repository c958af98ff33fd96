//! Mock Procore API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Procore
//! OAuth and REST APIs for integration and end-to-end testing. Unlike
//! wiremock which mocks at the HTTP level per-test, this server maintains
//! state across requests (including a log of every request), enabling
//! realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use procore_api::mock_server::MockServer;
//! use procore_api::{Company, CompanyListQuery, Credentials, List, ProcoreClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let credentials = Credentials::new("id", "secret");
//!     let client = ProcoreClient::connect(&credentials, &server.client_config())
//!         .await
//!         .unwrap();
//!
//!     // Server comes with default fixtures
//!     let companies = Company::list_all(&client, &CompanyListQuery).await.unwrap();
//!     assert_eq!(companies.len(), 2);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures, DEFAULT_COMPANY_ID, DEFAULT_PROJECT_ID};
pub use server::MockServer;
pub use state::{page_of, MockState, ReceivedPart, RecordedRequest};
