//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{Company, CompanyRef, DirectCost, Project, Record, VendorRef};

/// Company used by the default scenario.
pub const DEFAULT_COMPANY_ID: u64 = 8089;

/// Project used by the default scenario.
pub const DEFAULT_PROJECT_ID: u64 = 2783683;

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Create an active company.
    pub fn company(id: u64, name: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            is_active: Some(true),
            extra: Record::new(),
        }
    }

    /// Create an active project owned by `company_id`.
    pub fn project(id: u64, name: &str, company_id: u64) -> Project {
        Project {
            id,
            name: name.to_string(),
            display_name: Some(format!("{id} - {name}")),
            project_number: Some(id.to_string()),
            active: Some(true),
            company: Some(CompanyRef {
                id: company_id,
                name: None,
            }),
            created_at: None,
            updated_at: None,
            extra: Record::new(),
        }
    }

    /// Create a draft direct cost without attachments.
    pub fn direct_cost(id: u64, direct_cost_type: &str) -> DirectCost {
        DirectCost {
            id,
            direct_cost_type: Some(direct_cost_type.to_string()),
            status: Some("draft".to_string()),
            description: None,
            invoice_number: None,
            direct_cost_date: Some("2024-03-15".to_string()),
            vendor: None,
            attachments: Vec::new(),
            created_at: None,
            updated_at: None,
            extra: Record::new(),
        }
    }

    /// Create an invoice from a vendor.
    pub fn vendor_invoice(id: u64, invoice_number: &str, vendor_name: &str) -> DirectCost {
        let mut dc = Self::direct_cost(id, "Invoice");
        dc.invoice_number = Some(invoice_number.to_string());
        dc.vendor = Some(VendorRef {
            id: id + 1000,
            name: Some(vendor_name.to_string()),
        });
        dc
    }

    /// `count` direct costs with consecutive ids starting at `first_id`.
    pub fn direct_costs(first_id: u64, count: usize) -> Vec<DirectCost> {
        (0..count as u64)
            .map(|i| Self::direct_cost(first_id + i, "Expense"))
            .collect()
    }

    /// Get the default test scenario.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// Default scenario: two companies, three projects in the first, and a
/// handful of direct costs in its sandbox project.
pub struct DefaultScenario {
    pub companies: Vec<Company>,
    pub projects: Vec<(u64, Project)>,
    pub direct_costs: Vec<(u64, DirectCost)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let companies = vec![
            Fixtures::company(DEFAULT_COMPANY_ID, "Rogers-O`Brien Construction"),
            Fixtures::company(3829260, "Sandbox Company"),
        ];

        let projects = vec![
            (
                DEFAULT_COMPANY_ID,
                Fixtures::project(DEFAULT_PROJECT_ID, "Sandbox Test Project", DEFAULT_COMPANY_ID),
            ),
            (
                DEFAULT_COMPANY_ID,
                Fixtures::project(2783684, "Downtown Office Tower", DEFAULT_COMPANY_ID),
            ),
            (
                DEFAULT_COMPANY_ID,
                Fixtures::project(2783685, "Hospital Expansion", DEFAULT_COMPANY_ID),
            ),
        ];

        let direct_costs = vec![
            Fixtures::vendor_invoice(95483758, "INV-1001", "Acme Concrete"),
            Fixtures::vendor_invoice(95483759, "INV-1002", "Lone Star Steel"),
            Fixtures::direct_cost(95483760, "Expense"),
            Fixtures::direct_cost(95483761, "Payroll"),
        ]
        .into_iter()
        .map(|dc| (DEFAULT_PROJECT_ID, dc))
        .collect();

        Self {
            companies,
            projects,
            direct_costs,
        }
    }
}
