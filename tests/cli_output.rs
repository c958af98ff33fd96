//! CLI output formatting tests: JSON with `--json`, pretty-print otherwise.

use procore_api::{Company, DirectCost, PrettyPrint, Project};
use serde_json::json;

fn make_test_company() -> Company {
    serde_json::from_value(json!({
        "id": 8089,
        "name": "Rogers-O`Brien Construction",
        "is_active": true,
        "logo_url": null
    }))
    .unwrap()
}

fn make_test_project() -> Project {
    serde_json::from_value(json!({
        "id": 2783683,
        "name": "Sandbox Test Project",
        "project_number": "1234",
        "active": true,
        "company": { "id": 8089, "name": "Rogers-O`Brien Construction" },
        "created_at": "2023-02-01T15:04:05Z"
    }))
    .unwrap()
}

fn make_test_direct_cost() -> DirectCost {
    serde_json::from_value(json!({
        "id": 95483758,
        "direct_cost_type": "Invoice",
        "status": "approved",
        "invoice_number": "INV-1001",
        "direct_cost_date": "2024-03-15",
        "vendor": { "id": 12, "name": "Acme Concrete" },
        "attachments": [
            { "id": 1, "name": "invoice.pdf", "url": "https://storage.procore.test/1" }
        ],
        "grand_total": "1250.0"
    }))
    .unwrap()
}

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_output_keeps_unmodelled_fields() {
    let direct_cost = make_test_direct_cost();
    let parsed: serde_json::Value =
        serde_json::from_str(&serde_json::to_string_pretty(&direct_cost).unwrap()).unwrap();

    assert_eq!(parsed["id"], 95483758);
    assert_eq!(parsed["invoice_number"], "INV-1001");
    // Flattened extra fields go back out at the top level
    assert_eq!(parsed["grand_total"], "1250.0");
    assert!(parsed.get("extra").is_none());
}

#[test]
fn test_json_list_outputs_array() {
    let companies = vec![make_test_company(), make_test_company()];
    let parsed: serde_json::Value =
        serde_json::from_str(&serde_json::to_string_pretty(&companies).unwrap()).unwrap();

    assert!(parsed.is_array());
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    assert!(parsed[0].get("logo_url").is_some());
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let output = make_test_project().pretty_print();
    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&output);
    assert!(parse_result.is_err(), "Default output should NOT be valid JSON");
}

#[test]
fn test_company_pretty_print_shows_key_fields() {
    let output = make_test_company().pretty_print();

    assert!(output.starts_with("Company #8089"));
    assert!(output.contains("Name:           Rogers-O`Brien Construction"));
    assert!(output.contains("Active:         yes"));
}

#[test]
fn test_project_pretty_print_shows_key_fields() {
    let output = make_test_project().pretty_print();

    assert!(output.starts_with("Project #2783683"));
    assert!(output.contains("Number:         1234"));
    assert!(output.contains("Company:        Rogers-O`Brien Construction (8089)"));
    assert!(output.contains("Created:        2023-02-01 15:04:05 UTC"));
}

#[test]
fn test_direct_cost_pretty_print_shows_key_fields() {
    let output = make_test_direct_cost().pretty_print();

    assert!(output.contains("Type:           Invoice"));
    assert!(output.contains("Status:         approved"));
    assert!(output.contains("Vendor:         Acme Concrete"));
    assert!(output.contains("Attachments:    invoice.pdf"));
}

#[test]
fn test_pretty_print_skips_missing_fields() {
    let direct_cost: DirectCost = serde_json::from_value(json!({ "id": 1 })).unwrap();
    let output = direct_cost.pretty_print();

    assert!(!output.contains("Vendor:"));
    assert!(!output.contains("Attachments:"));
    assert_eq!(output.lines().count(), 2);
}
