//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Company, DirectCost, Project};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

impl PrettyPrint for Company {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Company #{}", self.id));
        lines.push(format!("Name:           {}", self.name));

        if let Some(active) = self.is_active {
            lines.push(format!("Active:         {}", if active { "yes" } else { "no" }));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Project #{}", self.id));
        lines.push(format!("Name:           {}", self.name));

        if let Some(ref number) = self.project_number {
            lines.push(format!("Number:         {}", number));
        }

        if let Some(ref company) = self.company {
            match company.name {
                Some(ref name) => lines.push(format!("Company:        {} ({})", name, company.id)),
                None => lines.push(format!("Company:        {}", company.id)),
            }
        }

        if let Some(active) = self.active {
            lines.push(format!("Active:         {}", if active { "yes" } else { "no" }));
        }

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for DirectCost {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Direct Cost #{}", self.id));

        if let Some(ref kind) = self.direct_cost_type {
            lines.push(format!("Type:           {}", kind));
        }

        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {}", status));
        }

        if let Some(ref date) = self.direct_cost_date {
            lines.push(format!("Date:           {}", date));
        }

        if let Some(ref invoice) = self.invoice_number {
            lines.push(format!("Invoice:        {}", invoice));
        }

        if let Some(ref vendor) = self.vendor {
            lines.push(format!(
                "Vendor:         {}",
                vendor.name.clone().unwrap_or_else(|| vendor.id.to_string())
            ));
        }

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        // Attachment names
        if !self.attachments.is_empty() {
            let names: Vec<&str> = self
                .attachments
                .iter()
                .map(|a| a.name.as_deref().unwrap_or("(unnamed)"))
                .collect();
            lines.push(format!("Attachments:    {}", names.join(", ")));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_cost_pretty_print_format() {
        let dc: DirectCost = serde_json::from_value(serde_json::json!({
            "id": 95483758,
            "direct_cost_type": "Invoice",
            "attachments": [{ "name": "invoice.pdf" }, {}]
        }))
        .unwrap();

        let output = dc.pretty_print();
        assert!(output.starts_with("Direct Cost #95483758"));
        assert!(output.contains("Type:           Invoice"));
        assert!(output.contains("invoice.pdf, (unnamed)"));
    }
}
