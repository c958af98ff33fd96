//! Basic example demonstrating the Procore API client.
//!
//! Run with:
//! ```
//! CLIENT_ID=your-id CLIENT_SECRET=your-secret cargo run --example basic -- <company name or id> [files...]
//! ```

use procore_api::{
    Company, CompanyListQuery, DirectCost, DirectCostKey, DirectCostListQuery, Identifier, List,
    ProcoreClient, Project, ProjectListQuery,
};

#[tokio::main]
async fn main() -> procore_api::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let company_arg: Option<Identifier> = args.next().and_then(|a| a.parse().ok());
    let files: Vec<String> = args.collect();

    // Exchange credentials from environment variables for a token
    println!("Connecting to Procore...");
    let client = ProcoreClient::from_env().await?;
    println!("Connected to: {}", client.base_url());

    // List every company the app is installed in
    println!("\n--- Companies ---");
    let companies = Company::list_all(&client, &CompanyListQuery).await?;
    for company in &companies {
        println!("  - {} ({})", company.name, company.id);
    }

    let company = match company_arg {
        Some(identifier) => Company::find(&client, &identifier).await?,
        None => match companies.into_iter().next() {
            Some(company) => company,
            None => {
                println!("No companies available");
                return Ok(());
            }
        },
    };

    // List the company's projects
    println!("\n--- Projects of {} ---", company.name);
    let projects = Project::list_all(&client, &ProjectListQuery::new(company.id)).await?;
    println!("Found {} projects", projects.len());
    for project in projects.iter().take(10) {
        println!(
            "  - {} {}",
            project.project_number.as_deref().unwrap_or("-"),
            project.name
        );
    }

    let Some(project) = projects.first() else {
        println!("\nDone!");
        return Ok(());
    };

    // List the first project's direct costs
    println!("\n--- Direct Costs of {} ---", project.name);
    let costs =
        DirectCost::list_all(&client, &DirectCostListQuery::new(company.id, project.id)).await?;
    println!("Found {} direct costs", costs.len());
    for cost in costs.iter().take(5) {
        println!(
            "  {} - {} ({} attachments)",
            cost.id,
            cost.direct_cost_type.as_deref().unwrap_or("unknown"),
            cost.attachments.len()
        );
    }

    // Attach files to the first cost, if any were given
    if let (Some(cost), false) = (costs.first(), files.is_empty()) {
        println!("\n--- Attaching {} files to {} ---", files.len(), cost.id);
        let key = DirectCostKey::new(company.id, project.id, cost.id);
        let updated = DirectCost::attach(&client, key, &files).await?;
        println!("Updated direct cost {}", updated["id"]);
    }

    println!("\nDone!");
    Ok(())
}
