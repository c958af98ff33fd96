//! Procore API CLI binary.
//!
//! A command-line interface for interacting with the Procore API.

use std::process::ExitCode;

use clap::Parser;
use procore_api::cli::{Cli, Command, Entity};
use procore_api::{
    ClientConfig, Company, CompanyListQuery, Credentials, DirectCost, DirectCostKey,
    DirectCostListQuery, Get, Identifier, List, PrettyPrint, ProcoreClient, ProcoreError,
    Project, ProjectListQuery, TokenProvider,
};
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set CLIENT_ID and CLIENT_SECRET environment variables");
            return ExitCode::FAILURE;
        }
    };

    let mut config = ClientConfig::default();
    if let Some(ref url) = cli.oauth_url {
        config.oauth_url = url.clone();
    }
    if let Some(ref url) = cli.api_url {
        config.api_url = url.clone();
    }

    match run(&credentials, &config, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(credentials: &Credentials, config: &ClientConfig, cli: Cli) -> procore_api::Result<()> {
    let connect = || ProcoreClient::connect(credentials, config);

    match cli.command {
        Command::Token => {
            TokenProvider::new(config)?.exchange(credentials).await?;
            println!("Successfully obtained access token");
            Ok(())
        }
        Command::List {
            entity,
            company,
            project,
            per_page,
        } => handle_list(&connect().await?, entity, company, project, per_page, cli.json).await,
        Command::Get {
            entity,
            id,
            company,
            project,
        } => handle_get(&connect().await?, entity, id, company, project, cli.json).await,
        Command::Find {
            entity,
            identifier,
            company,
        } => handle_find(&connect().await?, entity, &identifier, company, cli.json).await,
        Command::Attach {
            company,
            project,
            direct_cost,
            files,
        } => {
            let client = connect().await?;
            let key = DirectCostKey::new(company, project, direct_cost);
            let response = DirectCost::attach(&client, key, &files).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}

fn require(value: Option<u64>, flag: &str, entity: &Entity) -> procore_api::Result<u64> {
    value.ok_or_else(|| {
        ProcoreError::InvalidArgument(format!("--{flag} is required for {entity:?}"))
    })
}

async fn handle_list(
    client: &ProcoreClient,
    entity: Entity,
    company: Option<u64>,
    project: Option<u64>,
    per_page: u32,
    json: bool,
) -> procore_api::Result<()> {
    match entity {
        Entity::Company => {
            let companies =
                Company::list_all_with_page_size(client, &CompanyListQuery, per_page).await?;
            output_list(&companies, json, |c| CompanyRow::from(c))?;
        }
        Entity::Project => {
            let query = ProjectListQuery::new(require(company, "company", &entity)?);
            let projects = Project::list_all_with_page_size(client, &query, per_page).await?;
            output_list(&projects, json, |p| ProjectRow::from(p))?;
        }
        Entity::DirectCost => {
            let query = DirectCostListQuery::new(
                require(company, "company", &entity)?,
                require(project, "project", &entity)?,
            );
            let costs = DirectCost::list_all_with_page_size(client, &query, per_page).await?;
            output_list(&costs, json, |d| DirectCostRow::from(d))?;
        }
    }
    Ok(())
}

async fn handle_get(
    client: &ProcoreClient,
    entity: Entity,
    id: u64,
    company: u64,
    project: u64,
    json: bool,
) -> procore_api::Result<()> {
    match entity {
        Entity::DirectCost => {
            let direct_cost = DirectCost::get(client, DirectCostKey::new(company, project, id)).await?;
            output_single(&direct_cost, json)
        }
        _ => {
            eprintln!("Hint: Use 'procore find {entity:?} <id>' for companies and projects");
            Err(ProcoreError::InvalidArgument(
                "only direct costs can be fetched by id".to_string(),
            ))
        }
    }
}

async fn handle_find(
    client: &ProcoreClient,
    entity: Entity,
    identifier: &Identifier,
    company: Option<u64>,
    json: bool,
) -> procore_api::Result<()> {
    match entity {
        Entity::Company => {
            let company = Company::find(client, identifier).await?;
            output_single(&company, json)
        }
        Entity::Project => {
            let company_id = require(company, "company", &entity)?;
            let project = Project::find(client, company_id, identifier).await?;
            output_single(&project, json)
        }
        Entity::DirectCost => {
            eprintln!("Hint: Use 'procore get direct-cost <id> --company <id> --project <id>'");
            Err(ProcoreError::InvalidArgument(
                "direct costs are looked up with 'get'".to_string(),
            ))
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> procore_api::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> procore_api::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct CompanyRow {
    id: u64,
    name: String,
    active: String,
}

impl From<&Company> for CompanyRow {
    fn from(c: &Company) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            active: c.is_active.map(|a| a.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ProjectRow {
    id: u64,
    number: String,
    name: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            number: p.project_number.clone().unwrap_or_default(),
            name: p.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct DirectCostRow {
    id: u64,
    #[tabled(rename = "type")]
    kind: String,
    date: String,
    status: String,
    attachments: usize,
}

impl From<&DirectCost> for DirectCostRow {
    fn from(d: &DirectCost) -> Self {
        Self {
            id: d.id,
            kind: d.direct_cost_type.clone().unwrap_or_default(),
            date: d.direct_cost_date.clone().unwrap_or_default(),
            status: d.status.clone().unwrap_or_default(),
            attachments: d.attachments.len(),
        }
    }
}
