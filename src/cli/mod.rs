//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the procore binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::Identifier;
use crate::pagination::DEFAULT_PER_PAGE;

/// Procore API command-line interface.
///
/// Credentials are read from `CLIENT_ID` and `CLIENT_SECRET`.
#[derive(Parser, Debug)]
#[command(name = "procore", about = "Procore API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// OAuth server base URL.
    #[arg(long, global = true, env = "PROCORE_OAUTH_URL")]
    pub oauth_url: Option<String>,

    /// REST API base URL.
    #[arg(long, global = true, env = "PROCORE_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the credentials can obtain an access token.
    Token,

    /// List every entity of a kind, following pagination to the end.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Company ID (required for projects and direct costs).
        #[arg(long)]
        company: Option<u64>,

        /// Project ID (required for direct costs).
        #[arg(long)]
        project: Option<u64>,

        /// Number of items requested per page.
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,
    },

    /// Get a single direct cost by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: u64,

        /// Company ID.
        #[arg(long)]
        company: u64,

        /// Project ID.
        #[arg(long)]
        project: u64,
    },

    /// Find a company or project by ID or exact name.
    Find {
        /// The type of entity to find.
        entity: Entity,

        /// Numeric ID or exact name.
        identifier: Identifier,

        /// Company ID (required for projects).
        #[arg(long)]
        company: Option<u64>,
    },

    /// Attach files to a direct cost.
    Attach {
        /// Company ID.
        #[arg(long)]
        company: u64,

        /// Project ID.
        #[arg(long)]
        project: u64,

        /// Direct cost ID.
        #[arg(long)]
        direct_cost: u64,

        /// Files to attach, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A company the app is installed in.
    #[value(alias = "companies")]
    Company,
    /// A project of a company.
    #[value(alias = "projects")]
    Project,
    /// A direct cost of a project.
    #[value(alias = "direct-costs")]
    DirectCost,
}
