//! One-shot discovery from the command line

use std::sync::Arc;

use crate::cli::commands::DiscoverArgs;
use crate::cli::output::print_discovery_results;
use crate::cli::output::print_info;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::discovery::DiscoveryService;
use crate::AppConfig;
use crate::Result;

pub async fn handle_discover_command(config: &AppConfig, args: &DiscoverArgs) -> Result<()> {
    let request = args.to_request();

    let database = Arc::new(Database::from_config(config).await?);
    database.verify_schema_or_error().await?;
    let embedder = crate::embeddings::provider_from_config(config)?;
    let service = DiscoveryService::from_database(database, embedder, config.discovery.clone());

    if !args.json {
        match request.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => print_info(&format!("🔍 Discovering courses for: \"{query}\"")),
            None => print_warning("No query given; only the candidate count is reported"),
        }
    }

    let response = service.discover(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_discovery_results(&response);
    }

    Ok(())
}
