use clap::Parser;
use coursescout::cli::handle_config_command;
use coursescout::cli::handle_discover_command;
use coursescout::cli::handle_init_command;
use coursescout::cli::handle_serve_api;
use coursescout::cli::error_line;
use coursescout::cli::print_error;
use coursescout::cli::Cli;
use coursescout::cli::Commands;
use coursescout::config::AppConfig;
use coursescout::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    if cli.verbose {
        coursescout::logging::init_logging_with_level("debug")?;
    } else {
        coursescout::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    let result = match cli.command {
        Commands::Init { force, reset } => handle_init_command(&config, force, reset).await,
        Commands::Discover(args) => handle_discover_command(&config, &args).await,
        Commands::Serve { host, port, cors } => handle_serve_api(&config, host, port, cors).await,
        Commands::Config => handle_config_command(&config),
    };

    if let Err(e) = &result {
        print_error(&error_line(e));
    }
    result
}
