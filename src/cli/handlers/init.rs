//! Database initialization handlers

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::AppConfig;
use crate::Result;

/// Handle database initialization command
pub async fn handle_init_command(config: &AppConfig, force: bool, reset: bool) -> Result<()> {
    if !force {
        print_warning("This will initialize the discovery schema and create indexes.");
        print_warning("This operation is safe - it uses CREATE IF NOT EXISTS.");
        if reset {
            print_warning("--reset will DROP the existing discovery tables first.");
        }
        println!("\nUse --force to proceed.");
        return Ok(());
    }

    let database = Database::from_config(config).await?;

    if reset {
        print_info("🗑️  Dropping existing discovery tables...");
        database.drop_schema().await?;
    }

    print_info("🗄️  Initializing CourseScout database...");
    database.init_schema().await?;

    print_success(
        "Tables created: courses, course_metrics, requirements, \
         course_requirements, comment_chunks",
    );
    print_success(&format!(
        "Vector column configured: vector({})",
        config.embedding_dimension()
    ));
    Ok(())
}
