//! CLI command definitions and argument parsing

use clap::Parser;
use clap::Subcommand;

use crate::models::DiscoveryRequest;

#[derive(Parser)]
#[command(name = "coursescout")]
#[command(about = "CourseScout CLI: discover courses from student reviews")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database schema and indexes
    Init {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
        /// Drop existing discovery tables first
        #[arg(long)]
        reset: bool,
    },
    /// Discover courses matching an interest query and filters
    Discover(DiscoverArgs),
    /// Start the HTTP API server
    Serve {
        /// Host to bind (default from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable permissive CORS
        #[arg(long)]
        cors: bool,
    },
    /// Show current configuration
    Config,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct DiscoverArgs {
    /// Free-text interest query; omit to only count candidates
    pub query: Option<String>,
    /// Minimum average course rating
    #[arg(long)]
    pub min_course_rating: Option<f64>,
    /// Maximum average course rating
    #[arg(long)]
    pub max_course_rating: Option<f64>,
    /// Minimum average instruction rating
    #[arg(long)]
    pub min_instruction_rating: Option<f64>,
    /// Maximum average instruction rating
    #[arg(long)]
    pub max_instruction_rating: Option<f64>,
    /// Workload bucket, e.g. "4 - 7" (repeatable)
    #[arg(long = "hours")]
    pub hours_buckets: Vec<String>,
    /// Requirement ID the course must satisfy (repeatable, all must match)
    #[arg(long = "requirement")]
    pub requirement_ids: Vec<String>,
    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

impl DiscoverArgs {
    pub fn to_request(&self) -> DiscoveryRequest {
        DiscoveryRequest {
            query: self.query.clone(),
            min_course_rating: self.min_course_rating,
            max_course_rating: self.max_course_rating,
            min_instruction_rating: self.min_instruction_rating,
            max_instruction_rating: self.max_instruction_rating,
            hours_buckets: self.hours_buckets.clone(),
            requirement_ids: self.requirement_ids.clone(),
        }
    }
}
