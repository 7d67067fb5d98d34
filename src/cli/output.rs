//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `CourseScout` CLI

use crate::errors::CourseScoutError;
use crate::models::DiscoveryResponse;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Prevents panics when truncating strings with multi-byte UTF-8 characters.
/// Appends "..." when the input was truncated.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

fn rating(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Print discovery results
pub fn print_discovery_results(response: &DiscoveryResponse) {
    println!("Candidates after filters: {}", response.total_candidates);

    if response.courses.is_empty() {
        println!("No matching courses.");
        return;
    }

    println!();
    for (idx, course) in response.courses.iter().enumerate() {
        let score = course
            .similarity_score
            .map_or_else(String::new, |s| format!(" | Score: {s:.3}"));
        println!("{}. {} - {}{}", idx + 1, course.code, course.title, score);
        println!(
            "   Course rating: {} | Instruction rating: {} | Hours/week: {}",
            rating(course.course_rating_avg),
            rating(course.instruction_rating_avg),
            course.hours_per_week_mode.as_deref().unwrap_or("n/a")
        );
        for snippet in &course.matching_snippets {
            println!(
                "     [{:.3}] \"{}\"",
                snippet.similarity,
                truncate_str(&snippet.content, 120)
            );
        }
        println!();
    }
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 CourseScout Configuration:");
    println!();

    println!("🗄️  Database:");
    println!("  URL: {}", mask_database_url(config.database_url()));
    println!("  Max connections: {}", config.max_connections());
    println!("  Min connections: {}", config.min_connections());
    println!("  Connection timeout: {}s", config.connection_timeout());
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {:?}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!(
        "  API key: {}",
        if config.embeddings.api_key.is_some() { "set" } else { "not set" }
    );
    println!(
        "  Query cache: {} (capacity {})",
        config.embeddings.enable_cache, config.embeddings.cache_capacity
    );
    println!();

    let d = config.discovery();
    println!("🔎 Discovery:");
    println!("  Max candidates: {}", d.max_candidates);
    println!("  Chunk similarity floor: {}", d.chunk_similarity_floor);
    println!("  Chunk search limit: {}", d.chunk_search_limit);
    println!("  Snippets per course: {}", d.snippets_per_course);
    println!("  Course score floor: {}", d.course_score_floor);
    println!("  Max results: {}", d.max_results);
    println!("  Query-less result limit: {}", d.no_query_result_limit);
    println!("  Chunk types: {}", d.chunk_types.join(", "));
    println!("  Remote call timeout: {}ms", d.remote_call_timeout_ms);
    println!("  ivfflat probes: {}", d.ivfflat_probes);
    println!();

    println!("🌐 Server:");
    println!("  Bind: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.enable_cors);
    println!("  Max concurrent requests: {}", config.server.max_concurrent_requests);
}

/// Mask database URL for logging (hide password)
fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            format!(
                "{}://{}@{}:{}",
                parsed.scheme(),
                parsed.username(),
                host,
                parsed.port().unwrap_or(5432)
            )
        } else {
            "***masked***".to_string()
        }
    } else {
        "***invalid***".to_string()
    }
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}

/// One-line summary of a failed command, tagged with the error kind
pub fn error_line(err: &CourseScoutError) -> String {
    format!("{err} [{}]", err.kind())
}
