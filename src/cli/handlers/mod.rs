//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - init: Database schema initialization
//! - discover: One-shot course discovery
//! - serve: API server
//! - info: Configuration display

pub mod discover;
pub mod info;
pub mod init;
pub mod serve;

// Re-export all public handlers
pub use discover::*;
pub use info::*;
pub use init::*;
pub use serve::*;
