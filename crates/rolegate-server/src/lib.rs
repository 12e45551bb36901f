//! rolegate-server: Hosting support for the rolegate enforcer
//!
//! This crate contains everything a host process needs to stand up an
//! enforcer:
//! - Configuration management
//! - Logging setup
//! - Store and enforcer construction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               rolegate-server               │
//! ├─────────────────────────────────────────────┤
//! │  config.rs        - Configuration loading   │
//! │  observability.rs - Logging subscriber      │
//! │  bootstrap.rs     - Store & enforcer wiring │
//! └─────────────────────────────────────────────┘
//! ```

pub mod bootstrap;
pub mod config;
pub mod observability;

// Re-exports for convenience
pub use bootstrap::{build_enforcer, build_store, BootstrapError};
pub use config::{ConfigLoadError, ServerConfig};
pub use observability::{init_logging, LoggingConfig};
