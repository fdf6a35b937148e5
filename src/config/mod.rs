//! Configuration management for the rating systems and the CLI
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for both rating systems.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, LoggingSettings, SystemKind};
pub use rating::{Glicko2Config, GlickoConfig};
