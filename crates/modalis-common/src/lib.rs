//! modalis-common — Shared error taxonomy and configuration used across all Modalis crates.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{Config, DatasetsConfig, MoaConfig, MoaMode, PathsConfig, VocabularyConfig};
pub use error::{ModalisError, Result};
