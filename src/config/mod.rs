//! Configuration module for page comparison
//!
//! This module provides the `CompareConfig` struct and its type-safe builder
//! for configuring comparisons with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{CompareConfigBuilder, WithLiveDomain};
pub use types::{
    BlockedResourceType, CompareConfig, ExtractionMode, FetchConfig, OutputMode, StrategyPolicy,
    TextConversion,
};
