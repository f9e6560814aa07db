//! # Core Module
//!
//! Shared abstractions used by the parsers and post-processing passes.
//!
//! ## Organization
//!
//! - **Config**: Import configuration consumed by the OBJ parser

pub mod config;

pub use config::{ImportConfig, IndexPolicy, PostProcessFlags};
