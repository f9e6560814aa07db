//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the loader:
//! - Math types and the small matrix routines used by tangent generation
//! - Logging utilities

pub mod math;
pub mod logging;
