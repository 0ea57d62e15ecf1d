//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Collections and identity handles
//! - Lazy process-wide singletons
//! - Logging utilities

pub mod collections;
pub mod singleton;
pub mod logging;
