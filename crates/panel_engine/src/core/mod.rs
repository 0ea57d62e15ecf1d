//! # Core Engine Module
//!
//! Shared abstractions the other subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for panels, pools and logging
//! - **Foundation**: Low-level utilities (collections, singletons, logging)
//! - **Assets**: Asset loading and instantiation contracts

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;
pub use crate::assets;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    PanelConfig,
    PoolConfig,
    Config,
    ConfigError,
};
