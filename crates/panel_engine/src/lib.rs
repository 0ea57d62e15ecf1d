//! # Panel Engine
//!
//! Popup panel orchestration and reusable object pooling for a real-time
//! engine that owns the scene graph.
//!
//! ## Features
//!
//! - **Object Pools**: FIFO recycling of expensive scene objects with checked ownership
//! - **Panel Stack**: lazily created, cached popups layered in show order
//! - **Hide Notifications**: any number of subscribers per panel event
//! - **Host Agnostic**: asset loading, instantiation and scene lookup are traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use panel_engine::prelude::*;
//!
//! let host = Rc::new(MyHost::new());
//! let context: UiContext<UIPanel<Popup>, MyHost> =
//!     UiContext::new(Rc::clone(&host), ApplicationConfig::load_or_default("ui.toml")?)?;
//!
//! context.panels().on_hide(|| log::info!("popup closed"));
//! let settings = context.panels().show(Popup::Settings).await?;
//! context.panels().hide();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod assets;
pub mod scene;
pub mod events;
pub mod pool;
pub mod ui;

mod context;

pub use context::UiContext;

#[cfg(test)]
mod test_support;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        UiContext,
        assets::{AssetError, AssetLoader, Instantiator},
        scene::{NameRegistry, DuplicatePolicy, SceneRegistry},
        events::{Event, EventType, SubscriptionId},
        pool::{ObjectPool, Pooled, Poolable, PoolError, PoolStats, Refused},
        ui::{Panel, PanelError, PanelHandle, PanelHost, PanelKind, PanelManager, UIPanel},
        core::config::{ApplicationConfig, Config, ConfigError, PanelConfig, PoolConfig},
    };
}
