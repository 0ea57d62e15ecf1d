//! Scene lookup
//!
//! The host keeps a name → live object index next to its scene graph, so
//! lookups are a hash lookup instead of a walk over every root's subtree.
//!
//! ## Architecture
//!
//! ```text
//! Scene graph (host)
//!      ↓ register / unregister on spawn / despawn
//! NameRegistry
//!      ↓ find_by_name
//! PanelManager
//! ```

mod registry;

pub use registry::{NameRegistry, DuplicatePolicy, RegistryError};

/// Name based lookup of live objects, implemented by the scene host
pub trait SceneRegistry<T> {
    /// Find the live object registered under `name`
    fn find_by_name(&self, name: &str) -> Option<T>;
}
