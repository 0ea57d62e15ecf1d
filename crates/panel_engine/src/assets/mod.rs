//! Asset loading and instantiation contracts
//!
//! The host engine owns the scene graph and the asset store. Pools and the
//! panel manager only talk to it through these traits:
//!
//! ```text
//! path ──AssetLoader::load──▶ Template ──Instantiator::instantiate──▶ live object
//!                                            ▲
//!                                   attachment (parent)
//! ```
//!
//! Loading is asynchronous (the caller suspends while the rest of the frame
//! keeps running); instantiation is synchronous.

use async_trait::async_trait;
use thiserror::Error;

/// Resolves creation templates (blueprints) by path
#[async_trait(?Send)]
pub trait AssetLoader {
    /// The loaded blueprint new objects are stamped from
    type Template;

    /// Load the template stored at `path`
    async fn load(&self, path: &str) -> Result<Self::Template, AssetError>;
}

/// Produces live objects of type `T` from a loaded template
pub trait Instantiator<T>: AssetLoader {
    /// Placement context, typically the parent node new objects hang under
    type Attachment;

    /// Stamp out a new `T`, optionally as a child of `parent`.
    ///
    /// Fails with [`AssetError::ComponentMissing`] when the new object does
    /// not carry the capability `T` stands for.
    fn instantiate(
        &self,
        template: &Self::Template,
        parent: Option<&Self::Attachment>,
    ) -> Result<T, AssetError>;
}

/// Asset loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Template loaded but the host could not build an object from it
    #[error("Instantiation failed: {0}")]
    InstantiationFailed(String),

    /// The new object lacks the requested capability
    #[error("Missing component: {0}")]
    ComponentMissing(String),
}
