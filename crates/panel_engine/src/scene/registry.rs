//! Name registry - unique name → object index

use super::SceneRegistry;
use std::collections::HashMap;
use thiserror::Error;

/// What to do when a name is registered twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Refuse the second registration
    #[default]
    Reject,
    /// The newer object takes over the name
    Replace,
}

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name already taken under [`DuplicatePolicy::Reject`]
    #[error("Name already registered: {0}")]
    DuplicateName(String),
}

/// Index of live objects by unique name
#[derive(Debug, Clone)]
pub struct NameRegistry<T> {
    entries: HashMap<String, T>,
    policy: DuplicatePolicy,
}

impl<T> NameRegistry<T> {
    /// Create a registry that rejects duplicate names
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Reject)
    }

    /// Create a registry with an explicit duplicate policy
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
        }
    }

    /// Register `object` under `name`.
    ///
    /// Returns the object previously holding the name when the policy is
    /// [`DuplicatePolicy::Replace`].
    pub fn register(&mut self, name: impl Into<String>, object: T) -> Result<Option<T>, RegistryError> {
        let name = name.into();
        match self.policy {
            DuplicatePolicy::Reject if self.entries.contains_key(&name) => {
                log::warn!("Refusing duplicate registration of '{}'", name);
                Err(RegistryError::DuplicateName(name))
            }
            _ => {
                let previous = self.entries.insert(name, object);
                Ok(previous)
            }
        }
    }

    /// Remove the object registered under `name`
    pub fn unregister(&mut self, name: &str) -> Option<T> {
        self.entries.remove(name)
    }

    /// Borrow the object registered under `name`
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Whether `name` is taken
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for NameRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> SceneRegistry<T> for NameRegistry<T> {
    fn find_by_name(&self, name: &str) -> Option<T> {
        self.entries.get(name).cloned()
    }
}
