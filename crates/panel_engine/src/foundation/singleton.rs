//! Lazily-initialized process-wide slot
//!
//! ```rust
//! use panel_engine::foundation::singleton::Singleton;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! static FRAME_COUNTER: Singleton<AtomicU32> = Singleton::new();
//!
//! FRAME_COUNTER.get().fetch_add(1, Ordering::Relaxed);
//! assert_eq!(FRAME_COUNTER.get().load(Ordering::Relaxed), 1);
//! ```
//!
//! Only suitable for `Sync` types. The panel manager is single-threaded and is
//! owned by [`crate::UiContext`] instead.

use std::sync::OnceLock;

/// One lazily constructed instance of `T`, created on first access and kept
/// for the rest of the process.
pub struct Singleton<T> {
    cell: OnceLock<T>,
}

impl<T> Singleton<T> {
    /// Create an empty slot; usable in `static` items
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Whether the instance has been constructed yet
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Default> Singleton<T> {
    /// Get the instance, constructing it on first access.
    ///
    /// Concurrent first accesses block on each other; `T::default` runs once.
    pub fn get(&self) -> &T {
        self.cell.get_or_init(|| {
            log::debug!("Constructing singleton {}", std::any::type_name::<T>());
            T::default()
        })
    }
}

impl<T> Default for Singleton<T> {
    fn default() -> Self {
        Self::new()
    }
}
