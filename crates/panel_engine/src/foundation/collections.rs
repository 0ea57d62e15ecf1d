//! Specialized collection types

pub use slotmap::{SlotMap, DefaultKey};

/// Handle-based map using slot map for stable, generation-checked references
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Handle type for stable references
pub type Handle = DefaultKey;

/// Monotonic id source for objects that must be told apart across instances
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: std::sync::atomic::AtomicU64,
}

impl IdAllocator {
    /// Create an allocator starting at zero
    pub const fn new() -> Self {
        Self {
            next: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Hand out the next id
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_stale_handle_rejected_after_clear() {
        let mut map: HandleMap<u32> = HandleMap::new();
        let handle = map.insert(7);
        map.clear();
        let _fresh = map.insert(8);
        assert!(map.get(handle).is_none());
    }
}
