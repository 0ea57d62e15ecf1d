//! Object pool with a FIFO idle queue
//!
//! # Architecture
//!
//! ```text
//! ObjectPool
//!     ├── template + attachment (set by initialize, dropped by release)
//!     ├── slots: HandleMap<SlotState>   ownership table, generation checked
//!     └── idle:  VecDeque<(Handle, T)>  oldest released first
//!                     ↓
//!              Pooled<T> handed to callers
//! ```
//!
//! Fabrication and release share one path (`IdleStore::park`), so every
//! object, fresh or returned, has its deactivation hook run before it is
//! handed out again.

use crate::assets::{AssetError, Instantiator};
use crate::foundation::collections::{Handle, HandleMap, IdAllocator};
use std::collections::VecDeque;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use thiserror::Error;

static POOL_IDS: IdAllocator = IdAllocator::new();

/// Lifecycle hooks an object needs to live in an [`ObjectPool`]
pub trait Poolable {
    /// Called when the object is handed to a caller
    fn on_activate(&mut self);

    /// Called when the object goes back to the idle queue
    fn on_deactivate(&mut self);
}

/// Identifies one pool instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(u64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}

/// Object pool errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The template could not be loaded or an object could not be built from it
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(#[from] AssetError),

    /// Initialization failed to load the template, so nothing can be fabricated
    #[error("Template '{path}' never loaded; cannot fabricate")]
    TemplateUnavailable {
        /// Path the pool was initialized with
        path: String,
    },

    /// Operation needs an initialized pool
    #[error("{pool} is not initialized")]
    Uninitialized {
        /// Pool that was asked
        pool: PoolId,
    },

    /// Object was not checked out from this pool (foreign, or orphaned by release)
    #[error("Object is not checked out from {pool}")]
    NotOwned {
        /// Pool that refused the object
        pool: PoolId,
    },
}

/// Snapshot of pool usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Objects fabricated since the last initialize
    pub created: usize,
    /// Hand-outs served from the idle queue without fabricating
    pub recycled: usize,
    /// Objects waiting in the idle queue
    pub idle: usize,
    /// Objects currently held by callers
    pub in_use: usize,
}

/// An object [`ObjectPool::enqueue_object`] refused, handed back untouched so
/// the caller can return it to the pool that owns it
#[derive(Debug)]
pub struct Refused<T> {
    /// Why the pool refused the object
    pub error: PoolError,
    /// The refused object
    pub object: Pooled<T>,
}

impl<T> From<Refused<T>> for PoolError {
    fn from(refused: Refused<T>) -> Self {
        refused.error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Idle,
    InUse,
}

/// An object checked out of a pool.
///
/// Derefs to the object. Give it back with [`ObjectPool::enqueue_object`];
/// dropping it instead abandons the object and its slot stays in use.
#[derive(Debug)]
pub struct Pooled<T> {
    pool: PoolId,
    handle: Handle,
    object: T,
}

impl<T> Pooled<T> {
    /// Pool this object was checked out from
    pub fn pool_id(&self) -> PoolId {
        self.pool
    }
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.object
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.object
    }
}

/// Template and placement captured by `initialize`
struct PoolSetup<Tpl, Att> {
    template_path: String,
    /// `None` when the load failed
    template: Option<Tpl>,
    attachment: Option<Att>,
}

struct IdleStore<T> {
    queue: VecDeque<(Handle, T)>,
    slots: HandleMap<SlotState>,
}

impl<T: Poolable> IdleStore<T> {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            slots: HandleMap::new(),
        }
    }

    /// Deactivate and append to the tail. Shared by fabrication and release.
    fn park(&mut self, handle: Handle, mut object: T) {
        object.on_deactivate();
        if let Some(state) = self.slots.get_mut(handle) {
            *state = SlotState::Idle;
        }
        self.queue.push_back((handle, object));
    }

    fn checkout(&mut self) -> Option<(Handle, T)> {
        let (handle, object) = self.queue.pop_front()?;
        if let Some(state) = self.slots.get_mut(handle) {
            *state = SlotState::InUse;
        }
        Some((handle, object))
    }

    fn is_checked_out(&self, handle: Handle) -> bool {
        self.slots.get(handle) == Some(&SlotState::InUse)
    }

    fn in_use(&self) -> usize {
        self.slots.values().filter(|state| **state == SlotState::InUse).count()
    }

    fn clear(&mut self) {
        self.queue.clear();
        // Bumps slot generations, so handles held by callers go stale
        self.slots.clear();
    }
}

/// Pool of reusable `T`s stamped from one template by host `H`
pub struct ObjectPool<T, H: Instantiator<T>> {
    id: PoolId,
    host: Rc<H>,
    setup: Option<PoolSetup<H::Template, H::Attachment>>,
    store: IdleStore<T>,
    created: usize,
    recycled: usize,
}

impl<T: Poolable, H: Instantiator<T>> ObjectPool<T, H> {
    /// Create an empty, uninitialized pool
    pub fn new(host: Rc<H>) -> Self {
        Self {
            id: PoolId(POOL_IDS.next_id()),
            host,
            setup: None,
            store: IdleStore::new(),
            created: 0,
            recycled: 0,
        }
    }

    /// Load the template at `template_path` and pre-warm `prewarm_count`
    /// idle instances under `attachment`.
    ///
    /// A failed load still leaves the pool initialized; later fabrication
    /// attempts report [`PoolError::TemplateUnavailable`]. Initializing an
    /// initialized pool releases it first.
    pub async fn initialize(
        &mut self,
        template_path: &str,
        prewarm_count: usize,
        attachment: Option<H::Attachment>,
    ) -> Result<(), PoolError> {
        if self.is_initialized() {
            log::warn!("{} re-initialized; releasing previous contents", self.id);
            self.release();
        }

        let (template, loaded) = match self.host.load(template_path).await {
            Ok(template) => (Some(template), Ok(())),
            Err(e) => {
                log::error!("{} failed to load template '{}': {}", self.id, template_path, e);
                (None, Err(PoolError::ResourceUnavailable(e)))
            }
        };

        self.setup = Some(PoolSetup {
            template_path: template_path.to_string(),
            template,
            attachment,
        });
        self.created = 0;
        self.recycled = 0;
        loaded?;

        self.prewarm(prewarm_count)?;
        log::info!(
            "{} initialized from '{}' with {} idle object(s)",
            self.id,
            template_path,
            self.store.queue.len()
        );
        Ok(())
    }

    /// Fabricate `count` more idle instances
    pub fn prewarm(&mut self, count: usize) -> Result<(), PoolError> {
        for _ in 0..count {
            self.fabricate()?;
        }
        Ok(())
    }

    /// Hand out the oldest idle object, fabricating one if the queue is empty.
    ///
    /// Returns `Ok(None)` if the pool was never initialized or has been
    /// released.
    pub fn get_object(&mut self) -> Result<Option<Pooled<T>>, PoolError> {
        if self.setup.is_none() {
            log::debug!("{} is not initialized; no object", self.id);
            return Ok(None);
        }

        if self.store.queue.is_empty() {
            self.fabricate()?;
        } else {
            self.recycled += 1;
        }

        let id = self.id;
        Ok(self.store.checkout().map(|(handle, mut object)| {
            object.on_activate();
            Pooled { pool: id, handle, object }
        }))
    }

    /// Return a checked-out object. Runs its deactivation hook and appends it
    /// to the idle queue.
    ///
    /// Objects from another pool, or orphaned by [`release`](Self::release),
    /// are refused and handed back inside the error.
    pub fn enqueue_object(&mut self, pooled: Pooled<T>) -> Result<(), Refused<T>> {
        if pooled.pool != self.id || !self.store.is_checked_out(pooled.handle) {
            log::warn!("{} refused an object it does not own (from {})", self.id, pooled.pool);
            return Err(Refused {
                error: PoolError::NotOwned { pool: self.id },
                object: pooled,
            });
        }
        let Pooled { handle, object, .. } = pooled;
        self.store.park(handle, object);
        Ok(())
    }

    /// Drop the idle queue and forget template and attachment.
    ///
    /// Objects still held by callers are orphaned and can no longer be
    /// returned.
    pub fn release(&mut self) {
        let orphaned = self.store.in_use();
        if orphaned > 0 {
            log::debug!("{} released with {} object(s) still checked out", self.id, orphaned);
        }
        self.store.clear();
        self.setup = None;
    }

    /// Whether `initialize` has run since construction or the last release
    pub fn is_initialized(&self) -> bool {
        self.setup.is_some()
    }

    /// Pool identity
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Path of the template, if initialized
    pub fn template_path(&self) -> Option<&str> {
        self.setup.as_ref().map(|setup| setup.template_path.as_str())
    }

    /// Objects waiting in the idle queue
    pub fn idle_count(&self) -> usize {
        self.store.queue.len()
    }

    /// Objects currently held by callers
    pub fn in_use_count(&self) -> usize {
        self.store.in_use()
    }

    /// Usage snapshot
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created,
            recycled: self.recycled,
            idle: self.idle_count(),
            in_use: self.in_use_count(),
        }
    }

    /// Construct one instance and park it idle
    fn fabricate(&mut self) -> Result<(), PoolError> {
        let setup = self
            .setup
            .as_ref()
            .ok_or(PoolError::Uninitialized { pool: self.id })?;
        let template = setup
            .template
            .as_ref()
            .ok_or_else(|| PoolError::TemplateUnavailable {
                path: setup.template_path.clone(),
            })?;

        let object = self.host.instantiate(template, setup.attachment.as_ref())?;
        let handle = self.store.slots.insert(SlotState::InUse);
        self.created += 1;
        log::trace!("{} fabricated object #{}", self.id, self.created);
        self.store.park(handle, object);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestHost, Widget};
    use futures::executor::block_on;

    const WIDGET_PATH: &str = "Prefabs/Widget";

    fn pool_with(host: &Rc<TestHost>, prewarm: usize) -> ObjectPool<Widget, TestHost> {
        let mut pool = ObjectPool::new(Rc::clone(host));
        block_on(pool.initialize(WIDGET_PATH, prewarm, Some("WidgetRoot".to_string()))).unwrap();
        pool
    }

    #[test]
    fn test_prewarm_scenario() {
        let host = Rc::new(TestHost::new());
        let mut pool = pool_with(&host, 3);
        assert_eq!(pool.idle_count(), 3);
        assert_eq!(host.instantiations(), 3);

        let a = pool.get_object().unwrap().unwrap();
        let b = pool.get_object().unwrap().unwrap();
        let c = pool.get_object().unwrap().unwrap();
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(host.instantiations(), 3);

        let d = pool.get_object().unwrap().unwrap();
        assert_eq!(host.instantiations(), 4);

        let mut ids = vec![a.id, b.id, c.id, d.id];
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(pool.stats(), PoolStats { created: 4, recycled: 3, idle: 0, in_use: 4 });
    }

    #[test]
    fn test_fifo_order() {
        let host = Rc::new(TestHost::new());
        let mut pool = pool_with(&host, 0);
        let a = pool.get_object().unwrap().unwrap();
        let b = pool.get_object().unwrap().unwrap();
        let (a_id, b_id) = (a.id, b.id);

        pool.enqueue_object(a).unwrap();
        pool.enqueue_object(b).unwrap();

        assert_eq!(pool.get_object().unwrap().unwrap().id, a_id);
        assert_eq!(pool.get_object().unwrap().unwrap().id, b_id);
    }

    #[test]
    fn test_growth_from_empty() {
        let host = Rc::new(TestHost::new());
        let mut pool = pool_with(&host, 0);
        let objects: Vec<_> = (0..5).map(|_| pool.get_object().unwrap().unwrap()).collect();

        assert_eq!(host.instantiations(), 5);
        let mut ids: Vec<_> = objects.iter().map(|w| w.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_hooks_and_attachment() {
        let host = Rc::new(TestHost::new());
        let mut pool = pool_with(&host, 0);

        let widget = pool.get_object().unwrap().unwrap();
        // Fresh objects pass through the release path before hand-out
        assert_eq!(widget.deactivations, 1);
        assert_eq!(widget.activations, 1);
        assert!(widget.active);
        assert_eq!(widget.parent.as_deref(), Some("WidgetRoot"));

        pool.enqueue_object(widget).unwrap();
        let widget = pool.get_object().unwrap().unwrap();
        assert_eq!(widget.deactivations, 2);
        assert_eq!(widget.activations, 2);
    }

    #[test]
    fn test_idle_queue_never_holds_duplicates() {
        let host = Rc::new(TestHost::new());
        let mut pool = pool_with(&host, 2);
        let mut held = Vec::new();

        for step in 0..20 {
            if step % 3 == 2 {
                if let Some(widget) = held.pop() {
                    pool.enqueue_object(widget).unwrap();
                }
            } else {
                held.push(pool.get_object().unwrap().unwrap());
            }

            let mut idle: Vec<_> = pool.store.queue.iter().map(|(_, w)| w.id).collect();
            let idle_len = idle.len();
            idle.sort_unstable();
            idle.dedup();
            assert_eq!(idle.len(), idle_len);
            assert!(held.iter().all(|w| !idle.contains(&w.id)));
            assert_eq!(pool.in_use_count(), held.len());
        }
    }

    #[test]
    fn test_release_returns_sentinel() {
        let host = Rc::new(TestHost::new());
        let mut pool = pool_with(&host, 2);
        let held = pool.get_object().unwrap().unwrap();

        pool.release();
        assert!(!pool.is_initialized());
        assert_eq!(pool.idle_count(), 0);
        assert!(pool.get_object().unwrap().is_none());
        assert_eq!(host.instantiations(), 2);

        // Orphans cannot come back
        let refused = pool.enqueue_object(held).unwrap_err();
        assert_eq!(refused.error, PoolError::NotOwned { pool: pool.id() });
    }

    #[test]
    fn test_uninitialized_pool() {
        let host = Rc::new(TestHost::new());
        let mut pool: ObjectPool<Widget, TestHost> = ObjectPool::new(Rc::clone(&host));
        assert!(pool.get_object().unwrap().is_none());
        assert_eq!(pool.prewarm(1), Err(PoolError::Uninitialized { pool: pool.id() }));
    }

    #[test]
    fn test_foreign_object_rejected() {
        let host = Rc::new(TestHost::new());
        let mut first = pool_with(&host, 1);
        let mut second = pool_with(&host, 1);

        let stranger = second.get_object().unwrap().unwrap();
        let stranger_id = stranger.id;
        let refused = first.enqueue_object(stranger).unwrap_err();
        assert_eq!(refused.error, PoolError::NotOwned { pool: first.id() });
        assert_eq!(first.idle_count(), 1);

        // The owner takes it back intact
        assert_eq!(refused.object.id, stranger_id);
        assert_eq!(refused.object.pool_id(), second.id());
        second.enqueue_object(refused.object).unwrap();
        assert_eq!(second.in_use_count(), 0);
        assert_eq!(second.idle_count(), 1);
    }

    #[test]
    fn test_missing_template() {
        let host = Rc::new(TestHost::new());
        host.mark_missing("Prefabs/Ghost");
        let mut pool: ObjectPool<Widget, TestHost> = ObjectPool::new(Rc::clone(&host));

        let result = block_on(pool.initialize("Prefabs/Ghost", 2, None));
        assert!(matches!(result, Err(PoolError::ResourceUnavailable(AssetError::NotFound(_)))));
        assert!(pool.is_initialized());
        assert_eq!(
            pool.get_object().unwrap_err(),
            PoolError::TemplateUnavailable { path: "Prefabs/Ghost".to_string() }
        );
        assert_eq!(host.instantiations(), 0);
    }

    #[test]
    fn test_reinitialize_releases() {
        let host = Rc::new(TestHost::new());
        let mut pool = pool_with(&host, 2);
        let held = pool.get_object().unwrap().unwrap();

        block_on(pool.initialize(WIDGET_PATH, 1, None)).unwrap();
        assert_eq!(pool.idle_count(), 1);
        assert!(pool.enqueue_object(held).is_err());
        assert_eq!(pool.stats().created, 1);
    }
}
