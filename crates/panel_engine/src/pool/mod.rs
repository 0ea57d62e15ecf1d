//! Reusable object pooling
//!
//! Recycles expensive-to-create scene objects instead of destroying and
//! re-instantiating them. Objects are stamped from one template under one
//! attachment point and cycle between callers and a FIFO idle queue.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut pool = ObjectPool::new(Rc::clone(&host));
//! pool.initialize("Prefabs/Bullet", 16, Some(bullet_root)).await?;
//!
//! if let Some(bullet) = pool.get_object()? {
//!     // ... use it for a while
//!     pool.enqueue_object(bullet)?;
//! }
//! ```

mod object_pool;

pub use object_pool::{ObjectPool, Pooled, Poolable, PoolError, PoolId, PoolStats, Refused};
