//! Panel Manager
//!
//! Lazily creates, caches and stacks popup panels.
//!
//! ```text
//! show(kind) ─▶ cache ─miss─▶ creation lock(kind) ─▶ scene registry ─miss─▶ load + instantiate
//!                 │                                        │                       │
//!                 └────────────── hit ◀────────────────────┴──── insert ◀──────────┘
//!                 ↓
//!            show hook, push, layering = base + depth
//! ```
//!
//! All methods take `&self`; state lives in `RefCell`s that are never
//! borrowed across an `.await`, so several `show` calls can be in flight on
//! one thread. Cache population is serialized per kind: a second `show` of
//! the same kind waits for the first and then reads the cache.

use super::panel::{Panel, PanelHandle, PanelHost, PanelKind};
use crate::assets::{AssetError, Instantiator};
use crate::core::config::PanelConfig;
use crate::events::{Event, EventHandler, EventSystem, EventType, SubscriptionId};
use crate::scene::SceneRegistry;
use futures::lock::Mutex;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Panel manager errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// Template missing or instantiation failed
    #[error("Panel unavailable: {0}")]
    ResourceUnavailable(#[from] AssetError),

    /// The template produced a panel of a different kind than requested
    #[error("Template '{path}' produced a {found} panel, expected {expected}")]
    KindMismatch {
        /// Template path that was instantiated
        path: String,
        /// Requested kind
        expected: String,
        /// Kind the new panel reported
        found: String,
    },
}

type UiRoot<P, H> = <H as Instantiator<PanelHandle<P>>>::Attachment;

/// Central popup management system
pub struct PanelManager<P: Panel, H: PanelHost<P>> {
    host: Rc<H>,

    config: PanelConfig,

    /// Parent new panels are instantiated under
    ui_root: Option<UiRoot<P, H>>,

    /// One panel per kind, created once
    cache: RefCell<HashMap<P::Kind, PanelHandle<P>>>,

    /// Visible panels, top = last
    stack: RefCell<Vec<PanelHandle<P>>>,

    /// Held while a kind's panel is being looked up or created
    creation_locks: RefCell<HashMap<P::Kind, Rc<Mutex<()>>>>,

    events: EventSystem,

    /// Panels built from templates (scene adoptions not counted)
    creations: Cell<usize>,
}

impl<P: Panel, H: PanelHost<P>> PanelManager<P, H> {
    /// Create a manager with default configuration
    pub fn new(host: Rc<H>) -> Self {
        Self::with_config(host, PanelConfig::default())
    }

    /// Create a manager with custom configuration
    pub fn with_config(host: Rc<H>, config: PanelConfig) -> Self {
        Self {
            host,
            config,
            ui_root: None,
            cache: RefCell::new(HashMap::new()),
            stack: RefCell::new(Vec::new()),
            creation_locks: RefCell::new(HashMap::new()),
            events: EventSystem::new(),
            creations: Cell::new(0),
        }
    }

    /// Instantiate new panels under `root`
    pub fn set_ui_root(&mut self, root: UiRoot<P, H>) {
        self.ui_root = Some(root);
    }

    /// Active configuration
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Show the panel of `kind` under its default name
    pub async fn show(&self, kind: P::Kind) -> Result<PanelHandle<P>, PanelError> {
        self.show_named(kind, kind.asset_name()).await
    }

    /// Show the panel of `kind`, looking it up / loading it as `name` on first use.
    ///
    /// The panel is pushed on the stack and layered at
    /// `popup_sorting_order + depth`, so it renders above everything shown
    /// before it.
    pub async fn show_named(&self, kind: P::Kind, name: &str) -> Result<PanelHandle<P>, PanelError> {
        let panel = self.cached_panel(kind, name).await?;
        {
            let mut inner = panel.borrow_mut();
            if !inner.is_shown() {
                inner.show();
            }
        }

        let depth = {
            let mut stack = self.stack.borrow_mut();
            stack.push(Rc::clone(&panel));
            stack.len()
        };
        let order = self
            .config
            .popup_sorting_order
            .saturating_add(i32::try_from(depth).unwrap_or(i32::MAX));
        panel.borrow_mut().set_sorting_order(order);
        log::debug!("Showing {:?} at depth {} (order {})", kind, depth, order);

        self.events.emit(Event::new(EventType::PanelShown, depth));
        Ok(panel)
    }

    /// Pop and hide the top panel, notifying hide subscribers.
    ///
    /// Returns `None` without notifying anyone if the stack is empty.
    pub fn hide(&self) -> Option<PanelHandle<P>> {
        let (popped, depth) = {
            let mut stack = self.stack.borrow_mut();
            let popped = stack.pop();
            (popped, stack.len())
        };
        let Some(panel) = popped else {
            log::debug!("Panel stack is empty; nothing to hide");
            return None;
        };

        panel.borrow_mut().hide();
        log::debug!("Hid {:?}, {} panel(s) remain", panel.borrow().kind(), depth);
        self.events.emit(Event::new(EventType::PanelHidden, depth));
        Some(panel)
    }

    /// Get the cached panel of `kind`, adopting it from the scene or creating
    /// it from `<popup_asset_dir>/<name>` on first use
    pub async fn cached_panel(&self, kind: P::Kind, name: &str) -> Result<PanelHandle<P>, PanelError> {
        if let Some(panel) = self.lookup_cache(kind) {
            return Ok(panel);
        }

        let lock = self.creation_lock(kind);
        let _creating = lock.lock().await;
        if let Some(panel) = self.lookup_cache(kind) {
            log::debug!("{:?} was cached while waiting for its creation lock", kind);
            return Ok(panel);
        }

        let panel = match self.find_in_scene(kind, name) {
            Some(panel) => panel,
            None => self.create_panel(kind, name).await?,
        };
        self.cache.borrow_mut().insert(kind, Rc::clone(&panel));
        Ok(panel)
    }

    /// Forget every cached panel. Shown panels stay shown and stacked.
    pub fn clear_all_cached_panels(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Empty the stack without running hide hooks
    pub fn clear_panel_stack(&self) {
        self.stack.borrow_mut().clear();
    }

    /// Reset cache and stack together
    pub fn clear_panels(&self) {
        self.clear_all_cached_panels();
        self.clear_panel_stack();
    }

    /// Topmost panel
    pub fn top(&self) -> Option<PanelHandle<P>> {
        self.stack.borrow().last().cloned()
    }

    /// Number of stacked panels
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    /// Whether a panel of `kind` is cached
    pub fn is_cached(&self, kind: P::Kind) -> bool {
        self.cache.borrow().contains_key(&kind)
    }

    /// Number of cached panels
    pub fn cached_count(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Panels created from templates so far
    pub fn creation_count(&self) -> usize {
        self.creations.get()
    }

    /// Register a handler for panel events.
    ///
    /// Handlers may call back into the manager. Events raised from inside a
    /// handler are delivered to every subscriber after the current one.
    pub fn subscribe(&self, event_type: EventType, handler: impl EventHandler + 'static) -> SubscriptionId {
        self.events.subscribe(event_type, handler)
    }

    /// Run `callback` every time a panel is hidden
    pub fn on_hide(&self, mut callback: impl FnMut() + 'static) -> SubscriptionId {
        self.subscribe(EventType::PanelHidden, move |_: &Event| callback())
    }

    /// Remove a handler; also valid from inside a handler
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn lookup_cache(&self, kind: P::Kind) -> Option<PanelHandle<P>> {
        self.cache.borrow().get(&kind).cloned()
    }

    fn creation_lock(&self, kind: P::Kind) -> Rc<Mutex<()>> {
        let mut locks = self.creation_locks.borrow_mut();
        let lock = locks.entry(kind).or_insert_with(|| Rc::new(Mutex::new(())));
        Rc::clone(lock)
    }

    /// Adopt a live panel registered under `name`, if it has the right kind
    fn find_in_scene(&self, kind: P::Kind, name: &str) -> Option<PanelHandle<P>> {
        let found = SceneRegistry::<PanelHandle<P>>::find_by_name(&*self.host, name)?;
        let found_kind = found.borrow().kind();
        if found_kind == kind {
            log::debug!("Adopting {:?} panel '{}' from the scene", kind, name);
            Some(found)
        } else {
            log::debug!("'{}' in the scene is {:?}, not {:?}", name, found_kind, kind);
            None
        }
    }

    async fn create_panel(&self, kind: P::Kind, name: &str) -> Result<PanelHandle<P>, PanelError> {
        let path = self.config.popup_asset_path(name);
        log::info!("Creating {:?} panel from '{}'", kind, path);

        let template = self.host.load(&path).await.map_err(|e| {
            log::error!("Failed to load panel template '{}': {}", path, e);
            PanelError::ResourceUnavailable(e)
        })?;
        let panel = Instantiator::<PanelHandle<P>>::instantiate(
            &*self.host,
            &template,
            self.ui_root.as_ref(),
        )?;

        let found_kind = panel.borrow().kind();
        if found_kind != kind {
            return Err(PanelError::KindMismatch {
                path,
                expected: format!("{:?}", kind),
                found: format!("{:?}", found_kind),
            });
        }

        self.creations.set(self.creations.get() + 1);
        Ok(panel)
    }
}
