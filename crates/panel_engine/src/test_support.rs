//! In-memory scene host shared by the unit tests

use crate::assets::{AssetError, AssetLoader, Instantiator};
use crate::pool::Poolable;
use crate::scene::{NameRegistry, SceneRegistry};
use crate::ui::{PanelHandle, PanelKind, UIPanel};
use async_trait::async_trait;
use futures::lock::Mutex;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Popup {
    Settings,
    Inventory,
    Shop,
}

impl Popup {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Settings" => Some(Self::Settings),
            "Inventory" => Some(Self::Inventory),
            "Shop" | "ShopPopup" => Some(Self::Shop),
            _ => None,
        }
    }
}

impl PanelKind for Popup {
    fn asset_name(&self) -> &'static str {
        match self {
            Self::Settings => "Settings",
            Self::Inventory => "Inventory",
            Self::Shop => "Shop",
        }
    }
}

pub type TestPanel = UIPanel<Popup>;

#[derive(Debug)]
pub struct Widget {
    pub id: u32,
    pub parent: Option<String>,
    pub active: bool,
    pub activations: u32,
    pub deactivations: u32,
}

impl Poolable for Widget {
    fn on_activate(&mut self) {
        self.active = true;
        self.activations += 1;
    }

    fn on_deactivate(&mut self) {
        self.active = false;
        self.deactivations += 1;
    }
}

#[derive(Debug, Clone)]
pub struct Blueprint {
    pub path: String,
}

pub struct TestHost {
    loads: Cell<usize>,
    instantiations: Cell<usize>,
    loaded: RefCell<Vec<String>>,
    missing: RefCell<HashSet<String>>,
    next_id: Cell<u32>,
    last_parent: RefCell<Option<String>>,
    registry: RefCell<NameRegistry<PanelHandle<TestPanel>>>,
    /// Loads wait on this; tests hold it to keep a load in flight
    gate: Rc<Mutex<()>>,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            loads: Cell::new(0),
            instantiations: Cell::new(0),
            loaded: RefCell::new(Vec::new()),
            missing: RefCell::new(HashSet::new()),
            next_id: Cell::new(0),
            last_parent: RefCell::new(None),
            registry: RefCell::new(NameRegistry::new()),
            gate: Rc::new(Mutex::new(())),
        }
    }

    pub fn mark_missing(&self, path: &str) {
        self.missing.borrow_mut().insert(path.to_string());
    }

    pub fn spawn_panel(&self, kind: Popup, name: &str) -> PanelHandle<TestPanel> {
        let panel = Rc::new(RefCell::new(UIPanel::named(kind, name)));
        self.registry
            .borrow_mut()
            .register(name, Rc::clone(&panel))
            .unwrap();
        panel
    }

    pub fn load_gate(&self) -> Rc<Mutex<()>> {
        Rc::clone(&self.gate)
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    pub fn instantiations(&self) -> usize {
        self.instantiations.get()
    }

    pub fn loaded_paths(&self) -> Vec<String> {
        self.loaded.borrow().clone()
    }

    pub fn last_parent(&self) -> Option<String> {
        self.last_parent.borrow().clone()
    }
}

#[async_trait(?Send)]
impl AssetLoader for TestHost {
    type Template = Blueprint;

    async fn load(&self, path: &str) -> Result<Blueprint, AssetError> {
        self.loads.set(self.loads.get() + 1);
        self.loaded.borrow_mut().push(path.to_string());
        let _pass = self.gate.lock().await;

        if self.missing.borrow().contains(path) {
            return Err(AssetError::NotFound(path.to_string()));
        }
        Ok(Blueprint { path: path.to_string() })
    }
}

impl Instantiator<Widget> for TestHost {
    type Attachment = String;

    fn instantiate(&self, _template: &Blueprint, parent: Option<&String>) -> Result<Widget, AssetError> {
        self.instantiations.set(self.instantiations.get() + 1);
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Ok(Widget {
            id,
            parent: parent.cloned(),
            active: false,
            activations: 0,
            deactivations: 0,
        })
    }
}

impl Instantiator<PanelHandle<TestPanel>> for TestHost {
    type Attachment = String;

    fn instantiate(
        &self,
        template: &Blueprint,
        parent: Option<&String>,
    ) -> Result<PanelHandle<TestPanel>, AssetError> {
        self.instantiations.set(self.instantiations.get() + 1);
        *self.last_parent.borrow_mut() = parent.cloned();

        let name = template.path.rsplit('/').next().unwrap_or_default();
        let kind = Popup::from_name(name)
            .ok_or_else(|| AssetError::ComponentMissing(format!("{} has no panel", template.path)))?;
        Ok(Rc::new(RefCell::new(UIPanel::named(kind, name))))
    }
}

impl SceneRegistry<PanelHandle<TestPanel>> for TestHost {
    fn find_by_name(&self, name: &str) -> Option<PanelHandle<TestPanel>> {
        self.registry.borrow().find_by_name(name)
    }
}
