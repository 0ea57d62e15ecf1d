//! Popup demo application
//!
//! Drives the panel stack and an object pool against an in-memory scene
//! host: opens and closes a few popups, then fires and recycles bullets.

use async_trait::async_trait;
use panel_engine::foundation::logging;
use panel_engine::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Popup {
    Settings,
    Inventory,
    Confirm,
}

impl PanelKind for Popup {
    fn asset_name(&self) -> &'static str {
        match self {
            Popup::Settings => "Settings",
            Popup::Inventory => "Inventory",
            Popup::Confirm => "Confirm",
        }
    }
}

type DemoPanel = UIPanel<Popup>;

/// What a template stamps out
#[derive(Debug, Clone)]
enum Blueprint {
    Popup(Popup),
    Bullet { speed: f32 },
}

#[derive(Debug)]
struct Bullet {
    serial: u32,
    speed: f32,
    parent: Option<String>,
    live: bool,
}

impl Poolable for Bullet {
    fn on_activate(&mut self) {
        self.live = true;
    }

    fn on_deactivate(&mut self) {
        self.live = false;
    }
}

/// Stand-in for the engine's asset store and scene graph
struct DemoHost {
    templates: HashMap<String, Blueprint>,
    scene: RefCell<NameRegistry<PanelHandle<DemoPanel>>>,
    next_serial: Cell<u32>,
}

impl DemoHost {
    fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert("Prefabs/Popup/Settings".to_string(), Blueprint::Popup(Popup::Settings));
        templates.insert("Prefabs/Popup/Inventory".to_string(), Blueprint::Popup(Popup::Inventory));
        templates.insert("Prefabs/Bullet".to_string(), Blueprint::Bullet { speed: 40.0 });

        Self {
            templates,
            scene: RefCell::new(NameRegistry::new()),
            next_serial: Cell::new(0),
        }
    }

    /// Place a popup in the scene up front, as a level would
    fn place_popup(&self, kind: Popup, name: &str) -> Result<(), DemoError> {
        let panel = Rc::new(RefCell::new(UIPanel::named(kind, name)));
        self.scene.borrow_mut().register(name, panel)?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl AssetLoader for DemoHost {
    type Template = Blueprint;

    async fn load(&self, path: &str) -> Result<Blueprint, AssetError> {
        log::debug!("Loading '{}'", path);
        self.templates
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

impl Instantiator<PanelHandle<DemoPanel>> for DemoHost {
    type Attachment = ();

    fn instantiate(&self, template: &Blueprint, _parent: Option<&()>) -> Result<PanelHandle<DemoPanel>, AssetError> {
        match template {
            Blueprint::Popup(kind) => Ok(Rc::new(RefCell::new(UIPanel::new(*kind)))),
            other => Err(AssetError::ComponentMissing(format!("{:?} is not a panel", other))),
        }
    }
}

impl Instantiator<Bullet> for DemoHost {
    type Attachment = String;

    fn instantiate(&self, template: &Blueprint, parent: Option<&String>) -> Result<Bullet, AssetError> {
        match template {
            Blueprint::Bullet { speed } => {
                let serial = self.next_serial.get();
                self.next_serial.set(serial + 1);
                Ok(Bullet { serial, speed: *speed, parent: parent.cloned(), live: false })
            }
            other => Err(AssetError::ComponentMissing(format!("{:?} is not a bullet", other))),
        }
    }
}

impl SceneRegistry<PanelHandle<DemoPanel>> for DemoHost {
    fn find_by_name(&self, name: &str) -> Option<PanelHandle<DemoPanel>> {
        self.scene.borrow().find_by_name(name)
    }
}

#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Registry(#[from] panel_engine::scene::RegistryError),
}

async fn run(context: &UiContext<DemoPanel, DemoHost>) -> Result<(), DemoError> {
    let panels = context.panels();
    let closed = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&closed);
    panels.on_hide(move || counter.set(counter.get() + 1));

    // Inventory was placed in the level, settings comes from its template
    let inventory = panels.show(Popup::Inventory).await?;
    let settings = panels.show(Popup::Settings).await?;
    log::info!(
        "Inventory at order {}, settings at order {}",
        inventory.borrow().sorting_order(),
        settings.borrow().sorting_order()
    );

    match panels.show(Popup::Confirm).await {
        Ok(_) => log::warn!("Confirm popup unexpectedly available"),
        Err(e) => log::info!("Confirm popup not shipped: {}", e),
    }

    panels.hide();
    panels.hide();
    panels.hide();
    log::info!("{} popup(s) closed, {} cached", closed.get(), panels.cached_count());

    let mut bullets = context
        .initialized_pool::<Bullet>("Prefabs/Bullet", Some("BulletRoot".to_string()))
        .await?;
    let mut volley = Vec::new();
    for _ in 0..5 {
        if let Some(bullet) = bullets.get_object()? {
            log::debug!(
                "Fired bullet #{} at {} under {:?} (live: {})",
                bullet.serial,
                bullet.speed,
                bullet.parent,
                bullet.live
            );
            volley.push(bullet);
        }
    }
    for bullet in volley {
        bullets.enqueue_object(bullet).map_err(PoolError::from)?;
    }
    let reused = bullets.get_object()?;
    log::info!(
        "Reused bullet #{:?}; pool stats {:?}",
        reused.as_ref().map(|bullet| bullet.serial),
        bullets.stats()
    );

    bullets.release();
    Ok(())
}

fn main() -> Result<(), DemoError> {
    let config = ApplicationConfig::load_or_default("popup_demo.toml")?;
    logging::init_with_level(config.engine.level_filter());

    let host = Rc::new(DemoHost::new());
    host.place_popup(Popup::Inventory, "Inventory")?;

    let context = UiContext::new(Rc::clone(&host), config)?;
    futures::executor::block_on(run(&context))?;

    log::info!("Demo finished");
    Ok(())
}
