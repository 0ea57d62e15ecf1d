//! Explicit UI context
//!
//! Owns the panel manager and hands out pools that share the same scene
//! host. Applications build one and pass it down instead of reaching for a
//! global; tests build as many as they like.

use crate::assets::Instantiator;
use crate::core::config::{ApplicationConfig, ConfigError};
use crate::pool::{ObjectPool, PoolError, Poolable};
use crate::ui::{Panel, PanelHost, PanelManager};
use std::rc::Rc;

/// Panel manager plus pool factory bound to one scene host
pub struct UiContext<P: Panel, H: PanelHost<P>> {
    config: ApplicationConfig,
    host: Rc<H>,
    panels: PanelManager<P, H>,
}

impl<P: Panel, H: PanelHost<P>> UiContext<P, H> {
    /// Validate `config` and build the context
    pub fn new(host: Rc<H>, config: ApplicationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let panels = PanelManager::with_config(Rc::clone(&host), config.panels.clone());
        log::info!(
            "UI context ready (popup base order {}, assets under '{}')",
            config.panels.popup_sorting_order,
            config.panels.popup_asset_dir
        );
        Ok(Self { config, host, panels })
    }

    /// The panel manager
    pub fn panels(&self) -> &PanelManager<P, H> {
        &self.panels
    }

    /// Mutable panel manager, for setup such as [`PanelManager::set_ui_root`]
    pub fn panels_mut(&mut self) -> &mut PanelManager<P, H> {
        &mut self.panels
    }

    /// The scene host
    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// Configuration the context was built with
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Create an uninitialized pool on this context's host
    pub fn create_pool<T>(&self) -> ObjectPool<T, H>
    where
        T: Poolable,
        H: Instantiator<T>,
    {
        ObjectPool::new(Rc::clone(&self.host))
    }

    /// Create a pool and initialize it with the configured default pre-warm
    pub async fn initialized_pool<T>(
        &self,
        template_path: &str,
        attachment: Option<<H as Instantiator<T>>::Attachment>,
    ) -> Result<ObjectPool<T, H>, PoolError>
    where
        T: Poolable,
        H: Instantiator<T>,
    {
        let mut pool = self.create_pool();
        pool.initialize(template_path, self.config.pools.default_prewarm, attachment)
            .await?;
        Ok(pool)
    }
}
