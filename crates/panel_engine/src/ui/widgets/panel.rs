//! Panel widget - popup backgrounds the panel manager can stack

use crate::ui::panel::{Panel, PanelKind};

/// UI panel component - a popup that tracks its own visibility and layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIPanel<K> {
    /// Which popup this is
    pub kind: K,

    /// Scene name the panel is registered under
    pub name: String,

    /// Whether the panel is currently shown
    pub visible: bool,

    /// Z-order for layering (higher = on top)
    pub z_order: i32,

    /// Times the show hook ran
    pub show_count: u32,

    /// Times the hide hook ran
    pub hide_count: u32,
}

impl<K: PanelKind> UIPanel<K> {
    /// Create a hidden panel named after its kind
    pub fn new(kind: K) -> Self {
        Self::named(kind, kind.asset_name())
    }

    /// Create a hidden panel with an explicit scene name
    pub fn named(kind: K, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            visible: false,
            z_order: 0,
            show_count: 0,
            hide_count: 0,
        }
    }
}

impl<K: PanelKind> Panel for UIPanel<K> {
    type Kind = K;

    fn kind(&self) -> K {
        self.kind
    }

    fn is_shown(&self) -> bool {
        self.visible
    }

    fn show(&mut self) {
        self.visible = true;
        self.show_count += 1;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hide_count += 1;
    }

    fn set_sorting_order(&mut self, order: i32) {
        self.z_order = order;
    }

    fn sorting_order(&self) -> i32 {
        self.z_order
    }
}
