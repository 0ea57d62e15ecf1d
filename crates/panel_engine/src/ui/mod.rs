//! UI System Module
//!
//! Popup panel orchestration, kept separate from whatever draws the panels.
//!
//! Architecture:
//! - PanelManager: panel cache, visibility stack and hide notifications
//! - panel: the capability traits a host's panel type implements
//! - widgets/: a stock panel widget

pub mod manager;
pub mod panel;
pub mod widgets;

pub use manager::{PanelManager, PanelError};
pub use panel::{Panel, PanelHandle, PanelHost, PanelKind};

// Re-export widgets
pub use widgets::UIPanel;

// Re-export events
pub use crate::events::{EventSystem, EventType, SubscriptionId};
