//! UI widget definitions

pub mod panel;

pub use self::panel::UIPanel;
