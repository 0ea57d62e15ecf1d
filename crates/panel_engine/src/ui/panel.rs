//! Panel capability
//!
//! Anything the panel manager can stack implements [`Panel`]. Panels are
//! discriminated by a caller-supplied [`PanelKind`], normally a fieldless
//! enum listing every popup the game has.

use crate::assets::Instantiator;
use crate::scene::SceneRegistry;
use std::cell::RefCell;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

/// Shared handle to a live panel; the scene host holds the other reference
pub type PanelHandle<P> = Rc<RefCell<P>>;

/// Closed set of panel variants
pub trait PanelKind: Copy + Eq + Hash + Debug + 'static {
    /// Default template / scene name for this kind
    fn asset_name(&self) -> &'static str;
}

/// Show/hide state and layering of a UI panel
pub trait Panel {
    /// Discriminator the manager caches by
    type Kind: PanelKind;

    /// Which kind of panel this is
    fn kind(&self) -> Self::Kind;

    /// Whether the panel is currently visible
    fn is_shown(&self) -> bool;

    /// Show hook
    fn show(&mut self);

    /// Hide hook
    fn hide(&mut self);

    /// Set the layering value; higher renders on top
    fn set_sorting_order(&mut self, order: i32);

    /// Current layering value
    fn sorting_order(&self) -> i32;
}

/// Scene host the panel manager can pull panels from: a name registry plus
/// template instantiation.
pub trait PanelHost<P: Panel>:
    Instantiator<PanelHandle<P>> + SceneRegistry<PanelHandle<P>>
{
}

impl<P, H> PanelHost<P> for H
where
    P: Panel,
    H: Instantiator<PanelHandle<P>> + SceneRegistry<PanelHandle<P>>,
{
}
