//! Selectable tree widget for ratatui driven by a reducer-based selection store.
//!
//! The core is surface-agnostic: [`TreeBuilder`] walks a [`TreeNode`] and
//! asks a [`TreeSurface`] to create containers and affordances, while
//! [`SelectionStore`] keeps the ordered set of selected leaves.
//! [`VisualTree`] is the in-memory surface drawn by [`TreeSelectorView`].
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings and `TreeSelectorState::handle_key*` helpers.
//! - `serde`: serde support for `TreeNode` (host JSON shape) and `SelectionState`.

mod action;
mod builder;
mod context;
mod error;
mod glyphs;
#[cfg(feature = "keymap")]
mod keymap;
mod node;
pub mod prelude;
mod selection;
mod selector;
mod state;
mod store;
mod style;
mod surface;
mod visual;
mod widget;

pub use action::{TreeAction, TreeEvent};
pub use builder::{BuiltTree, CheckedLeaf, TreeBuilder, toggle_collapse};
pub use context::{RowKind, TreeRowContext};
pub use error::TreeNodeError;
pub use glyphs::{TreeGlyphs, TreeMarkerStyles, tree_label_cell, tree_label_line};
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, TreeKeyBindings};
pub use node::{DepthFirst, ROOT_ID, TreeNode};
pub use selection::{
    SelectedEntry, SelectionAction, SelectionChange, SelectionEffect, SelectionReducer,
    SelectionState, SelectionStore,
};
pub use selector::{Activated, TreeSelector};
pub use state::{TreeSelectorState, VisibleRow};
pub use store::{Reducer, Store, SubscriptionId, Transition};
pub use style::{TreeScrollPolicy, TreeSelectorStyle};
pub use surface::{Activation, AffordanceKind, Mount, TreeSurface, VisualClass};
pub use visual::{ElementId, VisualTree};
pub use widget::TreeSelectorView;
