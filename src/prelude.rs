pub use crate::{
    Activated, Activation, AffordanceKind, BuiltTree, ElementId, Mount, Reducer, RowKind,
    SelectedEntry, SelectionAction, SelectionChange, SelectionEffect, SelectionState,
    SelectionStore, Store, TreeAction, TreeBuilder, TreeEvent, TreeGlyphs, TreeNode,
    TreeNodeError, TreeRowContext, TreeScrollPolicy, TreeSelector, TreeSelectorState,
    TreeSelectorStyle, TreeSelectorView, TreeSurface, VisualClass, VisualTree, toggle_collapse,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, TreeKeyBindings};
