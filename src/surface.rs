use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

/// Visual state classes the core asks the surface to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualClass {
    /// Leaf select affordance, not selected.
    Selectable,
    /// Leaf select affordance, selected.
    Selected,
    /// Non-interactive branch affordance.
    Category,
    /// Visible container or expanded collapse toggle.
    Expanded,
    /// Hidden container or collapsed collapse toggle.
    Collapsed,
}

impl VisualClass {
    /// Stable class name for surfaces that style by name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selectable => "select",
            Self::Selected => "select-active",
            Self::Category => "category",
            Self::Expanded => "expanded",
            Self::Collapsed => "collapsed",
        }
    }

    /// Flips `Expanded` to `Collapsed`; anything else becomes `Expanded`.
    pub const fn toggled(current: Option<Self>) -> Self {
        match current {
            Some(Self::Expanded) => Self::Collapsed,
            _ => Self::Expanded,
        }
    }
}

/// Kind of interactive element attached to a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AffordanceKind {
    Select,
    Category,
    CollapseToggle,
}

/// Where a container is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mount<'a, H> {
    /// A mount point that exists in the host before the tree is built.
    Host(&'a str),
    /// A container created during the same build.
    Container(H),
}

/// Handler registered for an affordance, resolved on user activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation<H> {
    /// Toggle the selection of a leaf.
    Select { id: String, label: String },
    /// Flip the visibility of the direct children of `container`.
    Collapse { container: H },
}

/// Rendering collaborator used by the tree builder and the selector.
///
/// The core never draws anything itself; it creates elements through this
/// trait and reads back only what it needs to toggle classes.
pub trait TreeSurface {
    /// Opaque element handle.
    type Handle: Copy + Eq + Hash + Debug;

    /// Creates a container tagged with a structural id.
    fn create_container(&mut self, id: &str) -> Self::Handle;
    /// Creates an affordance inside `container`.
    fn create_affordance(&mut self, container: Self::Handle, kind: AffordanceKind) -> Self::Handle;
    /// Replaces the class of an element.
    fn set_class(&mut self, handle: Self::Handle, class: VisualClass);
    /// Returns the current class of an element.
    fn class(&self, handle: Self::Handle) -> Option<VisualClass>;
    /// Attaches a container; returns `false` if the mount point does not exist.
    fn mount(&mut self, container: Self::Handle, parent: Mount<'_, Self::Handle>) -> bool;
    /// Appends label text to a container.
    fn append_text(&mut self, container: Self::Handle, text: &str);
    /// Returns the containers mounted directly inside `container`.
    fn child_containers(&self, container: Self::Handle) -> SmallVec<[Self::Handle; 8]>;
    /// Registers the handler run when `handle` is activated.
    fn on_activate(&mut self, handle: Self::Handle, activation: Activation<Self::Handle>);
    /// Returns the handler registered for `handle`.
    fn activation(&self, handle: Self::Handle) -> Option<Activation<Self::Handle>>;
    /// Replaces the shared summary of selected labels.
    fn update_summary(&mut self, text: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_flips_expanded_only() {
        assert_eq!(VisualClass::toggled(Some(VisualClass::Expanded)), VisualClass::Collapsed);
        assert_eq!(VisualClass::toggled(Some(VisualClass::Collapsed)), VisualClass::Expanded);
        assert_eq!(VisualClass::toggled(None), VisualClass::Expanded);
    }

    #[test]
    fn class_names_are_distinct() {
        let names = [
            VisualClass::Selectable,
            VisualClass::Selected,
            VisualClass::Category,
            VisualClass::Expanded,
            VisualClass::Collapsed,
        ]
        .map(VisualClass::as_str);
        for (idx, name) in names.iter().enumerate() {
            assert!(!names[idx + 1..].contains(name));
        }
    }
}
