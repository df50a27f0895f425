use crate::builder::{BuiltTree, TreeBuilder, toggle_collapse};
use crate::node::TreeNode;
use crate::selection::{SelectionChange, SelectionEffect, SelectionState, SelectionStore};
use crate::surface::{Activation, Mount, TreeSurface, VisualClass};

/// What an activation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activated {
    /// A leaf selection was toggled.
    Selection(SelectionChange),
    /// A branch collapse toggle now carries this class.
    Collapse(VisualClass),
}

/// Tree selector: wires a selection store to a rendering surface.
///
/// The store is injected by the caller; the selector only routes leaf
/// activations through it and applies the returned effects to the surface.
pub struct TreeSelector<S: TreeSurface> {
    store: SelectionStore<S::Handle>,
    surface: S,
    builder: TreeBuilder,
}

impl<S: TreeSurface> TreeSelector<S> {
    pub const fn new(store: SelectionStore<S::Handle>, surface: S) -> Self {
        Self {
            store,
            surface,
            builder: TreeBuilder::new(),
        }
    }

    /// Replaces the builder used by [`TreeSelector::build`].
    pub fn with_builder(mut self, builder: TreeBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Builds `node` under the host mount point `host`.
    ///
    /// Checked leaves reported by a seeding builder are selected right away.
    pub fn build(&mut self, node: &TreeNode, host: &str) -> BuiltTree<S::Handle> {
        let built = self
            .builder
            .build(&mut self.surface, node, Mount::Host(host));
        for leaf in &built.checked {
            self.toggle_selection(leaf.target, &leaf.id, &leaf.label);
        }
        built
    }

    /// Runs the handler registered for `handle`.
    ///
    /// Returns `None` when nothing is registered for it.
    pub fn activate(&mut self, handle: S::Handle) -> Option<Activated> {
        match self.surface.activation(handle)? {
            Activation::Select { id, label } => self
                .toggle_selection(handle, &id, &label)
                .map(|effect| Activated::Selection(effect.change)),
            Activation::Collapse { container } => Some(Activated::Collapse(toggle_collapse(
                &mut self.surface,
                handle,
                container,
            ))),
        }
    }

    /// Dispatches `CheckValue` for a leaf and reflects the outcome.
    pub fn toggle_selection(
        &mut self,
        target: S::Handle,
        id: &str,
        label: &str,
    ) -> Option<SelectionEffect<S::Handle>> {
        let effect = self.store.check_value(id, label, target);
        if let Some(effect) = effect {
            self.surface.set_class(effect.target, effect.change.class());
        }
        self.surface.update_summary(&self.store.state().summary());
        effect
    }

    /// Selected labels joined with `", "`.
    pub fn summary(&self) -> String {
        self.store.state().summary()
    }

    pub const fn selection(&self) -> &SelectionState {
        self.store.state()
    }

    pub const fn store(&self) -> &SelectionStore<S::Handle> {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut SelectionStore<S::Handle> {
        &mut self.store
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_parts(self) -> (SelectionStore<S::Handle>, S) {
        (self.store, self.surface)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::node::ROOT_ID;
    use crate::visual::{ElementId, VisualTree};

    const HOST: &str = "htmlRoot";

    fn firms() -> TreeNode {
        TreeNode::branch(
            ROOT_ID,
            "Наши фирмы",
            [TreeNode::branch(
                "935737",
                "Рога и Копыта",
                [TreeNode::leaf("5135", "Мыло"), TreeNode::leaf("7733", "Ракеты")],
            )],
        )
    }

    fn selector() -> TreeSelector<VisualTree> {
        TreeSelector::new(SelectionStore::selection(), VisualTree::new().with_host(HOST))
    }

    fn select_handle(selector: &TreeSelector<VisualTree>, id: &str) -> ElementId {
        let container = selector.surface().container_by_id(id).unwrap();
        selector.surface().select_affordance(container).unwrap()
    }

    #[test]
    fn end_to_end_summary() {
        let mut selector = selector();
        selector.build(&firms(), HOST);
        let soap = select_handle(&selector, "5135");
        let rockets = select_handle(&selector, "7733");

        assert_eq!(
            selector.activate(soap),
            Some(Activated::Selection(SelectionChange::Selected))
        );
        assert_eq!(selector.surface().summary(), "Мыло");
        assert_eq!(selector.surface().class(soap), Some(VisualClass::Selected));

        selector.activate(rockets);
        assert_eq!(selector.surface().summary(), "Мыло, Ракеты");

        assert_eq!(
            selector.activate(soap),
            Some(Activated::Selection(SelectionChange::Deselected))
        );
        assert_eq!(selector.surface().summary(), "Ракеты");
        assert_eq!(selector.summary(), "Ракеты");
        assert_eq!(selector.surface().class(soap), Some(VisualClass::Selectable));
        assert_eq!(selector.surface().class(rockets), Some(VisualClass::Selected));
    }

    #[test]
    fn collapse_activation_does_not_touch_store() {
        let mut selector = selector();
        selector.build(&firms(), HOST);
        let branch = selector.surface().container_by_id("935737").unwrap();
        let toggle = selector.surface().collapse_toggle(branch).unwrap();
        let soap = selector.surface().container_by_id("5135").unwrap();

        assert_eq!(
            selector.activate(toggle),
            Some(Activated::Collapse(VisualClass::Collapsed))
        );
        assert_eq!(selector.surface().class(soap), Some(VisualClass::Collapsed));
        assert_eq!(selector.store().dispatch_count(), 0);
    }

    #[test]
    fn unregistered_handle_is_ignored() {
        let mut selector = selector();
        selector.build(&firms(), HOST);
        let branch = selector.surface().container_by_id("935737").unwrap();

        assert_eq!(selector.activate(branch), None);
        assert!(selector.selection().is_empty());
    }

    #[test]
    fn shared_label_blocks_second_leaf() {
        let tree = TreeNode::branch(
            ROOT_ID,
            "Root",
            [TreeNode::leaf("A", "X"), TreeNode::leaf("B", "X")],
        );
        let mut selector = selector();
        selector.build(&tree, HOST);
        let a = select_handle(&selector, "A");
        let b = select_handle(&selector, "B");

        selector.activate(a);
        assert_eq!(
            selector.activate(b),
            Some(Activated::Selection(SelectionChange::Deselected))
        );
        assert_eq!(selector.selection().len(), 1);
        assert!(selector.selection().contains_id("A"));
        assert_eq!(selector.surface().class(a), Some(VisualClass::Selected));
        assert_eq!(selector.surface().class(b), Some(VisualClass::Selectable));
    }

    #[test]
    fn seeding_selects_checked_leaves() {
        let tree = TreeNode::branch(
            ROOT_ID,
            "Root",
            [
                TreeNode::leaf("a", "A").with_checked(true),
                TreeNode::leaf("b", "B"),
                TreeNode::leaf("c", "C").with_checked(true),
            ],
        );
        let mut selector = selector().with_builder(TreeBuilder::new().seed_checked(true));
        selector.build(&tree, HOST);

        assert_eq!(selector.summary(), "A, C");
        assert_eq!(selector.surface().summary(), "A, C");
        let a = select_handle(&selector, "a");
        assert_eq!(selector.surface().class(a), Some(VisualClass::Selected));
    }

    #[test]
    fn subscribers_observe_activations() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = SelectionStore::<ElementId>::selection();
        let sink = Rc::clone(&log);
        store.subscribe(move |state: &SelectionState, effect: &SelectionEffect<ElementId>| {
            sink.borrow_mut().push((state.summary(), effect.change));
        });
        let mut selector = TreeSelector::new(store, VisualTree::new().with_host(HOST));
        selector.build(&firms(), HOST);
        let soap = select_handle(&selector, "5135");

        selector.activate(soap);
        selector.activate(soap);

        assert_eq!(
            *log.borrow(),
            vec![
                ("Мыло".to_string(), SelectionChange::Selected),
                (String::new(), SelectionChange::Deselected),
            ]
        );
    }
}
