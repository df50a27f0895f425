use crate::node::{ROOT_ID, TreeNode};
use crate::surface::{Activation, AffordanceKind, Mount, TreeSurface, VisualClass};

/// Leaf flagged `checked` in the input, reported when seeding is enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckedLeaf<H> {
    pub id: String,
    pub label: String,
    pub target: H,
}

/// Result of [`TreeBuilder::build`].
#[derive(Clone, Debug)]
pub struct BuiltTree<H> {
    /// Container of the input node, `None` if it was skipped.
    pub root: Option<H>,
    /// Every container created, in pre-order.
    pub containers: Vec<H>,
    /// Nodes dropped because of an empty id (subtrees not counted).
    pub skipped: usize,
    /// Checked leaves, collected only with [`TreeBuilder::seed_checked`].
    pub checked: Vec<CheckedLeaf<H>>,
}

impl<H> Default for BuiltTree<H> {
    fn default() -> Self {
        Self {
            root: None,
            containers: Vec::new(),
            skipped: 0,
            checked: Vec::new(),
        }
    }
}

/// Depth-first construction of the visual hierarchy for a [`TreeNode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeBuilder {
    seed_checked: bool,
}

impl TreeBuilder {
    pub const fn new() -> Self {
        Self {
            seed_checked: false,
        }
    }

    /// Reports leaves flagged `checked` so they can start out selected.
    pub const fn seed_checked(mut self, seed: bool) -> Self {
        self.seed_checked = seed;
        self
    }

    pub const fn seeds_checked(&self) -> bool {
        self.seed_checked
    }

    /// Builds containers for `node` and its descendants under `mount`.
    pub fn build<S: TreeSurface>(
        &self,
        surface: &mut S,
        node: &TreeNode,
        mount: Mount<'_, S::Handle>,
    ) -> BuiltTree<S::Handle> {
        let mut built = BuiltTree {
            containers: Vec::with_capacity(node.node_count()),
            ..BuiltTree::default()
        };
        built.root = self.build_node(surface, node, mount, &mut built);
        tracing::debug!(
            containers = built.containers.len(),
            skipped = built.skipped,
            checked = built.checked.len(),
            "tree built"
        );
        built
    }

    fn build_node<S: TreeSurface>(
        &self,
        surface: &mut S,
        node: &TreeNode,
        mount: Mount<'_, S::Handle>,
        built: &mut BuiltTree<S::Handle>,
    ) -> Option<S::Handle> {
        if node.id().is_empty() {
            tracing::debug!(label = node.label(), "skipping node without id");
            built.skipped += 1;
            return None;
        }

        let container = surface.create_container(node.id());
        if node.id() != ROOT_ID {
            surface.set_class(container, VisualClass::Expanded);
        }
        built.containers.push(container);

        match node {
            TreeNode::Leaf { id, label, checked } => {
                let select = surface.create_affordance(container, AffordanceKind::Select);
                surface.set_class(select, VisualClass::Selectable);
                surface.on_activate(
                    select,
                    Activation::Select {
                        id: id.clone(),
                        label: label.clone(),
                    },
                );
                if self.seed_checked && *checked {
                    built.checked.push(CheckedLeaf {
                        id: id.clone(),
                        label: label.clone(),
                        target: select,
                    });
                }
            }
            TreeNode::Branch { .. } => {
                let category = surface.create_affordance(container, AffordanceKind::Category);
                surface.set_class(category, VisualClass::Category);
                let toggle = surface.create_affordance(container, AffordanceKind::CollapseToggle);
                surface.set_class(toggle, VisualClass::Expanded);
                surface.on_activate(toggle, Activation::Collapse { container });
            }
        }

        surface.append_text(container, node.label());

        if !surface.mount(container, mount) {
            tracing::warn!(id = node.id(), ?mount, "mount point not found");
        }

        for child in node.children() {
            self.build_node(surface, child, Mount::Container(container), built);
        }

        Some(container)
    }
}

/// One-level accordion toggle for a branch.
///
/// Flips `toggle` between expanded and collapsed, then flips every direct
/// child container of `container` independently. Deeper descendants keep
/// their own class. Returns the new class of `toggle`.
pub fn toggle_collapse<S: TreeSurface>(
    surface: &mut S,
    toggle: S::Handle,
    container: S::Handle,
) -> VisualClass {
    let toggle_class = VisualClass::toggled(surface.class(toggle));
    surface.set_class(toggle, toggle_class);
    for child in surface.child_containers(container) {
        let next = VisualClass::toggled(surface.class(child));
        surface.set_class(child, next);
    }
    toggle_class
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::VisualTree;

    const HOST: &str = "app";

    fn sample() -> TreeNode {
        TreeNode::branch(
            ROOT_ID,
            "Root",
            [TreeNode::branch(
                "B1",
                "Branch",
                [TreeNode::leaf("L1", "Leaf 1"), TreeNode::leaf("L2", "Leaf 2")],
            )],
        )
    }

    fn build(node: &TreeNode) -> (VisualTree, BuiltTree<crate::visual::ElementId>) {
        let mut surface = VisualTree::new().with_host(HOST);
        let built = TreeBuilder::new().build(&mut surface, node, Mount::Host(HOST));
        (surface, built)
    }

    #[test]
    fn builds_every_container() {
        let (surface, built) = build(&sample());
        let ids: Vec<_> = built
            .containers
            .iter()
            .filter_map(|handle| surface.container_id(*handle))
            .collect();
        assert_eq!(ids, vec!["root", "B1", "L1", "L2"]);
        assert_eq!(built.skipped, 0);

        let root = built.root.unwrap();
        assert_eq!(surface.host_children(HOST), &[root]);
        assert_eq!(surface.class(root), None);
        assert_eq!(surface.text(root), Some("Root"));

        let b1 = surface.container_by_id("B1").unwrap();
        assert_eq!(surface.parent(b1), Some(root));
        assert_eq!(surface.class(b1), Some(VisualClass::Expanded));
    }

    #[test]
    fn leaves_are_selectable_and_branches_are_categories() {
        let (surface, _) = build(&sample());
        let b1 = surface.container_by_id("B1").unwrap();
        let category = surface.affordance_of(b1, AffordanceKind::Category).unwrap();
        let toggle = surface.collapse_toggle(b1).unwrap();
        assert_eq!(surface.select_affordance(b1), None);
        assert_eq!(surface.class(category), Some(VisualClass::Category));
        assert_eq!(surface.activation(category), None);
        assert_eq!(surface.class(toggle), Some(VisualClass::Expanded));
        assert_eq!(
            surface.activation(toggle),
            Some(Activation::Collapse { container: b1 })
        );

        for (id, label) in [("L1", "Leaf 1"), ("L2", "Leaf 2")] {
            let leaf = surface.container_by_id(id).unwrap();
            let select = surface.select_affordance(leaf).unwrap();
            assert_eq!(surface.parent(leaf), Some(b1));
            assert_eq!(surface.class(select), Some(VisualClass::Selectable));
            assert_eq!(surface.collapse_toggle(leaf), None);
            assert_eq!(
                surface.activation(select),
                Some(Activation::Select {
                    id: id.to_string(),
                    label: label.to_string()
                })
            );
        }
    }

    #[test]
    fn empty_id_skips_subtree_only() {
        let tree = TreeNode::branch(
            ROOT_ID,
            "Root",
            [
                TreeNode::leaf("a", "A"),
                TreeNode::branch("", "Broken", [TreeNode::leaf("hidden", "Hidden")]),
                TreeNode::leaf("b", "B"),
            ],
        );
        let (surface, built) = build(&tree);
        let root = built.root.unwrap();

        assert_eq!(built.skipped, 1);
        assert_eq!(built.containers.len(), 3);
        assert_eq!(surface.container_by_id("hidden"), None);
        assert_eq!(surface.container_by_id(""), None);
        let children: Vec<_> = surface
            .children(root)
            .iter()
            .filter_map(|handle| surface.container_id(*handle))
            .collect();
        assert_eq!(children, vec!["a", "b"]);
    }

    #[test]
    fn empty_root_builds_nothing() {
        let (surface, built) = build(&TreeNode::leaf("", "nothing"));
        assert_eq!(built.root, None);
        assert!(surface.is_empty());
        assert!(surface.host_children(HOST).is_empty());
    }

    #[test]
    fn collapse_flips_direct_children_only() {
        let (mut surface, _) = build(&sample());
        let root = surface.container_by_id("root").unwrap();
        let b1 = surface.container_by_id("B1").unwrap();
        let l1 = surface.container_by_id("L1").unwrap();
        let l2 = surface.container_by_id("L2").unwrap();
        let toggle = surface.collapse_toggle(b1).unwrap();

        assert_eq!(toggle_collapse(&mut surface, toggle, b1), VisualClass::Collapsed);
        assert_eq!(surface.class(l1), Some(VisualClass::Collapsed));
        assert_eq!(surface.class(l2), Some(VisualClass::Collapsed));
        assert_eq!(surface.class(b1), Some(VisualClass::Expanded));
        assert_eq!(surface.class(root), None);

        assert_eq!(toggle_collapse(&mut surface, toggle, b1), VisualClass::Expanded);
        assert_eq!(surface.class(l1), Some(VisualClass::Expanded));
        assert_eq!(surface.class(l2), Some(VisualClass::Expanded));
    }

    #[test]
    fn collapse_leaves_grandchildren_untouched() {
        let (mut surface, _) = build(&sample());
        let root = surface.container_by_id("root").unwrap();
        let b1 = surface.container_by_id("B1").unwrap();
        let l1 = surface.container_by_id("L1").unwrap();
        let root_toggle = surface.collapse_toggle(root).unwrap();

        toggle_collapse(&mut surface, root_toggle, root);

        assert_eq!(surface.class(b1), Some(VisualClass::Collapsed));
        assert_eq!(surface.class(l1), Some(VisualClass::Expanded));
        assert!(surface.is_hidden(l1));
    }

    #[test]
    fn duplicate_ids_resolve_to_last_container() {
        let tree = TreeNode::branch(
            ROOT_ID,
            "Root",
            [
                TreeNode::branch("dup", "First", [TreeNode::leaf("x", "X")]),
                TreeNode::leaf("dup", "Second"),
            ],
        );
        let (surface, built) = build(&tree);
        assert_eq!(built.containers.len(), 4);

        let dup = surface.container_by_id("dup").unwrap();
        assert_eq!(surface.text(dup), Some("Second"));
        // The first container still received its own child.
        let x = surface.container_by_id("x").unwrap();
        assert_eq!(surface.text(surface.parent(x).unwrap()), Some("First"));
    }

    #[test]
    fn missing_host_still_builds_subtree() {
        let mut surface = VisualTree::new();
        let built = TreeBuilder::new().build(&mut surface, &sample(), Mount::Host("nowhere"));
        let b1 = surface.container_by_id("B1").unwrap();
        assert_eq!(built.containers.len(), 4);
        assert_eq!(surface.parent(b1), built.root);
    }

    #[test]
    fn seeds_checked_leaves_when_enabled() {
        let tree = TreeNode::branch(
            ROOT_ID,
            "Root",
            [
                TreeNode::leaf("a", "A").with_checked(true),
                TreeNode::leaf("b", "B"),
                TreeNode::branch("c", "C", [TreeNode::leaf("d", "D")]).with_checked(true),
            ],
        );
        let mut surface = VisualTree::new().with_host(HOST);
        let built = TreeBuilder::new().build(&mut surface, &tree, Mount::Host(HOST));
        assert!(built.checked.is_empty());

        let mut surface = VisualTree::new().with_host(HOST);
        let built = TreeBuilder::new()
            .seed_checked(true)
            .build(&mut surface, &tree, Mount::Host(HOST));
        let ids: Vec<_> = built.checked.iter().map(|leaf| leaf.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        let a = surface.container_by_id("a").unwrap();
        assert_eq!(surface.select_affordance(a), Some(built.checked[0].target));
    }
}
