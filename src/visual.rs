use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;

use crate::surface::{Activation, AffordanceKind, Mount, TreeSurface, VisualClass};

/// Index of an element in a [`VisualTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
enum ElementKind {
    Container {
        id: String,
        text: String,
        parent: Option<ElementId>,
        children: SmallVec<[ElementId; 8]>,
        affordances: SmallVec<[ElementId; 2]>,
    },
    Affordance {
        kind: AffordanceKind,
        owner: ElementId,
    },
}

#[derive(Clone, Debug)]
struct Element {
    kind: ElementKind,
    class: Option<VisualClass>,
}

/// In-memory element arena implementing [`TreeSurface`].
///
/// Containers are addressed by handle; the structural id index is only a
/// lookup aid and keeps the most recently created container for each id.
pub struct VisualTree {
    elements: Vec<Element>,
    hosts: FxHashMap<String, SmallVec<[ElementId; 4]>>,
    by_id: FxHashMap<String, ElementId>,
    activations: FxHashMap<ElementId, Activation<ElementId>>,
    summary: String,
    // Bumped whenever the mounted structure or a class changes.
    revision: u64,
}

impl Default for VisualTree {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualTree {
    /// Creates an arena without any host mount points.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an arena with room for roughly `capacity` tree nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        // Each node owns a container plus one or two affordances.
        Self {
            elements: Vec::with_capacity(capacity * 3),
            hosts: FxHashMap::default(),
            by_id: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            activations: FxHashMap::with_capacity_and_hasher(capacity * 2, FxBuildHasher),
            summary: String::new(),
            revision: 0,
        }
    }

    /// Registers a host mount point and returns the arena.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.add_host(host);
        self
    }

    /// Registers a host mount point.
    pub fn add_host(&mut self, host: impl Into<String>) {
        self.hosts.entry(host.into()).or_default();
    }

    pub fn has_host(&self, host: &str) -> bool {
        self.hosts.contains_key(host)
    }

    /// Containers mounted directly under a host, in mount order.
    pub fn host_children(&self, host: &str) -> &[ElementId] {
        self.hosts
            .get(host)
            .map(SmallVec::as_slice)
            .unwrap_or_default()
    }

    /// Number of elements (containers and affordances).
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Counter that changes whenever rows could appear, disappear or restyle.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Current summary text.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Most recently created container with the given structural id.
    pub fn container_by_id(&self, id: &str) -> Option<ElementId> {
        self.by_id.get(id).copied()
    }

    pub fn is_container(&self, handle: ElementId) -> bool {
        matches!(
            self.element(handle).map(|el| &el.kind),
            Some(ElementKind::Container { .. })
        )
    }

    /// Structural id of a container.
    pub fn container_id(&self, handle: ElementId) -> Option<&str> {
        match &self.element(handle)?.kind {
            ElementKind::Container { id, .. } => Some(id.as_str()),
            ElementKind::Affordance { .. } => None,
        }
    }

    /// Label text appended to a container.
    pub fn text(&self, handle: ElementId) -> Option<&str> {
        match &self.element(handle)?.kind {
            ElementKind::Container { text, .. } => Some(text.as_str()),
            ElementKind::Affordance { .. } => None,
        }
    }

    pub fn class(&self, handle: ElementId) -> Option<VisualClass> {
        self.element(handle).and_then(|el| el.class)
    }

    /// Parent container of a container, or owner container of an affordance.
    pub fn parent(&self, handle: ElementId) -> Option<ElementId> {
        match &self.element(handle)?.kind {
            ElementKind::Container { parent, .. } => *parent,
            ElementKind::Affordance { owner, .. } => Some(*owner),
        }
    }

    /// Containers mounted inside a container, in mount order.
    pub fn children(&self, handle: ElementId) -> &[ElementId] {
        match self.element(handle).map(|el| &el.kind) {
            Some(ElementKind::Container { children, .. }) => children.as_slice(),
            _ => &[],
        }
    }

    /// Affordances created inside a container, in creation order.
    pub fn affordances(&self, handle: ElementId) -> &[ElementId] {
        match self.element(handle).map(|el| &el.kind) {
            Some(ElementKind::Container { affordances, .. }) => affordances.as_slice(),
            _ => &[],
        }
    }

    pub fn affordance_kind(&self, handle: ElementId) -> Option<AffordanceKind> {
        match self.element(handle)?.kind {
            ElementKind::Affordance { kind, .. } => Some(kind),
            ElementKind::Container { .. } => None,
        }
    }

    /// First affordance of the given kind inside a container.
    pub fn affordance_of(&self, container: ElementId, kind: AffordanceKind) -> Option<ElementId> {
        self.affordances(container)
            .iter()
            .copied()
            .find(|handle| self.affordance_kind(*handle) == Some(kind))
    }

    /// Select affordance of a leaf container.
    pub fn select_affordance(&self, container: ElementId) -> Option<ElementId> {
        self.affordance_of(container, AffordanceKind::Select)
    }

    /// Collapse toggle of a branch container.
    pub fn collapse_toggle(&self, container: ElementId) -> Option<ElementId> {
        self.affordance_of(container, AffordanceKind::CollapseToggle)
    }

    /// Returns `true` if the container or any ancestor container is collapsed.
    pub fn is_hidden(&self, handle: ElementId) -> bool {
        let mut current = Some(handle);
        while let Some(node) = current {
            if self.class(node) == Some(VisualClass::Collapsed) {
                return true;
            }
            current = match self.element(node).map(|el| &el.kind) {
                Some(ElementKind::Container { parent, .. }) => *parent,
                _ => None,
            };
        }
        false
    }

    fn element(&self, handle: ElementId) -> Option<&Element> {
        self.elements.get(handle.0)
    }

    fn push(&mut self, kind: ElementKind) -> ElementId {
        let handle = ElementId(self.elements.len());
        self.elements.push(Element { kind, class: None });
        handle
    }
}

impl TreeSurface for VisualTree {
    type Handle = ElementId;

    fn create_container(&mut self, id: &str) -> ElementId {
        let handle = self.push(ElementKind::Container {
            id: id.to_string(),
            text: String::new(),
            parent: None,
            children: SmallVec::new(),
            affordances: SmallVec::new(),
        });
        if let Some(previous) = self.by_id.insert(id.to_string(), handle) {
            tracing::debug!(id, ?previous, ?handle, "container id reused");
        }
        handle
    }

    fn create_affordance(&mut self, container: ElementId, kind: AffordanceKind) -> ElementId {
        let handle = self.push(ElementKind::Affordance {
            kind,
            owner: container,
        });
        if let Some(Element {
            kind: ElementKind::Container { affordances, .. },
            ..
        }) = self.elements.get_mut(container.0)
        {
            affordances.push(handle);
        }
        handle
    }

    fn set_class(&mut self, handle: ElementId, class: VisualClass) {
        if let Some(element) = self.elements.get_mut(handle.0) {
            element.class = Some(class);
            self.revision += 1;
        }
    }

    fn class(&self, handle: ElementId) -> Option<VisualClass> {
        Self::class(self, handle)
    }

    fn mount(&mut self, container: ElementId, parent: Mount<'_, ElementId>) -> bool {
        if !self.is_container(container) {
            return false;
        }
        let parent_handle = match parent {
            Mount::Host(host) => {
                let Some(children) = self.hosts.get_mut(host) else {
                    return false;
                };
                children.push(container);
                None
            }
            Mount::Container(parent_handle) => {
                let Some(Element {
                    kind: ElementKind::Container { children, .. },
                    ..
                }) = self.elements.get_mut(parent_handle.0)
                else {
                    return false;
                };
                children.push(container);
                Some(parent_handle)
            }
        };
        if let Some(Element {
            kind: ElementKind::Container { parent, .. },
            ..
        }) = self.elements.get_mut(container.0)
        {
            *parent = parent_handle;
        }
        self.revision += 1;
        true
    }

    fn append_text(&mut self, container: ElementId, value: &str) {
        if let Some(Element {
            kind: ElementKind::Container { text, .. },
            ..
        }) = self.elements.get_mut(container.0)
        {
            text.push_str(value);
        }
    }

    fn child_containers(&self, container: ElementId) -> SmallVec<[ElementId; 8]> {
        SmallVec::from_slice(self.children(container))
    }

    fn on_activate(&mut self, handle: ElementId, activation: Activation<ElementId>) {
        self.activations.insert(handle, activation);
    }

    fn activation(&self, handle: ElementId) -> Option<Activation<ElementId>> {
        self.activations.get(&handle).cloned()
    }

    fn update_summary(&mut self, text: &str) {
        self.summary.clear();
        self.summary.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_under_unknown_host_fails() {
        let mut tree = VisualTree::new();
        let container = tree.create_container("a");
        assert!(!tree.mount(container, Mount::Host("missing")));

        tree.add_host("app");
        assert!(tree.mount(container, Mount::Host("app")));
        assert_eq!(tree.host_children("app"), &[container]);
        assert_eq!(tree.parent(container), None);
    }

    #[test]
    fn mount_links_parent_and_child() {
        let mut tree = VisualTree::new().with_host("app");
        let parent = tree.create_container("p");
        let child = tree.create_container("c");
        let toggle = tree.create_affordance(parent, AffordanceKind::CollapseToggle);
        assert!(tree.mount(parent, Mount::Host("app")));
        assert!(tree.mount(child, Mount::Container(parent)));

        assert_eq!(tree.children(parent), &[child]);
        assert_eq!(tree.parent(child), Some(parent));
        assert_eq!(tree.parent(toggle), Some(parent));
        assert_eq!(tree.collapse_toggle(parent), Some(toggle));
        assert_eq!(tree.select_affordance(parent), None);
        assert!(!tree.mount(child, Mount::Container(toggle)));
    }

    #[test]
    fn id_index_keeps_last_container() {
        let mut tree = VisualTree::new();
        let first = tree.create_container("dup");
        let second = tree.create_container("dup");
        assert_ne!(first, second);
        assert_eq!(tree.container_by_id("dup"), Some(second));
    }

    #[test]
    fn hidden_follows_collapsed_ancestors() {
        let mut tree = VisualTree::new().with_host("app");
        let outer = tree.create_container("outer");
        let inner = tree.create_container("inner");
        tree.mount(outer, Mount::Host("app"));
        tree.mount(inner, Mount::Container(outer));
        tree.set_class(inner, VisualClass::Expanded);
        assert!(!tree.is_hidden(inner));

        tree.set_class(outer, VisualClass::Collapsed);
        assert!(tree.is_hidden(inner));
    }

    #[test]
    fn text_and_summary_updates() {
        let mut tree = VisualTree::new();
        let container = tree.create_container("a");
        tree.append_text(container, "Мыло");
        tree.update_summary("Мыло");
        assert_eq!(tree.text(container), Some("Мыло"));
        assert_eq!(tree.container_id(container), Some("a"));
        assert_eq!(tree.summary(), "Мыло");
        tree.update_summary("");
        assert_eq!(tree.summary(), "");
    }

    #[test]
    fn revision_moves_on_mount_and_class_changes() {
        let mut tree = VisualTree::new().with_host("app");
        let start = tree.revision();
        let container = tree.create_container("a");
        assert_eq!(tree.revision(), start);

        assert!(tree.mount(container, Mount::Host("app")));
        let mounted = tree.revision();
        assert!(mounted > start);

        tree.set_class(container, VisualClass::Collapsed);
        assert!(tree.revision() > mounted);

        let before = tree.revision();
        assert!(!tree.mount(container, Mount::Host("missing")));
        tree.update_summary("x");
        assert_eq!(tree.revision(), before);
    }
}
