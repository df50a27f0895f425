use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;

use crate::action::{TreeAction, TreeEvent};
use crate::selector::TreeSelector;
use crate::style::TreeScrollPolicy;
use crate::surface::VisualClass;
use crate::visual::{ElementId, VisualTree};

#[cfg(feature = "keymap")]
use crate::keymap::TreeKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

/// A visible container row with metadata used for rendering and navigation.
#[derive(Clone)]
pub struct VisibleRow {
    pub(crate) container: ElementId,
    pub(crate) level: u16,
    pub(crate) parent: Option<ElementId>,
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

impl VisibleRow {
    pub const fn container(&self) -> ElementId {
        self.container
    }

    pub const fn level(&self) -> u16 {
        self.level
    }
}

/// Cursor state for [`TreeSelectorView`](crate::TreeSelectorView).
///
/// Expansion lives in the [`VisualTree`] classes; this state only caches the
/// rows that are currently visible and tracks the cursor over them.
pub struct TreeSelectorState {
    list_state: TableState,
    // Cached visible rows to avoid recomputing DFS every render.
    visible_rows: Vec<VisibleRow>,
    // Fast lookup from container to visible row index.
    visible_index: FxHashMap<ElementId, usize>,
    // Marks whether visible_rows must be rebuilt.
    dirty: bool,
    // Tree revision the cached rows were built from.
    revision: u64,
    draw_lines: bool,
    #[cfg(feature = "keymap")]
    keymap: TreeKeyBindings,
}

impl Default for TreeSelectorState {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeSelectorState {
    /// Creates a new empty state with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a state with preallocated capacity for the given number of rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list_state: TableState::default(),
            visible_rows: Vec::with_capacity(capacity),
            visible_index: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            dirty: true,
            revision: 0,
            draw_lines: true,
            #[cfg(feature = "keymap")]
            keymap: TreeKeyBindings::new(),
        }
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut TreeKeyBindings {
        &mut self.keymap
    }

    pub(crate) const fn list_state(&self) -> &TableState {
        &self.list_state
    }

    pub(crate) const fn list_state_mut(&mut self) -> &mut TableState {
        &mut self.list_state
    }

    /// Rows currently visible, in display order.
    pub fn visible_rows(&self) -> &[VisibleRow] {
        &self.visible_rows
    }

    /// Returns the number of visible rows.
    pub const fn visible_len(&self) -> usize {
        self.visible_rows.len()
    }

    /// Returns whether guide lines are drawn.
    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    /// Enables or disables drawing of guide lines.
    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
    }

    /// Marks the visible-row cache as dirty.
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Selects the first visible row.
    pub const fn select_first(&mut self) {
        if self.visible_rows.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    /// Selects the last visible row.
    pub const fn select_last(&mut self) {
        if self.visible_rows.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.visible_rows.len() - 1));
        }
    }

    /// Moves selection to the previous visible row.
    pub fn select_prev(&mut self) {
        if self.visible_rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(selected.saturating_sub(1)));
    }

    /// Moves selection to the next visible row.
    pub fn select_next(&mut self) {
        if self.visible_rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        let new_selected = (selected + 1).min(self.visible_rows.len().saturating_sub(1));
        self.list_state.select(Some(new_selected));
    }

    /// Moves selection to the parent container of the selected row.
    pub fn select_parent(&mut self) {
        let Some(parent) = self
            .list_state
            .selected()
            .and_then(|idx| self.visible_rows.get(idx))
            .and_then(|row| row.parent)
        else {
            return;
        };
        if let Some(parent_idx) = self.visible_index.get(&parent).copied() {
            self.list_state.select(Some(parent_idx));
        }
    }

    /// Selects the row of the container with the given structural id.
    ///
    /// Returns `false` if no such container is visible.
    pub fn select_by_id(&mut self, tree: &VisualTree, host: &str, id: &str) -> bool {
        self.ensure_visible_rows(tree, host);
        let Some(idx) = tree
            .container_by_id(id)
            .and_then(|container| self.visible_index.get(&container).copied())
        else {
            return false;
        };
        self.list_state.select(Some(idx));
        true
    }

    /// Returns the container under the cursor, if any.
    pub fn selected_container(&self) -> Option<ElementId> {
        self.list_state
            .selected()
            .and_then(|idx| self.visible_rows.get(idx).map(|row| row.container))
    }

    /// Adjusts scroll offset so the selection is within the viewport.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize) {
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.list_state.offset();
        if selected < offset {
            *self.list_state.offset_mut() = selected;
        } else if selected >= offset + viewport_height {
            *self.list_state.offset_mut() = selected + 1 - viewport_height;
        }
    }

    /// Adjusts selection visibility according to the provided scroll policy.
    pub fn ensure_selection_visible_with_policy(
        &mut self,
        viewport_height: usize,
        policy: TreeScrollPolicy,
    ) {
        match policy {
            TreeScrollPolicy::KeepInView => self.ensure_selection_visible(viewport_height),
            TreeScrollPolicy::CenterOnSelect => {
                self.ensure_selection_visible_centered(viewport_height);
            }
        }
    }

    fn ensure_selection_visible_centered(&mut self, viewport_height: usize) {
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let total = self.visible_rows.len();
        if total <= viewport_height {
            *self.list_state.offset_mut() = 0;
            return;
        }

        // Center selection, then clamp to valid scroll range.
        let half = viewport_height / 2;
        let max_offset = total.saturating_sub(viewport_height);
        *self.list_state.offset_mut() = selected.saturating_sub(half).min(max_offset);
    }

    /// Ensures the visible row list is up to date.
    ///
    /// Rows are rebuilt when marked dirty or when `tree` changed since the
    /// last rebuild, so direct calls to [`TreeSelector::activate`] or
    /// [`TreeSelector::build`] show up on the next render. Switching `host`
    /// still needs [`TreeSelectorState::invalidate`].
    pub fn ensure_visible_rows(&mut self, tree: &VisualTree, host: &str) {
        if !self.dirty && self.revision == tree.revision() {
            return;
        }
        self.update_visible_rows(tree, host);
    }

    /// Handles a tree action and returns the resulting event.
    pub fn handle_action<C>(
        &mut self,
        selector: &mut TreeSelector<VisualTree>,
        host: &str,
        action: TreeAction<C>,
    ) -> TreeEvent<C> {
        self.ensure_visible_rows(selector.surface(), host);
        self.handle_action_inner(selector, host, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key(
        &mut self,
        selector: &mut TreeSelector<VisualTree>,
        host: &str,
        key: KeyEvent,
    ) -> TreeEvent<()> {
        self.ensure_visible_rows(selector.surface(), host);
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(selector, host, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<C, F>(
        &mut self,
        selector: &mut TreeSelector<VisualTree>,
        host: &str,
        key: KeyEvent,
        custom: F,
    ) -> TreeEvent<C>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        self.ensure_visible_rows(selector.surface(), host);
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(selector, host, action)
    }

    fn handle_action_inner<C>(
        &mut self,
        selector: &mut TreeSelector<VisualTree>,
        host: &str,
        action: TreeAction<C>,
    ) -> TreeEvent<C> {
        if matches!(&action, TreeAction::Custom(_)) {
            return TreeEvent::Action(action);
        }

        if self.visible_rows.is_empty() {
            return TreeEvent::Unhandled;
        }

        match action {
            TreeAction::SelectPrev => {
                self.select_prev();
                TreeEvent::Handled
            }
            TreeAction::SelectNext => {
                self.select_next();
                TreeEvent::Handled
            }
            TreeAction::SelectParent => {
                self.select_parent();
                TreeEvent::Handled
            }
            TreeAction::SelectFirst => {
                self.select_first();
                TreeEvent::Handled
            }
            TreeAction::SelectLast => {
                self.select_last();
                TreeEvent::Handled
            }
            TreeAction::Activate => {
                let Some(container) = self.selected_container() else {
                    return TreeEvent::Unhandled;
                };
                let tree = selector.surface();
                let target = tree
                    .select_affordance(container)
                    .or_else(|| tree.collapse_toggle(container));
                self.activate(selector, host, target)
            }
            TreeAction::ToggleSelect => {
                let target = self
                    .selected_container()
                    .and_then(|container| selector.surface().select_affordance(container));
                self.activate(selector, host, target)
            }
            TreeAction::ToggleCollapse => {
                let target = self
                    .selected_container()
                    .and_then(|container| selector.surface().collapse_toggle(container));
                self.activate(selector, host, target)
            }
            TreeAction::ToggleGuides => {
                self.draw_lines = !self.draw_lines;
                TreeEvent::Handled
            }
            TreeAction::Custom(_) => TreeEvent::Action(action),
        }
    }

    fn activate<C>(
        &mut self,
        selector: &mut TreeSelector<VisualTree>,
        host: &str,
        target: Option<ElementId>,
    ) -> TreeEvent<C> {
        let Some(target) = target else {
            return TreeEvent::Unhandled;
        };
        if selector.activate(target).is_none() {
            return TreeEvent::Unhandled;
        }
        self.dirty = true;
        self.update_visible_rows(selector.surface(), host);
        TreeEvent::Handled
    }

    fn update_visible_rows(&mut self, tree: &VisualTree, host: &str) {
        let selected = self.selected_container();
        self.visible_rows.clear();
        self.visible_index.clear();
        let roots = Self::visible_children(tree, tree.host_children(host));
        let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();
        let last_idx = roots.len().saturating_sub(1);
        for (idx, root) in roots.iter().copied().enumerate() {
            is_tail_stack.push(idx == last_idx);
            self.build_visible_rows(tree, root, 0, None, &mut is_tail_stack);
            is_tail_stack.pop();
        }
        self.dirty = false;
        self.revision = tree.revision();
        // Keep the cursor on the same container when it is still visible.
        if let Some(idx) = selected.and_then(|container| self.visible_index.get(&container).copied())
        {
            self.list_state.select(Some(idx));
        }
        self.clamp_selection();
    }

    fn visible_children(tree: &VisualTree, children: &[ElementId]) -> SmallVec<[ElementId; 8]> {
        children
            .iter()
            .copied()
            .filter(|child| tree.class(*child) != Some(VisualClass::Collapsed))
            .collect()
    }

    fn build_visible_rows(
        &mut self,
        tree: &VisualTree,
        container: ElementId,
        level: u16,
        parent: Option<ElementId>,
        is_tail_stack: &mut SmallVec<[bool; 8]>,
    ) {
        let idx = self.visible_rows.len();
        // Top-level rows carry no guide columns.
        let tails = if level == 0 {
            SmallVec::new()
        } else {
            SmallVec::from_slice(&is_tail_stack[1..])
        };
        self.visible_rows.push(VisibleRow {
            container,
            level,
            parent,
            is_tail_stack: tails,
        });
        self.visible_index.insert(container, idx);

        let children = Self::visible_children(tree, tree.children(container));
        let last_idx = children.len().saturating_sub(1);
        for (i, child) in children.iter().copied().enumerate() {
            is_tail_stack.push(i == last_idx);
            self.build_visible_rows(tree, child, level + 1, Some(container), is_tail_stack);
            is_tail_stack.pop();
        }
    }

    const fn clamp_selection(&mut self) {
        if self.visible_rows.is_empty() {
            self.list_state.select(None);
            return;
        }

        if let Some(selected) = self.list_state.selected()
            && selected >= self.visible_rows.len()
        {
            self.list_state
                .select(Some(self.visible_rows.len().saturating_sub(1)));
        }
    }
}
