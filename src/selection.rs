use std::marker::PhantomData;

use crate::store::{Reducer, Store, Transition};
use crate::surface::VisualClass;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of a selected leaf taken at selection time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedEntry {
    pub id: String,
    pub label: String,
}

impl SelectedEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Ordered set of selected leaves, in selection order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    entries: Vec<SelectedEntry>,
}

impl SelectionState {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[SelectedEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectedEntry> {
        self.entries.iter()
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.iter().any(|entry| entry.label == label)
    }

    /// Labels in selection order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    /// Labels joined with `", "`, as shown in the summary panel.
    pub fn summary(&self) -> String {
        self.labels().collect::<Vec<_>>().join(", ")
    }

    fn appended(&self, entry: SelectedEntry) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.extend_from_slice(&self.entries);
        entries.push(entry);
        Self { entries }
    }

    fn without_id(&self, id: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.id != id)
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectionState {
    type Item = &'a SelectedEntry;
    type IntoIter = std::slice::Iter<'a, SelectedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Input of the selection reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionAction<H> {
    /// Toggle a leaf. `target` is the affordance that reflects the outcome.
    CheckValue {
        id: String,
        label: String,
        target: H,
    },
    /// Action type the reducer does not handle; leaves the state unchanged.
    Custom(String),
}

/// Direction of a selection toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Selected,
    Deselected,
}

impl SelectionChange {
    /// Class the toggled affordance should carry afterwards.
    pub const fn class(self) -> VisualClass {
        match self {
            Self::Selected => VisualClass::Selected,
            Self::Deselected => VisualClass::Selectable,
        }
    }
}

/// Visual consequence of a `CheckValue` transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionEffect<H> {
    pub target: H,
    pub change: SelectionChange,
}

/// Reducer for [`SelectionState`].
///
/// Membership is decided by label while removal filters by id: dispatching a
/// second id that shares a selected label counts as "present" and removes
/// nothing, because no entry carries that id.
pub struct SelectionReducer<H> {
    _handle: PhantomData<fn() -> H>,
}

impl<H> SelectionReducer<H> {
    pub const fn new() -> Self {
        Self {
            _handle: PhantomData,
        }
    }
}

impl<H> Default for SelectionReducer<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy> Reducer for SelectionReducer<H> {
    type State = SelectionState;
    type Action = SelectionAction<H>;
    type Effect = SelectionEffect<H>;

    fn reduce(
        &self,
        state: &SelectionState,
        action: &SelectionAction<H>,
    ) -> Transition<SelectionState, SelectionEffect<H>> {
        match action {
            SelectionAction::CheckValue { id, label, target } => {
                if state.contains_label(label) {
                    Transition::to(state.without_id(id)).with_effect(SelectionEffect {
                        target: *target,
                        change: SelectionChange::Deselected,
                    })
                } else {
                    Transition::to(state.appended(SelectedEntry::new(id.as_str(), label.as_str())))
                        .with_effect(SelectionEffect {
                            target: *target,
                            change: SelectionChange::Selected,
                        })
                }
            }
            SelectionAction::Custom(_) => Transition::identity(),
        }
    }
}

/// Store holding the selected leaves of one tree.
pub type SelectionStore<H> = Store<SelectionReducer<H>>;

impl<H: Copy> Store<SelectionReducer<H>> {
    /// Creates a store with an empty selection.
    pub fn selection() -> Self {
        Self::new(SelectionReducer::new(), SelectionState::new())
    }

    /// Dispatches `CheckValue` for the given leaf.
    pub fn check_value(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        target: H,
    ) -> Option<SelectionEffect<H>> {
        let action = SelectionAction::CheckValue {
            id: id.into(),
            label: label.into(),
            target,
        };
        let effect = self.dispatch(action);
        if let Some(effect) = &effect {
            tracing::debug!(
                change = ?effect.change,
                selected = self.state().len(),
                "selection toggled"
            );
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(store: &SelectionStore<u32>) -> Vec<String> {
        store.state().labels().map(str::to_string).collect()
    }

    #[test]
    fn toggle_pair_is_identity() {
        let mut store = SelectionStore::<u32>::selection();
        store.check_value("a", "A", 1);
        let before = store.state().clone();

        store.check_value("b", "B", 2);
        store.check_value("b", "B", 2);

        assert_eq!(*store.state(), before);
    }

    #[test]
    fn membership_by_label_removal_by_id() {
        let mut store = SelectionStore::<u32>::selection();
        store.check_value("A", "X", 1);

        let effect = store.check_value("B", "X", 2);

        assert_eq!(
            effect,
            Some(SelectionEffect {
                target: 2,
                change: SelectionChange::Deselected
            })
        );
        assert_eq!(store.state().entries(), &[SelectedEntry::new("A", "X")]);
    }

    #[test]
    fn preserves_selection_order() {
        let mut store = SelectionStore::<u32>::selection();
        store.check_value("1", "a", 1);
        store.check_value("2", "b", 2);
        store.check_value("3", "c", 3);
        assert_eq!(labels(&store), vec!["a", "b", "c"]);

        store.check_value("2", "b", 2);
        assert_eq!(labels(&store), vec!["a", "c"]);
        assert_eq!(store.state().summary(), "a, c");
    }

    #[test]
    fn effects_follow_toggle_direction() {
        let mut store = SelectionStore::<u32>::selection();
        let first = store.check_value("a", "A", 7).unwrap();
        let second = store.check_value("a", "A", 7).unwrap();

        assert_eq!(first.change, SelectionChange::Selected);
        assert_eq!(first.change.class(), VisualClass::Selected);
        assert_eq!(second.change, SelectionChange::Deselected);
        assert_eq!(second.change.class(), VisualClass::Selectable);
        assert_eq!(second.target, 7);
    }

    #[test]
    fn unknown_action_is_identity() {
        let mut store = SelectionStore::<u32>::selection();
        store.check_value("a", "A", 1);

        let effect = store.dispatch(SelectionAction::Custom("RESET".to_string()));

        assert_eq!(effect, None);
        assert_eq!(labels(&store), vec!["A"]);
        assert_eq!(store.dispatch_count(), 2);
    }

    #[test]
    fn empty_summary_for_empty_state() {
        let state = SelectionState::new();
        assert!(state.is_empty());
        assert_eq!(state.summary(), "");
        assert!(!state.contains_id("a"));
    }
}
