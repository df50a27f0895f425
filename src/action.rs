/// Actions that a user or application can initiate on the selector view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeAction<Custom = ()> {
    /// Move the cursor to the previous visible row.
    SelectPrev,
    /// Move the cursor to the next visible row.
    SelectNext,
    /// Move the cursor to the parent container.
    SelectParent,
    /// Move the cursor to the first visible row.
    SelectFirst,
    /// Move the cursor to the last visible row.
    SelectLast,
    /// Leaf: toggle its selection. Branch: toggle its children's visibility.
    Activate,
    /// Toggle the selection of the leaf under the cursor.
    ToggleSelect,
    /// Toggle the collapse state of the branch under the cursor.
    ToggleCollapse,
    /// Toggle drawing of guide lines.
    ToggleGuides,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeEvent<Custom = ()> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., nothing selected / nothing to do).
    Unhandled,
    /// The action is forwarded to the caller for handling.
    Action(TreeAction<Custom>),
}
