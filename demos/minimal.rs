// Minimal example: build a small selector, toggle two leaves and render once.
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::StatefulWidget;

use tui_treeselect::{
    ROOT_ID, SelectionStore, TreeAction, TreeNode, TreeSelector, TreeSelectorState,
    TreeSelectorStyle, TreeSelectorView, VisualTree,
};

const HOST: &str = "app";

fn main() {
    // root -> fruit -> {apple, pear}, root -> plum.
    let tree = TreeNode::branch(
        ROOT_ID,
        "Basket",
        [
            TreeNode::branch(
                "fruit",
                "Fruit",
                [TreeNode::leaf("apple", "Apple"), TreeNode::leaf("pear", "Pear")],
            ),
            TreeNode::leaf("plum", "Plum"),
        ],
    );

    // The store is created up front and handed to the selector.
    let store = SelectionStore::selection();
    let mut selector = TreeSelector::new(store, VisualTree::new().with_host(HOST));
    selector.build(&tree, HOST);

    // State holds the cursor and must live across frames.
    let mut state = TreeSelectorState::new();
    for id in ["apple", "plum"] {
        if state.select_by_id(selector.surface(), HOST, id) {
            state.handle_action::<()>(&mut selector, HOST, TreeAction::Activate);
        }
    }

    let widget = TreeSelectorView::for_selector(&selector, HOST, TreeSelectorStyle::default());

    // Render into an in-memory buffer (no terminal required for the example).
    let area = Rect::new(0, 0, 40, 10);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer, &mut state);

    for y in area.top()..area.bottom() {
        let row: String = (area.left()..area.right())
            .filter_map(|x| buffer.cell((x, y)))
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        println!("{}", row.trim_end());
    }
    println!("selected: {}", selector.summary());
}
