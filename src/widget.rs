use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::{
    Block, Borders, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
    StatefulWidget, Table, TableState, Widget, Wrap,
};

use crate::context::{RowKind, TreeRowContext};
use crate::glyphs::{TreeGlyphs, tree_label_cell};
use crate::selector::TreeSelector;
use crate::state::{TreeSelectorState, VisibleRow};
use crate::style::TreeSelectorStyle;
use crate::surface::VisualClass;
use crate::visual::VisualTree;

/// Основной виджет выбора (table + summary panel, stateful).
pub struct TreeSelectorView<'a> {
    tree: &'a VisualTree,
    host: &'a str,
    style: TreeSelectorStyle<'a>,
    glyphs: TreeGlyphs<'a>,
}

impl<'a> TreeSelectorView<'a> {
    /// Renders the containers mounted under `host`.
    pub const fn new(tree: &'a VisualTree, host: &'a str, style: TreeSelectorStyle<'a>) -> Self {
        Self {
            tree,
            host,
            style,
            glyphs: TreeGlyphs::unicode(),
        }
    }

    /// Renders the surface owned by a selector.
    pub const fn for_selector(
        selector: &'a TreeSelector<VisualTree>,
        host: &'a str,
        style: TreeSelectorStyle<'a>,
    ) -> Self {
        Self::new(selector.surface(), host, style)
    }

    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    fn row_kind(&self, row: &VisibleRow) -> RowKind {
        let container = row.container();
        if let Some(select) = self.tree.select_affordance(container) {
            RowKind::Leaf {
                selected: self.tree.class(select) == Some(VisualClass::Selected),
            }
        } else {
            let expanded = self
                .tree
                .collapse_toggle(container)
                .is_none_or(|toggle| self.tree.class(toggle) != Some(VisualClass::Collapsed));
            RowKind::Branch { expanded }
        }
    }

    #[inline]
    fn build_rows(&self, rows: &[VisibleRow], state: &TreeSelectorState) -> Vec<Row<'a>> {
        let markers = self.style.markers();
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let kind = self.row_kind(row);
            let ctx = TreeRowContext {
                level: row.level(),
                is_tail_stack: row.is_tail_stack.as_slice(),
                kind,
                draw_lines: state.draw_lines(),
                line_style: self.style.line_style,
            };
            let label = self.tree.text(row.container()).unwrap_or_default();
            let cell = tree_label_cell(&ctx, label, &self.glyphs, markers);
            let mut table_row = Row::new([cell]);
            if kind == (RowKind::Leaf { selected: true }) {
                table_row = table_row.style(self.style.selected_style);
            }
            out.push(table_row);
        }
        out
    }

    #[inline]
    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        state: &TreeSelectorState,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let position = state
            .list_state()
            .offset()
            .min(scroll_len.saturating_sub(1));
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(position)
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }

    fn render_summary(&self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(self.style.borders)
            .border_style(self.style.border_style)
            .style(self.style.block_style);
        if let Some(title) = self.style.summary_title.clone() {
            block = block.title(title);
        }
        Paragraph::new(self.tree.summary())
            .style(self.style.summary_style)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

impl StatefulWidget for TreeSelectorView<'_> {
    type State = TreeSelectorState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.ensure_visible_rows(self.tree, self.host);

        let (tree_area, summary_area) = if self.style.show_summary {
            let [tree_area, summary_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);
            (tree_area, Some(summary_area))
        } else {
            (area, None)
        };

        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner_height = block.inner(tree_area).height as usize;
        state.ensure_selection_visible_with_policy(inner_height, self.style.scroll_policy);

        let rows = self.build_rows(state.visible_rows(), state);
        let total_rows = rows.len();
        let scroll_rows = total_rows.saturating_sub(inner_height);

        let (table_area, table_block, scrollbar_area) = if scroll_rows > 0 {
            let table_area = Rect {
                width: tree_area.width.saturating_sub(1),
                ..tree_area
            };
            let scrollbar_area = Rect {
                x: tree_area.x + tree_area.width.saturating_sub(1),
                y: tree_area.y,
                width: 1,
                height: tree_area.height,
            };
            let mut table_borders = self.style.borders;
            table_borders.remove(Borders::RIGHT);
            (table_area, block.borders(table_borders), Some(scrollbar_area))
        } else {
            (tree_area, block, None)
        };

        let table = Table::new(rows, [Constraint::Percentage(100)])
            .style(self.style.block_style)
            .block(table_block)
            .row_highlight_style(self.style.highlight_style)
            .highlight_symbol(self.style.highlight_symbol);
        let table_state: &mut TableState = state.list_state_mut();
        StatefulWidget::render(table, table_area, buf, table_state);

        if let Some(scrollbar_area) = scrollbar_area {
            Self::render_scrollbar(scrollbar_area, buf, state, inner_height, scroll_rows);
        }
        if let Some(summary_area) = summary_area {
            self.render_summary(summary_area, buf);
        }
    }
}
