use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Cell;

use crate::context::{RowKind, TreeRowContext};

#[derive(Clone, Copy)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub empty: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
    pub selected: &'a str,
    pub unselected: &'a str,
    pub category: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            empty: "   ",
            expanded: "▼",
            collapsed: "▶",
            selected: "[✓]",
            unselected: "[ ]",
            category: "■",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            empty: "   ",
            expanded: "v",
            collapsed: ">",
            selected: "[x]",
            unselected: "[ ]",
            category: "#",
        }
    }
}

/// Styles applied to the marker span of a row.
#[derive(Clone, Copy, Default)]
pub struct TreeMarkerStyles {
    pub selected: Style,
    pub category: Style,
}

/// Builds the label line for a row: guides, expander, marker, label.
pub fn tree_label_line<'a>(
    ctx: &TreeRowContext<'_>,
    label: &'a str,
    glyphs: &TreeGlyphs<'a>,
    markers: TreeMarkerStyles,
) -> Line<'a> {
    let (expander, marker) = match ctx.kind {
        RowKind::Leaf { selected: true } => (None, Span::styled(glyphs.selected, markers.selected)),
        RowKind::Leaf { selected: false } => (None, Span::raw(glyphs.unselected)),
        RowKind::Branch { expanded } => (
            Some(if expanded {
                glyphs.expanded
            } else {
                glyphs.collapsed
            }),
            Span::styled(glyphs.category, markers.category),
        ),
    };

    let mut spans = Vec::with_capacity(ctx.is_tail_stack.len() + 6);

    if ctx.level > 0 && ctx.draw_lines {
        for (l, is_last) in ctx.is_tail_stack.iter().enumerate() {
            let part = if l == (ctx.level as usize) - 1 {
                if *is_last {
                    glyphs.branch_last
                } else {
                    glyphs.branch
                }
            } else if *is_last {
                glyphs.indent
            } else {
                glyphs.vert
            };
            spans.push(Span::styled(part, ctx.line_style));
        }
    } else {
        for _ in 0..ctx.level {
            spans.push(Span::raw(glyphs.empty));
        }
    }

    // Leaves take the expander column so labels line up with sibling branches.
    spans.push(Span::raw(expander.unwrap_or(" ")));
    spans.push(Span::raw(" "));
    spans.push(marker);
    spans.push(Span::raw(" "));
    spans.push(Span::raw(label));
    Line::from(spans)
}

pub fn tree_label_cell<'a>(
    ctx: &TreeRowContext<'_>,
    label: &'a str,
    glyphs: &TreeGlyphs<'a>,
    markers: TreeMarkerStyles,
) -> Cell<'a> {
    Cell::from(tree_label_line(ctx, label, glyphs, markers))
}
