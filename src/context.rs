use ratatui::style::Style;

/// Kind-specific state of a rendered row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Leaf { selected: bool },
    Branch { expanded: bool },
}

#[derive(Clone, Copy)]
pub struct TreeRowContext<'a> {
    pub level: u16,
    pub is_tail_stack: &'a [bool],
    pub kind: RowKind,
    pub draw_lines: bool,
    pub line_style: Style,
}
