use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Borders;

use crate::glyphs::TreeMarkerStyles;

/// Политика скролла при изменении выбранной строки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeScrollPolicy {
    KeepInView,
    CenterOnSelect,
}

/// Визуальные настройки виджета выбора.
#[derive(Clone)]
pub struct TreeSelectorStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub highlight_style: Style,
    /// Row style for leaves that are currently selected.
    pub selected_style: Style,
    pub category_style: Style,
    pub line_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    pub summary_title: Option<Line<'a>>,
    pub summary_style: Style,
    /// Hides the summary panel when `false`.
    pub show_summary: bool,
    pub scroll_policy: TreeScrollPolicy,
}

impl TreeSelectorStyle<'_> {
    pub(crate) const fn markers(&self) -> TreeMarkerStyles {
        TreeMarkerStyles {
            selected: self.selected_style,
            category: self.category_style,
        }
    }
}

impl Default for TreeSelectorStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            highlight_style: Style::default(),
            selected_style: Style::default(),
            category_style: Style::default(),
            line_style: Style::default(),
            highlight_symbol: ">> ",
            borders: Borders::ALL,
            summary_title: Some(Line::from("Selected")),
            summary_style: Style::default(),
            show_summary: true,
            scroll_policy: TreeScrollPolicy::KeepInView,
        }
    }
}
