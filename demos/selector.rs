use std::env;
use std::fs;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::{DefaultTerminal, Frame};
use tracing_subscriber::EnvFilter;

use tui_treeselect::{
    SelectionStore, TreeBuilder, TreeNode, TreeSelector, TreeSelectorState, TreeSelectorStyle,
    TreeSelectorView, VisualTree,
};

const HOST: &str = "htmlRoot";

const FIRMS: &str = r#"{
  "id": "root",
  "labelValue": "Наши фирмы",
  "checked": false,
  "nestedStructure": [
    {
      "id": "935737",
      "labelValue": "Рога и Копыта",
      "checked": false,
      "nestedStructure": [
        {
          "id": "1235515",
          "labelValue": "Продукция",
          "checked": false,
          "nestedStructure": [
            { "id": "5135", "labelValue": "Мыло", "checked": false },
            { "id": "7733", "labelValue": "Ракеты космос-космос", "checked": false }
          ]
        },
        {
          "id": "26646357",
          "labelValue": "Сотрудники",
          "checked": false,
          "nestedStructure": [
            { "id": "125576702", "labelValue": "Иванов", "checked": false },
            { "id": "963579", "labelValue": "Петров", "checked": false }
          ]
        }
      ]
    }
  ]
}"#;

struct DemoArgs {
    path: Option<String>,
    seed_checked: bool,
}

impl DemoArgs {
    fn parse() -> Self {
        let mut path = None;
        let mut seed_checked = false;
        for arg in env::args().skip(1) {
            if arg == "--seed-checked" {
                seed_checked = true;
            } else {
                path = Some(arg);
            }
        }
        Self { path, seed_checked }
    }
}

fn load_tree(args: &DemoArgs) -> io::Result<TreeNode> {
    let input = match &args.path {
        Some(path) => fs::read_to_string(path)?,
        None => FIRMS.to_string(),
    };
    let tree = TreeNode::from_json(&input).map_err(io::Error::other)?;
    if let Err(err) = tree.validate() {
        tracing::warn!(%err, "rendering tree with duplicate ids");
    }
    Ok(tree)
}

fn render(
    frame: &mut Frame,
    selector: &TreeSelector<VisualTree>,
    state: &mut TreeSelectorState,
    style: &TreeSelectorStyle<'_>,
) {
    let widget = TreeSelectorView::for_selector(selector, HOST, style.clone());
    frame.render_stateful_widget(widget, frame.area(), state);
}

fn run_app(
    mut terminal: DefaultTerminal,
    mut selector: TreeSelector<VisualTree>,
    style: TreeSelectorStyle<'_>,
) -> io::Result<()> {
    let mut state = TreeSelectorState::new();
    state.ensure_visible_rows(selector.surface(), HOST);
    state.select_first();

    loop {
        terminal.draw(|frame| render(frame, &selector, &mut state, &style))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    _ => {
                        let _ = state.handle_key(&mut selector, HOST, key);
                    }
                },
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}

fn main() -> io::Result<()> {
    // Logs go to stderr; the terminal UI owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = DemoArgs::parse();
    let tree = load_tree(&args)?;

    let store = SelectionStore::selection();
    let surface = VisualTree::with_capacity(tree.node_count()).with_host(HOST);
    let mut selector = TreeSelector::new(store, surface)
        .with_builder(TreeBuilder::new().seed_checked(args.seed_checked));
    selector.store_mut().subscribe(|state, effect| {
        tracing::info!(change = ?effect.change, selected = state.len(), "selection changed");
    });
    selector.build(&tree, HOST);

    let mut style = TreeSelectorStyle::default();
    style.block_style = Style::default()
        .fg(Color::Rgb(221, 227, 235))
        .bg(Color::Rgb(24, 28, 36));
    style.border_style = Style::default().fg(Color::Rgb(92, 110, 140));
    style.line_style = Style::default().fg(Color::Rgb(86, 98, 120));
    style.selected_style = Style::default()
        .fg(Color::Rgb(136, 192, 208))
        .add_modifier(Modifier::BOLD);
    style.category_style = Style::default().fg(Color::Rgb(229, 201, 133));
    style.highlight_style = Style::default()
        .fg(Color::Rgb(255, 255, 255))
        .bg(Color::Rgb(52, 66, 96))
        .add_modifier(Modifier::BOLD);
    style.title = Some(Line::from(tree.label().to_string()));

    let terminal = ratatui::init();
    let result = run_app(terminal, selector, style);
    ratatui::restore();
    result
}
