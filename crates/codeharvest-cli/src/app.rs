use anyhow::Result;
use codeharvest_engine::{GeneratedProject, NodeKind, ProjectTree, ProjectTreeItem};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use relative_path::RelativePathBuf;
use std::io::Stdout;

pub struct App {
    project: GeneratedProject,
    tree: ProjectTree,
    tree_items: Vec<ProjectTreeItem>,
    file_list_state: ListState,
    current_content: Vec<String>,
}

impl App {
    pub fn new(project: GeneratedProject) -> Self {
        let tree = ProjectTree::fully_expanded(project.tree.clone());
        let tree_items = tree.get_items();

        let mut app = Self {
            project,
            tree,
            tree_items,
            file_list_state: ListState::default(),
            current_content: Vec::new(),
        };

        if !app.tree_items.is_empty() {
            app.file_list_state.select(Some(0));
            app.update_content_for_selection();
        }

        app
    }

    fn next_file(&mut self) {
        if self.tree_items.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.tree_items.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn previous_file(&mut self) {
        if self.tree_items.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(0) | None => self.tree_items.len() - 1,
            Some(i) => i - 1,
        };
        self.file_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn selected_item(&self) -> Option<&ProjectTreeItem> {
        self.file_list_state
            .selected()
            .and_then(|index| self.tree_items.get(index))
    }

    fn update_content_for_selection(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };

        let content = match item.node.kind {
            NodeKind::Folder if item.node.path.as_str().is_empty() => self.project_summary(),
            NodeKind::Folder => vec![
                format!("📁 {}", item.node.path),
                format!("{} file(s)", item.node.file_count()),
                String::new(),
                "Press Enter/Space to toggle, → to expand, ← to collapse".to_string(),
            ],
            NodeKind::File => {
                let language = self
                    .project
                    .structure
                    .file(item.node.path.as_str())
                    .map(|f| f.language.to_string())
                    .unwrap_or_default();
                let mut lines = vec![format!("{} ({language})", item.node.path), String::new()];
                lines.extend(
                    item.node
                        .content
                        .as_deref()
                        .unwrap_or_default()
                        .lines()
                        .map(str::to_string),
                );
                lines
            }
        };
        self.current_content = content;
    }

    fn project_summary(&self) -> Vec<String> {
        let structure = &self.project.structure;
        let mut lines = vec![
            format!("Project: {}", structure.name),
            format!("Type: {}", structure.project_type),
            format!("Files: {}", structure.files.len()),
        ];
        if !structure.dependencies.is_empty() {
            lines.push(String::new());
            lines.push("Dependencies:".to_string());
            lines.extend(structure.dependencies.iter().map(|d| format!("  {d}")));
        }
        lines
    }

    fn selected_folder(&self) -> Option<(RelativePathBuf, bool)> {
        self.selected_item()
            .filter(|item| item.node.is_folder())
            .map(|item| (item.node.path.clone(), item.is_expanded))
    }

    fn activate_selected_item(&mut self) {
        if let Some((path, _)) = self.selected_folder() {
            self.tree.toggle_folder(&path);
            self.refresh_items();
        }
    }

    fn expand_selected_folder(&mut self) {
        if let Some((path, false)) = self.selected_folder() {
            self.tree.expand_folder(&path);
            self.refresh_items();
        }
    }

    fn collapse_selected_folder(&mut self) {
        if let Some((path, true)) = self.selected_folder() {
            self.tree.collapse_folder(&path);
            self.refresh_items();
        }
    }

    fn refresh_items(&mut self) {
        self.tree_items = self.tree.get_items();
        self.update_content_for_selection();
    }
}

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_file(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_file(),
                KeyCode::Enter | KeyCode::Char(' ') => app.activate_selected_item(),
                KeyCode::Right => app.expand_selected_folder(),
                KeyCode::Left => app.collapse_selected_folder(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    let file_items: Vec<ListItem> = app
        .tree_items
        .iter()
        .map(|item| {
            let indent = "  ".repeat(item.depth);
            let icon = match (item.node.kind, item.is_expanded) {
                (NodeKind::Folder, true) => "📂 ",
                (NodeKind::Folder, false) => "📁 ",
                (NodeKind::File, _) => "📄 ",
            };
            ListItem::new(Line::from(format!("{indent}{icon}{}", item.node.name)))
        })
        .collect();

    let title = format!("{} ({})", app.project.structure.name, app.project.structure.project_type);
    let files_list = List::new(file_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state);

    let content_text: Vec<Line> = if app.current_content.is_empty() {
        vec![Line::from("No code blocks were found in this response")]
    } else {
        app.current_content
            .iter()
            .map(|line| Line::from(Span::raw(line.as_str())))
            .collect()
    };

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Content"));

    f.render_widget(content, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next | "),
        Span::raw("Enter/Space: Toggle | →: Expand | ←: Collapse"),
    ]));

    f.render_widget(help, rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeharvest_engine::Parser;
    use pretty_assertions::assert_eq;

    fn app(text: &str) -> App {
        App::new(Parser::default().generate(text))
    }

    fn visible_names(app: &App) -> Vec<String> {
        app.tree_items.iter().map(|i| i.node.name.clone()).collect()
    }

    const RESPONSE: &str = "File: src/app.py\n```python\ndef run():\n    return 1\n```\n\
                            File: README.md\n```markdown\n# Demo project readme\n```";

    #[test]
    fn opens_fully_expanded_on_summary() {
        let app = app(RESPONSE);

        assert_eq!(
            visible_names(&app),
            vec!["python-project", "src", "app.py", "README.md"]
        );
        assert_eq!(app.current_content[0], "Project: python-project");
        assert_eq!(app.current_content[1], "Type: python");
    }

    #[test]
    fn selecting_a_file_shows_its_content() {
        let mut app = app(RESPONSE);
        app.next_file();
        app.next_file();

        assert_eq!(app.current_content[0], "src/app.py (python)");
        assert_eq!(app.current_content[2], "def run():");
    }

    #[test]
    fn navigation_wraps() {
        let mut app = app(RESPONSE);
        app.previous_file();
        assert_eq!(app.file_list_state.selected(), Some(3));
        app.next_file();
        assert_eq!(app.file_list_state.selected(), Some(0));
    }

    #[test]
    fn folders_collapse_and_expand() {
        let mut app = app(RESPONSE);
        app.next_file();

        app.collapse_selected_folder();
        assert_eq!(visible_names(&app), vec!["python-project", "src", "README.md"]);

        app.expand_selected_folder();
        assert_eq!(visible_names(&app).len(), 4);

        app.activate_selected_item();
        assert_eq!(visible_names(&app).len(), 3);
    }

    #[test]
    fn empty_project_shows_only_root() {
        let app = app("Absolutely nothing worthwhile appears anywhere within this particular message.");
        assert_eq!(visible_names(&app), vec!["generated-project"]);
        assert_eq!(app.current_content[2], "Files: 0");
    }
}
