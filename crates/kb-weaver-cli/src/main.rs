mod textarea;

use std::time::{Duration, Instant};
use std::{env, fs, path::PathBuf, process};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kb_weaver_config::Settings;
use kb_weaver_engine::codec::parse_markdown;
use kb_weaver_engine::compose::{FieldEdit, FormAssembler};
use kb_weaver_engine::models::{Article, Flag, SupportTicket};
use kb_weaver_engine::sync::{EditorOptions, EditorSync, SyntaxMode, Theme};
use kb_weaver_engine::{import, publish, quality, scan};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use textarea::TextArea;

const FIELD_LABELS: [&str; 7] = [
    "Title",
    "Problem",
    "Solution",
    "Expected Result",
    "Prerequisites",
    "Additional Notes",
    "Tags",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Form,
    Editor,
}

struct App {
    file_path: PathBuf,
    settings: Settings,
    form: FormAssembler,
    editor: EditorSync<TextArea>,
    /// The authoritative document: whatever the form composed last or the
    /// user last typed in the editor.
    markdown: String,
    focus: Focus,
    field_state: ListState,
    /// Raw tags field text as typed; split on commas when applied.
    tags_input: String,
    flags: Vec<Flag>,
    status: String,
    /// Set when a save was blocked on flagged content and a repeat save
    /// overrides it.
    save_pending_override: bool,
}

impl App {
    fn new(file_path: PathBuf, settings: Settings, seed: String) -> Self {
        let (article, tags_input) = if seed.is_empty() {
            (Article::default(), String::new())
        } else {
            let parsed = parse_markdown(&seed);
            let tags_input = parsed.tags.join(", ");
            (parsed.into_article(seed.clone()), tags_input)
        };

        let debounce = Duration::from_millis(settings.quality_debounce_ms);
        let form = FormAssembler::with_debounce(article, debounce);
        let options = EditorOptions {
            theme: settings.theme,
            syntax: SyntaxMode::Markdown,
        };
        let editor = EditorSync::new(TextArea::default(), options, &seed);

        let mut field_state = ListState::default();
        field_state.select(Some(0));

        Self {
            file_path,
            settings,
            form,
            editor,
            markdown: seed,
            focus: Focus::Form,
            field_state,
            tags_input,
            flags: Vec::new(),
            status: "Tab: switch pane | ^S save | ^P publish export | ^T theme | ^Q quit"
                .to_string(),
            save_pending_override: false,
        }
    }

    fn selected_field(&self) -> usize {
        self.field_state.selected().unwrap_or(0)
    }

    fn field_value(&self, index: usize) -> String {
        let article = self.form.article();
        match index {
            0 => article.title.clone(),
            1 => article.problem.clone(),
            2 => article.solution.clone(),
            3 => article.expected_result.clone().unwrap_or_default(),
            4 => article.prerequisites.clone().unwrap_or_default(),
            5 => article.additional_notes.clone().unwrap_or_default(),
            _ => self.tags_input.clone(),
        }
    }

    fn apply_field_value(&mut self, value: String) {
        let edit = match self.selected_field() {
            0 => FieldEdit::Title(value),
            1 => FieldEdit::Problem(value),
            2 => FieldEdit::Solution(value),
            3 => FieldEdit::ExpectedResult(value),
            4 => FieldEdit::Prerequisites(value),
            5 => FieldEdit::AdditionalNotes(value),
            _ => {
                self.tags_input = value;
                FieldEdit::Tags(split_tags(&self.tags_input))
            }
        };

        self.markdown = self.form.apply(edit, Instant::now()).to_string();
        self.editor.set_external(&self.markdown);
        self.save_pending_override = false;
    }

    fn form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down => self.select_field(1),
            KeyCode::Up => self.select_field(-1),
            KeyCode::Char(c) => {
                let mut value = self.field_value(self.selected_field());
                value.push(c);
                self.apply_field_value(value);
            }
            KeyCode::Enter => {
                // Multi-line content in the larger fields
                let mut value = self.field_value(self.selected_field());
                value.push('\n');
                self.apply_field_value(value);
            }
            KeyCode::Backspace => {
                let mut value = self.field_value(self.selected_field());
                value.pop();
                self.apply_field_value(value);
            }
            _ => {}
        }
    }

    fn select_field(&mut self, delta: isize) {
        let count = FIELD_LABELS.len() as isize;
        let current = self.selected_field() as isize;
        let next = (current + delta).rem_euclid(count);
        self.field_state.select(Some(next as usize));
    }

    fn editor_key(&mut self, key: KeyEvent) {
        let surface = self.editor.surface_mut();
        match key.code {
            KeyCode::Char(c) => surface.insert_char(c),
            KeyCode::Enter => surface.insert_newline(),
            KeyCode::Backspace => surface.backspace(),
            KeyCode::Left => {
                surface.move_left();
                return;
            }
            KeyCode::Right => {
                surface.move_right();
                return;
            }
            KeyCode::Up => {
                surface.move_up();
                return;
            }
            KeyCode::Down => {
                surface.move_down();
                return;
            }
            _ => return,
        }
        self.markdown = self.editor.local_edit();
        self.save_pending_override = false;
    }

    /// Fire the debounced scoring request, scoring in-process.
    fn tick(&mut self, now: Instant) {
        if let Some(request) = self.form.poll(now) {
            let score = quality::score(&request.article);
            self.form.apply_score(request.seq, score);
        }
    }

    fn save(&mut self) {
        let article = parse_markdown(&self.markdown).into_article(self.markdown.clone());
        if let Err(incomplete) = article.validate() {
            self.status = format!("Not saved: {incomplete}");
            self.save_pending_override = false;
            return;
        }

        self.flags = scan::scan(&self.markdown);
        if !self.flags.is_empty() && !self.save_pending_override {
            self.save_pending_override = true;
            self.status = format!(
                "{} potential data leak(s) flagged - ^S again to save anyway",
                self.flags.len()
            );
            return;
        }

        match fs::write(&self.file_path, &self.markdown) {
            Ok(()) => {
                self.status = format!("Saved {}", self.file_path.display());
                self.save_pending_override = false;
            }
            Err(e) => {
                self.status = format!("Save failed: {e}");
            }
        }
    }

    fn export_storage_format(&mut self) {
        let conversion = publish::to_storage_format(&self.markdown);
        let out_path = self.file_path.with_extension("xhtml");
        match fs::write(&out_path, &conversion.xhtml) {
            Ok(()) => {
                self.status = if conversion.warnings.is_empty() {
                    format!("Exported {}", out_path.display())
                } else {
                    format!(
                        "Exported {} ({} warning(s))",
                        out_path.display(),
                        conversion.warnings.len()
                    )
                };
            }
            Err(e) => {
                self.status = format!("Export failed: {e}");
            }
        }
    }

    /// Theme changes rebuild the editor surface; options are fixed per
    /// surface, not restyled in place.
    fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
        let options = EditorOptions {
            theme: self.settings.theme,
            syntax: SyntaxMode::Markdown,
        };
        self.editor.rebuild(TextArea::default(), options);
        self.status = format!("Theme: {:?}", self.settings.theme);
    }

    fn text_style(&self) -> Style {
        match self.settings.theme {
            Theme::Light => Style::default().fg(Color::Black),
            Theme::Dark => Style::default().fg(Color::White),
        }
    }
}

fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let (file_path, ticket_path) = parse_args(&args);

    let settings = match Settings::load() {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(e) => {
            eprintln!("Warning: ignoring unreadable settings: {e}");
            Settings::default()
        }
    };

    let seed = if let Some(ticket_path) = &ticket_path {
        let json = fs::read_to_string(ticket_path)?;
        let ticket: SupportTicket = serde_json::from_str(&json)?;
        import::ticket_to_markdown(&ticket)
    } else if file_path.exists() {
        fs::read_to_string(&file_path)?
    } else {
        String::new()
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(file_path, settings, seed);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn parse_args(args: &[String]) -> (PathBuf, Option<PathBuf>) {
    let mut file = None;
    let mut ticket = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--ticket" => {
                i += 1;
                match args.get(i) {
                    Some(path) => ticket = Some(PathBuf::from(path)),
                    None => usage(&args[0]),
                }
            }
            other if file.is_none() => file = Some(PathBuf::from(other)),
            _ => usage(&args[0]),
        }
        i += 1;
    }

    match file {
        Some(file) => (file, ticket),
        None => usage(&args[0]),
    }
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <article.md> [--ticket <ticket.json>]");
    process::exit(1);
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('s') => app.save(),
                    KeyCode::Char('p') => app.export_storage_format(),
                    KeyCode::Char('t') => app.toggle_theme(),
                    _ => {}
                }
                continue;
            }

            if key.code == KeyCode::Tab {
                app.focus = match app.focus {
                    Focus::Form => Focus::Editor,
                    Focus::Editor => Focus::Form,
                };
                continue;
            }

            match app.focus {
                Focus::Form => app.form_key(key),
                Focus::Editor => app.editor_key(key),
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let text_style = app.text_style();

    let mut constraints = vec![Constraint::Min(0)];
    if !app.flags.is_empty() {
        constraints.push(Constraint::Length((app.flags.len() as u16 + 2).min(8)));
    }
    constraints.push(Constraint::Length(2));

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(vertical[0]);

    // Form panel
    let field_items: Vec<ListItem> = FIELD_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let value = app.field_value(i);
            let preview = value.lines().next().unwrap_or("").to_string();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{label}: "), text_style.add_modifier(Modifier::BOLD)),
                Span::styled(preview, text_style),
            ]))
        })
        .collect();

    let form_title = if app.focus == Focus::Form {
        "Article [editing]"
    } else {
        "Article"
    };
    let form_list = List::new(field_items)
        .block(Block::default().borders(Borders::ALL).title(form_title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(form_list, panes[0], &mut app.field_state);

    // Editor panel
    let editor_title = if app.focus == Focus::Editor {
        "Markdown [editing]"
    } else {
        "Markdown"
    };
    let editor_lines: Vec<Line> = app
        .editor
        .surface()
        .lines()
        .iter()
        .map(|line| Line::from(Span::styled(line.clone(), text_style)))
        .collect();

    let editor = Paragraph::new(editor_lines)
        .block(Block::default().borders(Borders::ALL).title(editor_title))
        .wrap(Wrap { trim: false });

    f.render_widget(editor, panes[1]);

    if app.focus == Focus::Editor {
        let (row, col) = app.editor.surface().cursor();
        let x = panes[1].x + 1 + (col as u16).min(panes[1].width.saturating_sub(3));
        let y = panes[1].y + 1 + (row as u16).min(panes[1].height.saturating_sub(3));
        f.set_cursor_position((x, y));
    }

    // Flag panel, only when the last save attempt surfaced leaks
    let mut status_area_index = 1;
    if !app.flags.is_empty() {
        let flag_items: Vec<ListItem> = app
            .flags
            .iter()
            .map(|flag| {
                ListItem::new(Line::from(Span::styled(
                    format!(
                        "line {}: [{}] {} ({})",
                        flag.line_number, flag.severity, flag.pattern_type, flag.matched_text
                    ),
                    Style::default().fg(Color::Red),
                )))
            })
            .collect();
        let flag_list = List::new(flag_items)
            .block(Block::default().borders(Borders::ALL).title("Sensitive data"));
        f.render_widget(flag_list, vertical[1]);
        status_area_index = 2;
    }

    // Status and score
    let score_line = match app.form.score() {
        Some(score) => format!(
            "Score {} | {} step(s) | {} word(s){}",
            score.overall,
            score.solution_step_count,
            score.word_count,
            if score.warnings.is_empty() {
                String::new()
            } else {
                format!(" | {}", score.warnings.join("; "))
            }
        ),
        None => "Score pending".to_string(),
    };

    let status = Paragraph::new(vec![
        Line::from(Span::styled(score_line, text_style)),
        Line::from(Span::styled(app.status.clone(), text_style)),
    ]);
    f.render_widget(status, vertical[status_area_index]);
}
