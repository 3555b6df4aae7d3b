use anyhow::Result;
use credit_request::{FieldDefinition, FieldId, FormSession, Notice, Section, Submission};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const SECTIONS: [Section; 3] = [
    Section::PersonalData,
    Section::Address,
    Section::CreditInformation,
];

fn next_section(section: Section) -> Section {
    match section {
        Section::PersonalData => Section::Address,
        Section::Address => Section::CreditInformation,
        Section::CreditInformation => Section::PersonalData,
    }
}

fn previous_section(section: Section) -> Section {
    match section {
        Section::PersonalData => Section::CreditInformation,
        Section::Address => Section::PersonalData,
        Section::CreditInformation => Section::Address,
    }
}

pub struct App {
    pub session: FormSession,
    pub current_section: Section,
    pub state: TableState,
    pub notice: Option<Notice>,
    pub last_submission: Option<Submission>,
    /// Set after a rejected submit; errors stay hidden until then
    pub show_all_errors: bool,
}

impl App {
    pub fn new() -> Self {
        let mut state = TableState::default();
        state.select(Some(0));

        Self {
            session: FormSession::new(),
            current_section: Section::PersonalData,
            state,
            notice: None,
            last_submission: None,
            show_all_errors: false,
        }
    }

    /// Fields of the current section, in form order
    pub fn section_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .iter()
            .copied()
            .filter(|id| {
                self.session
                    .definition(*id)
                    .map(|d| d.section == self.current_section)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn selected_field(&self) -> Option<FieldId> {
        let fields = self.section_fields();
        self.state.selected().and_then(|i| fields.get(i).copied())
    }

    pub fn next_section(&mut self) {
        self.current_section = next_section(self.current_section);
        self.state.select(Some(0));
    }

    pub fn previous_section(&mut self) {
        self.current_section = previous_section(self.current_section);
        self.state.select(Some(0));
    }

    pub fn next(&mut self) {
        let len = self.section_fields().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => {
                // past the last field: continue in the next section
                self.next_section();
                return;
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let i = match self.state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => {
                // before the first field: land on the last field of the previous section
                self.previous_section();
                self.section_fields().len().saturating_sub(1)
            }
        };
        self.state.select(Some(i));
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(field) = self.selected_field() {
            self.session.push_char(field, c);
            self.notice = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.selected_field() {
            self.session.backspace(field);
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.selected_field() {
            self.session.clear(field);
        }
    }

    pub fn submit(&mut self) {
        match self.session.submit() {
            Ok(submission) => {
                self.notice = Some(submission.notice.clone());
                self.last_submission = Some(submission);
                self.show_all_errors = false;
                self.current_section = Section::PersonalData;
                self.state.select(Some(0));
            }
            Err(errors) => {
                self.show_all_errors = true;
                self.notice = Some(Notice {
                    title: "Erro ao enviar solicitação".to_string(),
                    description: format!("{} campo(s) com erro", errors.len()),
                });
            }
        }
    }

    /// Errors are shown for touched fields, or for all after a failed submit
    pub fn visible_error(&self, field: FieldId) -> Option<&str> {
        let touched = !self.session.raw(field).is_empty();
        if touched || self.show_all_errors {
            self.session.error(field)
        } else {
            None
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal form failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => app.submit(),
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_field(),
                KeyCode::Enter => app.submit(),
                KeyCode::BackTab => app.previous_section(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_section();
                    } else {
                        app.next_section();
                    }
                }
                KeyCode::Down => app.next(),
                KeyCode::Up => app.previous(),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Char(c) => app.type_char(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title + section tabs
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_fields(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, section) in SECTIONS.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        if *section == app.current_section {
            tab_spans.push(Span::styled(
                format!("[{}]", section.title()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            tab_spans.push(Span::styled(
                section.title().to_string(),
                Style::default().fg(Color::Gray),
            ));
        }
    }

    let header_text = vec![
        Line::from(vec![Span::styled(
            "Solicitação de Crédito",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(tab_spans),
    ];

    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn field_label(definition: &FieldDefinition) -> String {
    if definition.is_required() {
        format!("{} *", definition.label)
    } else {
        definition.label.clone()
    }
}

fn render_fields(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Campo", "Valor", ""].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .section_fields()
        .into_iter()
        .filter_map(|id| app.session.definition(id).map(|d| (id, d)))
        .map(|(id, definition)| {
            let shown = app.session.display(id);
            let (value, value_style) = if shown.is_empty() {
                (definition.placeholder.clone(), Style::default().fg(Color::DarkGray))
            } else if id == FieldId::RequestedAmount {
                (format!("R$ {}", shown), Style::default().fg(Color::White))
            } else {
                (shown, Style::default().fg(Color::White))
            };

            let error = app.visible_error(id).unwrap_or("").to_string();

            Row::new(vec![
                Cell::from(field_label(definition)),
                Cell::from(value).style(value_style),
                Cell::from(error).style(Style::default().fg(Color::Red)),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(40),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", app.current_section.title())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(notice) = &app.notice {
        let color = if app.show_all_errors { Color::Red } else { Color::Green };
        status_spans.push(Span::styled(
            format!(" {} ", notice.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        status_spans.push(Span::raw(format!("{} | ", notice.description)));
    }

    status_spans.push(Span::styled("↑↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Field | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Section | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Enviar solicitação | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
