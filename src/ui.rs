use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
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
use vehicle_ledger::{Car, CarHistory, CarStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(CarStatus),
}

impl StatusFilter {
    /// All → Active → Sold → Registered → Scrapped → All
    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(CarStatus::Active),
            StatusFilter::Only(CarStatus::Active) => StatusFilter::Only(CarStatus::Sold),
            StatusFilter::Only(CarStatus::Sold) => StatusFilter::Only(CarStatus::Registered),
            StatusFilter::Only(CarStatus::Registered) => StatusFilter::Only(CarStatus::Scrapped),
            StatusFilter::Only(CarStatus::Scrapped) => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    fn accepts(&self, car: &Car) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => car.status == *status,
        }
    }
}

pub struct App {
    pub cars: Vec<Car>,
    pub histories: Vec<CarHistory>,
    /// Indexes into `cars` that pass the filter
    pub visible: Vec<usize>,
    pub state: TableState,
    pub filter: StatusFilter,
    pub show_history: bool,
}

impl App {
    /// `histories[i]` belongs to `cars[i]`.
    pub fn new(cars: Vec<Car>, histories: Vec<CarHistory>) -> Self {
        let mut app = Self {
            visible: Vec::new(),
            cars,
            histories,
            state: TableState::default(),
            filter: StatusFilter::All,
            show_history: false,
        };
        app.apply_filter(StatusFilter::All);
        app
    }

    pub fn apply_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.visible = self
            .cars
            .iter()
            .enumerate()
            .filter(|(_, car)| filter.accepts(car))
            .map(|(i, _)| i)
            .collect();
        self.state
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected().and_then(|i| self.visible.get(i).copied())
    }

    pub fn selected_history(&self) -> Option<&CarHistory> {
        self.selected_index().and_then(|i| self.histories.get(i))
    }

    pub fn next(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn count_by_status(&self, status: CarStatus) -> usize {
        self.cars.iter().filter(|c| c.status == status).count()
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_history(),
                KeyCode::Char('f') => app.apply_filter(app.filter.next()),
                KeyCode::Char('c') => app.apply_filter(StatusFilter::All),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home if !app.visible.is_empty() => app.state.select(Some(0)),
                KeyCode::End if !app.visible.is_empty() => {
                    app.state.select(Some(app.visible.len() - 1))
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_history {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        render_table(f, content[0], app);
        render_history(f, content[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn status_color(status: CarStatus) -> Color {
    match status {
        CarStatus::Active => Color::Green,
        CarStatus::Sold => Color::Yellow,
        CarStatus::Registered => Color::Cyan,
        CarStatus::Scrapped => Color::Red,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            "Vehicle Ledger",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Cars: {}", app.cars.len()),
            Style::default().fg(Color::White),
        ),
    ];

    for status in [
        CarStatus::Active,
        CarStatus::Sold,
        CarStatus::Registered,
        CarStatus::Scrapped,
    ] {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {}", status.as_str(), app.count_by_status(status)),
            Style::default().fg(status_color(status)),
        ));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(
        ["Chassis", "Owner", "Status", "Registration", "Expiry"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
    )
    .height(1);

    let rows: Vec<Row> = app
        .visible
        .iter()
        .filter_map(|&i| app.cars.get(i))
        .map(|car| {
            Row::new(vec![
                Cell::from(car.chassis_number.clone()),
                Cell::from(truncate(&car.owner, 24)),
                Cell::from(car.status.as_str())
                    .style(Style::default().fg(status_color(car.status))),
                Cell::from(car.registration_number.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(car.registration_expiry.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(12),
            Constraint::Length(11),
            Constraint::Length(13),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Cars [{}] ", app.filter.label())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_history(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    match app.selected_history() {
        Some(history) => {
            lines.push(Line::from(Span::styled(
                format!("{} - {} versions", history.chassis_number, history.version_count()),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));

            for version in history.versions.iter().rev() {
                lines.push(Line::from(vec![
                    Span::styled(format!("v{} ", version.version), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        version.value.status.as_str(),
                        Style::default().fg(status_color(version.value.status)),
                    ),
                    Span::raw(format!(" → {}", version.value.owner)),
                ]));
                lines.push(Line::from(Span::styled(
                    format!(
                        "   {}  tx {}",
                        version.valid_from.format("%Y-%m-%d %H:%M:%S"),
                        truncate(&version.tx_id, 15)
                    ),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        None => lines.push(Line::from("No car selected")),
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" History ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, app.visible.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" History | "),
        Span::styled("f", Style::default().fg(Color::Yellow)),
        Span::raw(" Filter | "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(" Clear | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
