// Terminal client manager.
//
// The submit flow mirrors a modal form: Idle -> Loading -> Success (modal
// auto-closes after a short delay) or Idle -> Loading -> Error (modal stays
// open, message shown, resubmission allowed). The delete confirmation runs
// the same machine independently. Mutations are spawned onto a tokio runtime
// and report back over a channel, so the draw loop never blocks and an
// in-flight call cannot be canceled.

use crate::api_client::ClientsApi;
use crate::types::{Client, ClientInput};
use crate::validation::validate_form;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::Mutex;

const TICK: Duration = Duration::from_millis(100);
/// How long the success state stays visible before the modal auto-closes.
const SUCCESS_CLOSE_DELAY: Duration = Duration::from_millis(1500);

const FORM_FIELDS: [(&str, &str); 5] = [
    ("name", "Name"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("document", "Document"),
    ("address", "Address"),
];

// ============================================================================
// PAGES & STATE MACHINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Clients,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Clients,
            Page::Clients => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        self.next()
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Clients => "Clients",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    None,
    Form,
    ConfirmDelete,
}

/// Modal create/edit form state.
pub struct FormState {
    pub values: ClientInput,
    pub focused: usize,
    pub errors: HashMap<&'static str, &'static str>,
    /// Some = editing an existing client, None = creating a new one.
    pub editing: Option<Client>,
    pub status: SubmitStatus,
    pub close_at: Option<Instant>,
}

impl FormState {
    fn blank() -> Self {
        Self {
            values: ClientInput::default(),
            focused: 0,
            errors: HashMap::new(),
            editing: None,
            status: SubmitStatus::Idle,
            close_at: None,
        }
    }

    fn for_edit(client: Client) -> Self {
        Self {
            values: ClientInput {
                name: client.name.clone(),
                email: client.email.clone(),
                phone: client.phone.clone(),
                document: client.document.clone(),
                address: client.address.clone(),
            },
            focused: 0,
            errors: HashMap::new(),
            editing: Some(client),
            status: SubmitStatus::Idle,
            close_at: None,
        }
    }

    pub fn focused_field(&self) -> &'static str {
        FORM_FIELDS[self.focused % FORM_FIELDS.len()].0
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focused_field() {
            "name" => &mut self.values.name,
            "email" => &mut self.values.email,
            "phone" => &mut self.values.phone,
            "document" => &mut self.values.document,
            _ => &mut self.values.address,
        }
    }

    fn field_value(&self, field: &str) -> &str {
        match field {
            "name" => &self.values.name,
            "email" => &self.values.email,
            "phone" => &self.values.phone,
            "document" => &self.values.document,
            _ => &self.values.address,
        }
    }
}

/// Delete-confirmation state, mirroring the form machine independently.
pub struct DeleteState {
    pub target: Client,
    pub status: SubmitStatus,
    pub close_at: Option<Instant>,
}

/// A gateway call the event loop should spawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create(ClientInput),
    Update { id: String, input: ClientInput },
    Delete { id: String },
    Reload,
}

/// Result of a spawned gateway call, delivered over the channel.
#[derive(Debug)]
pub enum Outcome {
    Saved(Result<Client, String>),
    Deleted(Result<(), String>),
    Loaded(Result<Vec<Client>, String>),
}

// ============================================================================
// SEARCH FILTER
// ============================================================================

/// Case-insensitive substring match against name, email, or document.
/// Applied locally; no server round-trip.
pub fn matches_search(client: &Client, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    client.name.to_lowercase().contains(&term)
        || client.email.to_lowercase().contains(&term)
        || client.document.to_lowercase().contains(&term)
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub clients: Vec<Client>,
    pub filtered: Vec<Client>,
    pub table: TableState,
    pub search: String,
    pub searching: bool,
    pub page: Page,
    pub modal: Modal,
    pub form: FormState,
    pub delete: Option<DeleteState>,
    pub loading: bool,
    pub load_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(clients: Vec<Client>) -> Self {
        let mut app = Self {
            clients,
            filtered: Vec::new(),
            table: TableState::default(),
            search: String::new(),
            searching: false,
            page: Page::Clients,
            modal: Modal::None,
            form: FormState::blank(),
            delete: None,
            loading: false,
            load_error: None,
            should_quit: false,
        };
        app.apply_filter();
        app
    }

    pub fn with_load_error(message: String) -> Self {
        let mut app = Self::new(Vec::new());
        app.load_error = Some(message);
        app
    }

    /// Rebuild the filtered view from the full list and reset the selection.
    pub fn apply_filter(&mut self) {
        self.filtered = self
            .clients
            .iter()
            .filter(|c| matches_search(c, &self.search))
            .cloned()
            .collect();

        if self.filtered.is_empty() {
            self.table.select(None);
        } else {
            self.table.select(Some(0));
        }
    }

    pub fn set_clients(&mut self, clients: Vec<Client>) {
        self.clients = clients;
        self.loading = false;
        self.load_error = None;
        self.apply_filter();
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.table.selected().and_then(|i| self.filtered.get(i))
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table.select(Some(i));
    }

    // ------------------------------------------------------------------
    // Modal lifecycle
    // ------------------------------------------------------------------

    pub fn open_new_client_form(&mut self) {
        self.form = FormState::blank();
        self.modal = Modal::Form;
    }

    pub fn open_edit_client_form(&mut self) {
        if let Some(client) = self.selected_client().cloned() {
            self.form = FormState::for_edit(client);
            self.modal = Modal::Form;
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(client) = self.selected_client().cloned() {
            self.delete = Some(DeleteState {
                target: client,
                status: SubmitStatus::Idle,
                close_at: None,
            });
            self.modal = Modal::ConfirmDelete;
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::None;
        self.form = FormState::blank();
        self.delete = None;
    }

    // ------------------------------------------------------------------
    // Form editing
    // ------------------------------------------------------------------

    pub fn focus_next_field(&mut self) {
        self.form.focused = (self.form.focused + 1) % FORM_FIELDS.len();
    }

    pub fn focus_previous_field(&mut self) {
        self.form.focused = (self.form.focused + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    fn form_input(&mut self, c: char) {
        self.form.focused_value_mut().push(c);
        self.after_form_edit();
    }

    fn form_backspace(&mut self) {
        self.form.focused_value_mut().pop();
        self.after_form_edit();
    }

    /// Typing clears the focused field's error and leaves a failed submit
    /// behind, so the user can immediately try again.
    fn after_form_edit(&mut self) {
        let field = self.form.focused_field();
        self.form.errors.remove(field);
        if matches!(self.form.status, SubmitStatus::Error(_)) {
            self.form.status = SubmitStatus::Idle;
        }
    }

    /// Validate and, if clean, hand back the gateway call to spawn.
    /// Submission is blocked while validation errors exist or while a call
    /// is already in flight.
    pub fn submit_form(&mut self) -> Option<Action> {
        if matches!(
            self.form.status,
            SubmitStatus::Loading | SubmitStatus::Success
        ) {
            return None;
        }

        let errors = validate_form(&self.form.values);
        if !errors.is_empty() {
            self.form.errors = errors;
            return None;
        }

        self.form.status = SubmitStatus::Loading;
        match &self.form.editing {
            Some(client) => Some(Action::Update {
                id: client.id.clone(),
                input: self.form.values.clone(),
            }),
            None => Some(Action::Create(self.form.values.clone())),
        }
    }

    pub fn confirm_delete(&mut self) -> Option<Action> {
        let delete = self.delete.as_mut()?;
        if matches!(delete.status, SubmitStatus::Loading | SubmitStatus::Success) {
            return None;
        }
        delete.status = SubmitStatus::Loading;
        Some(Action::Delete {
            id: delete.target.id.clone(),
        })
    }

    // ------------------------------------------------------------------
    // Outcomes & time
    // ------------------------------------------------------------------

    /// Fold a finished gateway call back into the state machine. A
    /// successful mutation schedules the auto-close and asks for a reload,
    /// the list view's only consistency mechanism.
    pub fn handle_outcome(&mut self, outcome: Outcome, now: Instant) -> Option<Action> {
        match outcome {
            Outcome::Saved(Ok(_)) => {
                self.form.status = SubmitStatus::Success;
                self.form.close_at = Some(now + SUCCESS_CLOSE_DELAY);
                Some(Action::Reload)
            }
            Outcome::Saved(Err(message)) => {
                self.form.status = SubmitStatus::Error(message);
                None
            }
            Outcome::Deleted(Ok(())) => {
                if let Some(delete) = self.delete.as_mut() {
                    delete.status = SubmitStatus::Success;
                    delete.close_at = Some(now + SUCCESS_CLOSE_DELAY);
                }
                Some(Action::Reload)
            }
            Outcome::Deleted(Err(message)) => {
                if let Some(delete) = self.delete.as_mut() {
                    delete.status = SubmitStatus::Error(message);
                }
                None
            }
            Outcome::Loaded(Ok(clients)) => {
                self.set_clients(clients);
                None
            }
            Outcome::Loaded(Err(message)) => {
                self.loading = false;
                self.load_error = Some(message);
                None
            }
        }
    }

    /// Advance the clocks: close any modal whose success delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self.modal == Modal::Form {
            if let Some(close_at) = self.form.close_at {
                if now >= close_at {
                    self.close_modal();
                }
            }
        }

        if self.modal == Modal::ConfirmDelete {
            let due = self
                .delete
                .as_ref()
                .and_then(|d| d.close_at)
                .is_some_and(|at| now >= at);
            if due {
                self.close_modal();
            }
        }
    }

    // ------------------------------------------------------------------
    // Key dispatch
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self.modal {
            Modal::Form => self.handle_form_key(key),
            Modal::ConfirmDelete => self.handle_confirm_key(key),
            Modal::None => {
                if self.searching {
                    self.handle_search_key(key);
                    None
                } else {
                    self.handle_page_key(key)
                }
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        // A call in flight cannot be canceled; ignore everything until it
        // settles (success auto-closes, error returns control).
        if self.form.status == SubmitStatus::Loading {
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                if self.form.status != SubmitStatus::Success {
                    self.close_modal();
                }
                None
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next_field();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_previous_field();
                None
            }
            KeyCode::Backspace => {
                self.form_backspace();
                None
            }
            KeyCode::Char(c) => {
                self.form_input(c);
                None
            }
            _ => None,
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        let status = self
            .delete
            .as_ref()
            .map(|d| d.status.clone())
            .unwrap_or(SubmitStatus::Idle);
        if status == SubmitStatus::Loading {
            return None;
        }

        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => {
                if status != SubmitStatus::Success {
                    self.close_modal();
                }
                None
            }
            _ => None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.searching = false,
            KeyCode::Backspace => {
                self.search.pop();
                self.apply_filter();
            }
            KeyCode::Char(c) => {
                self.search.push(c);
                self.apply_filter();
            }
            _ => {}
        }
    }

    fn handle_page_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.page = self.page.previous();
                } else {
                    self.page = self.page.next();
                }
                None
            }
            KeyCode::BackTab => {
                self.page = self.page.previous();
                None
            }
            _ if self.page == Page::Clients => self.handle_clients_key(key),
            _ => None,
        }
    }

    fn handle_clients_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('/') => {
                self.searching = true;
                None
            }
            KeyCode::Char('a') => {
                self.open_new_client_form();
                None
            }
            KeyCode::Char('e') => {
                self.open_edit_client_form();
                None
            }
            KeyCode::Char('d') => {
                self.request_delete();
                None
            }
            KeyCode::Char('r') => {
                self.loading = true;
                self.load_error = None;
                Some(Action::Reload)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                None
            }
            KeyCode::Home => {
                if !self.filtered.is_empty() {
                    self.table.select(Some(0));
                }
                None
            }
            KeyCode::End => {
                if !self.filtered.is_empty() {
                    self.table.select(Some(self.filtered.len() - 1));
                }
                None
            }
            _ => None,
        }
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

pub fn run_ui(app: &mut App, api: Arc<Mutex<ClientsApi>>, handle: Handle) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, api, handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    api: Arc<Mutex<ClientsApi>>,
    handle: Handle,
) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();

    loop {
        terminal.draw(|f| ui(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        while let Ok(outcome) = rx.try_recv() {
            if let Some(action) = app.handle_outcome(outcome, Instant::now()) {
                dispatch(action, &api, &handle, &tx);
            }
        }

        app.tick(Instant::now());

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = app.handle_key(key) {
                    dispatch(action, &api, &handle, &tx);
                }
            }
        }
    }
}

/// Spawn one gateway call; its outcome comes back over the channel.
fn dispatch(action: Action, api: &Arc<Mutex<ClientsApi>>, handle: &Handle, tx: &Sender<Outcome>) {
    let api = Arc::clone(api);
    let tx = tx.clone();

    handle.spawn(async move {
        let outcome = match action {
            Action::Create(input) => {
                let mut api = api.lock().await;
                Outcome::Saved(api.create_client(&input).await.map_err(|e| e.to_string()))
            }
            Action::Update { id, input } => {
                let mut api = api.lock().await;
                Outcome::Saved(
                    api.update_client(&id, &input)
                        .await
                        .map_err(|e| e.to_string()),
                )
            }
            Action::Delete { id } => {
                let mut api = api.lock().await;
                Outcome::Deleted(api.delete_client(&id).await.map_err(|e| e.to_string()))
            }
            Action::Reload => {
                let mut api = api.lock().await;
                Outcome::Loaded(api.refresh().await.map_err(|e| e.to_string()))
            }
        };

        let _ = tx.send(outcome);
    });
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.page {
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        Page::Clients => render_clients(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    match app.modal {
        Modal::Form => render_form_modal(f, app),
        Modal::ConfirmDelete => render_confirm_modal(f, app),
        Modal::None => {}
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Dashboard, Page::Clients];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Clients: {}", app.clients.len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" RealEstate Pro "),
    );

    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(rows[0]);

    // Only the client count is live; the other tiles stay static until
    // lots, contracts, and payments get a working read path.
    let stats = [
        ("Total Sales", "R$ 1.2M".to_string()),
        ("Active Clients", app.clients.len().to_string()),
        ("Available Lots", "38".to_string()),
        ("Due Payments", "27".to_string()),
    ];

    for (i, (name, value)) in stats.iter().enumerate() {
        let tile = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", value),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(format!(" {} ", name)),
        );
        f.render_widget(tile, tiles[i]);
    }

    let hint = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Press Tab to open the client manager.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Overview "));

    f.render_widget(hint, rows[1]);
}

fn render_clients(f: &mut Frame, area: Rect, app: &mut App) {
    if app.loading {
        let loading = Paragraph::new("\n  Loading clients...")
            .block(Block::default().borders(Borders::ALL).title(" Clients "));
        f.render_widget(loading, area);
        return;
    }

    if let Some(ref message) = app.load_error {
        let error = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  Error loading clients: {}", message),
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Press r to retry.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Clients "));
        f.render_widget(error, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_search_bar(f, chunks[0], app);
    render_table(f, chunks[1], app);
}

fn render_search_bar(f: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if app.search.is_empty() && !app.searching {
        (
            "Search clients by name, email or document...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (app.search.clone(), Style::default().fg(Color::White))
    };

    let border = if app.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };

    let search = Paragraph::new(Line::from(vec![
        Span::raw(" 🔍 "),
        Span::styled(text, style),
        if app.searching {
            Span::styled("▏", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        },
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Search "),
    );

    f.render_widget(search, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    if app.filtered.is_empty() {
        let empty = Paragraph::new("\n  No clients found")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Clients "));
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["Name", "Email", "Phone", "Document"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.filtered.iter().map(|client| {
        let cells = vec![
            Cell::from(truncate(&client.name, 28)),
            Cell::from(truncate(&client.email, 30)),
            Cell::from(client.phone.clone()),
            Cell::from(truncate(&client.document, 18)),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Length(32),
            Constraint::Length(16),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Clients "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.table);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.table.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if !app.search.is_empty() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", app.search),
            Style::default().fg(Color::Green),
        ));
    }

    let hints: &[(&str, &str)] = match app.modal {
        Modal::Form => &[
            ("Tab", "Next field"),
            ("Enter", "Save"),
            ("Esc", "Cancel"),
        ],
        Modal::ConfirmDelete => &[("y", "Delete"), ("n", "Keep")],
        Modal::None if app.searching => &[("Esc", "Done"), ("⌫", "Erase")],
        Modal::None => &[
            ("a", "Add"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("/", "Search"),
            ("r", "Reload"),
            ("q", "Quit"),
        ],
    };

    for (key, label) in hints {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {}", label)));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_form_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(52, 21, f.size());
    f.render_widget(Clear, area);

    let title = if app.form.editing.is_some() {
        " Edit Client "
    } else {
        " Add New Client "
    };

    let mut lines = vec![Line::from("")];

    for (i, (field, label)) in FORM_FIELDS.iter().enumerate() {
        let marker = if i == app.form.focused { "→ " } else { "  " };
        let label_style = if i == app.form.focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<9}", label), label_style),
            Span::raw(app.form.field_value(field).to_string()),
            if i == app.form.focused {
                Span::styled("▏", Style::default().fg(Color::Yellow))
            } else {
                Span::raw("")
            },
        ]));

        match app.form.errors.get(field) {
            Some(message) => lines.push(Line::from(Span::styled(
                format!("           {}", message),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from("")),
        }
    }

    lines.push(Line::from(""));
    lines.push(match &app.form.status {
        SubmitStatus::Idle => Line::from(Span::styled(
            "  Enter to save, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
        SubmitStatus::Loading => Line::from(Span::styled(
            "  Saving...",
            Style::default().fg(Color::Yellow),
        )),
        SubmitStatus::Success => Line::from(Span::styled(
            "  ✓ Saved!",
            Style::default().fg(Color::Green),
        )),
        SubmitStatus::Error(message) => Line::from(Span::styled(
            format!("  ✗ {}", message),
            Style::default().fg(Color::Red),
        )),
    });

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );

    f.render_widget(modal, area);
}

fn render_confirm_modal(f: &mut Frame, app: &App) {
    let Some(ref delete) = app.delete else {
        return;
    };

    let area = centered_rect(50, 8, f.size());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Delete client "),
            Span::styled(
                delete.target.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]),
        Line::from(""),
        match &delete.status {
            SubmitStatus::Idle => Line::from(Span::styled(
                "  y to delete, n to keep",
                Style::default().fg(Color::DarkGray),
            )),
            SubmitStatus::Loading => Line::from(Span::styled(
                "  Deleting...",
                Style::default().fg(Color::Yellow),
            )),
            SubmitStatus::Success => Line::from(Span::styled(
                "  ✓ Deleted",
                Style::default().fg(Color::Green),
            )),
            SubmitStatus::Error(message) => Line::from(Span::styled(
                format!("  ✗ {}", message),
                Style::default().fg(Color::Red),
            )),
        },
    ];

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Confirm Delete "),
    );

    f.render_widget(modal, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

// ============================================================================
// TESTS
// ============================================================================
