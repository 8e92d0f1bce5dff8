use std::{cmp, collections::BTreeMap, io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamedex_core::{
    browse::{BrowseState, DetailState, FetchRequest},
    catalog::{CatalogError, CatalogGateway},
    models::{joined_names, recent_years, FilterKey, Game, GamePage, NamedRef, Taxonomy},
    route::Route,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{debug, error, info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);
const YEAR_CHOICES: usize = 25;
const PREVIEW_TAGS: usize = 3;
const MAX_SEARCH_LEN: usize = 80;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    score: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            score: Color::Yellow,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
    Picker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Browse,
    Detail,
}

#[derive(Debug, Clone)]
struct FilterPicker {
    key: FilterKey,
    items: Vec<NamedRef>,
    cursor: usize,
}

impl FilterPicker {
    fn new(key: FilterKey, items: Vec<NamedRef>, selected: Option<&str>) -> Self {
        let cursor = selected
            .and_then(|value| items.iter().position(|item| item.id.to_string() == value))
            .unwrap_or(0);
        Self { key, items, cursor }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len - 1) as usize;
    }

    fn current(&self) -> Option<&NamedRef> {
        self.items.get(self.cursor)
    }
}

enum AppEvent {
    Input(Event),
    Tick,
    PageLoaded {
        ticket: u64,
        result: Result<GamePage, CatalogError>,
    },
    TaxonomyLoaded(Result<Taxonomy, CatalogError>),
    DetailLoaded {
        id: i64,
        game: Option<Game>,
    },
}

/// Terminal front-end for browsing the game catalog.
pub struct GamedexApp {
    gateway: CatalogGateway,
    browse: BrowseState,
    detail: Option<DetailState>,
    taxonomy: Taxonomy,
    tag_names: BTreeMap<String, String>,
    screen: Screen,
    state: UiState,
    picker: Option<FilterPicker>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    theme: Theme,
}

impl GamedexApp {
    pub fn new(gateway: CatalogGateway) -> Self {
        Self {
            gateway,
            browse: BrowseState::new(),
            detail: None,
            taxonomy: Taxonomy::default(),
            tag_names: BTreeMap::new(),
            screen: Screen::Browse,
            state: UiState::default(),
            picker: None,
            event_tx: None,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self, start: Route) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        self.start_taxonomy_load();
        let request = self.browse.refresh();
        self.start_page_load(request);
        if let Route::Game(id) = start {
            self.open_detail(id);
        }

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn route(&self) -> Route {
        match (&self.screen, &self.detail) {
            (Screen::Detail, Some(detail)) => Route::Game(detail.id()),
            _ => Route::Browse,
        }
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::PageLoaded { ticket, result }) => {
                self.handle_page_loaded(ticket, result);
                true
            }
            Some(AppEvent::TaxonomyLoaded(result)) => {
                match result {
                    Ok(taxonomy) if taxonomy.is_empty() => {
                        warn!("Catalog returned no filter choices");
                        self.taxonomy = taxonomy;
                        self.state
                            .set_status("No filter choices available".to_string());
                    }
                    Ok(taxonomy) => {
                        info!(
                            genres = taxonomy.genres.len(),
                            platforms = taxonomy.platforms.len(),
                            developers = taxonomy.developers.len(),
                            "Filter choices loaded"
                        );
                        self.taxonomy = taxonomy;
                    }
                    Err(err) => {
                        warn!(%err, "Filter choices unavailable");
                        self.taxonomy = Taxonomy::default();
                        self.state
                            .set_status("Filter choices unavailable".to_string());
                    }
                }
                true
            }
            Some(AppEvent::DetailLoaded { id, game }) => {
                self.handle_detail_loaded(id, game);
                true
            }
            None => false,
        }
    }

    fn handle_page_loaded(&mut self, ticket: u64, result: Result<GamePage, CatalogError>) {
        if let Err(err) = &result {
            warn!(ticket, %err, "Game list request failed");
        }
        if !self.browse.resolve(ticket, result) {
            debug!(ticket, "Discarding stale game list response");
            return;
        }

        self.state.cursor = 0;
        self.state.offset = 0;
        let results = self.browse.results();
        let status = match (&results.error, results.games.len()) {
            (Some(_), _) => "Request failed; no games to show".to_string(),
            (None, 0) => "No games found".to_string(),
            (None, count) => format!("Loaded {count} games (page {})", self.browse.page()),
        };
        info!(
            ticket,
            page = self.browse.page(),
            games = results.games.len(),
            has_next = results.has_next,
            "Game list updated"
        );
        self.state.set_status(status);
    }

    fn handle_detail_loaded(&mut self, id: i64, game: Option<Game>) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        if !detail.resolve(id, game) {
            debug!(id, "Discarding detail response for another game");
            return;
        }
        let status = match detail.game() {
            Some(game) => format!("Showing {}", game.title),
            None => format!("Details for game {id} are unavailable"),
        };
        self.state.set_status(status);
    }

    fn start_page_load(&mut self, request: FetchRequest) {
        let Some(sender) = self.event_tx.clone() else {
            error!("event_channel_missing");
            return;
        };
        info!(
            ticket = request.ticket,
            page = request.page,
            filters = %request.filters.describe(),
            "Fetching games"
        );
        self.state.set_status("Loading games…".to_string());
        let gateway = self.gateway.clone();
        spawn(async move {
            let result = request.run(&gateway).await;
            let _ = sender
                .send(AppEvent::PageLoaded {
                    ticket: request.ticket,
                    result,
                })
                .await;
        });
    }

    fn start_taxonomy_load(&mut self) {
        let Some(sender) = self.event_tx.clone() else {
            error!("event_channel_missing");
            return;
        };
        let gateway = self.gateway.clone();
        spawn(async move {
            let result = gateway.try_fetch_filter_taxonomy().await;
            let _ = sender.send(AppEvent::TaxonomyLoaded(result)).await;
        });
    }

    fn open_detail(&mut self, id: i64) {
        let Some(sender) = self.event_tx.clone() else {
            error!("event_channel_missing");
            return;
        };
        self.detail = Some(DetailState::open(id));
        self.screen = Screen::Detail;
        self.state.tag_cursor = 0;
        info!(route = %self.route(), "Opening game details");
        self.state.set_status("Loading game details…".to_string());
        let gateway = self.gateway.clone();
        spawn(async move {
            let game = gateway.fetch_game_by_id(id).await;
            let _ = sender.send(AppEvent::DetailLoaded { id, game }).await;
        });
    }

    fn close_detail(&mut self) {
        self.screen = Screen::Browse;
        self.detail = None;
        self.state.set_status("Back to the game list".to_string());
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => match self.screen {
                Screen::Browse => self.handle_key(key)?,
                Screen::Detail => self.handle_detail_key(key)?,
            },
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.state.mode {
            Mode::Search => self.handle_search_key(key),
            Mode::Picker => self.handle_picker_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state.set_status("Search cancelled".to_string());
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                let text = self.state.search_input.clone();
                let request = self.browse.set_search(&text);
                self.start_page_load(request);
            }
            KeyCode::Backspace => {
                self.state.search_input.pop();
            }
            KeyCode::Char(c) => {
                if (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT)
                    && self.state.search_input.chars().count() < MAX_SEARCH_LEN
                {
                    self.state.search_input.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(picker) = self.picker.as_mut() else {
            self.state.mode = Mode::Browse;
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.picker = None;
                self.state.mode = Mode::Browse;
            }
            KeyCode::Char('j') | KeyCode::Down => picker.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => picker.move_cursor(-1),
            KeyCode::PageDown => picker.move_cursor(10),
            KeyCode::PageUp => picker.move_cursor(-10),
            KeyCode::Enter => {
                let key = picker.key;
                let value = picker.current().map(|item| item.id.to_string());
                self.picker = None;
                self.state.mode = Mode::Browse;
                if let Some(value) = value {
                    let request = self.browse.set_filter(key, &value);
                    self.start_page_load(request);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn open_picker(&mut self, key: FilterKey) {
        let items = match key {
            FilterKey::Year => recent_years(YEAR_CHOICES)
                .into_iter()
                .map(|year| NamedRef::new(i64::from(year), year.to_string()))
                .collect(),
            FilterKey::Genre => self.taxonomy.genres.clone(),
            FilterKey::Platform => self.taxonomy.platforms.clone(),
            FilterKey::Developer => self.taxonomy.developers.clone(),
        };
        if items.is_empty() {
            self.state
                .set_status(format!("No {} choices available", key.label().to_lowercase()));
            return;
        }
        self.picker = Some(FilterPicker::new(key, items, self.browse.filters().get(key)));
        self.state.mode = Mode::Picker;
        self.state
            .set_status(format!("Select {} (Enter toggles, Esc closes)", key.label()));
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        let total = self.browse.results().games.len();
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1, total),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1, total),
            KeyCode::Home => self.state.move_to(0, total),
            KeyCode::End => self.state.move_to(total.saturating_sub(1), total),
            KeyCode::PageDown => self.state.move_cursor(self.state.list_height as isize, total),
            KeyCode::PageUp => self.state.move_cursor(-(self.state.list_height as isize), total),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Search;
                self.state.search_input = self.browse.filters().search.clone().unwrap_or_default();
                self.state.set_status("Enter search text".to_string());
            }
            KeyCode::Char('y') => self.open_picker(FilterKey::Year),
            KeyCode::Char('g') => self.open_picker(FilterKey::Genre),
            KeyCode::Char('p') => self.open_picker(FilterKey::Platform),
            KeyCode::Char('d') => self.open_picker(FilterKey::Developer),
            KeyCode::Char('c') => {
                if self.browse.filters().is_empty() {
                    self.state.set_status("No filters active".to_string());
                } else {
                    let request = self.browse.clear_filters();
                    self.start_page_load(request);
                }
            }
            KeyCode::Char('r') => {
                let request = self.browse.refresh();
                self.start_page_load(request);
            }
            KeyCode::Char('n') | KeyCode::Char(']') => match self.browse.next_page() {
                Some(request) => self.start_page_load(request),
                None => self.state.set_status("No next page".to_string()),
            },
            KeyCode::Char('N') | KeyCode::Char('[') => match self.browse.prev_page() {
                Some(request) => self.start_page_load(request),
                None => self.state.set_status("Already on the first page".to_string()),
            },
            KeyCode::Enter => {
                if let Some(id) = self.current_game().map(|game| game.id) {
                    self.open_detail(id);
                } else {
                    self.state.set_status("No game selected".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        let tag_count = self
            .detail
            .as_ref()
            .and_then(DetailState::game)
            .map(|game| game.tags.len())
            .unwrap_or(0);
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.close_detail(),
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
                if tag_count > 0 {
                    self.state.tag_cursor = (self.state.tag_cursor + 1) % tag_count;
                }
            }
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
                if tag_count > 0 {
                    self.state.tag_cursor = (self.state.tag_cursor + tag_count - 1) % tag_count;
                }
            }
            KeyCode::Char('r') => {
                let retry = self
                    .detail
                    .as_ref()
                    .filter(|detail| detail.is_placeholder())
                    .map(DetailState::id);
                if let Some(id) = retry {
                    self.open_detail(id);
                }
            }
            KeyCode::Enter => {
                let tag = self
                    .detail
                    .as_ref()
                    .and_then(DetailState::game)
                    .and_then(|game| game.tags.get(self.state.tag_cursor))
                    .cloned();
                if let Some(tag) = tag {
                    let value = tag.id.to_string();
                    self.tag_names.insert(value.clone(), tag.name);
                    let request = self.browse.toggle_tag(&value);
                    self.close_detail();
                    self.start_page_load(request);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn current_game(&self) -> Option<&Game> {
        self.browse.results().games.get(self.state.cursor)
    }

    fn filter_label(&self, key: FilterKey) -> Option<String> {
        let value = self.browse.filters().get(key)?;
        let items = match key {
            FilterKey::Year => return Some(value.to_string()),
            FilterKey::Genre => &self.taxonomy.genres,
            FilterKey::Platform => &self.taxonomy.platforms,
            FilterKey::Developer => &self.taxonomy.developers,
        };
        Some(
            items
                .iter()
                .find(|item| item.id.to_string() == value)
                .map(|item| item.name.clone())
                .unwrap_or_else(|| value.to_string()),
        )
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Browse => self.draw_browse(frame),
            Screen::Detail => self.draw_detail(frame),
        }
        match self.state.mode {
            Mode::Search if self.screen == Screen::Browse => self.render_search_prompt(frame),
            Mode::Picker if self.screen == Screen::Browse => {
                if let Some(picker) = &self.picker {
                    self.render_picker(frame, picker);
                }
            }
            _ => {}
        }
    }

    fn draw_browse(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(size);

        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        self.render_header(frame, chunks[0]);
        self.render_game_list(frame, body_chunks[0]);
        self.render_game_preview(frame, body_chunks[1]);
        self.render_status(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut filters: Vec<Span> = Vec::new();
        for key in FilterKey::ALL {
            let (text, style) = match self.filter_label(key) {
                Some(label) => (
                    format!("{}: {label}", key.label()),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                None => (key.label().to_string(), Style::default().fg(self.theme.muted)),
            };
            filters.push(Span::styled(format!("[{text}]"), style));
            filters.push(Span::raw(" "));
        }
        let current = self.browse.filters();
        if !current.tags.is_empty() {
            let tags = tag_labels(current.tags.iter(), &self.tag_names).join(", ");
            filters.push(Span::styled(
                format!("[Tags: {tags}]"),
                Style::default().fg(self.theme.accent),
            ));
            filters.push(Span::raw(" "));
        }
        if let Some(search) = &current.search {
            filters.push(Span::styled(
                format!("[Search: {search}]"),
                Style::default().fg(self.theme.accent),
            ));
        }

        let title = Line::from(vec![
            Span::styled(
                "Metacritic's Greatest",
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " · The Ultimate Game Rankings",
                Style::default().fg(self.theme.muted),
            ),
        ]);
        let paragraph = Paragraph::new(vec![title, Line::from(filters)])
            .block(Block::default().borders(Borders::ALL).title("gamedex"));
        frame.render_widget(paragraph, area);
    }

    fn render_game_list(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!("Games · page {}", self.browse.page());
        let block = Block::default().borders(Borders::ALL).title(title);
        let results = self.browse.results();

        if results.loading {
            let paragraph = Paragraph::new("Loading games…")
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }
        if results.games.is_empty() {
            let (message, color) = match &results.error {
                Some(_) => ("Request failed. Press r to retry.", self.theme.danger),
                None => ("No games found.", self.theme.warning),
            };
            let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(color)))
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        self.state.list_height = area.height.saturating_sub(2) as usize;
        let total = results.games.len();
        self.state.clamp_cursor(total);
        self.state.ensure_cursor_visible(total);

        let mut list_state = ListState::default();
        let height = self.state.list_height;
        let end = (self.state.offset + height).min(total);
        let games = &results.games[self.state.offset..end];
        if !games.is_empty() {
            let selected = self
                .state
                .cursor
                .saturating_sub(self.state.offset)
                .min(games.len().saturating_sub(1));
            list_state.select(Some(selected));
        }
        let items: Vec<ListItem> = games
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let is_selected = self.state.cursor == self.state.offset + idx;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let score = Span::styled(
                    format!("{:>3} ", game.score_label()),
                    Style::default()
                        .fg(self.theme.score)
                        .add_modifier(Modifier::BOLD),
                );
                let title = Span::styled(
                    game.title.clone(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                );
                let released = Span::styled(
                    format!(" · {}", game.release_label()),
                    Style::default().fg(self.theme.muted),
                );
                ListItem::new(Line::from(vec![marker, score, title, released]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_game_preview(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Game");
        let Some(game) = self.current_game().filter(|_| !self.browse.results().loading) else {
            frame.render_widget(Paragraph::new("No game selected").block(block), area);
            return;
        };

        let mut lines = vec![Line::from(Span::styled(
            game.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(vec![
            Span::styled("Metacritic: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(game.score_label(), Style::default().fg(self.theme.score)),
        ]));
        lines.push(Line::from(format!("Release date: {}", game.release_label())));
        lines.push(Line::from(format!("Platforms: {}", joined_names(&game.platforms))));
        let genres = if game.genres.is_empty() {
            "No Genre Info".to_string()
        } else {
            joined_names(&game.genres)
        };
        lines.push(Line::from(format!("Genres: {genres}")));
        let tags = if game.tags.is_empty() {
            "No Tags".to_string()
        } else {
            let shown = cmp::min(PREVIEW_TAGS, game.tags.len());
            joined_names(&game.tags[..shown])
        };
        lines.push(Line::from(format!("Tags: {tags}")));
        let cover = game
            .cover_image_url
            .clone()
            .unwrap_or_else(|| "No Image Available".to_string());
        lines.push(Line::from(Span::styled(
            format!("Cover: {cover}"),
            Style::default().fg(self.theme.muted),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Enter opens {}", Route::Game(game.id)),
            Style::default().fg(self.theme.muted),
        )));

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Search {
            format!("Search: {}", self.state.search_input)
        } else {
            self.state.status.clone()
        };
        let mut paging = Vec::new();
        if self.browse.can_go_prev() {
            paging.push("[N] previous");
        }
        if self.browse.can_go_next() {
            paging.push("[n] next");
        }
        let secondary = format!(
            "Page {}  {}  ·  / search  y/g/p/d filters  c clear  r reload  Enter details  q quit",
            self.browse.page(),
            paging.join(" "),
        );
        let paragraph = Paragraph::new(vec![
            Line::from(primary),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_search_prompt(&self, frame: &mut Frame) {
        let frame_area = frame.size();
        let mut width = cmp::min(60_u16, frame_area.width.saturating_sub(4));
        width = cmp::max(width, 24_u16);
        let height = 5_u16.min(frame_area.height.saturating_sub(2)).max(3_u16);
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);

        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(self.state.search_input.clone()),
        ]);
        let helper = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" search  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel  (empty clears)"),
        ]);
        let paragraph = Paragraph::new(vec![input_line, Line::from(""), helper])
            .block(Block::default().borders(Borders::ALL).title("Search games"));
        frame.render_widget(paragraph, area);

        let cursor = self.state.search_input.chars().count() as u16;
        let cursor_x = (area.x + 3 + cursor).min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 1);
    }

    fn render_picker(&self, frame: &mut Frame, picker: &FilterPicker) {
        let frame_area = frame.size();
        let width = cmp::min(40_u16, frame_area.width.saturating_sub(4)).max(16);
        let height = cmp::min(picker.items.len() as u16 + 2, frame_area.height.saturating_sub(4))
            .max(3);
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let selected = self.browse.filters().get(picker.key);
        let items: Vec<ListItem> = picker
            .items
            .iter()
            .map(|item| {
                let active = selected == Some(item.id.to_string().as_str());
                let marker = if active { "✓ " } else { "  " };
                let style = if active {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                ListItem::new(Line::from(Span::styled(
                    format!("{marker}{}", item.name),
                    style,
                )))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(picker.cursor));
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(picker.key.label()),
            )
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_detail(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        let title = format!("Game Details · {}", self.route());
        let block = Block::default().borders(Borders::ALL).title(title);
        match self.detail.as_ref().and_then(DetailState::game) {
            Some(game) => {
                let paragraph = Paragraph::new(self.detail_lines(game))
                    .block(block)
                    .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, chunks[0]);
            }
            None => {
                let mut lines = vec![Line::from(Span::styled(
                    "Loading game details…",
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))];
                if matches!(self.detail, Some(DetailState::Unavailable { .. })) {
                    lines.push(Line::from(Span::styled(
                        "The catalog did not return this game. Press r to retry.",
                        Style::default().fg(self.theme.muted),
                    )));
                }
                let paragraph = Paragraph::new(lines)
                    .block(block)
                    .alignment(Alignment::Center);
                frame.render_widget(paragraph, chunks[0]);
            }
        }

        let help = Paragraph::new(vec![Line::from(vec![
            Span::raw(self.state.status.clone()),
            Span::styled(
                "  ·  Tab/Shift-Tab tags  Enter filter by tag  Esc back  q quit",
                Style::default().fg(self.theme.muted),
            ),
        ])])
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .wrap(Wrap { trim: true });
        frame.render_widget(help, chunks[1]);
    }

    fn detail_lines(&self, game: &Game) -> Vec<Line<'static>> {
        let label = |text: &str| {
            Span::styled(
                format!("{text}: "),
                Style::default().add_modifier(Modifier::BOLD),
            )
        };
        let mut lines = vec![
            Line::from(Span::styled(
                game.title.clone(),
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                joined_names(&game.genres),
                Style::default().fg(self.theme.accent),
            )),
            Line::from(""),
            Line::from(vec![
                label("Metacritic Score"),
                Span::styled(game.score_label(), Style::default().fg(self.theme.score)),
            ]),
            Line::from(vec![label("Release Date"), Span::raw(game.release_label())]),
            Line::from(vec![label("Platforms"), Span::raw(joined_names(&game.platforms))]),
            Line::from(vec![label("Developer"), Span::raw(joined_names(&game.developers))]),
        ];
        if let Some(cover) = &game.cover_image_url {
            lines.push(Line::from(vec![label("Cover"), Span::raw(cover.clone())]));
        }
        if game.has_trailer() {
            lines.push(Line::from(vec![
                label("Trailer"),
                Span::raw(game.trailer_url.clone()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(game.description.clone()));
        lines.push(Line::from(""));

        let mut tags = vec![label("Tags")];
        if game.tags.is_empty() {
            tags.push(Span::styled("No Tags", Style::default().fg(self.theme.muted)));
        }
        let active = &self.browse.filters().tags;
        for (idx, tag) in game.tags.iter().enumerate() {
            let mut style = Style::default();
            if active.contains(&tag.id.to_string()) {
                style = style.fg(self.theme.accent);
            }
            if idx == self.state.tag_cursor {
                style = style.bg(self.theme.selection_bg).add_modifier(Modifier::BOLD);
            }
            tags.push(Span::styled(format!("[{}]", tag.name), style));
            tags.push(Span::raw(" "));
        }
        lines.push(Line::from(tags));
        lines
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn tag_labels<'a>(
    tags: impl Iterator<Item = &'a String>,
    names: &BTreeMap<String, String>,
) -> Vec<String> {
    tags.map(|id| names.get(id).unwrap_or(id).clone()).collect()
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

struct UiState {
    cursor: usize,
    offset: usize,
    list_height: usize,
    tag_cursor: usize,
    search_input: String,
    status: String,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            list_height: 1,
            tag_cursor: 0,
            search_input: String::new(),
            status: "Ready".to_string(),
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn move_cursor(&mut self, delta: isize, total: usize) {
        if total == 0 {
            return;
        }
        let idx = (self.cursor as isize + delta).clamp(0, total as isize - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible(total);
    }

    fn move_to(&mut self, index: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.cursor = index.min(total - 1);
        self.ensure_cursor_visible(total);
    }

    fn clamp_cursor(&mut self, total: usize) {
        if total == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= total {
            self.cursor = total - 1;
        }
    }

    fn ensure_cursor_visible(&mut self, total: usize) {
        if total == 0 || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = total.saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamedex_core::config::AppConfig;

    #[test]
    fn cursor_stays_within_list_and_window() {
        let mut state = UiState {
            list_height: 5,
            ..UiState::default()
        };
        state.move_cursor(12, 28);
        assert_eq!(state.cursor, 12);
        assert_eq!(state.offset, 8);

        state.move_cursor(100, 28);
        assert_eq!(state.cursor, 27);
        assert_eq!(state.offset, 23);

        state.move_to(0, 28);
        assert_eq!((state.cursor, state.offset), (0, 0));

        state.move_cursor(3, 0);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn picker_starts_on_selected_value() {
        let items = vec![
            NamedRef::new(4, "PC"),
            NamedRef::new(187, "PlayStation 5"),
            NamedRef::new(7, "Nintendo Switch"),
        ];
        let mut picker = FilterPicker::new(FilterKey::Platform, items.clone(), Some("187"));
        assert_eq!(picker.current().map(|item| item.id), Some(187));

        picker.move_cursor(10);
        assert_eq!(picker.cursor, 2);
        picker.move_cursor(-10);
        assert_eq!(picker.cursor, 0);

        let picker = FilterPicker::new(FilterKey::Platform, items, Some("999"));
        assert_eq!(picker.cursor, 0);
    }

    fn game_with_tags(id: i64, tags: Vec<NamedRef>) -> Game {
        Game {
            id,
            title: "The Witcher 3: Wild Hunt".to_string(),
            metacritic: Some(92),
            released: None,
            cover_image_url: None,
            genres: Vec::new(),
            platforms: Vec::new(),
            developers: Vec::new(),
            tags,
            description: String::new(),
            trailer_url: String::new(),
        }
    }

    #[test]
    fn tag_filter_stores_id_and_shows_name() -> Result<()> {
        let gateway = CatalogGateway::from_config(&AppConfig::default())?;
        let mut app = GamedexApp::new(gateway);
        let tags = vec![
            NamedRef::new(31, "Singleplayer"),
            NamedRef::new(40845, "Hack & Slash"),
        ];
        let mut detail = DetailState::open(3328);
        assert!(detail.resolve(3328, Some(game_with_tags(3328, tags))));
        app.detail = Some(detail);
        app.screen = Screen::Detail;
        app.state.tag_cursor = 1;

        app.handle_detail_key(KeyEvent::from(KeyCode::Enter))?;

        assert_eq!(app.screen, Screen::Browse);
        let active = &app.browse.filters().tags;
        assert_eq!(active.iter().collect::<Vec<_>>(), vec!["40845"]);
        assert_eq!(tag_labels(active.iter(), &app.tag_names), vec!["Hack & Slash"]);
        assert_eq!(app.browse.page(), 1);
        Ok(())
    }

    #[test]
    fn unknown_tag_ids_are_labelled_verbatim() {
        let mut names = BTreeMap::new();
        names.insert("31".to_string(), "Singleplayer".to_string());
        let tags = ["31".to_string(), "7".to_string()];
        assert_eq!(tag_labels(tags.iter(), &names), vec!["Singleplayer", "7"]);
    }

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(40, 10, area);
        assert_eq!(rect, Rect::new(20, 7, 40, 10));

        let small = centered_rect(100, 100, Rect::new(0, 0, 10, 5));
        assert_eq!(small, Rect::new(0, 0, 10, 5));
    }
}
