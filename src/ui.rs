use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::detail_view::{display_name, DetailView, StatRow, PROGRESS_MAX};
use crate::navigator;
use crate::state::{AppState, PokemonSummary, Screen};

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const ACCENT_RED: Color = Color::Rgb(226, 102, 96);
const STAT_BAR_WIDTH: u16 = 20;
const ARTWORK_COLUMNS: u16 = 36;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DexComponentId {
    DexList,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DexContext {
    DexList,
    Search,
    Detail,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.search.active {
            return Some(DexComponentId::Search);
        }
        match self.screen {
            Screen::List => Some(DexComponentId::DexList),
            Screen::Detail => Some(DexComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::DexList => DexContext::DexList,
            DexComponentId::Search => DexContext::Search,
            DexComponentId::Detail => DexContext::Detail,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::DexList
    }
}

pub struct DexUi {
    dex_list: SelectList,
    status_bar: StatusBar,
}

impl Default for DexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            dex_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        let layout = app_layout(area);
        match state.screen {
            Screen::List => {
                event_ctx.set_component_area(DexComponentId::DexList, layout[1]);
                if state.search.active {
                    event_ctx.set_component_area(DexComponentId::Search, layout[0]);
                }
            }
            Screen::Detail => event_ctx.set_component_area(DexComponentId::Detail, layout[1]),
        }
        render_app(frame, area, state, &mut self.dex_list, &mut self.status_bar);
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_list_event(event, state, &mut self.dex_list)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_search_event(event, state)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_detail_event(event, state)
    }
}

fn app_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area)
}

/// Draws the whole frame without registering component areas.
pub fn render_app(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    dex_list: &mut SelectList,
    status_bar: &mut StatusBar,
) {
    frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
    let layout = app_layout(area);

    match state.screen {
        Screen::List => {
            render_list_header(frame, layout[0], state);
            render_list(frame, layout[1], state, dex_list);
        }
        Screen::Detail => {
            render_detail_header(frame, layout[0], state);
            render_detail(frame, layout[1], state);
        }
    }
    render_footer(frame, layout[2], state, status_bar);
}

pub fn handle_list_event(
    event: &EventKind,
    state: &AppState,
    dex_list: &mut SelectList,
) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::PageDown => vec![Action::SelectionPage(1)],
            crossterm::event::KeyCode::PageUp => vec![Action::SelectionPage(-1)],
            crossterm::event::KeyCode::Home | crossterm::event::KeyCode::Char('g') => {
                vec![Action::SelectionJumpTop]
            }
            crossterm::event::KeyCode::End | crossterm::event::KeyCode::Char('G') => {
                vec![Action::SelectionJumpBottom]
            }
            crossterm::event::KeyCode::Tab | crossterm::event::KeyCode::Char('m') => {
                vec![Action::FilterModeNext]
            }
            crossterm::event::KeyCode::Enter => state
                .selected_entry()
                .map(|entry| vec![Action::CardActivate(entry.id)])
                .unwrap_or_default(),
            _ => {
                let items = dex_items(state);
                let props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.selected_index.min(items.len().saturating_sub(1)),
                    is_focused: true,
                    style: dex_list_style(),
                    behavior: SelectListBehavior {
                        show_scrollbar: true,
                        wrap_navigation: false,
                    },
                    on_select: Action::DexSelect,
                    render_item: &|item| item.clone(),
                };
                let actions: Vec<_> = dex_list.handle_event(event, props).into_iter().collect();
                return handler_response(actions);
            }
        },
        EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Esc => vec![Action::SearchCancel],
            crossterm::event::KeyCode::Enter => vec![Action::SearchSubmit],
            crossterm::event::KeyCode::Backspace => vec![Action::SearchBackspace],
            crossterm::event::KeyCode::Tab => vec![Action::FilterModeNext],
            crossterm::event::KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_detail_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Left | crossterm::event::KeyCode::Char('h')
                if state.can_prev() =>
            {
                vec![Action::Navigate(navigator::Direction::Prev)]
            }
            crossterm::event::KeyCode::Right | crossterm::event::KeyCode::Char('l')
                if state.can_next() =>
            {
                vec![Action::Navigate(navigator::Direction::Next)]
            }
            crossterm::event::KeyCode::Esc | crossterm::event::KeyCode::Backspace => {
                vec![Action::GoHome]
            }
            crossterm::event::KeyCode::Char('p') => vec![Action::PlayCry],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn spinner(state: &AppState) -> &'static str {
    SPINNER[(state.tick % SPINNER.len() as u64) as usize]
}

fn render_list_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title_style = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    let query = if state.search.active {
        format!("/{}_", state.search.query)
    } else if state.search.query.is_empty() {
        "/ to search".to_string()
    } else {
        format!("/{}", state.search.query)
    };
    let query_style = if state.search.active {
        Style::default().fg(ACCENT_GOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let line = Line::from(vec![
        Span::styled("POKEDEX", title_style),
        Span::raw("  "),
        Span::styled(query, query_style),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", state.search.mode.label()),
            Style::default().fg(ACCENT_TEAL),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{}/{}", state.filtered_indices.len(), state.roster.len()),
            Style::default().fg(TEXT_DIM),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(state.location.as_str())
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Roster list, or the loading/error/not-found indicator in its place.
pub fn render_list(frame: &mut Frame, area: Rect, state: &AppState, dex_list: &mut SelectList) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_TEAL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let placeholder = if state.list_loading {
        Some(format!("Loading pokedex {}", spinner(state)))
    } else if let Some(error) = state.list_error.as_ref() {
        Some(format!("Could not load the pokedex: {error}"))
    } else if state.not_found() {
        Some(format!("No Pokémon found for \"{}\"", state.search.query))
    } else {
        None
    };
    if let Some(message) = placeholder {
        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let items = dex_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.selected_index.min(items.len().saturating_sub(1)),
        is_focused: !state.search.active,
        style: dex_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::DexSelect,
        render_item: &|item| item.clone(),
    };
    dex_list.render(frame, inner, props);
}

fn dex_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .filtered_indices
        .iter()
        .filter_map(|idx| state.roster.get(*idx))
        .map(dex_line)
        .collect()
}

/// `#025 Pikachu  Electric`
pub fn dex_line(entry: &PokemonSummary) -> Line<'static> {
    let types = entry
        .types
        .iter()
        .map(|name| display_name(name))
        .collect::<Vec<_>>()
        .join("/");
    Line::from(vec![
        Span::styled(format!("#{:03} ", entry.id), Style::default().fg(ACCENT_GOLD)),
        Span::styled(display_name(&entry.name), Style::default().fg(TEXT_MAIN)),
        Span::raw("  "),
        Span::styled(types, Style::default().fg(TEXT_DIM)),
    ])
}

fn dex_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..Default::default()
    }
}

fn render_detail_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let accent = state.theme.accent.to_color();
    let title = match state.current_detail() {
        Some(detail) => DetailView::build(detail, &state.theme).title,
        None => "Pokedex".to_string(),
    };
    let arrow = |label: &str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(BG_HIGHLIGHT)
        };
        Span::styled(label.to_string(), style)
    };
    let line = Line::from(vec![
        arrow("< prev", state.can_prev()),
        Span::raw("   "),
        Span::styled(title, Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        arrow("next >", state.can_next()),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(state.location.as_str())
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(accent));
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

/// Detail card themed by the primary type, or the loading/error message.
pub fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let accent = state.theme.accent;
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(accent.dimmed(0.2).to_color()).fg(TEXT_MAIN))
        .border_style(Style::default().fg(accent.to_color()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(detail) = state.current_detail() else {
        let message = if state.detail.is_loading() {
            let id = state.pending_id.or(state.current_id()).unwrap_or_default();
            Line::styled(
                format!("Loading #{id:03} {}", spinner(state)),
                Style::default().fg(TEXT_DIM),
            )
        } else if let Some(error) = state.detail.error() {
            Line::styled(error.to_string(), Style::default().fg(ACCENT_RED))
        } else {
            Line::styled("No Pokémon selected.", Style::default().fg(TEXT_DIM))
        };
        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    };

    let view = DetailView::build(detail, &state.theme);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(ARTWORK_COLUMNS), Constraint::Min(20)])
        .split(inner);
    render_artwork(frame, columns[0], state, &view);
    render_profile(frame, columns[1], &view);
}

fn render_artwork(frame: &mut Frame, area: Rect, state: &AppState, view: &DetailView) {
    if let Some(artwork) = state.current_artwork() {
        let backdrop = view.accent.dimmed(0.2).to_color();
        frame.render_widget(
            Paragraph::new(artwork.to_lines(backdrop)).alignment(Alignment::Center),
            area,
        );
        return;
    }

    let content = if state.artwork_loading {
        format!("[loading artwork {}]", spinner(state))
    } else {
        view.artwork_url.clone()
    };
    frame.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_profile(frame: &mut Frame, area: Rect, view: &DetailView) {
    let accent = view.accent.to_color();
    let label = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(vec![
        Span::styled(view.number.clone(), Style::default().fg(TEXT_DIM)),
        Span::raw(" "),
        Span::styled(
            view.name.clone(),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(genus) = view.genus.as_ref() {
        lines.push(Line::styled(genus.clone(), Style::default().fg(TEXT_DIM)));
    }

    let mut badges = Vec::new();
    for badge in &view.badges {
        badges.push(Span::styled(
            format!(" {} ", badge.label),
            Style::default()
                .bg(badge.color.to_color())
                .fg(BG_BASE)
                .add_modifier(Modifier::BOLD),
        ));
        badges.push(Span::raw(" "));
    }
    lines.push(Line::from(badges));
    lines.push(Line::default());

    lines.push(Line::from(vec![
        Span::styled("Height    ", label),
        Span::raw(format!("{}  ({})", view.height_metric, view.height_imperial)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Weight    ", label),
        Span::raw(format!("{}  ({})", view.weight_metric, view.weight_imperial)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Abilities ", label),
        Span::raw(view.abilities.join(", ")),
    ]));
    lines.push(Line::default());

    lines.extend(view.stats.iter().map(|row| stat_line(row, view)));
    lines.push(Line::default());
    lines.push(Line::styled(
        view.flavor_text.clone(),
        Style::default().fg(TEXT_MAIN).add_modifier(Modifier::ITALIC),
    ));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
        area,
    );
}

fn stat_line(row: &StatRow, view: &DetailView) -> Line<'static> {
    let filled =
        (u32::from(row.progress) * u32::from(STAT_BAR_WIDTH) / u32::from(PROGRESS_MAX)) as usize;
    let empty = usize::from(STAT_BAR_WIDTH).saturating_sub(filled);
    Line::from(vec![
        Span::styled(
            format!("{:<5}", row.label),
            Style::default()
                .fg(view.accent.to_color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", row.value), Style::default().fg(TEXT_MAIN)),
        Span::styled("█".repeat(filled), Style::default().fg(view.accent.to_color())),
        Span::styled(
            "░".repeat(empty),
            Style::default().fg(view.accent.dimmed(0.45).to_color()),
        ),
    ])
}

/// Footer status text. Load failures outrank passive notices.
pub fn footer_status(state: &AppState) -> String {
    state
        .message
        .clone()
        .or_else(|| state.notice.clone())
        .unwrap_or_else(|| {
            if state.list_loading {
                "Loading pokedex...".to_string()
            } else if state.detail.is_loading() {
                "Loading pokemon...".to_string()
            } else if state.cry_playing {
                "Playing cry".to_string()
            } else {
                String::new()
            }
        })
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = footer_status(state);
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search.active {
        let left = vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Tab", "Mode"),
        ];
        return (left, Vec::new());
    }

    let left = match state.screen {
        Screen::List => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("PgUp/PgDn", "Page"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("m", "Mode"),
        ],
        Screen::Detail => vec![
            StatusBarHint::new("h/l", "Prev/Next"),
            StatusBarHint::new("p", "Cry"),
            StatusBarHint::new("Esc", "Back"),
        ],
    };
    let center = vec![
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("C", "Clear cache"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}
