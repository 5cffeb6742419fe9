//! Quote comparison grid
//!
//! Owns the view-only state of the grid: selection, sort and the
//! raw/normalized toggle. The quotes themselves are passed in, the grid never
//! changes them.

use crate::action::Action;
use crate::component::Component;
use crate::components::cells;
use crate::model::{row_order, PriceSort, Quote, QuoteId};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

pub const EMPTY_MESSAGE: &str = "No quotes added yet.";

pub struct QuoteTable {
    /// Show normalized USD prices instead of the quoted currency
    pub normalize: bool,
    pub sort: PriceSort,
    selected: Option<QuoteId>,
    state: TableState,
}

impl Default for QuoteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteTable {
    pub fn new() -> Self {
        Self {
            normalize: false,
            sort: PriceSort::default(),
            selected: None,
            state: TableState::default(),
        }
    }

    /// Display order as indices into `quotes`
    pub fn order(&self, quotes: &[Quote]) -> Vec<usize> {
        row_order(quotes, self.normalize, self.sort)
    }

    pub fn selected_quote<'a>(&self, quotes: &'a [Quote]) -> Option<&'a Quote> {
        let id = self.selected.as_ref()?;
        quotes.iter().find(|q| &q.id == id)
    }

    fn selected_position(&self, quotes: &[Quote], order: &[usize]) -> Option<usize> {
        let id = self.selected.as_ref()?;
        order.iter().position(|&i| &quotes[i].id == id)
    }

    fn select_position(&mut self, quotes: &[Quote], order: &[usize], position: usize) {
        self.selected = order.get(position).map(|&i| quotes[i].id.clone());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Keep the selected quote after a reload, or fall back to the first row
    pub fn sync_selection(&mut self, quotes: &[Quote]) {
        let order = self.order(quotes);
        if self.selected_position(quotes, &order).is_none() {
            self.select_position(quotes, &order, 0);
        }
    }

    /// Select next row, wrapping to the first
    pub fn next(&mut self, quotes: &[Quote]) {
        let order = self.order(quotes);
        if order.is_empty() {
            return;
        }
        let next = match self.selected_position(quotes, &order) {
            Some(pos) if pos + 1 < order.len() => pos + 1,
            _ => 0,
        };
        self.select_position(quotes, &order, next);
    }

    /// Select previous row, wrapping to the last
    pub fn previous(&mut self, quotes: &[Quote]) {
        let order = self.order(quotes);
        if order.is_empty() {
            return;
        }
        let prev = match self.selected_position(quotes, &order) {
            Some(pos) if pos > 0 => pos - 1,
            _ => order.len() - 1,
        };
        self.select_position(quotes, &order, prev);
    }

    pub fn select_first(&mut self, quotes: &[Quote]) {
        let order = self.order(quotes);
        self.select_position(quotes, &order, 0);
    }

    pub fn select_last(&mut self, quotes: &[Quote]) {
        let order = self.order(quotes);
        if let Some(last) = order.len().checked_sub(1) {
            self.select_position(quotes, &order, last);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View toggles
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_normalize(&mut self) {
        self.normalize = !self.normalize;
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    pub fn view_label(&self) -> &'static str {
        if self.normalize {
            "Normalized USD"
        } else {
            "Original Currency"
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    pub fn draw_with_quotes(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        quotes: &[Quote],
        loading: bool,
        focused: bool,
    ) {
        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            Cell::from("Carrier"),
            Cell::from("Route"),
            Cell::from(format!("Price {}", self.sort.indicator())),
            Cell::from("Transit"),
            Cell::from("Surcharges"),
            Cell::from("Carbon"),
            Cell::from("Status"),
            Cell::from("Actions"),
        ])
        .style(header_style)
        .bottom_margin(1);

        let order = self.order(quotes);
        let rows: Vec<Row> = if order.is_empty() {
            let message = if loading {
                "Loading quotes..."
            } else {
                EMPTY_MESSAGE
            };
            vec![Row::new(vec![Cell::from(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            ))])]
        } else {
            order
                .iter()
                .map(|&i| {
                    let quote = &quotes[i];
                    Row::new(vec![
                        Cell::from(cells::carrier(quote)),
                        Cell::from(cells::route(quote)),
                        Cell::from(cells::price(quote, self.normalize)),
                        Cell::from(cells::transit(quote)),
                        Cell::from(cells::surcharges(quote)),
                        Cell::from(cells::carbon(quote)),
                        Cell::from(cells::status(quote)),
                        Cell::from(cells::actions(quote)),
                    ])
                    .height(2)
                    .bottom_margin(1)
                })
                .collect()
        };

        let widths = [
            Constraint::Percentage(18),
            Constraint::Percentage(14),
            Constraint::Percentage(20),
            Constraint::Percentage(8),
            Constraint::Percentage(12),
            Constraint::Percentage(10),
            Constraint::Percentage(8),
            Constraint::Percentage(10),
        ];

        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let title = Line::from(vec![
            Span::styled(" Quotes ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("({}) ", self.view_label()),
                Style::default().fg(Color::Yellow),
            ),
        ]);

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        let position = self.selected_position(quotes, &order);
        self.state.select(position);
        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

impl Component for QuoteTable {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstRow),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastRow),

            // View
            KeyCode::Char('n') => Some(Action::ToggleNormalize),
            KeyCode::Char('s') => Some(Action::TogglePriceSort),
            KeyCode::Char('R') => Some(Action::Refresh),

            // Row actions
            KeyCode::Char('e') => Some(Action::DraftEmail),
            KeyCode::Char('a') => Some(Action::OpenAllocate),
            KeyCode::Char('x') => Some(Action::OpenException),
            KeyCode::Char('v') => Some(Action::OpenAudit),
            KeyCode::Char('l') => Some(Action::OpenSimulate),
            KeyCode::Char('p') => Some(Action::OpenPreview),
            KeyCode::Char('E') => Some(Action::ExportCsv),
            KeyCode::Char('y') => Some(Action::SyncErp),
            KeyCode::Char('c') => Some(Action::OpenComments),
            KeyCode::Tab => Some(Action::FocusComments),

            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_with_quotes, which needs the loaded list
        Ok(())
    }
}
