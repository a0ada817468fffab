//! TUI rendering.

use chrono::Utc;
use inkbook_core::finance::{IncomeKind, Totals};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::app::{App, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(3), // summary strip
      Constraint::Min(0),    // tables
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_summary(f, rows[1], app);
  draw_tables(f, rows[2], app);
  draw_status(f, rows[3], app);
}

/// Format a whole amount with thousands separators.
pub fn amount(value: i64) -> String {
  let digits = value.unsigned_abs().to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
  if value < 0 {
    out.push('-');
  }
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

fn dim() -> Style { Style::default().fg(Color::DarkGray) }

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let left = Span::styled(
    format!(" inkbook  {}", app.period.label()),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{} UTC ", Utc::now().format("%Y-%m-%d")),
    dim(),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Summary strip ────────────────────────────────────────────────────────────

fn draw_summary(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 4); 4])
    .split(area);

  let totals: Option<Totals> = app.report.as_ref().map(|r| r.totals);
  let pending = app.summary.map(|s| s.pending_balance);

  let profit_color = match totals {
    Some(t) if t.profit < 0 => Color::Red,
    _ => Color::Green,
  };
  let cards = [
    ("Income", totals.map(|t| t.income), Color::Green),
    ("Expenses", totals.map(|t| t.expenses), Color::Yellow),
    ("Profit", totals.map(|t| t.profit), profit_color),
    ("Pending", pending, Color::Cyan),
  ];

  for ((title, value, color), col) in cards.into_iter().zip(cols.iter()) {
    let text = value.map_or_else(|| "—".to_string(), amount);
    let block = Block::default()
      .title(format!(" {title} "))
      .borders(Borders::ALL)
      .border_style(dim());
    f.render_widget(
      Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(block),
      *col,
    );
  }
}

// ─── Tables ───────────────────────────────────────────────────────────────────

fn draw_tables(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(area);

  draw_income(f, cols[0], app);
  draw_expenses(f, cols[1], app);
}

fn header_row(cells: &[&'static str]) -> Row<'static> {
  Row::new(cells.iter().copied().map(Cell::from))
    .style(Style::default().add_modifier(Modifier::BOLD))
}

fn draw_income(f: &mut Frame, area: Rect, app: &App) {
  let events = app
    .report
    .as_ref()
    .map(|r| r.income_details.as_slice())
    .unwrap_or_default();

  // Days only differ within a month; a single day shows times only.
  let when_fmt = match app.period.mode {
    Mode::Monthly => "%m-%d %H:%M",
    Mode::Daily => "%H:%M",
  };

  let rows = events.iter().map(|e| {
    let (kind, color) = match e.kind {
      IncomeKind::Deposit => ("deposit", Color::Cyan),
      IncomeKind::Completion => ("completed", Color::Green),
    };
    Row::new(vec![
      Cell::from(e.at.format(when_fmt).to_string()),
      Cell::from(kind).style(Style::default().fg(color)),
      Cell::from(e.client_name.clone()),
      Cell::from(e.artist_name.clone()),
      Cell::from(amount(e.amount.get())),
    ])
  });

  let table = Table::new(rows, [
    Constraint::Length(11),
    Constraint::Length(9),
    Constraint::Fill(1),
    Constraint::Fill(1),
    Constraint::Length(12),
  ])
  .header(header_row(&["When", "Kind", "Client", "Artist", "Amount"]))
  .block(
    Block::default()
      .title(format!(" Income ({}) ", events.len()))
      .borders(Borders::ALL)
      .border_style(dim()),
  );
  f.render_widget(table, area);
}

fn draw_expenses(f: &mut Frame, area: Rect, app: &App) {
  let expenses = app
    .report
    .as_ref()
    .map(|r| r.expense_details.as_slice())
    .unwrap_or_default();

  let rows = expenses.iter().map(|e| {
    Row::new(vec![
      Cell::from(e.expense_date.format("%m-%d").to_string()),
      Cell::from(e.category.to_string()),
      Cell::from(e.description.clone()),
      Cell::from(amount(e.amount.get())),
    ])
  });

  let table = Table::new(rows, [
    Constraint::Length(5),
    Constraint::Length(9),
    Constraint::Fill(1),
    Constraint::Length(12),
  ])
  .header(header_row(&["Date", "Category", "Description", "Amount"]))
  .block(
    Block::default()
      .title(format!(" Expenses ({}) ", expenses.len()))
      .borders(Borders::ALL)
      .border_style(dim()),
  );
  f.render_widget(table, area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let mode_label = match app.period.mode {
    Mode::Monthly => "MONTH",
    Mode::Daily => "DAY",
  };
  let status = if app.status_msg.is_empty() {
    "←→/hl period  Tab month/day  t today  r reload  q quit".to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), dim()),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
