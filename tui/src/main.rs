//! PRX Enforcement Dashboard: interactive Ratatui TUI
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  [1] Banking  [2] FinTech  [3] Healthcare  [4] Enterprise SaaS LIVE │
//!   ├─── overview ────────────────────────────────────────────────────────┤
//!   │  Total / Allowed / Blocked / Escalated / Avg latency (live + 24h)   │
//!   ├─── breakdown ───────────────────────────────────────────────────────┤
//!   │  per-outcome share of live decisions                                │
//!   ├─── left panel ──────────────────┬─── right panel ───────────────────┤
//!   │  Action Feed                    │  Pending Escalations              │
//!   ├─────────────────────────────────┴───────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘

use std::{io, time::Duration};

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
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame, Terminal,
};

use prx_config::RoutingTable;
use prx_contracts::{
    error::PrxResult,
    outcome::Outcome,
    record::DecisionRecord,
    scenario::Industry,
};
use prx_core::{
    clock::SystemClock,
    query::{outcome_counts, HistoryFilter, OutcomeFilter},
    sampler::RandSampler,
    Simulator,
};
use prx_scenarios::BuiltinCatalog;

// ── App state ─────────────────────────────────────────────────────────────────

struct App {
    sim: Simulator,
    filter: OutcomeFilter,
    /// Index into the pending list, newest first.
    selected: usize,
    /// Result of the last approve/reject, shown in the footer.
    status: Option<String>,
}

impl App {
    fn new() -> PrxResult<Self> {
        let table = RoutingTable::builtin()?;
        let catalog = BuiltinCatalog::new()?;
        let mut sim = Simulator::new(
            table.settings().clone(),
            Box::new(table),
            Box::new(catalog),
            Box::new(SystemClock),
            Box::new(RandSampler::from_entropy()),
            Industry::Banking,
        );
        sim.configure(Industry::Banking);
        Ok(Self {
            sim,
            filter: OutcomeFilter::All,
            selected: 0,
            status: None,
        })
    }

    fn select_industry(&mut self, industry: Industry) {
        if industry == self.sim.industry() {
            return;
        }
        self.sim.configure(industry);
        self.selected = 0;
        self.status = None;
    }

    fn advance(&mut self) {
        let step = self.sim.advance();
        if !step.timed_out.is_empty() {
            self.status = Some(format!("{} escalation(s) timed out and were blocked", step.timed_out.len()));
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.sim.pending().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.sim.pending().len();
        if len == 0 {
            return;
        }
        self.selected = if down {
            (self.selected + 1).min(len - 1)
        } else {
            self.selected.saturating_sub(1)
        };
    }

    fn resolve_selected(&mut self, approve: bool) {
        let Some(id) = self.sim.pending().nth(self.selected).map(|p| p.id.0.clone()) else {
            return;
        };
        let record = if approve {
            self.sim.approve(&id)
        } else {
            self.sim.reject(&id)
        };
        self.status = record.map(|r| {
            format!(
                "{} {} ({})",
                if approve { "Approved" } else { "Rejected" },
                r.action_type,
                r.trace_id
            )
        });
        self.clamp_selection();
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    let full = f.area();

    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(5), // overview stats
            Constraint::Length(3), // outcome breakdown
            Constraint::Min(10),   // feed + escalations
            Constraint::Length(3), // footer
        ])
        .split(full);

    render_header(f, outer_chunks[0], app);
    render_overview(f, outer_chunks[1], app);
    render_breakdown(f, outer_chunks[2], app);

    let mid_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(outer_chunks[3]);

    render_feed(f, mid_chunks[0], app);
    render_escalations(f, mid_chunks[1], app);
    render_footer(f, outer_chunks[4], app);
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Allowed => Color::Green,
        Outcome::Blocked => Color::Red,
        Outcome::Escalated => Color::Yellow,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans: Vec<Span> = vec![Span::styled("PRX Enforcement    ", title_style)];

    for (i, industry) in Industry::ALL.iter().enumerate() {
        let style = if app.sim.industry() == *industry {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let label = &app.sim.scenario_for(*industry).label;
        spans.push(Span::styled(format!("[{}] {}  ", i + 1, label), style));
    }

    let (live_label, live_color) = if app.sim.is_live() {
        ("● LIVE", Color::Green)
    } else {
        ("❚❚ PAUSED", Color::DarkGray)
    };
    spans.push(Span::styled(
        live_label,
        Style::default().fg(live_color).add_modifier(Modifier::BOLD),
    ));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let live = app.sim.stats();
    let combined = live.combined_with(&app.sim.scenario().stats_24h);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let stat = |title: &str, value: String, live_part: String, color: Color| {
        Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(live_part, Style::default().fg(Color::DarkGray))),
        ])
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    };

    f.render_widget(
        stat("Total (24h)", combined.total.to_string(), format!("+{} live", live.total), Color::White),
        cells[0],
    );
    f.render_widget(
        stat("Allowed", combined.allowed.to_string(), format!("+{} live", live.allowed), Color::Green),
        cells[1],
    );
    f.render_widget(
        stat(
            "Blocked",
            combined.blocked.to_string(),
            format!("{}% block rate", combined.block_rate()),
            Color::Red,
        ),
        cells[2],
    );
    f.render_widget(
        stat(
            "Escalated",
            combined.escalated.to_string(),
            format!("{} pending", app.sim.pending().len()),
            Color::Yellow,
        ),
        cells[3],
    );
    f.render_widget(
        stat(
            "Avg latency",
            format!("{:.1}ms", combined.avg_latency),
            "policy eval".to_string(),
            Color::Cyan,
        ),
        cells[4],
    );
}

fn render_breakdown(f: &mut Frame, area: Rect, app: &App) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (cell, (outcome, count, share)) in cells.iter().zip(app.sim.stats().breakdown()) {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(format!(" {} ", outcome.as_str()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .gauge_style(Style::default().fg(outcome_color(outcome)))
            .ratio(share.clamp(0.0, 1.0))
            .label(format!("{} ({:.1}%)", count, share * 100.0));
        f.render_widget(gauge, *cell);
    }
}

fn render_feed(f: &mut Frame, area: Rect, app: &App) {
    let filter = HistoryFilter::new(app.filter, "");
    let records = filter.apply(app.sim.history());
    let visible = area.height.saturating_sub(3) as usize;

    let mut items: Vec<ListItem> = Vec::new();
    let counts = outcome_counts(app.sim.history());
    let mut pills: Vec<Span> = vec![Span::raw(" ")];
    for candidate in [
        OutcomeFilter::All,
        OutcomeFilter::Only(Outcome::Allowed),
        OutcomeFilter::Only(Outcome::Blocked),
        OutcomeFilter::Only(Outcome::Escalated),
    ] {
        let count = match candidate {
            OutcomeFilter::All => app.sim.history().len(),
            OutcomeFilter::Only(o) => counts.iter().find(|(c, _)| *c == o).map_or(0, |(_, n)| *n),
        };
        let style = if candidate == app.filter {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        pills.push(Span::styled(format!(" {} {} ", candidate.label(), count), style));
        pills.push(Span::raw(" "));
    }
    items.push(ListItem::new(Line::from(pills)));

    if records.is_empty() {
        items.push(ListItem::new(Span::styled(
            "  No actions match this filter",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for record in records.into_iter().take(visible) {
        items.push(ListItem::new(feed_line(record)));
    }

    let block = Block::default()
        .title(" Action Feed ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(List::new(items).block(block), area);
}

fn feed_line(record: &DecisionRecord) -> Line<'_> {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", record.timestamp.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:<9}", record.outcome.as_str()),
            Style::default()
                .fg(outcome_color(record.outcome))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {:<22}", truncate(&record.action_type, 22))),
        Span::styled(
            format!(" {:<18}", truncate(&record.agent, 18)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!(" {:>4.1}ms", record.latency_ms),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(resolution) = &record.resolution {
        spans.push(Span::styled(
            format!("  ↳ {}", resolution.resolved_by),
            Style::default().fg(Color::Magenta),
        ));
    }
    Line::from(spans)
}

fn render_escalations(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" Pending Escalations ({}) ", app.sim.pending().len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.sim.pending().len() == 0 {
        f.render_widget(
            Paragraph::new(Span::styled(
                "  Nothing awaiting review",
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
        return;
    }

    // Three rows per card: summary, route, countdown gauge.
    let per_card = 3u16;
    let capacity = (inner.height / per_card) as usize;
    let skip = app.selected.saturating_sub(capacity.saturating_sub(1));

    for (slot, (i, pending)) in app.sim.pending().enumerate().skip(skip).take(capacity).enumerate() {
        let top = inner.y + slot as u16 * per_card;
        let selected = i == app.selected;
        let countdown = app.sim.countdown(pending);
        let marker = if selected { "▶ " } else { "  " };
        let name_style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let summary = Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(truncate(&pending.action_type, 22), name_style),
            Span::styled(
                format!("  {}", truncate(&pending.agent, 18)),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let route = Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{} → {}", pending.policy_matched, pending.escalate_to),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("  SLA {}m", pending.sla_minutes),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(summary), Rect::new(inner.x, top, inner.width, 1));
        f.render_widget(Paragraph::new(route), Rect::new(inner.x, top + 1, inner.width, 1));

        let gauge_color = if countdown.expired || countdown.urgent {
            Color::Red
        } else {
            Color::Yellow
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(gauge_color).bg(Color::Black))
            .ratio(countdown.fraction.clamp(0.0, 1.0))
            .label(countdown.label());
        f.render_widget(
            gauge,
            Rect::new(inner.x + 2, top + 2, inner.width.saturating_sub(4), 1),
        );
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
    let mut spans: Vec<Span> = vec![
        key(" [1-4] "),
        Span::raw("Industry  "),
        key("[space] "),
        Span::raw(if app.sim.is_live() { "Pause  " } else { "Resume  " }),
        key("[f] "),
        Span::raw(format!("Filter: {}  ", app.filter.label())),
        key("[↑/↓] "),
        Span::raw("Select  "),
        key("[a] "),
        Span::raw("Approve  "),
        key("[x] "),
        Span::raw("Reject  "),
        key("[q] "),
        Span::raw("Quit"),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("   {}", status),
            Style::default().fg(Color::Magenta),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Truncate a string to at most `max` chars, appending "…" if truncated.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    // Build before touching the terminal so configuration errors print normally.
    let mut app = App::new().map_err(io::Error::other)?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    // Bounds how late a due tick or sweep can fire.
    const POLL_MS: u64 = 100;

    loop {
        app.advance();
        terminal.draw(|f| ui(f, &app))?;

        if !event::poll(Duration::from_millis(POLL_MS))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,

            KeyCode::Char('1') => app.select_industry(Industry::Banking),
            KeyCode::Char('2') => app.select_industry(Industry::Fintech),
            KeyCode::Char('3') => app.select_industry(Industry::Healthcare),
            KeyCode::Char('4') => app.select_industry(Industry::Saas),

            KeyCode::Char(' ') => {
                app.sim.toggle_live();
            }
            KeyCode::Char('f') | KeyCode::Char('F') => app.filter = app.filter.next(),

            KeyCode::Up => app.move_selection(false),
            KeyCode::Down => app.move_selection(true),
            KeyCode::Char('a') | KeyCode::Char('A') => app.resolve_selected(true),
            KeyCode::Char('x') | KeyCode::Char('X') => app.resolve_selected(false),

            _ => {}
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}
