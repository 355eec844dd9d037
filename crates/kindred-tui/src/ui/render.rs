use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use kindred_core::bootstrap::PurchaseStatus;

use crate::app::{App, Screen, SKELETON_CARD_COUNT};

use super::styles;

/// Spinner frames for the checking indicator
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render(frame: &mut Frame, app: &App, frame_count: usize) {
    if app.splash_visible() {
        render_splash(frame, app.splash.is_held());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Screen content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    match app.current_screen() {
        Screen::Entry => render_checking(frame, chunks[1], frame_count),
        Screen::Welcome => render_welcome(frame, chunks[1]),
        Screen::Main => render_main(frame, app, chunks[1]),
    }
    render_status_bar(frame, app, chunks[2]);
}

fn render_splash(frame: &mut Frame, held: bool) {
    let area = frame.area();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("k i n d r e d", styles::title_style())),
    ];
    if held {
        lines.push(Line::from(""));
        lines.push(Line::from("starting up"));
    }
    let top_pad = area.height.saturating_sub(lines.len() as u16) / 2;
    let inner = Rect::new(area.x, area.y + top_pad, area.width, area.height - top_pad);

    frame.render_widget(Block::default().style(styles::splash_style()), area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(styles::splash_style()),
        inner,
    );
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    let title = Paragraph::new(Line::from(vec![
        Span::styled("  kindred", styles::title_style()),
        Span::styled("   [q] quit", styles::muted_style()),
    ]))
    .block(block);
    frame.render_widget(title, area);
}

fn render_checking(frame: &mut Frame, area: Rect, frame_count: usize) {
    let spinner = SPINNER[(frame_count / 4) % SPINNER.len()];
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(spinner, styles::highlight_style()),
        Span::raw("  Checking your session..."),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_row(area));
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Welcome to kindred", styles::title_style())),
        Line::from(""),
        Line::from(Span::raw("Sign in on your phone to continue.")),
        Line::from(""),
        Line::from(vec![
            Span::styled("[r]", styles::help_key_style()),
            Span::styled(" check again   ", styles::muted_style()),
            Span::styled("[q]", styles::help_key_style()),
            Span::styled(" quit", styles::muted_style()),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::muted_style());
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

/// Feed placeholders while the main area loads.
fn render_main(frame: &mut Frame, app: &App, area: Rect) {
    let opacity = app.shimmer_opacity().unwrap_or(kindred_core::shimmer::DEFAULT_MIN_OPACITY);
    let skeleton = styles::skeleton_style(opacity);

    let constraints = vec![Constraint::Length(4); SKELETON_CARD_COUNT];
    let cards = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(area);

    for card in cards.iter() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(*card);
        let title = Rect::new(rows[0].x, rows[0].y, rows[0].width / 2, 1);
        let body = Rect::new(rows[1].x, rows[1].y, rows[1].width.saturating_sub(4), 1);
        frame.render_widget(Block::default().style(skeleton), title);
        frame.render_widget(Block::default().style(skeleton), body);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let purchases = match app.purchases {
        Some(PurchaseStatus::Ready) => "purchases ready",
        Some(PurchaseStatus::Unavailable) => "purchases unavailable",
        None => "purchases starting",
    };
    let text = format!(" {:?} | {}", app.verdict(), purchases);
    frame.render_widget(Paragraph::new(text).style(styles::status_bar_style()), area);
}

fn centered_row(area: Rect) -> Rect {
    Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1))
}
