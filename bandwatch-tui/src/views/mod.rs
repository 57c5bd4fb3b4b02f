//! View rendering.

pub mod meter;

use crate::notifications::NotificationLevel;
use crate::state::{App, FeedStatus};
use crate::theme::notification_color;
use chrono::{Duration, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

/// How long a notification replaces the key help in the footer.
const NOTIFICATION_TTL_SECS: i64 = 5;

pub fn render_view(f: &mut Frame<'_>, app: &App, now: Instant) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);
    meter::render(f, app, layout[1], now);
    render_footer(f, app, layout[2]);

    if let Some(modal) = &app.modal {
        render_modal(f, app, &modal.title, &modal.message);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let feed = match app.feed {
        FeedStatus::Waiting => "Feed: Waiting",
        FeedStatus::Live => "Feed: Live",
        FeedStatus::Closed => "Feed: Closed",
    };
    let paused = if app.updates_paused { " | PAUSED" } else { "" };
    let title = format!("BANDWATCH | Beta band power | {}{}", feed, paused);
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(block, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = if app.selector.open {
        "j/k move • Enter select • Esc close"
    } else {
        "c select cut-off • h/l step cut-off • p pause • ? help • q quit"
    };
    let recent = app
        .notifications
        .last()
        .filter(|note| note.is_fresh(Utc::now(), Duration::seconds(NOTIFICATION_TTL_SECS)));
    let (text, style) = match recent {
        Some(note) if note.level != NotificationLevel::Info || !app.selector.open => (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        _ => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_modal(f: &mut Frame<'_>, app: &App, title: &str, message: &str) {
    let area = centered(f.size(), 60, 5);
    let paragraph = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}
