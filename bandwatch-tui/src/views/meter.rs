//! Meter view: cut-off selector, chart and readout.

use crate::state::App;
use crate::theme::rgb_color;
use crate::widgets::{BandChart, CutoffSelector, Readout};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    Frame,
};
use std::time::Instant;

const READOUT_WIDTH: u16 = 22;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect, now: Instant) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(READOUT_WIDTH)])
        .split(rows[1]);

    let selector = CutoffSelector {
        current: app.vis.cutoff(),
        open: app.selector.open,
        highlighted: app.selector.highlighted,
        label_style: Style::default().fg(app.theme.text),
        value_style: Style::default().fg(app.theme.primary),
        highlight_style: Style::default()
            .fg(app.theme.text)
            .bg(app.theme.highlight_bg),
    };
    selector.render(f, rows[0]);

    let border = if app.vis.is_alert() {
        app.theme.error
    } else {
        app.theme.border
    };
    let chart = BandChart {
        title: "Band Power".to_string(),
        surface: app.vis.surface(),
        scales: app.vis.scales(),
        now,
        axis_color: app.theme.axis,
        border_style: Style::default().fg(border),
    };
    chart.render(f, columns[0]);

    let palette = &app.vis.config().palette;
    let readout = Readout {
        beta: app.vis.last_sample().map(|sample| sample.beta),
        cutoff: app.vis.cutoff().get(),
        alert: app.vis.is_alert(),
        samples: app.samples_received,
        text_style: Style::default().fg(app.theme.text_dim),
        normal_style: Style::default().fg(rgb_color(palette.normal)),
        alert_style: Style::default().fg(rgb_color(palette.alert)),
    };
    readout.render(f, columns[1]);

    selector.render_options(f, rows[0], area);
}
