//! Canvas rendering of the retained meter scene.
//!
//! Scene coordinates have `y` growing downwards; the canvas has it growing
//! upwards, so every `y` is flipped against the surface height. The logical
//! surface is stretched over whatever area the widget gets, which is how
//! terminal resizes are absorbed without touching the scales.

use crate::theme::rgb_color;
use bandwatch_core::{
    Category, Element, LineElement, RectElement, RetainedSurface, ScaleManager, Surface,
    TextAnchor, TextElement,
};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line},
        Block, Borders,
    },
    Frame,
};
use std::time::Instant;

/// Room around the plot for tick and category labels, in surface units.
const LEFT_MARGIN_FRACTION: f64 = 0.12;
const BOTTOM_MARGIN_FRACTION: f64 = 0.08;
const TOP_MARGIN_FRACTION: f64 = 0.04;
const TICK_STEP: f64 = 10.0;

pub struct BandChart<'a> {
    pub title: String,
    pub surface: &'a RetainedSurface,
    pub scales: &'a ScaleManager,
    pub now: Instant,
    pub axis_color: Color,
    pub border_style: Style,
}

struct Projection {
    height: f64,
    /// Surface units per terminal cell.
    cell_width: f64,
    cell_height: f64,
}

impl Projection {
    fn y(&self, scene_y: f64) -> f64 {
        self.height - scene_y
    }
}

impl<'a> BandChart<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(self.border_style);
        let inner = block.inner(area);
        if inner.width == 0 || inner.height == 0 {
            f.render_widget(block, area);
            return;
        }

        let width = self.surface.width();
        let height = self.surface.height();
        let x_bounds = [-width * LEFT_MARGIN_FRACTION, width];
        let y_bounds = [
            -height * BOTTOM_MARGIN_FRACTION,
            height * (1.0 + TOP_MARGIN_FRACTION),
        ];
        let projection = Projection {
            height,
            cell_width: (x_bounds[1] - x_bounds[0]) / f64::from(inner.width),
            cell_height: (y_bounds[1] - y_bounds[0]) / f64::from(inner.height),
        };
        let elements = self.surface.elements_at(self.now);

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                self.paint_axes(ctx, &projection);
                for (_, element) in &elements {
                    match element {
                        Element::Rect(rect) => paint_rect(ctx, rect, &projection),
                        Element::Line(line) => paint_line(ctx, line, &projection),
                        Element::Text(_) => {}
                    }
                }
                ctx.layer();
                for (_, element) in &elements {
                    if let Element::Text(text) = element {
                        paint_text(ctx, text, &projection);
                    }
                }
            });
        f.render_widget(canvas, area);
    }

    fn paint_axes(&self, ctx: &mut Context<'_>, projection: &Projection) {
        let width = self.scales.width();
        let height = self.scales.height();
        ctx.draw(&segment(0.0, 0.0, 0.0, height, self.axis_color));
        ctx.draw(&segment(0.0, 0.0, width, 0.0, self.axis_color));

        let style = Style::default().fg(self.axis_color);
        for tick in self.scales.value_scale().ticks(TICK_STEP) {
            let y = projection.y(self.scales.y(tick));
            let label = format!("{:>3}", tick);
            let x = -(label.len() as f64 + 1.0) * projection.cell_width;
            ctx.print(x, y, Span::styled(label, style));
        }

        for category in Category::ALL {
            let band = self.scales.band(category);
            let label = category.label();
            let x = band.center() - label.len() as f64 * projection.cell_width / 2.0;
            ctx.print(x, -projection.cell_height, Span::styled(label, style));
        }
    }
}

fn segment(x1: f64, y1: f64, x2: f64, y2: f64, color: Color) -> Line {
    Line {
        x1,
        y1,
        x2,
        y2,
        color,
    }
}

fn paint_rect(ctx: &mut Context<'_>, rect: &RectElement, projection: &Projection) {
    if rect.height <= 0.0 || rect.width <= 0.0 {
        return;
    }
    let color = rgb_color(rect.fill);
    let top = projection.y(rect.y);
    let bottom = projection.y(rect.y + rect.height);
    // Braille packs two dot columns per cell.
    let step = (projection.cell_width / 2.0).max(f64::EPSILON);
    let mut x = rect.x;
    while x <= rect.x + rect.width {
        ctx.draw(&segment(x, bottom, x, top, color));
        x += step;
    }
}

fn paint_line(ctx: &mut Context<'_>, line: &LineElement, projection: &Projection) {
    let color = rgb_color(line.stroke);
    let (y1, y2) = (projection.y(line.y1), projection.y(line.y2));
    let Some((dash, gap)) = line.dash else {
        ctx.draw(&segment(line.x1, y1, line.x2, y2, color));
        return;
    };
    let length = (line.x2 - line.x1).hypot(y2 - y1);
    if length <= 0.0 || dash <= 0.0 {
        return;
    }
    let (dx, dy) = ((line.x2 - line.x1) / length, (y2 - y1) / length);
    let mut start = 0.0;
    while start < length {
        let end = (start + dash).min(length);
        ctx.draw(&segment(
            line.x1 + dx * start,
            y1 + dy * start,
            line.x1 + dx * end,
            y1 + dy * end,
            color,
        ));
        start = end + gap;
    }
}

fn paint_text(ctx: &mut Context<'_>, text: &TextElement, projection: &Projection) {
    let span_width = text.content.chars().count() as f64 * projection.cell_width;
    let x = match text.anchor {
        TextAnchor::Start => text.x,
        TextAnchor::Middle => text.x - span_width / 2.0,
        TextAnchor::End => text.x - span_width,
    };
    ctx.print(
        x,
        projection.y(text.y),
        Span::styled(text.content.clone(), Style::default().fg(rgb_color(text.fill))),
    );
}
