//! Numeric readout next to the chart.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct Readout {
    pub beta: Option<f64>,
    pub cutoff: u8,
    pub alert: bool,
    pub samples: u64,
    pub text_style: Style,
    pub normal_style: Style,
    pub alert_style: Style,
}

impl Readout {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let value = self
            .beta
            .map(|beta| format!("{:.1}", beta))
            .unwrap_or_else(|| "--".to_string());
        let (state, state_style) = if self.beta.is_none() {
            ("waiting", self.text_style)
        } else if self.alert {
            ("ABOVE CUT-OFF", self.alert_style.add_modifier(Modifier::BOLD))
        } else {
            ("below cut-off", self.normal_style)
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("Beta    ", self.text_style),
                Span::styled(value, state_style),
            ]),
            Line::from(Span::styled(
                format!("Cut-off {}", self.cutoff),
                self.text_style,
            )),
            Line::from(Span::styled(state, state_style)),
            Line::from(Span::styled(
                format!("Samples {}", self.samples),
                self.text_style,
            )),
        ];
        let paragraph =
            Paragraph::new(lines).block(Block::default().title("Readout").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
