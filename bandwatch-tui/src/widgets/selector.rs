//! Labelled cut-off dropdown.

use bandwatch_core::CutoffValue;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub const SELECTOR_LABEL: &str = "Select Cut-off Value: ";

pub struct CutoffSelector {
    pub current: CutoffValue,
    pub open: bool,
    pub highlighted: usize,
    pub label_style: Style,
    pub value_style: Style,
    pub highlight_style: Style,
}

impl CutoffSelector {
    /// Render the closed control into `area`.
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let marker = if self.open { "▴" } else { "▾" };
        let line = Line::from(vec![
            Span::styled(SELECTOR_LABEL, self.label_style),
            Span::styled(format!("[ {:>2} {} ]", self.current, marker), self.value_style),
        ]);
        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    /// Render the open option list just below the control.
    pub fn render_options(&self, f: &mut Frame<'_>, anchor: Rect, bounds: Rect) {
        if !self.open {
            return;
        }
        let options: Vec<CutoffValue> = CutoffValue::options().collect();
        let height = (options.len() as u16 + 2).min(bounds.height);
        let x = anchor.x + 1 + SELECTOR_LABEL.len() as u16;
        let popup = Rect {
            x: x.min(bounds.right().saturating_sub(10)),
            y: anchor.bottom().min(bounds.bottom().saturating_sub(height)),
            width: 10.min(bounds.width),
            height,
        };

        let items: Vec<ListItem> = options
            .iter()
            .map(|value| {
                let style = if *value == self.current {
                    self.value_style.add_modifier(Modifier::BOLD)
                } else {
                    self.value_style
                };
                ListItem::new(Span::styled(value.to_string(), style))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(self.highlight_style)
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(self.highlighted));

        f.render_widget(Clear, popup);
        f.render_stateful_widget(list, popup, &mut state);
    }
}
