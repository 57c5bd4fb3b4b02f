//! Event types for the TUI event loop.

use bandwatch_core::MetricSample;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    Sample(MetricSample),
    FeedError(String),
    FeedClosed,
}
