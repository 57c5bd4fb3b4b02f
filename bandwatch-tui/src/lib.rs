//! Bandwatch TUI library exports.

pub mod config;
pub mod error;
pub mod events;
pub mod keys;
pub mod logging;
pub mod notifications;
pub mod persistence;
pub mod source;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
