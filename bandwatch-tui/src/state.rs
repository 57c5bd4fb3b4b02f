//! Application state.

use crate::config::TuiConfig;
use crate::events::TuiEvent;
use crate::keys::{map_key, Action};
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::PersistedState;
use crate::theme::MeterTheme;
use bandwatch_core::{
    BandPowerVis, CutoffValue, MetricSample, RetainedSurface, ValidationError, VisError,
    VisResult,
};
use chrono::{DateTime, Utc};
use std::time::Instant;

const MAX_NOTIFICATIONS: usize = 50;

/// Where the sample feed currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Waiting,
    Live,
    Closed,
}

/// The cut-off dropdown.
#[derive(Debug, Clone, Default)]
pub struct SelectorState {
    pub open: bool,
    /// Highlighted option while open.
    pub highlighted: usize,
}

#[derive(Debug, Clone)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: MeterTheme,
    pub vis: BandPowerVis<RetainedSurface>,
    pub selector: SelectorState,
    pub notifications: Vec<Notification>,
    pub modal: Option<Modal>,
    pub feed: FeedStatus,
    pub samples_received: u64,
    pub last_sample_at: Option<DateTime<Utc>>,
    pub updates_paused: bool,
    /// Newest sample received while paused.
    pub pending_sample: Option<MetricSample>,
    /// Set by every handled event; cleared when a frame is drawn.
    dirty: bool,
    animating_last_frame: bool,
}

impl App {
    pub fn new(config: TuiConfig) -> VisResult<Self> {
        let surface = RetainedSurface::new(config.vis.surface.width, config.vis.surface.height);
        let vis = BandPowerVis::new(config.vis.clone(), surface)?;
        let selector = SelectorState {
            open: false,
            highlighted: vis.cutoff().index(),
        };
        Ok(Self {
            config,
            theme: MeterTheme::default(),
            vis,
            selector,
            notifications: Vec::new(),
            modal: None,
            feed: FeedStatus::Waiting,
            samples_received: 0,
            last_sample_at: None,
            updates_paused: false,
            pending_sample: None,
            dirty: true,
            animating_last_frame: false,
        })
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let overflow = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..overflow);
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState::new(i64::from(self.vis.cutoff()))
    }

    /// Restore a saved cut-off. Unknown values are rejected and reported.
    pub fn restore(&mut self, state: &PersistedState) {
        match self.vis.try_set_cutoff(state.cutoff) {
            Ok(()) => {
                self.selector.highlighted = self.vis.cutoff().index();
                tracing::info!(cutoff = state.cutoff, "restored cut-off");
            }
            Err(err) => {
                tracing::warn!(cutoff = state.cutoff, error = %err, "ignoring persisted cut-off");
                self.notify(
                    NotificationLevel::Warning,
                    format!("Saved cut-off ignored: {}", err),
                );
            }
        }
    }

    pub fn ingest(&mut self, sample: MetricSample) {
        self.ingest_at(sample, Instant::now());
    }

    /// Feed a sample through, or hold on to it while updates are paused.
    /// Only accepted samples count towards the feed being live.
    pub fn ingest_at(&mut self, sample: MetricSample, now: Instant) {
        let accepted: VisResult<()> = if self.updates_paused {
            if sample.beta.is_finite() {
                self.pending_sample = Some(sample);
                Ok(())
            } else {
                Err(ValidationError::NonFiniteSample { value: sample.beta }.into())
            }
        } else {
            self.vis.update_at(sample, now)
        };
        match accepted {
            Ok(()) => {
                self.samples_received += 1;
                self.last_sample_at = Some(Utc::now());
                self.feed = FeedStatus::Live;
            }
            Err(err) => self.reject_sample(err),
        }
    }

    fn reject_sample(&mut self, err: VisError) {
        tracing::warn!(error = %err, "sample rejected");
        self.notify(NotificationLevel::Error, err.to_string());
    }

    pub fn toggle_pause(&mut self) {
        self.updates_paused = !self.updates_paused;
        if !self.updates_paused {
            if let Some(sample) = self.pending_sample.take() {
                if let Err(err) = self.vis.update(sample) {
                    self.reject_sample(err);
                }
            }
        }
    }

    pub fn apply_cutoff(&mut self, cutoff: CutoffValue) {
        if cutoff == self.vis.cutoff() {
            return;
        }
        self.vis.set_cutoff(cutoff);
        self.selector.highlighted = cutoff.index();
        tracing::info!(cutoff = %cutoff, "cut-off selected");
    }

    /// Apply a cut-off chosen by its option text.
    pub fn select_option_text(&mut self, text: &str) -> Result<(), VisError> {
        let cutoff = CutoffValue::parse(text)?;
        self.apply_cutoff(cutoff);
        Ok(())
    }

    pub fn open_selector(&mut self) {
        self.selector.open = true;
        self.selector.highlighted = self.vis.cutoff().index();
    }

    pub fn move_selector(&mut self, delta: isize) {
        let count = CutoffValue::options().count();
        let current = self.selector.highlighted as isize;
        self.selector.highlighted = (current + delta).clamp(0, count as isize - 1) as usize;
    }

    pub fn confirm_selector(&mut self) {
        let text = CutoffValue::from_index(self.selector.highlighted)
            .map(|value| value.to_string())
            .unwrap_or_default();
        self.selector.open = false;
        if let Err(err) = self.select_option_text(&text) {
            self.notify(NotificationLevel::Error, err.to_string());
        }
    }

    /// Handle one event. Returns `true` when the app should exit.
    pub fn handle_event(&mut self, event: TuiEvent) -> bool {
        self.dirty = true;
        match event {
            TuiEvent::Input(key) => {
                if let Some(action) = map_key(key) {
                    return self.handle_action(action);
                }
            }
            TuiEvent::Sample(sample) => self.ingest(sample),
            TuiEvent::FeedError(message) => self.notify(NotificationLevel::Error, message),
            TuiEvent::FeedClosed => {
                self.feed = FeedStatus::Closed;
                self.notify(NotificationLevel::Warning, "Sample feed closed");
            }
            TuiEvent::Resize { width, height } => {
                tracing::debug!(width, height, "terminal resized");
            }
        }
        false
    }

    pub fn handle_action(&mut self, action: Action) -> bool {
        if self.modal.is_some() {
            match action {
                Action::Quit => return true,
                Action::Cancel | Action::Confirm | Action::OpenHelp => self.modal = None,
                _ => {}
            }
            return false;
        }

        match action {
            Action::Quit => return true,
            Action::OpenSelector => self.open_selector(),
            Action::Confirm if self.selector.open => self.confirm_selector(),
            Action::Confirm => self.open_selector(),
            Action::Cancel => self.selector.open = false,
            Action::MoveUp if self.selector.open => self.move_selector(-1),
            Action::MoveDown if self.selector.open => self.move_selector(1),
            Action::MoveUp | Action::MoveDown => {}
            Action::CutoffUp => self.apply_cutoff(self.vis.cutoff().next()),
            Action::CutoffDown => self.apply_cutoff(self.vis.cutoff().previous()),
            Action::PauseUpdates => self.toggle_pause(),
            Action::OpenHelp => {
                self.modal = Some(Modal {
                    title: "Keybindings".to_string(),
                    message: "c/Enter pick cut-off • j/k move • h/l step cut-off • p pause • q quit"
                        .to_string(),
                })
            }
        }
        false
    }

    /// Whether anything on the chart is still moving at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.vis.surface().is_animating(now)
    }

    /// Whether a frame should be drawn at `now`. Frames keep coming while
    /// anything animates, plus one more once it settles so the final
    /// geometry always reaches the screen.
    pub fn frame_due(&mut self, now: Instant) -> bool {
        let animating = self.is_animating(now);
        let due = self.dirty || animating || self.animating_last_frame;
        self.dirty = false;
        self.animating_last_frame = animating;
        due
    }
}
