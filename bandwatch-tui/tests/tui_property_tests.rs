use bandwatch_core::{Category, CutoffValue, ElementKey, MetricSample, Surface, CUTOFF_OPTIONS};
use bandwatch_test_utils::generators::{arb_beta, arb_cutoff, arb_invalid_cutoff};
use bandwatch_tui::config::{ConfigError, SourceKind, TuiConfig};
use bandwatch_tui::events::TuiEvent;
use bandwatch_tui::keys::{map_key, Action};
use bandwatch_tui::persistence::{self, PersistedState};
use bandwatch_tui::state::{App, FeedStatus};
use bandwatch_tui::views::render_view;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use ratatui::{backend::TestBackend, Terminal};
use std::time::{Duration, Instant};

fn base_config() -> TuiConfig {
    TuiConfig {
        state_path: "tmp/bandwatch-state.json".into(),
        log_path: "tmp/bandwatch.log".into(),
        ..TuiConfig::default()
    }
}

fn app() -> App {
    App::new(base_config()).unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

fn render_to_string(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    let now = Instant::now() + Duration::from_secs(1);
    terminal.draw(|f| render_view(f, app, now)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer.get(x, y).symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn config_defaults_are_valid() {
    let config = TuiConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.source.kind, SourceKind::Simulate);
    assert_eq!(config.vis.bar_transition_ms, 10);
    assert_eq!(config.vis.cutoff_transition_ms, 300);
}

#[test]
fn config_requires_tick_rate() {
    let mut config = base_config();
    config.tick_rate_ms = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            field: "tick_rate_ms",
            ..
        })
    ));
}

#[test]
fn config_requires_simulator_interval() {
    let mut config = base_config();
    config.source.interval_ms = 0;
    assert!(config.validate().is_err());

    config.source.kind = SourceKind::Stdin;
    assert!(config.validate().is_ok());
}

#[test]
fn config_surfaces_vis_errors() {
    let mut config = base_config();
    config.vis.marker_text = "  ".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::Vis(_))));
}

#[test]
fn config_example_file_parses() {
    let config = TuiConfig::from_toml(include_str!("../config.example.toml")).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.source.seed, Some(7));
    assert_eq!(config.vis.marker_text, "Great Job");
}

#[test]
fn config_vis_section_is_optional() {
    let toml = r#"
        tick_rate_ms = 50
        state_path = "state.json"
        log_path = "bandwatch.log"

        [source]
        kind = "stdin"
        interval_ms = 0
    "#;
    let config = TuiConfig::from_toml(toml).unwrap();
    assert_eq!(config.source.kind, SourceKind::Stdin);
    assert_eq!(config.vis, bandwatch_core::VisConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_unknown_fields() {
    let toml = r#"
        tick_rate_ms = 50
        state_path = "state.json"
        log_path = "bandwatch.log"
        colour = "red"

        [source]
        kind = "simulate"
        interval_ms = 100
    "#;
    assert!(matches!(
        TuiConfig::from_toml(toml),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn key_release_is_ignored() {
    let mut event = key(KeyCode::Char('q'));
    event.kind = KeyEventKind::Release;
    assert_eq!(map_key(event), None);
}

#[test]
fn ctrl_c_quits() {
    let mut event = key(KeyCode::Char('c'));
    event.modifiers = KeyModifiers::CONTROL;
    assert_eq!(map_key(event), Some(Action::Quit));
    assert_eq!(map_key(key(KeyCode::Char('c'))), Some(Action::OpenSelector));
}

proptest! {
    #[test]
    fn keybinding_steps_cutoff(ch in prop::sample::select(vec!['l', '+', 'h', '-'])) {
        let expected = if ch == 'l' || ch == '+' {
            Action::CutoffUp
        } else {
            Action::CutoffDown
        };
        prop_assert_eq!(map_key(key(KeyCode::Char(ch))), Some(expected));
    }

    #[test]
    fn digits_are_unbound(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        prop_assert_eq!(map_key(key(KeyCode::Char(ch))), None);
    }

    #[test]
    fn selector_highlight_stays_in_range(moves in prop::collection::vec(-3isize..=3, 0..40)) {
        let mut app = app();
        app.open_selector();
        for delta in moves {
            app.move_selector(delta);
            prop_assert!(app.selector.highlighted < CUTOFF_OPTIONS.len());
        }
    }

    #[test]
    fn stepping_cutoff_saturates(ups in 0usize..20, downs in 0usize..20) {
        let mut app = app();
        for _ in 0..ups {
            app.handle_action(Action::CutoffUp);
        }
        let expected_up = (3 + ups).min(CUTOFF_OPTIONS.len() - 1);
        prop_assert_eq!(app.vis.cutoff().index(), expected_up);
        for _ in 0..downs {
            app.handle_action(Action::CutoffDown);
        }
        prop_assert_eq!(app.vis.cutoff().index(), expected_up.saturating_sub(downs));
    }

    #[test]
    fn restore_accepts_every_option(cutoff in arb_cutoff()) {
        let mut app = app();
        app.restore(&PersistedState::new(i64::from(cutoff)));
        prop_assert_eq!(app.vis.cutoff(), cutoff);
        prop_assert_eq!(app.selector.highlighted, cutoff.index());
        prop_assert!(app.notifications.is_empty());
    }

    #[test]
    fn restore_rejects_unknown_values(value in arb_invalid_cutoff()) {
        let mut app = app();
        app.restore(&PersistedState::new(value));
        prop_assert_eq!(app.vis.cutoff(), CutoffValue::default());
        prop_assert_eq!(app.notifications.len(), 1);
    }

    #[test]
    fn ingest_tracks_alert_state(beta in arb_beta()) {
        let mut app = app();
        app.ingest(MetricSample::new(beta));
        prop_assert_eq!(app.vis.is_alert(), beta >= 19.0);
        prop_assert_eq!(app.samples_received, 1);
        prop_assert_eq!(app.feed, FeedStatus::Live);
    }
}

#[test]
fn selector_flow_applies_highlighted_option() {
    let mut app = app();
    assert!(!app.handle_event(TuiEvent::Input(key(KeyCode::Char('c')))));
    assert!(app.selector.open);
    assert_eq!(app.selector.highlighted, 3);

    app.handle_event(TuiEvent::Input(key(KeyCode::Down)));
    app.handle_event(TuiEvent::Input(key(KeyCode::Down)));
    app.handle_event(TuiEvent::Input(key(KeyCode::Enter)));

    assert!(!app.selector.open);
    assert_eq!(app.vis.cutoff().get(), 25);
}

#[test]
fn selector_cancel_keeps_cutoff() {
    let mut app = app();
    app.handle_action(Action::OpenSelector);
    app.handle_action(Action::MoveUp);
    app.handle_action(Action::Cancel);
    assert!(!app.selector.open);
    assert_eq!(app.vis.cutoff().get(), 19);
}

#[test]
fn option_text_must_be_an_option() {
    let mut app = app();
    assert!(app.select_option_text("22").is_ok());
    assert_eq!(app.vis.cutoff().get(), 22);
    assert!(app.select_option_text("20").is_err());
    assert!(app.select_option_text("abc").is_err());
    assert_eq!(app.vis.cutoff().get(), 22);
}

#[test]
fn lowering_cutoff_turns_on_alert_without_new_sample() {
    let mut app = app();
    app.ingest(MetricSample::new(15.0));
    assert!(!app.vis.is_alert());
    app.select_option_text("13").unwrap();
    assert!(app.vis.is_alert());
}

#[test]
fn paused_updates_buffer_latest_sample() {
    let mut app = app();
    app.ingest(MetricSample::new(5.0));
    app.handle_action(Action::PauseUpdates);
    assert!(app.updates_paused);

    app.ingest(MetricSample::new(40.0));
    app.ingest(MetricSample::new(60.0));
    assert_eq!(app.vis.last_sample().map(|s| s.beta), Some(5.0));
    assert_eq!(app.samples_received, 3);

    app.handle_action(Action::PauseUpdates);
    assert!(!app.updates_paused);
    assert_eq!(app.vis.last_sample().map(|s| s.beta), Some(60.0));
    assert!(app.pending_sample.is_none());
}

#[test]
fn non_finite_sample_is_reported() {
    let mut app = app();
    app.ingest(MetricSample::new(f64::NAN));
    assert!(app.vis.last_sample().is_none());
    assert_eq!(app.notifications.len(), 1);
    assert_eq!(app.samples_received, 0);
    assert_eq!(app.feed, FeedStatus::Waiting);
    assert!(app.last_sample_at.is_none());
}

#[test]
fn non_finite_sample_is_not_buffered_while_paused() {
    let mut app = app();
    app.handle_action(Action::PauseUpdates);
    app.ingest(MetricSample::new(f64::INFINITY));
    assert!(app.pending_sample.is_none());
    assert_eq!(app.samples_received, 0);
    assert_eq!(app.feed, FeedStatus::Waiting);
    assert_eq!(app.notifications.len(), 1);
}

#[test]
fn settled_bar_frame_follows_transition() {
    let mut app = app();
    let start = Instant::now() + Duration::from_secs(1);
    assert!(app.frame_due(start));
    assert!(!app.frame_due(start + Duration::from_millis(33)));

    let arrived = start + Duration::from_millis(100);
    app.ingest_at(MetricSample::new(5.0), arrived);
    app.ingest_at(MetricSample::new(60.0), arrived);
    assert!(app.frame_due(arrived));

    let next_tick = arrived + Duration::from_millis(33);
    assert!(app.frame_due(next_tick));
    let key = ElementKey::Bar(Category::Beta);
    let drawn = app.vis.surface().element_at(&key, next_tick).unwrap();
    let settled = app.vis.surface().target(&key).cloned().unwrap();
    assert_eq!(drawn, settled);
    assert_eq!(
        drawn.as_rect().unwrap().fill,
        app.vis.config().palette.alert
    );

    assert!(!app.frame_due(next_tick + Duration::from_millis(33)));
}

#[test]
fn resize_schedules_a_frame() {
    let mut app = app();
    let later = Instant::now() + Duration::from_secs(1);
    assert!(app.frame_due(later));
    assert!(!app.frame_due(later));

    assert!(!app.handle_event(TuiEvent::Resize {
        width: 80,
        height: 24
    }));
    assert!(app.frame_due(later));
}

#[test]
fn feed_events_update_status() {
    let mut app = app();
    assert_eq!(app.feed, FeedStatus::Waiting);
    app.handle_event(TuiEvent::FeedError("Sample decode error".to_string()));
    assert_eq!(app.notifications.len(), 1);
    app.handle_event(TuiEvent::FeedClosed);
    assert_eq!(app.feed, FeedStatus::Closed);
    assert_eq!(app.notifications.len(), 2);
}

#[test]
fn help_modal_swallows_actions() {
    let mut app = app();
    app.handle_action(Action::OpenHelp);
    assert!(app.modal.is_some());

    app.handle_action(Action::CutoffUp);
    assert_eq!(app.vis.cutoff().get(), 19);

    app.handle_action(Action::Cancel);
    assert!(app.modal.is_none());
    assert!(app.handle_action(Action::Quit));
}

#[test]
fn persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");
    assert_eq!(persistence::load(&path).unwrap(), None);

    let mut app = app();
    app.select_option_text("31").unwrap();
    persistence::save(&path, &app.persisted()).unwrap();

    let loaded = persistence::load(&path).unwrap().unwrap();
    assert_eq!(loaded.cutoff, 31);
    assert!(loaded.saved_at.is_some());

    let mut restored = App::new(base_config()).unwrap();
    restored.restore(&loaded);
    assert_eq!(restored.vis.cutoff().get(), 31);
}

#[test]
fn persistence_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(persistence::load(&path).is_err());
}

#[test]
fn render_shows_selector_and_cutoff_label() {
    let app = app();
    let screen = render_to_string(&app);
    assert!(screen.contains("Select Cut-off Value"));
    assert!(screen.contains("Cut-off: 19"));
    assert!(screen.contains("Feed: Waiting"));
    assert!(!screen.contains("Great Job"));
}

#[test]
fn render_shows_marker_in_alert() {
    let mut app = app();
    app.ingest(MetricSample::new(50.0));
    let screen = render_to_string(&app);
    assert!(screen.contains("Great Job"));
    assert!(screen.contains("ABOVE CUT-OFF"));
}

#[test]
fn render_lists_options_when_open() {
    let mut app = app();
    assert!(!render_to_string(&app).contains("> 19"));

    app.open_selector();
    assert!(render_to_string(&app).contains("> 19"));

    app.move_selector(1);
    let screen = render_to_string(&app);
    assert!(screen.contains("> 22"));
    assert!(!screen.contains("> 19"));
}
