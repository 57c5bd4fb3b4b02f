//! Sample feeds.
//!
//! Each feed runs as its own task and forwards samples into the UI event
//! channel. The UI loop is the only place samples are applied.

use crate::config::{SourceConfig, SourceKind};
use crate::events::TuiEvent;
use bandwatch_core::MetricSample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub fn spawn_feed(config: &SourceConfig, sender: mpsc::Sender<TuiEvent>) {
    match config.kind {
        SourceKind::Simulate => {
            let simulator = match config.seed {
                Some(seed) => Simulator::seeded(seed),
                None => Simulator::new(),
            };
            spawn_simulator(simulator, Duration::from_millis(config.interval_ms), sender);
        }
        SourceKind::Stdin => spawn_stdin_reader(sender),
    }
}

/// Slowly drifting sinusoid with noise, spending part of each cycle above
/// the default cut-off.
#[derive(Debug, Clone)]
pub struct Simulator {
    rng: StdRng,
    phase: f64,
}

impl Simulator {
    const BASELINE: f64 = 20.0;
    const AMPLITUDE: f64 = 14.0;
    const PHASE_STEP: f64 = 0.08;
    const NOISE: f64 = 4.0;

    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            phase: 0.0,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            phase: 0.0,
        }
    }

    pub fn next_sample(&mut self) -> MetricSample {
        self.phase = (self.phase + Self::PHASE_STEP) % std::f64::consts::TAU;
        let noise = self.rng.random_range(-Self::NOISE..=Self::NOISE);
        let beta = Self::BASELINE + Self::AMPLITUDE * self.phase.sin() + noise;
        MetricSample::new(beta.clamp(0.0, 100.0))
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_simulator(mut simulator: Simulator, interval: Duration, sender: mpsc::Sender<TuiEvent>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if sender
                .send(TuiEvent::Sample(simulator.next_sample()))
                .await
                .is_err()
            {
                break;
            }
        }
    });
}

/// Decode one stdin line. Blank lines yield `None`.
pub fn decode_line(line: &str) -> Option<TuiEvent> {
    if line.trim().is_empty() {
        return None;
    }
    Some(match MetricSample::from_json(line) {
        Ok(sample) => TuiEvent::Sample(sample),
        Err(err) => TuiEvent::FeedError(format!("Sample decode error: {}", err)),
    })
}

fn spawn_stdin_reader(sender: mpsc::Sender<TuiEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(event) = decode_line(&line) {
                        if sender.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::error!(error = %err, "stdin read failed");
                    let _ = sender
                        .send(TuiEvent::FeedError(format!("stdin read failed: {}", err)))
                        .await;
                    break;
                }
            }
        }
        let _ = sender.send(TuiEvent::FeedClosed).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_simulator_is_deterministic() {
        let mut a = Simulator::seeded(7);
        let mut b = Simulator::seeded(7);
        for _ in 0..50 {
            assert_eq!(a.next_sample(), b.next_sample());
        }
    }

    #[test]
    fn test_simulator_stays_in_domain() {
        let mut sim = Simulator::seeded(1);
        for _ in 0..1_000 {
            let beta = sim.next_sample().beta;
            assert!((0.0..=100.0).contains(&beta));
        }
    }

    #[test]
    fn test_decode_line() {
        assert!(decode_line("   ").is_none());
        assert!(matches!(
            decode_line("{\"beta\": 12.5}"),
            Some(TuiEvent::Sample(sample)) if sample.beta == 12.5
        ));
        assert!(matches!(
            decode_line("not json"),
            Some(TuiEvent::FeedError(msg)) if msg.contains("decode")
        ));
    }
}
