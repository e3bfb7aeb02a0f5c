//! The fixed-cadence application loop.
//!
//! Each tick: drain the hand-source channel keeping only the newest
//! observation set, run [`Controller::tick`], then hand the read-only state to
//! the visualizer.  A disconnected source or a quit command ends the loop
//! after the current tick.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use hand_gesture::ObservationSet;
use log::info;

use crate::config::AppConfig;
use crate::controller::{Command, CommandOutcome, Controller, TickReport};
use crate::source::{spawn_hand_source, HandSource, ReplayHandSource, SimHandSource, SimInput};
use crate::visualizer::Visualizer;

/// Where hand observations come from.
pub enum Input {
    /// Pointer and keys of the visualizer window.
    Simulated,
    Replay(ReplayHandSource),
}

/// Pull everything queued, keeping the newest set in `latest`.
///
/// Returns `false` once the source has hung up.
pub fn drain_latest(rx: &Receiver<ObservationSet>, latest: &mut ObservationSet) -> bool {
    loop {
        match rx.try_recv() {
            Ok(set)                         => *latest = set,
            Err(TryRecvError::Empty)        => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

fn describe(cmd: &Command, outcome: &CommandOutcome) -> String {
    match outcome {
        CommandOutcome::Applied     => format!("{:?}", cmd),
        CommandOutcome::Unchanged   => format!("{:?} - no change", cmd),
        CommandOutcome::Rejected(r) => format!("{:?} rejected: {}", cmd, r),
    }
}

fn describe_tick(ctl: &Controller, report: &TickReport) -> Option<String> {
    let idx = report.placed?;
    let r = &ctl.records()[idx];
    Some(format!(
        "Placed {} at ({:.1}, {:.1}, {:.1}) in {}",
        r.spec.name, r.position.x, r.position.y, r.position.z, r.zone
    ))
}

fn sleep_until_next(tick_start: Instant, cfg: &AppConfig) {
    let elapsed = tick_start.elapsed();
    let period = cfg.tick_period();
    if elapsed < period {
        thread::sleep(period - elapsed);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — windowed loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the interactive application until the window closes, the user quits,
/// or the hand source hangs up.
pub fn run(cfg: AppConfig, input: Input) -> Result<()> {
    let mut ctl = Controller::new(&cfg).context("invalid configuration")?;

    // ── Hand source ───────────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let hand_rx = match input {
        Input::Simulated      => spawn_hand_source(SimHandSource { rx: sim_rx }),
        Input::Replay(replay) => {
            drop(sim_rx);
            spawn_hand_source(replay)
        }
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx, cfg.gesture.workspace_extent)
        .map_err(|e| anyhow!("failed to open window: {}", e))?;

    let mut latest = ObservationSet::empty();
    let mut status = String::from("Ready - one hand builds, two hands orbit and zoom");

    while vis.is_open() {
        let tick_start = Instant::now();

        for cmd in vis.poll_input() {
            let outcome = ctl.apply(cmd.clone());
            status = describe(&cmd, &outcome);
        }

        let connected = drain_latest(&hand_rx, &mut latest);
        let report = ctl.tick(&latest, Instant::now());
        if let Some(msg) = describe_tick(&ctl, &report) {
            status = msg;
        }

        vis.render(&ctl, &status);

        if ctl.quit_requested() || !connected {
            break;
        }
        sleep_until_next(tick_start, &cfg);
    }

    info!("session ended with {} objects placed", ctl.world().len());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// run_headless() — no window
// ════════════════════════════════════════════════════════════════════════════

/// Tick until the source hangs up and return the final controller.
pub fn run_headless<S: HandSource>(cfg: &AppConfig, source: S) -> Result<Controller> {
    let mut ctl = Controller::new(cfg).context("invalid configuration")?;
    let rx = spawn_hand_source(source);
    let mut latest = ObservationSet::empty();

    loop {
        let tick_start = Instant::now();
        let connected = drain_latest(&rx, &mut latest);
        let report = ctl.tick(&latest, Instant::now());
        if let Some(msg) = describe_tick(&ctl, &report) {
            info!("{}", msg);
        }
        if !connected {
            break;
        }
        sleep_until_next(tick_start, cfg);
    }

    for (zone, count) in ctl.zone_counts().into_iter().filter(|(_, n)| *n > 0) {
        info!("{}: {} objects", zone, count);
    }
    Ok(ctl)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RecordedFrame;
    use hand_gesture::landmark::synthetic_hand;

    fn frame(at_ms: u64, pinch: f32) -> RecordedFrame {
        RecordedFrame {
            at_ms,
            set: ObservationSet::with_hands(vec![synthetic_hand(0.5, 0.5, pinch, 0.2)]),
        }
    }

    #[test]
    fn drain_keeps_newest() {
        let (tx, rx) = mpsc::channel();
        let mut latest = ObservationSet::empty();
        tx.send(ObservationSet { hands: vec![], brightness: Some(1.0) }).unwrap();
        tx.send(ObservationSet { hands: vec![], brightness: Some(2.0) }).unwrap();
        assert!(drain_latest(&rx, &mut latest));
        assert_eq!(latest.brightness, Some(2.0));

        // nothing new: previous set is reused
        assert!(drain_latest(&rx, &mut latest));
        assert_eq!(latest.brightness, Some(2.0));

        drop(tx);
        assert!(!drain_latest(&rx, &mut latest));
    }

    #[test]
    fn headless_replay_places_once_per_pinch() {
        let mut cfg = AppConfig::default();
        cfg.tick_hz = 200;
        let replay = ReplayHandSource::new(
            vec![frame(0, 0.2), frame(100, 0.01), frame(200, 0.2), frame(300, 0.2)],
            false,
        );
        let ctl = run_headless(&cfg, replay).unwrap();
        assert_eq!(ctl.world().len(), 1);
        assert_eq!(ctl.records()[0].zone, "zone1");
    }

    #[test]
    fn headless_rejects_invalid_config() {
        let mut cfg = AppConfig::default();
        cfg.tick_hz = 0;
        assert!(run_headless(&cfg, ReplayHandSource::new(vec![], false)).is_err());
    }

    #[test]
    fn status_lines() {
        assert_eq!(describe(&Command::ToggleSnap, &CommandOutcome::Applied), "ToggleSnap");
        assert_eq!(
            describe(&Command::RaiseLevel, &CommandOutcome::Unchanged),
            "RaiseLevel - no change"
        );
    }
}
