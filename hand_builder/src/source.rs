//! Hand sources: anything that produces [`ObservationSet`]s.
//!
//! Sources run on their own thread and deliver owned observation sets over an
//! `mpsc` channel.  The controller never knows whether a set came from the
//! simulation window or a recorded session.

use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use hand_gesture::landmark::synthetic_hand;
use hand_gesture::ObservationSet;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for sim and replay
// ════════════════════════════════════════════════════════════════════════════

pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<ObservationSet>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<S: HandSource>(source: S) -> Receiver<ObservationSet> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — window pointer and keys (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Normalized pointer position, `None` once it leaves the window.
    Pointer(Option<Vec2>),
    Pinch(bool),
    TwoHands(bool),
    /// Widen (positive) or narrow the hand.
    Spread(f32),
    Quit,
}

pub const SPREAD_RANGE: (f32, f32) = (0.05, 1.0);

const SIM_PINCH_CLOSED: f32 = 0.01;
const SIM_PINCH_OPEN:   f32 = 0.2;

/// Hand pose reconstructed from [`SimInput`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHands {
    pub pointer:   Option<Vec2>,
    pub pinching:  bool,
    pub two_hands: bool,
    /// Index↔pinky spread of the build hand; fingertip separation with two.
    pub spread:    f32,
}

impl Default for SimHands {
    fn default() -> Self {
        SimHands { pointer: None, pinching: false, two_hands: false, spread: 0.2 }
    }
}

impl SimHands {
    /// Fold one input in.  Returns `false` on quit.
    pub fn apply(&mut self, input: SimInput) -> bool {
        match input {
            SimInput::Pointer(p)   => self.pointer = p,
            SimInput::Pinch(on)    => self.pinching = on,
            SimInput::TwoHands(on) => self.two_hands = on,
            SimInput::Spread(d)    => {
                self.spread = (self.spread + d).clamp(SPREAD_RANGE.0, SPREAD_RANGE.1)
            }
            SimInput::Quit         => return false,
        }
        true
    }

    pub fn observations(&self) -> ObservationSet {
        let Some(p) = self.pointer else {
            return ObservationSet::empty();
        };
        if self.two_hands {
            let half = self.spread / 2.0;
            return ObservationSet::with_hands(vec![
                synthetic_hand(p.x - half, p.y, SIM_PINCH_OPEN, 0.2),
                synthetic_hand(p.x + half, p.y, SIM_PINCH_OPEN, 0.2),
            ]);
        }
        let pinch = if self.pinching { SIM_PINCH_CLOSED } else { SIM_PINCH_OPEN };
        ObservationSet::with_hands(vec![synthetic_hand(p.x, p.y, pinch, self.spread)])
    }
}

/// Hand source driven by [`SimInput`] events from the visualizer's window.
///
/// Emits a fresh observation set whenever the simulated pose changes.
pub struct SimHandSource {
    pub rx: Receiver<SimInput>,
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<ObservationSet>) {
        let mut hands = SimHands::default();
        for input in self.rx {
            if !hands.apply(input) {
                debug!("simulated hands: quit");
                return;
            }
            if tx.send(hands.observations()).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayHandSource — recorded sessions
// ════════════════════════════════════════════════════════════════════════════

/// One observation set stamped with its offset from the start of recording.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub at_ms: u64,
    pub set:   ObservationSet,
}

/// Plays back a RON list of [`RecordedFrame`]s in real time.
pub struct ReplayHandSource {
    frames:  Vec<RecordedFrame>,
    looping: bool,
}

impl ReplayHandSource {
    pub fn new(mut frames: Vec<RecordedFrame>, looping: bool) -> Self {
        frames.sort_by_key(|f| f.at_ms);
        ReplayHandSource { frames, looping }
    }

    pub fn from_ron(s: &str, looping: bool) -> Result<Self, ConfigError> {
        Ok(Self::new(ron::from_str(s)?, looping))
    }

    pub fn load<P: AsRef<Path>>(path: P, looping: bool) -> Result<Self, ConfigError> {
        Self::from_ron(&fs::read_to_string(path)?, looping)
    }

    pub fn frames(&self) -> &[RecordedFrame] { &self.frames }

    /// Send every frame once, honoring timestamps.  `false` if the receiver
    /// went away.
    fn play_once(&self, tx: &Sender<ObservationSet>) -> bool {
        let start = Instant::now();
        for frame in &self.frames {
            let due = start + Duration::from_millis(frame.at_ms);
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
            if tx.send(frame.set.clone()).is_err() {
                return false;
            }
        }
        true
    }
}

impl HandSource for ReplayHandSource {
    fn run(self: Box<Self>, tx: Sender<ObservationSet>) {
        info!("replaying {} recorded frames", self.frames.len());
        while self.play_once(&tx) && self.looping && !self.frames.is_empty() {}
        info!("replay finished");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_outside_window_is_no_hand() {
        let hands = SimHands::default();
        assert!(hands.observations().hands.is_empty());
    }

    #[test]
    fn pinch_key_closes_the_hand() {
        let mut hands = SimHands::default();
        hands.apply(SimInput::Pointer(Some(Vec2::new(0.4, 0.6))));
        let open = hands.observations();
        hands.apply(SimInput::Pinch(true));
        let closed = hands.observations();
        let d = |s: &ObservationSet| s.hands[0].index_tip().distance(s.hands[0].thumb_tip());
        assert!(d(&open) > 0.05);
        assert!(d(&closed) < 0.05);
        assert_eq!(closed.hands[0].index_tip().planar(), Vec2::new(0.4, 0.6));
    }

    #[test]
    fn two_hand_key_splits_around_pointer() {
        let mut hands = SimHands::default();
        hands.apply(SimInput::Pointer(Some(Vec2::new(0.5, 0.5))));
        hands.apply(SimInput::TwoHands(true));
        hands.apply(SimInput::Spread(0.2));
        let set = hands.observations();
        assert_eq!(set.hands.len(), 2);
        let sep = set.hands[0].index_tip().distance(set.hands[1].index_tip());
        assert!((sep - 0.4).abs() < 1e-5);
    }

    #[test]
    fn spread_is_clamped() {
        let mut hands = SimHands::default();
        for _ in 0..100 { hands.apply(SimInput::Spread(-0.1)); }
        assert_eq!(hands.spread, SPREAD_RANGE.0);
        assert!(!hands.apply(SimInput::Quit));
    }

    #[test]
    fn sim_source_forwards_sets_and_stops_on_quit() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_hand_source(SimHandSource { rx: sim_rx });
        sim_tx.send(SimInput::Pointer(Some(Vec2::new(0.5, 0.5)))).unwrap();
        sim_tx.send(SimInput::Quit).unwrap();
        let sets: Vec<ObservationSet> = rx.iter().collect();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].hands.len(), 1);
    }

    #[test]
    fn replay_plays_in_timestamp_order_then_disconnects() {
        let src = ReplayHandSource::from_ron(
            "[(at_ms: 20, set: (brightness: Some(80.0))), (at_ms: 0, set: (hands: []))]",
            false,
        ).unwrap();
        assert_eq!(src.frames()[0].at_ms, 0);
        let rx = spawn_hand_source(src);
        let sets: Vec<ObservationSet> = rx.iter().collect();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].brightness, None);
        assert_eq!(sets[1].brightness, Some(80.0));
    }

    #[test]
    fn replay_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        let frames = vec![RecordedFrame {
            at_ms: 5,
            set:   ObservationSet::with_hands(vec![synthetic_hand(0.5, 0.5, 0.01, 0.2)]),
        }];
        fs::write(&path, ron::to_string(&frames).unwrap()).unwrap();
        let src = ReplayHandSource::load(&path, false).unwrap();
        assert_eq!(src.frames(), &frames[..]);
    }
}
