//! Pinch debouncing as a level-to-edge state machine.
//!
//! The pinch distance is re-evaluated every tick.  [`PinchDebouncer`] turns
//! that level signal into discrete [`PlaceEvent`]s:
//!
//! ```text
//!             distance < threshold
//!   Released ─────────────────────▶ Pressed   (event if cooldown elapsed)
//!      ▲                               │
//!      └───────────────────────────────┘
//!             distance ≥ threshold
//! ```
//!
//! Consecutive events are always at least `cooldown` apart.  Time comes from
//! a monotonic [`Instant`], so behaviour does not depend on frame rate.

use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Configuration
// ════════════════════════════════════════════════════════════════════════════

/// What a pinch that stays closed does after its first event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatPolicy {
    /// One event per closing; nothing more until released.
    Once,
    /// Fire again every `cooldown` for as long as the pinch is held.
    WhileHeld,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    /// Normalized thumb↔index distance below which the hand is pinching.
    pub threshold: f32,
    pub cooldown:  Duration,
    pub repeat:    RepeatPolicy,
}

impl Default for PinchConfig {
    fn default() -> Self {
        PinchConfig {
            threshold: 0.05,
            cooldown:  Duration::from_millis(400),
            repeat:    RepeatPolicy::WhileHeld,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// State machine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinchState { Released, Pressed }

/// A discrete "place object" request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaceEvent {
    pub at: Instant,
}

#[derive(Clone, Debug)]
pub struct PinchDebouncer {
    config:       PinchConfig,
    state:        PinchState,
    last_trigger: Option<Instant>,
}

impl PinchDebouncer {
    pub fn new(config: PinchConfig) -> Self {
        PinchDebouncer { config, state: PinchState::Released, last_trigger: None }
    }

    pub fn config(&self)       -> &PinchConfig     { &self.config }
    pub fn state(&self)        -> PinchState       { self.state }
    pub fn is_pinching(&self)  -> bool             { self.state == PinchState::Pressed }
    pub fn last_trigger(&self) -> Option<Instant>  { self.last_trigger }

    /// True when an event fired at `now` would respect the cooldown.
    pub fn cooled_down(&self, now: Instant) -> bool {
        match self.last_trigger {
            None       => true,
            Some(last) => now.saturating_duration_since(last) >= self.config.cooldown,
        }
    }

    /// Feed this tick's pinch distance.  Returns the event this tick emits.
    pub fn update(&mut self, distance: f32, now: Instant) -> Option<PlaceEvent> {
        let closed = distance < self.config.threshold;
        match (self.state, closed) {
            (PinchState::Released, true) => {
                self.state = PinchState::Pressed;
                if self.cooled_down(now) {
                    self.fire(now)
                } else {
                    debug!("pinch within cooldown, suppressed");
                    None
                }
            }
            (PinchState::Pressed, true) => match self.config.repeat {
                RepeatPolicy::WhileHeld if self.cooled_down(now) => self.fire(now),
                _ => None,
            },
            (PinchState::Pressed, false) => {
                self.state = PinchState::Released;
                None
            }
            (PinchState::Released, false) => None,
        }
    }

    /// Drop to Released without touching the cooldown clock.
    ///
    /// Applied whenever the tick has no single build hand.
    pub fn force_release(&mut self) {
        self.state = PinchState::Released;
    }

    fn fire(&mut self, now: Instant) -> Option<PlaceEvent> {
        self.last_trigger = Some(now);
        Some(PlaceEvent { at: now })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
