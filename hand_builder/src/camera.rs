//! Two-hand orbit and zoom.
//!
//! The midpoint of the two index fingertips steers yaw (x) and pitch (y).
//! Hand separation steers orbit distance: hands closer together zoom in.
//!
//! | Input                    | Target                                        |
//! |--------------------------|-----------------------------------------------|
//! | `midpoint.x` ∈ [0, 1]    | yaw = lerp(`yaw_range`)                       |
//! | `midpoint.y` ∈ [0, 1]    | pitch = lerp(`pitch_range`)                   |
//! | `separation`             | distance = map onto `distance_map`, clamped   |
//!
//! The first two-hand tick after any other phase only remembers the
//! separation, so bringing the second hand into view never jumps the zoom.

use std::f32::consts::PI;

use glam::Vec3;
use hand_gesture::{Smoothed, SmoothingError, TwoHandFeatures};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// CameraConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub yaw_range:        (f32, f32),
    pub pitch_range:      (f32, f32),
    /// Hand separation mapped linearly onto `distance_map`.
    pub separation_range: (f32, f32),
    pub distance_map:     (f32, f32),
    /// Hard limits on orbit distance, applied to target and smoothed value.
    pub distance_bounds:  (f32, f32),
    pub initial_distance: f32,
    pub alpha:            f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            yaw_range:        (-PI, PI),
            pitch_range:      (-1.2, 1.2),
            separation_range: (0.0, 1.0),
            distance_map:     (5.0, 20.0),
            distance_bounds:  (5.0, 25.0),
            initial_distance: 12.0,
            alpha:            0.1,
        }
    }
}

fn lerp((lo, hi): (f32, f32), t: f32) -> f32 {
    lo + (hi - lo) * t
}

// ════════════════════════════════════════════════════════════════════════════
// LookAt
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookAt {
    pub eye:    Vec3,
    pub target: Vec3,
    pub up:     Vec3,
}

// ════════════════════════════════════════════════════════════════════════════
// CameraRig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct CameraRig {
    config:          CameraConfig,
    yaw:             Smoothed<f32>,
    pitch:           Smoothed<f32>,
    distance:        Smoothed<f32>,
    /// Separation seen on the previous two-hand tick; `None` outside TwoHand.
    last_separation: Option<f32>,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Result<Self, SmoothingError> {
        let (lo, hi) = config.distance_bounds;
        Ok(CameraRig {
            yaw:             Smoothed::new(0.0, config.alpha)?,
            pitch:           Smoothed::new(0.0, config.alpha)?,
            distance:        Smoothed::new(config.initial_distance.clamp(lo, hi), config.alpha)?,
            last_separation: None,
            config,
        })
    }

    pub fn config(&self)   -> &CameraConfig { &self.config }
    pub fn yaw(&self)      -> f32           { self.yaw.value() }
    pub fn pitch(&self)    -> f32           { self.pitch.value() }
    pub fn distance(&self) -> f32           { self.distance.value() }

    /// Distance target for a hand separation: linear map, then clamp.
    pub fn zoom_target_for(&self, separation: f32) -> f32 {
        let (s0, s1) = self.config.separation_range;
        let (lo, hi) = self.config.distance_bounds;
        lerp(self.config.distance_map, (separation - s0) / (s1 - s0)).clamp(lo, hi)
    }

    /// Update targets from a two-hand frame.
    pub fn drive(&mut self, hands: &TwoHandFeatures) {
        self.yaw.set_target(lerp(self.config.yaw_range, hands.midpoint.x));
        self.pitch.set_target(lerp(self.config.pitch_range, hands.midpoint.y));
        if self.last_separation.is_some() {
            self.distance.set_target(self.zoom_target_for(hands.separation));
        }
        self.last_separation = Some(hands.separation);
    }

    /// Leave two-hand control.  Targets stay where they are.
    pub fn release(&mut self) {
        self.last_separation = None;
    }

    /// Swing back to the default view.  Distance is kept.
    pub fn reset_orbit(&mut self) {
        self.yaw.set_target(0.0);
        self.pitch.set_target(0.0);
    }

    /// Advance all three smoothers one tick.
    pub fn step(&mut self) {
        let (lo, hi) = self.config.distance_bounds;
        self.yaw.step();
        self.pitch.step();
        self.distance.step();
        self.distance.map_value(|d| d.clamp(lo, hi));
    }

    /// Orbit camera around `target`, Y up.
    pub fn look_at(&self, target: Vec3) -> LookAt {
        let (y, p, d) = (self.yaw(), self.pitch(), self.distance());
        let offset = Vec3::new(p.cos() * y.sin(), p.sin(), p.cos() * y.cos()) * d;
        LookAt { eye: target + offset, target, up: Vec3::Y }
    }

    /// 0 % at the far bound, 100 % at the near bound.
    pub fn zoom_percent(&self) -> i32 {
        let (lo, hi) = self.config.distance_bounds;
        if hi <= lo {
            return 100;
        }
        ((hi - self.distance()) / (hi - lo) * 100.0).round() as i32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
