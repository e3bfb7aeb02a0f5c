//! Detector boundary types: landmarks, hand observations, observation sets.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

/// Landmarks per well-formed hand.
pub const LANDMARK_COUNT: usize = 21;
pub const THUMB_TIP:      usize = 4;
pub const INDEX_TIP:      usize = 8;
pub const PINKY_TIP:      usize = 20;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One normalized point on a detected hand.
///
/// `x` and `y` are in [0, 1] image space; `z` is the detector's relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Image-plane position, depth dropped.
    pub fn planar(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Planar Euclidean distance.
    pub fn distance(self, other: Landmark) -> f32 {
        self.planar().distance(other.planar())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// A hand observation that cannot be used this tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservationError {
    TooFewLandmarks { got: usize },
}

impl fmt::Display for ObservationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationError::TooFewLandmarks { got } => write!(
                f, "hand has {} landmarks, expected {}", got, LANDMARK_COUNT
            ),
        }
    }
}

impl std::error::Error for ObservationError {}

/// One detected hand for one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub landmarks:  Vec<Landmark>,
    /// Detection confidence, 0.0–1.0.
    #[serde(default)]
    pub confidence: f32,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>, confidence: f32) -> Self {
        HandObservation { landmarks, confidence: confidence.clamp(0.0, 1.0) }
    }

    pub fn validate(&self) -> Result<(), ObservationError> {
        if self.landmarks.len() < LANDMARK_COUNT {
            return Err(ObservationError::TooFewLandmarks { got: self.landmarks.len() });
        }
        Ok(())
    }

    pub fn is_well_formed(&self) -> bool {
        self.validate().is_ok()
    }

    // Callers validate first; indices below LANDMARK_COUNT are then in bounds.
    pub fn thumb_tip(&self) -> Landmark { self.landmarks[THUMB_TIP] }
    pub fn index_tip(&self) -> Landmark { self.landmarks[INDEX_TIP] }
    pub fn pinky_tip(&self) -> Landmark { self.landmarks[PINKY_TIP] }
}

// ════════════════════════════════════════════════════════════════════════════
// ObservationSet
// ════════════════════════════════════════════════════════════════════════════

/// Everything the detector reports for one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSet {
    /// Hands in detection order.
    #[serde(default)]
    pub hands:      Vec<HandObservation>,
    /// Mean luminance of the camera frame (0–255), when the detector reports it.
    #[serde(default)]
    pub brightness: Option<f32>,
}

impl ObservationSet {
    pub fn empty() -> Self {
        ObservationSet::default()
    }

    pub fn with_hands(hands: Vec<HandObservation>) -> Self {
        ObservationSet { hands, brightness: None }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic hands
// ════════════════════════════════════════════════════════════════════════════

/// Build a well-formed 21-point hand with the index tip at `(x, y)`.
///
/// The thumb tip sits `pinch` to the left of the index tip and the pinky tip
/// sits `spread` below it; every other landmark is parked at the index tip.
/// Used by the simulated hand source and by tests.
pub fn synthetic_hand(x: f32, y: f32, pinch: f32, spread: f32) -> HandObservation {
    let tip = Landmark::new(x, y);
    let mut landmarks = vec![tip; LANDMARK_COUNT];
    landmarks[THUMB_TIP] = Landmark::new(x - pinch, y);
    landmarks[PINKY_TIP] = Landmark::new(x, y + spread);
    HandObservation::new(landmarks, 0.9)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
