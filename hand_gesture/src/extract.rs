//! Per-tick gesture features.
//!
//! [`GestureExtractor::extract`] is a pure function of the observations it is
//! given: malformed hands are dropped, the remaining hand count picks exactly
//! one of the three [`GestureFrame`] variants.

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::landmark::HandObservation;

// ════════════════════════════════════════════════════════════════════════════
// ExtractorConfig
// ════════════════════════════════════════════════════════════════════════════

/// Maps hand spread to the size of a free-form object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Multiplier from normalized index↔pinky distance to world units.
    pub spread_scale: f32,
    pub size_min:     f32,
    pub size_max:     f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            spread_scale: 10.0,
            size_min:     0.5,
            size_max:     5.0,
        }
    }
}

impl ExtractorConfig {
    pub fn object_size(&self, spread: f32) -> f32 {
        (spread * self.spread_scale).clamp(self.size_min, self.size_max)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureFrame
// ════════════════════════════════════════════════════════════════════════════

/// Features of the only hand in view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingleHandFeatures {
    /// Index fingertip, normalized image space.
    pub fingertip:      Vec2,
    /// Thumb tip ↔ index tip.
    pub pinch_distance: f32,
    /// Index tip ↔ pinky tip.
    pub spread:         f32,
    /// `spread` mapped through [`ExtractorConfig::object_size`].
    pub object_size:    f32,
    pub confidence:     f32,
}

/// Features of the first two hands in view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoHandFeatures {
    pub fingertips: [Vec2; 2],
    pub midpoint:   Vec2,
    pub separation: f32,
    /// Confidence of the first hand.
    pub confidence: f32,
}

/// Derived snapshot for one tick.  Exactly one feature set is populated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureFrame {
    NoHand,
    OneHand(SingleHandFeatures),
    TwoHand(TwoHandFeatures),
}

impl GestureFrame {
    /// 0, 1 or 2.  Hands beyond the second are never counted.
    pub fn hand_count(&self) -> usize {
        match self {
            GestureFrame::NoHand     => 0,
            GestureFrame::OneHand(_) => 1,
            GestureFrame::TwoHand(_) => 2,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            GestureFrame::NoHand     => 0.0,
            GestureFrame::OneHand(f) => f.confidence,
            GestureFrame::TwoHand(f) => f.confidence,
        }
    }
}

/// Result of one extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extraction {
    pub frame:   GestureFrame,
    /// Observations discarded for having too few landmarks.
    pub dropped: usize,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureExtractor
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct GestureExtractor {
    config: ExtractorConfig,
}

impl GestureExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        GestureExtractor { config }
    }

    pub fn config(&self) -> &ExtractorConfig { &self.config }

    pub fn extract(&self, hands: &[HandObservation]) -> Extraction {
        let mut valid = Vec::with_capacity(2);
        let mut dropped = 0;
        for (i, hand) in hands.iter().enumerate() {
            match hand.validate() {
                Ok(()) => valid.push(hand),
                Err(e) => {
                    debug!("dropping hand #{}: {}", i, e);
                    dropped += 1;
                }
            }
        }

        let frame = match valid.as_slice() {
            []          => GestureFrame::NoHand,
            [only]      => GestureFrame::OneHand(self.single(only)),
            [a, b, ..]  => GestureFrame::TwoHand(Self::pair(a, b)),
        };
        Extraction { frame, dropped }
    }

    fn single(&self, hand: &HandObservation) -> SingleHandFeatures {
        let index = hand.index_tip();
        let spread = index.distance(hand.pinky_tip());
        SingleHandFeatures {
            fingertip:      index.planar(),
            pinch_distance: index.distance(hand.thumb_tip()),
            spread,
            object_size:    self.config.object_size(spread),
            confidence:     hand.confidence,
        }
    }

    fn pair(a: &HandObservation, b: &HandObservation) -> TwoHandFeatures {
        let pa = a.index_tip().planar();
        let pb = b.index_tip().planar();
        TwoHandFeatures {
            fingertips: [pa, pb],
            midpoint:   (pa + pb) * 0.5,
            separation: pa.distance(pb),
            confidence: a.confidence,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
