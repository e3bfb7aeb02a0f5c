//! # hand_gesture
//!
//! Turns the per-frame output of a hand-landmark detector into stable,
//! debounced interaction signals.
//!
//! ## Pipeline
//!
//! | Stage | Type | Output |
//! |---|---|---|
//! | Detector boundary | [`ObservationSet`] | 0..N hands of 21 normalized landmarks |
//! | Feature extraction | [`GestureExtractor`] | [`GestureFrame`]: no hand / one hand / two hands |
//! | Smoothing | [`Smoothed`] | exponentially filtered scalars and vectors |
//! | Pinch edges | [`PinchDebouncer`] | rate-limited [`PlaceEvent`]s |
//!
//! Only landmarks 4 (thumb tip), 8 (index tip) and 20 (pinky tip) are read.
//! Distances are planar: the relative depth `z` is carried but ignored.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use hand_gesture::{GestureExtractor, GestureFrame, PinchDebouncer, PinchConfig};
//! use hand_gesture::landmark::synthetic_hand;
//!
//! let extractor = GestureExtractor::default();
//! let mut pinch  = PinchDebouncer::new(PinchConfig::default());
//!
//! let hand = synthetic_hand(0.5, 0.5, 0.01, 0.2);
//! let out  = extractor.extract(&[hand]);
//! if let GestureFrame::OneHand(f) = out.frame {
//!     let t0 = Instant::now();
//!     assert!(pinch.update(f.pinch_distance, t0).is_some());
//!     assert!(pinch.update(f.pinch_distance, t0 + Duration::from_millis(10)).is_none());
//! }
//! ```

pub mod landmark;
pub mod extract;
pub mod smoothing;
pub mod pinch;

pub use landmark::{HandObservation, Landmark, ObservationError, ObservationSet};
pub use extract::{
    Extraction, ExtractorConfig, GestureExtractor, GestureFrame, SingleHandFeatures,
    TwoHandFeatures,
};
pub use smoothing::{Smoothed, SmoothingError};
pub use pinch::{PinchConfig, PinchDebouncer, PinchState, PlaceEvent, RepeatPolicy};
