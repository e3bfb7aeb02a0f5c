//! # hand_builder
//!
//! Gesture-driven 3D block builder.  One hand moves a placement cursor and
//! pinches to build; two hands orbit and zoom the camera.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hands | Action |
//! |---|---|---|
//! | Move index fingertip | One | Move the placement cursor (smoothed, grid-snapped) |
//! | Pinch thumb to index | One | Place the current item at the cursor |
//! | Hold the pinch | One | Place again every cooldown (`RepeatPolicy::WhileHeld`) |
//! | Spread index to pinky | One | Size of free-form cubes |
//! | Move both fingertips | Two | Orbit yaw (x) and pitch (y) |
//! | Hands apart / together | Two | Zoom out / in |
//! | No hands | | Cursor, pinch and camera hold still |
//!
//! Build mode, catalog selection, grid settings, height level, zones and
//! clearing are driven by [`controller::Command`]s instead.
//!
//! ## Hand sources
//!
//! * (default) — **Simulation**: the visualizer window's pointer is the index
//!   fingertip.
//! * `--replay FILE` — **Replay**: a RON list of timestamped observation sets.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | `Space` (hold) | Pinch |
//! | `Tab` (hold) | Two hands, centred on the pointer |
//! | `Shift` / `Ctrl` | Widen / narrow the hand |
//! | `1`–`4` | Free, Parts, City, Solar mode |
//! | `[` / `]` | Previous / next catalog item |
//! | `K` | Next free-form color |
//! | `G` | Zone floor grid |
//! | `J` / `H` | Placement grid visibility / snapping |
//! | `Up` / `Down` | Height level |
//! | `Z` | Next zone |
//! | `C` | Clear the world |
//! | `Q` / `Escape` | Quit |

pub mod config;
pub mod camera;
pub mod controller;
pub mod source;
pub mod visualizer;
pub mod app;
