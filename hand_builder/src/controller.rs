//! The interaction controller: one value owning every piece of session state.
//!
//! [`Controller::tick`] runs once per frame on the newest observation set.
//! The hand count picks the phase:
//!
//! | Phase     | Cursor  | Pinch           | Camera  |
//! |-----------|---------|-----------------|---------|
//! | `NoHand`  | frozen  | forced released | frozen  |
//! | `OneHand` | driven  | active          | frozen  |
//! | `TwoHand` | frozen  | forced released | driven  |
//!
//! Build mode is a separate state machine changed only by [`Command`]s.

use std::fmt;
use std::time::Instant;

use build_world::{
    lighting, CatalogKey, Color, LightingQuality, Mode, ModeController, PlacedItem,
    PlacementGrid, PlacementRecord, SelectError, VisualSpec, WorldModel, ZoneError, ZoneMap,
};
use glam::{Vec2, Vec3};
use hand_gesture::{
    Extraction, GestureExtractor, GestureFrame, ObservationSet, PinchDebouncer, PinchState,
    Smoothed,
};
use log::{debug, warn};

use crate::camera::{CameraRig, LookAt};
use crate::config::{AppConfig, ConfigError};

// ════════════════════════════════════════════════════════════════════════════
// Phase
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    NoHand,
    OneHand,
    TwoHand,
}

impl Phase {
    pub fn of(frame: &GestureFrame) -> Self {
        match frame {
            GestureFrame::NoHand      => Phase::NoHand,
            GestureFrame::OneHand(_)  => Phase::OneHand,
            GestureFrame::TwoHand(_)  => Phase::TwoHand,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::NoHand  => "no hand",
            Phase::OneHand => "build",
            Phase::TwoHand => "rotate & zoom",
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Commands
// ════════════════════════════════════════════════════════════════════════════

/// Discrete requests from the UI, keyboard or any other outer surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SwitchMode(Mode),
    /// Select by key string in the active mode's catalog.
    Select(String),
    SelectKey(CatalogKey),
    /// `true` steps forward.
    CycleSelection(bool),
    SetFreeformColor(Color),
    ToggleSnap,
    ToggleGridVisible,
    ToggleFloorGrid,
    RaiseLevel,
    LowerLevel,
    Teleport(String),
    NextZone,
    ClearWorld,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    InvalidCatalogKey(SelectError),
    UnknownZone(ZoneError),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidCatalogKey(e) => write!(f, "invalid catalog key: {}", e),
            Rejection::UnknownZone(e)       => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Rejection {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// Valid, but nothing changed (already in that state, or clamped).
    Unchanged,
    Rejected(Rejection),
}

impl CommandOutcome {
    fn changed(yes: bool) -> Self {
        if yes { CommandOutcome::Applied } else { CommandOutcome::Unchanged }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Renderer-facing snapshots
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub phase:   Phase,
    /// World index of the record placed this tick.
    pub placed:  Option<usize>,
    /// Observations dropped as malformed.
    pub dropped: usize,
}

/// Where a place event would put what, right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preview {
    pub position: Vec3,
    pub spec:     VisualSpec,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub mode:         Mode,
    pub selection:    &'static str,
    pub zone_id:      String,
    pub zone_name:    String,
    pub level:        u32,
    pub snap:         bool,
    pub grid_visible: bool,
    pub floor_grid:   bool,
    pub phase:        Phase,
    pub confidence:   f32,
    pub lighting:     LightingQuality,
    pub zoom_percent: i32,
    pub sun_lights:   Vec<Vec3>,
    /// Objects placed in the current zone.
    pub zone_objects: usize,
}

// ════════════════════════════════════════════════════════════════════════════
// Controller
// ════════════════════════════════════════════════════════════════════════════

pub struct Controller {
    // ── gesture pipeline ─────────────────────────────────────────────────
    extractor:        GestureExtractor,
    pinch:            PinchDebouncer,
    cursor:           Smoothed<Vec3>,
    workspace_extent: f32,

    // ── world ────────────────────────────────────────────────────────────
    modes:            ModeController,
    grid:             PlacementGrid,
    zones:            ZoneMap,
    world:            WorldModel,

    // ── view ─────────────────────────────────────────────────────────────
    camera:           CameraRig,

    // ── last tick ────────────────────────────────────────────────────────
    phase:            Phase,
    confidence:       f32,
    brightness:       Option<f32>,
    quit:             bool,
}

impl Controller {
    pub fn new(cfg: &AppConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let g = &cfg.gesture;
        Ok(Controller {
            extractor:        GestureExtractor::new(g.extractor()),
            pinch:            PinchDebouncer::new(g.pinch()),
            cursor:           Smoothed::new(Vec3::ZERO, g.cursor_alpha)?,
            workspace_extent: g.workspace_extent,
            modes:            ModeController::new(cfg.start_mode, (g.size_min, g.size_max)),
            grid:             PlacementGrid::new(cfg.grid),
            zones:            ZoneMap::new(cfg.zones.clone())?,
            world:            WorldModel::new(),
            camera:           CameraRig::new(cfg.camera)?,
            phase:            Phase::NoHand,
            confidence:       0.0,
            brightness:       None,
            quit:             false,
        })
    }

    /// Zone-local cursor target for a normalized fingertip.  X is mirrored
    /// so the cursor follows the hand as seen in a selfie view.
    pub fn cursor_target(&self, fingertip: Vec2) -> Vec3 {
        let e = self.workspace_extent;
        Vec3::new((1.0 - fingertip.x) * e - e / 2.0, 0.0, (fingertip.y - 0.5) * e)
    }

    /// Advance one frame.
    pub fn tick(&mut self, set: &ObservationSet, now: Instant) -> TickReport {
        let Extraction { frame, dropped } = self.extractor.extract(&set.hands);
        let phase = Phase::of(&frame);
        if phase != self.phase {
            debug!("phase: {:?} → {:?}", self.phase, phase);
        }
        self.phase = phase;
        self.confidence = frame.confidence();
        self.brightness = set.brightness;

        let mut fire = false;
        match frame {
            GestureFrame::NoHand => {
                self.pinch.force_release();
                self.camera.release();
            }
            GestureFrame::OneHand(hand) => {
                self.camera.release();
                let target = self.cursor_target(hand.fingertip);
                self.cursor.set_target(target);
                self.modes.set_freeform_size(hand.object_size);
                fire = self.pinch.update(hand.pinch_distance, now).is_some();
            }
            GestureFrame::TwoHand(hands) => {
                self.pinch.force_release();
                self.camera.drive(&hands);
            }
        }

        self.cursor.step();
        self.camera.step();

        let placed = fire.then(|| self.place_at_cursor());
        TickReport { phase, placed, dropped }
    }

    fn place_at_cursor(&mut self) -> usize {
        let item = match self.modes.current_key() {
            Some(key) => PlacedItem::Catalog(key),
            None      => PlacedItem::Freeform(self.modes.freeform()),
        };
        let record = PlacementRecord {
            position: self.preview_position(),
            mode:     self.modes.mode(),
            item,
            spec:     self.modes.current_spec(),
            zone:     self.zones.current().id.clone(),
        };
        self.world.place(record)
    }

    // ── commands ─────────────────────────────────────────────────────────

    pub fn apply(&mut self, cmd: Command) -> CommandOutcome {
        let outcome = match cmd {
            Command::SwitchMode(mode) => CommandOutcome::changed(self.modes.set_mode(mode)),
            Command::Select(raw)      => selected(self.modes.select_str(&raw)),
            Command::SelectKey(key)   => selected(self.modes.select(key)),
            Command::CycleSelection(forward) => {
                CommandOutcome::changed(self.modes.cycle(forward).is_some())
            }
            Command::SetFreeformColor(color) => {
                CommandOutcome::changed(self.modes.set_freeform_color(color))
            }
            Command::ToggleSnap => {
                self.grid.toggle_snap();
                CommandOutcome::Applied
            }
            Command::ToggleGridVisible => {
                self.grid.toggle_visible();
                CommandOutcome::Applied
            }
            Command::ToggleFloorGrid => {
                self.grid.toggle_floor();
                CommandOutcome::Applied
            }
            Command::RaiseLevel => CommandOutcome::changed(self.grid.raise()),
            Command::LowerLevel => CommandOutcome::changed(self.grid.lower()),
            Command::Teleport(id) => self.teleport(&id),
            Command::NextZone => {
                let id = self.zones.next_id().to_string();
                self.teleport(&id)
            }
            Command::ClearWorld => CommandOutcome::changed(self.world.clear() > 0),
            Command::Quit => {
                self.quit = true;
                CommandOutcome::Applied
            }
        };
        if let CommandOutcome::Rejected(reason) = &outcome {
            warn!("command rejected: {}", reason);
        }
        outcome
    }

    fn teleport(&mut self, id: &str) -> CommandOutcome {
        if self.zones.current().id == id {
            return CommandOutcome::Unchanged;
        }
        match self.zones.teleport(id) {
            Ok(_)  => {
                self.camera.reset_orbit();
                CommandOutcome::Applied
            }
            Err(e) => CommandOutcome::Rejected(Rejection::UnknownZone(e)),
        }
    }

    // ── read-only views ──────────────────────────────────────────────────

    fn preview_position(&self) -> Vec3 {
        self.grid.resolve(self.cursor.value(), self.zones.offset())
    }

    pub fn preview(&self) -> Preview {
        Preview { position: self.preview_position(), spec: self.modes.current_spec() }
    }

    pub fn look_at(&self) -> LookAt {
        self.camera.look_at(self.zones.offset())
    }

    pub fn hud(&self) -> Hud {
        let zone = self.zones.current();
        Hud {
            mode:         self.modes.mode(),
            selection:    self.modes.current_spec().name,
            zone_id:      zone.id.clone(),
            zone_name:    zone.name.clone(),
            level:        self.grid.level(),
            snap:         self.grid.snap_enabled(),
            grid_visible: self.grid.is_visible(),
            floor_grid:   self.grid.floor_visible(),
            phase:        self.phase,
            confidence:   self.confidence,
            lighting:     LightingQuality::classify(self.brightness),
            zoom_percent: self.camera.zoom_percent(),
            sun_lights:   lighting::sun_lights(&self.world),
            zone_objects: self.world.count_in_zone(&zone.id),
        }
    }

    /// Object count for every zone, in table order.
    pub fn zone_counts(&self) -> Vec<(String, usize)> {
        self.zones.zones().iter()
            .map(|z| (z.id.clone(), self.world.count_in_zone(&z.id)))
            .collect()
    }

    pub fn world(&self)          -> &WorldModel    { &self.world }
    pub fn records(&self)        -> &[PlacementRecord] { self.world.records() }
    pub fn grid(&self)           -> &PlacementGrid { &self.grid }
    pub fn zones(&self)          -> &ZoneMap       { &self.zones }
    pub fn modes(&self)          -> &ModeController { &self.modes }
    pub fn camera(&self)         -> &CameraRig     { &self.camera }
    pub fn phase(&self)          -> Phase          { self.phase }
    pub fn pinch_state(&self)    -> PinchState     { self.pinch.state() }
    pub fn cursor(&self)         -> Vec3           { self.cursor.value() }
    pub fn quit_requested(&self) -> bool           { self.quit }
}

fn selected(result: Result<bool, SelectError>) -> CommandOutcome {
    match result {
        Ok(changed) => CommandOutcome::changed(changed),
        Err(e)      => CommandOutcome::Rejected(Rejection::InvalidCatalogKey(e)),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use build_world::{BuildingPart, CityAsset};
    use hand_gesture::landmark::synthetic_hand;
    use hand_gesture::HandObservation;
    use std::time::Duration;

    const OPEN:    f32 = 0.2;
    const PINCHED: f32 = 0.01;

    fn controller() -> Controller {
        Controller::new(&AppConfig::default()).unwrap()
    }

    fn one(x: f32, y: f32, pinch: f32) -> ObservationSet {
        ObservationSet::with_hands(vec![synthetic_hand(x, y, pinch, 0.2)])
    }

    fn two(a: f32, b: f32) -> ObservationSet {
        ObservationSet::with_hands(vec![synthetic_hand(a, 0.5, OPEN, 0.2), synthetic_hand(b, 0.5, OPEN, 0.2)])
    }

    fn ms(t0: Instant, n: u64) -> Instant {
        t0 + Duration::from_millis(n)
    }

    /// Let the cursor settle over an open hand, then pinch once.
    fn place(c: &mut Controller, x: f32, y: f32, t0: Instant) -> Option<usize> {
        for i in 0..120 {
            c.tick(&one(x, y, OPEN), ms(t0, i));
        }
        c.tick(&one(x, y, PINCHED), ms(t0, 120)).placed
    }

    #[test]
    fn pinch_places_at_snapped_cursor() {
        let mut c = controller();
        let idx = place(&mut c, 0.3, 0.5, Instant::now()).unwrap();
        let r = &c.records()[idx];
        assert_eq!(r.position, Vec3::new(6.0, 0.0, 0.0));
        assert_eq!(r.item, PlacedItem::Catalog(CatalogKey::Part(BuildingPart::Wall)));
        assert_eq!(r.zone, "zone1");
        assert_eq!(c.preview().position, r.position);
    }

    #[test]
    fn scenario_d_teleport_tags_new_zone() {
        let mut c = controller();
        let t0 = Instant::now();
        for k in 0..3u64 {
            assert!(place(&mut c, 0.5, 0.5, ms(t0, k * 1000)).is_some());
        }
        assert_eq!(c.apply(Command::Teleport("zone3".into())), CommandOutcome::Applied);
        let counts = c.zone_counts();
        assert_eq!(counts[0], ("zone1".to_string(), 3));
        assert_eq!(counts[2], ("zone3".to_string(), 0));

        let idx = place(&mut c, 0.3, 0.5, ms(t0, 5000)).unwrap();
        let r = &c.records()[idx];
        assert_eq!(r.zone, "zone3");
        assert_eq!(r.position, Vec3::new(31.0, 0.0, 0.0));
        assert_eq!(c.hud().zone_objects, 1);
    }

    #[test]
    fn held_pinch_repeats_on_cooldown() {
        let mut c = controller();
        let t0 = Instant::now();
        let placed = (0..=60u64)
            .filter(|i| c.tick(&one(0.5, 0.5, PINCHED), ms(t0, i * 20)).placed.is_some())
            .count();
        // 1200 ms hold at 400 ms cooldown
        assert_eq!(placed, 4);
    }

    #[test]
    fn no_hand_freezes_cursor_target() {
        let mut c = controller();
        let t0 = Instant::now();
        c.tick(&one(0.3, 0.5, OPEN), t0);
        let target = c.cursor_target(Vec2::new(0.3, 0.5));
        for i in 1..200 {
            let r = c.tick(&ObservationSet::empty(), ms(t0, i));
            assert_eq!(r.phase, Phase::NoHand);
        }
        assert!((c.cursor() - target).length() < 1e-3);
        assert_eq!(c.hud().confidence, 0.0);
    }

    #[test]
    fn two_hands_release_pinch_and_keep_cooldown() {
        let mut c = controller();
        let t0 = Instant::now();
        assert!(c.tick(&one(0.5, 0.5, PINCHED), t0).placed.is_some());
        assert_eq!(c.pinch_state(), PinchState::Pressed);

        let r = c.tick(&two(0.3, 0.7), ms(t0, 100));
        assert_eq!(r.phase, Phase::TwoHand);
        assert_eq!(c.pinch_state(), PinchState::Released);

        // re-pinch inside the cooldown is silent, then repeats once it elapses
        assert!(c.tick(&one(0.5, 0.5, PINCHED), ms(t0, 200)).placed.is_none());
        assert!(c.tick(&one(0.5, 0.5, PINCHED), ms(t0, 450)).placed.is_some());
        assert_eq!(c.world().len(), 2);
    }

    #[test]
    fn two_hands_do_not_move_cursor() {
        let mut c = controller();
        let t0 = Instant::now();
        for i in 0..100 {
            c.tick(&one(0.5, 0.5, OPEN), ms(t0, i));
        }
        let before = c.cursor();
        for i in 100..200 {
            c.tick(&two(0.1, 0.9), ms(t0, i));
        }
        assert_eq!(c.cursor(), before);
        assert!(c.camera().yaw().abs() < 1e-3);
    }

    #[test]
    fn malformed_hands_are_counted_and_ignored() {
        let mut c = controller();
        let short = HandObservation::new(vec![Default::default(); 10], 0.9);
        let set = ObservationSet::with_hands(vec![short, synthetic_hand(0.5, 0.5, OPEN, 0.2)]);
        let r = c.tick(&set, Instant::now());
        assert_eq!(r.dropped, 1);
        assert_eq!(r.phase, Phase::OneHand);
    }

    #[test]
    fn mode_switch_keeps_world_zone_and_level() {
        let mut c = controller();
        place(&mut c, 0.5, 0.5, Instant::now());
        c.apply(Command::Teleport("zone4".into()));
        c.apply(Command::RaiseLevel);
        assert_eq!(c.apply(Command::SwitchMode(Mode::City)), CommandOutcome::Applied);
        assert_eq!(c.apply(Command::SwitchMode(Mode::City)), CommandOutcome::Unchanged);
        assert_eq!(c.world().len(), 1);
        assert_eq!(c.zones().current().id, "zone4");
        assert_eq!(c.grid().level(), 1);
        assert_eq!(c.hud().selection, "Road");
    }

    #[test]
    fn free_mode_places_spread_sized_cube() {
        let mut c = controller();
        c.apply(Command::SwitchMode(Mode::Free));
        let idx = place(&mut c, 0.5, 0.5, Instant::now()).unwrap();
        let r = &c.records()[idx];
        assert!(matches!(r.item, PlacedItem::Freeform(p) if (p.size - 2.0).abs() < 1e-5));
        assert_eq!(r.mode, Mode::Free);
    }

    #[test]
    fn invalid_selection_is_rejected() {
        let mut c = controller();
        let out = c.apply(Command::Select("spaceship".into()));
        assert!(matches!(out, CommandOutcome::Rejected(Rejection::InvalidCatalogKey(_))));
        let out = c.apply(Command::SelectKey(CatalogKey::City(CityAsset::Tree)));
        assert!(matches!(out, CommandOutcome::Rejected(Rejection::InvalidCatalogKey(_))));
        assert_eq!(c.hud().selection, "Wall");
        assert_eq!(c.apply(Command::Select("roof".into())), CommandOutcome::Applied);
        assert_eq!(c.hud().selection, "Roof");
    }

    #[test]
    fn unknown_zone_is_rejected() {
        let mut c = controller();
        let out = c.apply(Command::Teleport("zone42".into()));
        assert_eq!(out, CommandOutcome::Rejected(Rejection::UnknownZone(ZoneError::Unknown("zone42".into()))));
        assert_eq!(c.zones().current().id, "zone1");
        assert_eq!(c.apply(Command::Teleport("zone1".into())), CommandOutcome::Unchanged);
        assert_eq!(c.apply(Command::NextZone), CommandOutcome::Applied);
        assert_eq!(c.zones().current().id, "zone2");
    }

    #[test]
    fn teleport_resets_orbit_but_not_zoom() {
        let mut c = controller();
        let t0 = Instant::now();
        place(&mut c, 0.5, 0.5, t0);
        let high = ObservationSet::with_hands(vec![
            synthetic_hand(0.85, 0.9, OPEN, 0.2),
            synthetic_hand(0.95, 0.9, OPEN, 0.2),
        ]);
        for i in 0..300 {
            c.tick(&high, ms(t0, 1000 + i));
        }
        assert!(c.camera().yaw() > 2.0);
        assert!(c.camera().pitch() > 0.8);
        let distance = c.camera().distance();

        assert_eq!(c.apply(Command::Teleport("zone3".into())), CommandOutcome::Applied);
        for i in 0..200 {
            c.tick(&ObservationSet::empty(), ms(t0, 2000 + i));
        }
        assert!(c.camera().yaw().abs() < 1e-3);
        assert!(c.camera().pitch().abs() < 1e-3);
        assert!((c.camera().distance() - distance).abs() < 1e-3);
        assert_eq!(c.world().len(), 1);
        assert_eq!(c.look_at().target, Vec3::new(25.0, 0.0, 0.0));
    }

    #[test]
    fn grid_and_floor_toggle_separately() {
        let mut c = controller();
        assert_eq!(c.apply(Command::ToggleFloorGrid), CommandOutcome::Applied);
        let hud = c.hud();
        assert!(!hud.floor_grid);
        assert!(hud.grid_visible);
        c.apply(Command::ToggleGridVisible);
        assert!(!c.hud().grid_visible);
    }

    #[test]
    fn level_clamps_report_unchanged() {
        let mut c = controller();
        assert_eq!(c.apply(Command::LowerLevel), CommandOutcome::Unchanged);
        for _ in 0..10 {
            assert_eq!(c.apply(Command::RaiseLevel), CommandOutcome::Applied);
        }
        assert_eq!(c.apply(Command::RaiseLevel), CommandOutcome::Unchanged);
    }

    #[test]
    fn clear_and_quit() {
        let mut c = controller();
        assert_eq!(c.apply(Command::ClearWorld), CommandOutcome::Unchanged);
        place(&mut c, 0.5, 0.5, Instant::now());
        assert_eq!(c.apply(Command::ClearWorld), CommandOutcome::Applied);
        assert!(c.world().is_empty());
        assert!(!c.quit_requested());
        c.apply(Command::Quit);
        assert!(c.quit_requested());
    }

    #[test]
    fn hud_reports_lighting_and_suns() {
        let mut c = controller();
        c.apply(Command::SwitchMode(Mode::City));
        c.apply(Command::Select("sun".into()));
        place(&mut c, 0.5, 0.5, Instant::now());
        let mut set = one(0.5, 0.5, OPEN);
        set.brightness = Some(30.0);
        c.tick(&set, Instant::now() + Duration::from_secs(5));
        let hud = c.hud();
        assert_eq!(hud.sun_lights.len(), 1);
        assert_eq!(hud.lighting, LightingQuality::Poor);
        assert_eq!(hud.phase, Phase::OneHand);
        assert!((hud.confidence - 0.9).abs() < 1e-6);
    }
}
