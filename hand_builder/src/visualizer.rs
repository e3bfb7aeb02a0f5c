//! Software-rendered development view using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────┬─────────────────┐
//! │  top-down view of the current zone       │  HUD            │
//! │                                          │                 │
//! │  zone floor and grid lines (toggles)     │  mode / item    │
//! │  placed objects as colored squares       │  zone / level   │
//! │  cursor ghost outline                    │  hands / light  │
//! │  camera eye marker                       │  zoom / counts  │
//! │                                          │                 │
//! ├──────────────────────────────────────────┴─────────────────┤
//! │  status line / key legend                                  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pointer stands in for the index fingertip.  It is mirrored on the way
//! in so that, after the controller's own selfie mirroring, the cursor lands
//! under the pointer.

use std::sync::mpsc::Sender;

use build_world::{Color, Mode, ZONE_SPACING};
use glam::{Vec2, Vec3};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::controller::{Command, Controller};
use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const SCENE:    usize = 640;
const HUD_W:        usize = 320;
const LEGEND_H:     usize = 44;
pub const WIN_W:    usize = SCENE + HUD_W;
pub const WIN_H:    usize = SCENE + LEGEND_H;
const TEXT_SCALE:   usize = 2;
const BG_COLOR:     u32   = 0xFF1A1A2E;
const HUD_BG:       u32   = 0xFF16213E;
const GRID_COLOR:   u32   = 0xFF2A3A5A;
const AXIS_COLOR:   u32   = 0xFF44557A;
const FLOOR_COLOR:  u32   = 0xFF22304C;
const FLOOR_STEP:   f32   = 5.0;
const EYE_COLOR:    u32   = 0xFFFFD700;  // gold
const TEXT_BG:      u32   = 0xFF0F3460;

const SPREAD_STEP:  f32   = 0.02;

/// Free-form colors cycled with `K`.
const PALETTE: [Color; 5] = [
    Color::CYAN,
    Color([0.98, 0.45, 0.09]),
    Color([0.52, 0.80, 0.09]),
    Color([0.93, 0.28, 0.60]),
    Color([0.98, 0.98, 0.98]),
];

/// One-shot keys and the commands they issue.
const KEY_COMMANDS: &[(Key, Command)] = &[
    (Key::Key1,         Command::SwitchMode(Mode::Free)),
    (Key::Key2,         Command::SwitchMode(Mode::Parts)),
    (Key::Key3,         Command::SwitchMode(Mode::City)),
    (Key::Key4,         Command::SwitchMode(Mode::Solar)),
    (Key::LeftBracket,  Command::CycleSelection(false)),
    (Key::RightBracket, Command::CycleSelection(true)),
    (Key::G,            Command::ToggleFloorGrid),
    (Key::J,            Command::ToggleGridVisible),
    (Key::H,            Command::ToggleSnap),
    (Key::Up,           Command::RaiseLevel),
    (Key::Down,         Command::LowerLevel),
    (Key::Z,            Command::NextZone),
    (Key::C,            Command::ClearWorld),
    (Key::Q,            Command::Quit),
    (Key::Escape,       Command::Quit),
];

const LEGEND: &str =
    "1-4 MODE  [ ] ITEM  K COLOR  G FLOOR  J GRID  H SNAP  UP/DOWN LEVEL  Z ZONE  C CLEAR  Q QUIT  \
     SPACE PINCH  TAB TWO HANDS  SHIFT/CTRL SPREAD";

// ════════════════════════════════════════════════════════════════════════════
// Coordinate mapping
// ════════════════════════════════════════════════════════════════════════════

/// Window pixel → normalized fingertip, `None` outside the scene.
pub fn pointer_fingertip(mx: f32, my: f32) -> Option<Vec2> {
    let s = SCENE as f32;
    if mx < 0.0 || my < 0.0 || mx >= s || my >= s {
        return None;
    }
    Some(Vec2::new(1.0 - mx / s, my / s))
}

/// Top-down projection of a world point around the zone origin.
pub fn world_to_screen(p: Vec3, zone_offset: Vec3, span: f32) -> Vec2 {
    let local = p - zone_offset;
    Vec2::new(local.x / span + 0.5, local.z / span + 0.5) * SCENE as f32
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:   Window,
    buf:      Vec<u32>,
    sim_tx:   Sender<SimInput>,
    /// World units across the scene; the fingertip's sweep.
    span:     f32,

    // ── last sent simulated pose ─────────────────────────────────────────
    pointer:  Option<Vec2>,
    pinching: bool,
    two:      bool,
    palette:  usize,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, span: f32) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "Hand Builder — gesture block builder",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.set_target_fps(60);

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            span,
            pointer:  None,
            pinching: false,
            two:      false,
            palette:  0,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Read the keyboard and pointer.  Pose changes go to the simulated hand
    /// source; discrete keys come back as commands.
    pub fn poll_input(&mut self) -> Vec<Command> {
        let mut commands: Vec<Command> = KEY_COMMANDS.iter()
            .filter(|(k, _)| self.window.is_key_pressed(*k, KeyRepeat::No))
            .map(|(_, c)| c.clone())
            .collect();

        if self.window.is_key_pressed(Key::K, KeyRepeat::No) {
            self.palette = (self.palette + 1) % PALETTE.len();
            commands.push(Command::SetFreeformColor(PALETTE[self.palette]));
        }

        if commands.contains(&Command::Quit) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return commands;
        }

        // ── simulated hands ──────────────────────────────────────────────
        let pointer = self.window.get_mouse_pos(MouseMode::Discard)
            .and_then(|(x, y)| pointer_fingertip(x, y));
        if pointer != self.pointer {
            self.pointer = pointer;
            let _ = self.sim_tx.send(SimInput::Pointer(pointer));
        }

        let pinching = self.window.is_key_down(Key::Space);
        if pinching != self.pinching {
            self.pinching = pinching;
            let _ = self.sim_tx.send(SimInput::Pinch(pinching));
        }

        let two = self.window.is_key_down(Key::Tab);
        if two != self.two {
            self.two = two;
            let _ = self.sim_tx.send(SimInput::TwoHands(two));
        }

        let held = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);
        let wider    = held(Key::LeftShift) || held(Key::RightShift);
        let narrower = held(Key::LeftCtrl)  || held(Key::RightCtrl);
        if wider {
            let _ = self.sim_tx.send(SimInput::Spread(SPREAD_STEP));
        }
        if narrower {
            let _ = self.sim_tx.send(SimInput::Spread(-SPREAD_STEP));
        }

        commands
    }

    /// Render one frame.
    pub fn render(&mut self, ctl: &Controller, status: &str) {
        self.buf.fill(BG_COLOR);

        let offset = ctl.zones().offset();

        // ── Zone floor, then placement grid on top ───────────────────────
        if ctl.grid().floor_visible() {
            self.draw_floor();
        }
        if ctl.grid().is_visible() {
            self.draw_grid(ctl.grid().cell_size());
        }

        // ── Placed objects, lowest first so stacks show the top ──────────
        let mut records: Vec<_> = ctl.records().iter().collect();
        records.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        for r in records {
            let size = r.spec.size.footprint();
            let lift = (r.position.y / 20.0).clamp(0.0, 0.6);
            let color = blend(r.spec.color.to_argb(), 0xFFFFFFFF, lift);
            self.draw_square(r.position, offset, size, color, true);
        }

        // ── Cursor ghost ──────────────────────────────────────────────────
        let preview = ctl.preview();
        let ghost = blend(preview.spec.color.to_argb(), 0xFFFFFFFF, 0.5);
        self.draw_square(preview.position, offset, preview.spec.size.footprint(), ghost, false);

        // ── Camera eye ────────────────────────────────────────────────────
        let eye = world_to_screen(ctl.look_at().eye, offset, self.span);
        let max = (SCENE - 6) as f32;
        self.draw_diamond(eye.x.clamp(5.0, max) as usize, eye.y.clamp(5.0, max) as usize, 5, EYE_COLOR);

        // ── HUD ───────────────────────────────────────────────────────────
        self.draw_hud(ctl);

        // ── Status line and legend ────────────────────────────────────────
        self.fill_rect(0, SCENE, WIN_W, LEGEND_H, TEXT_BG);
        self.draw_label(status, 10, SCENE + 8, TEXT_SCALE, 0xFFEEEEEE);
        self.draw_label(LEGEND, 10, WIN_H - 12, 1, 0xFF888888);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    fn draw_floor(&mut self) {
        let half = ZONE_SPACING / 2.0;
        let corner = world_to_screen(Vec3::new(-half, 0.0, -half), Vec3::ZERO, self.span);
        let side = (ZONE_SPACING / self.span * SCENE as f32) as usize;
        let (x0, y0) = (corner.x.max(0.0) as usize, corner.y.max(0.0) as usize);
        if x0 >= SCENE || y0 >= SCENE {
            return;
        }
        let side = side.min(SCENE - x0).min(SCENE - y0);
        self.fill_rect(x0, y0, side, side, FLOOR_COLOR);

        let n = (half / FLOOR_STEP).floor() as i32;
        for k in -n..=n {
            let px = world_to_screen(Vec3::new(k as f32 * FLOOR_STEP, 0.0, 0.0), Vec3::ZERO, self.span).x;
            if px >= x0 as f32 && (px as usize) < x0 + side {
                self.fill_rect(px as usize, y0, 1, side, GRID_COLOR);
                self.fill_rect(x0, px as usize, side, 1, GRID_COLOR);
            }
        }
        self.draw_border(x0, y0, side, side, AXIS_COLOR);
    }

    fn draw_grid(&mut self, cell: f32) {
        let half = self.span / 2.0;
        let n = (half / cell).floor() as i32;
        for k in -n..=n {
            let px = world_to_screen(Vec3::new(k as f32 * cell, 0.0, 0.0), Vec3::ZERO, self.span).x;
            let color = if k == 0 { AXIS_COLOR } else { GRID_COLOR };
            if px >= 0.0 && (px as usize) < SCENE {
                self.fill_rect(px as usize, 0, 1, SCENE, color);
                self.fill_rect(0, px as usize, SCENE, 1, color);
            }
        }
    }

    fn draw_square(&mut self, p: Vec3, offset: Vec3, size: f32, color: u32, filled: bool) {
        let c = world_to_screen(p, offset, self.span);
        let side = (size / self.span * SCENE as f32).max(3.0);
        let x0 = c.x - side / 2.0;
        let y0 = c.y - side / 2.0;
        if x0 + side < 0.0 || y0 + side < 0.0 || x0 >= SCENE as f32 || y0 >= SCENE as f32 {
            return;
        }
        let (x, y) = (x0.max(0.0) as usize, y0.max(0.0) as usize);
        let w = ((x0 + side).min(SCENE as f32) as usize).saturating_sub(x).max(1);
        let h = ((y0 + side).min(SCENE as f32) as usize).saturating_sub(y).max(1);
        if filled {
            self.fill_rect(x, y, w, h, color);
            self.draw_border(x, y, w, h, 0xFF000000);
        } else {
            self.draw_border(x, y, w, h, color);
            if w > 2 && h > 2 {
                self.draw_border(x + 1, y + 1, w - 2, h - 2, color);
            }
        }
    }

    fn draw_hud(&mut self, ctl: &Controller) {
        self.fill_rect(SCENE, 0, HUD_W, SCENE, HUD_BG);
        let hud = ctl.hud();
        let on = |b: bool| if b { "ON" } else { "OFF" };
        let lines = [
            format!("MODE: {}", hud.mode.name()),
            format!("ITEM: {}", hud.selection),
            format!("ZONE: {}", hud.zone_id),
            format!("  {}", hud.zone_name),
            format!("LEVEL: {} ({:.1})", hud.level, ctl.grid().elevation()),
            format!("SNAP: {}  GRID: {}", on(hud.snap), on(hud.grid_visible)),
            format!("FLOOR: {}", on(hud.floor_grid)),
            String::new(),
            format!("HANDS: {}", hud.phase),
            format!("CONFIDENCE: {:.0}%", hud.confidence * 100.0),
            format!("LIGHT: {}", hud.lighting),
            format!("ZOOM: {}%", hud.zoom_percent),
            String::new(),
            format!("SUNS: {}", hud.sun_lights.len()),
            format!("HERE: {}", hud.zone_objects),
            format!("TOTAL: {}", ctl.world().len()),
        ];
        let mut y = 14;
        for line in &lines {
            self.draw_label(line, SCENE + 12, y, TEXT_SCALE, 0xFFEEEEEE);
            y += 8 * TEXT_SCALE;
        }

        // Swatch of what a pinch would build
        let spec = ctl.preview().spec;
        self.fill_rect(SCENE + 12, y + 8, 40, 40, spec.color.to_argb());
        self.draw_border(SCENE + 12, y + 8, 40, 40, 0xFFFFFFFF);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y+h).min(WIN_H) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            let dx = r as isize - dy;
            for &(sx, sy) in &[
                (cx as isize + dx, cy as isize + dy),
                (cx as isize - dx, cy as isize + dy),
                (cx as isize + dx, cy as isize - dy),
                (cx as isize - dx, cy as isize - dy),
            ] {
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// 3×5 bitmap font, each pixel drawn as a `scale`×`scale` block.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_maps_to_mirrored_fingertip() {
        assert_eq!(pointer_fingertip(0.0, 0.0), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(pointer_fingertip(320.0, 160.0), Some(Vec2::new(0.5, 0.25)));
        assert_eq!(pointer_fingertip(700.0, 10.0), None);
        assert_eq!(pointer_fingertip(-1.0, 10.0), None);
    }

    #[test]
    fn zone_origin_is_scene_centre() {
        let c = world_to_screen(Vec3::new(25.0, 3.0, 0.0), Vec3::new(25.0, 0.0, 0.0), 30.0);
        assert_eq!(c, Vec2::splat(SCENE as f32 / 2.0));
        let edge = world_to_screen(Vec3::new(15.0, 0.0, -15.0), Vec3::ZERO, 30.0);
        assert_eq!(edge, Vec2::new(SCENE as f32, 0.0));
    }

    #[test]
    fn every_mode_has_a_key() {
        for mode in Mode::ALL {
            assert!(KEY_COMMANDS.iter().any(|(_, c)| *c == Command::SwitchMode(mode)));
        }
    }

    #[test]
    fn floor_and_placement_grid_have_their_own_keys() {
        let key_for = |cmd: Command| KEY_COMMANDS.iter().find(|(_, c)| *c == cmd).map(|(k, _)| *k);
        assert_eq!(key_for(Command::ToggleFloorGrid), Some(Key::G));
        assert_eq!(key_for(Command::ToggleGridVisible), Some(Key::J));
    }

    #[test]
    fn legend_and_hud_text_have_glyphs() {
        let fallback = char_glyph('\u{1}');
        for ch in LEGEND.chars().chain("ZOOM: 65% LEVEL: 2 (4.0) ROTATE & ZOOM".chars()) {
            if ch != ' ' {
                assert_ne!(char_glyph(ch), fallback, "missing glyph {:?}", ch);
            }
        }
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }
}
