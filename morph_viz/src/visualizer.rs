//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                                              │
//! │          particles, ornaments, star          │
//! │        (perspective, rotated by scene)       │
//! │                                              │
//! ├──────────────────────────────────────────────┤
//! │  status line                                 │
//! │  key legend                                  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every entity transform is rotated by the scene angle, projected through
//! a fixed perspective camera and splatted into a depth-tested framebuffer.

use std::sync::mpsc::Sender;

use glam::{Mat4, Vec3};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use morph_field::entity::blend;
use morph_field::Glyph;

use crate::app::AppState;
use crate::capture::{SimInput, SimPose};
use crate::error::AppError;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:  usize = 960;
pub const WIN_H:  usize = 720;
const HUD_H:      usize = 44;
const STATUS_Y:   usize = WIN_H - HUD_H + 8;
const LEGEND_Y:   usize = WIN_H - 16;
const BG_COLOR:   u32   = 0xFF05070D;
const HUD_BG:     u32   = 0xFF0F1A14;
const TEXT_COLOR: u32   = 0xFFEEEEEE;
const DIM_TEXT:   u32   = 0xFF888888;
const GOLD_TEXT:  u32   = 0xFFFFD700;

const CAMERA_Z:   f32 = 20.0;
const FOV_DEG:    f32 = 50.0;

// ════════════════════════════════════════════════════════════════════════════
// Camera
// ════════════════════════════════════════════════════════════════════════════

/// A world point in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x:           f32,
    pub y:           f32,
    /// Distance along the view axis.
    pub depth:       f32,
    /// Screen pixels covered by one world unit at this depth.
    pub px_per_unit: f32,
}

/// Fixed perspective camera on the +z axis looking at the origin.
#[derive(Clone, Debug)]
pub struct Camera {
    view_proj: Mat4,
    focal_px:  f32,
    width:     f32,
    height:    f32,
}

impl Camera {
    pub fn new(width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        let fov = FOV_DEG.to_radians();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(fov, w / h, 0.1, 200.0);
        Camera {
            view_proj: proj * view,
            focal_px:  (h / 2.0) / (fov / 2.0).tan(),
            width:     w,
            height:    h,
        }
    }

    /// `None` for points behind or too close to the camera.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let clip = self.view_proj * p.extend(1.0);
        if clip.w < 0.1 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Projected {
            x:           (ndc.x + 1.0) * 0.5 * self.width,
            y:           (1.0 - ndc.y) * 0.5 * self.height,
            depth:       clip.w,
            px_per_unit: self.focal_px / clip.w,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fog
// ════════════════════════════════════════════════════════════════════════════

/// Fade toward the background with distance.
fn fog(color: u32, depth: f32) -> u32 {
    let t = ((depth - CAMERA_Z + 5.0) / 40.0).clamp(0.0, 0.7);
    blend(color, BG_COLOR, t)
}

// ════════════════════════════════════════════════════════════════════════════
// UiCommand
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    None,
    Toggle,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:   Window,
    buf:      Vec<u32>,
    depth:    Vec<f32>,
    camera:   Camera,
    sim_tx:   Sender<SimInput>,

    // Last values forwarded to the simulator, so only changes are sent.
    sim_pose:    SimPose,
    sim_wrist_x: f32,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Morph Viz — gesture controlled particle morph",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf:    vec![BG_COLOR; WIN_W * WIN_H],
            depth:  vec![f32::INFINITY; WIN_W * WIN_H],
            camera: Camera::new(WIN_W, WIN_H - HUD_H),
            sim_tx,
            sim_pose:    SimPose::Relaxed,
            sim_wrist_x: 0.5,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse.  Hand keys go to the simulator; the
    /// returned command is for the app loop.
    pub fn poll_input(&mut self) -> UiCommand {
        if !self.window.is_open() { return UiCommand::Quit; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return UiCommand::Quit;
        }
        let toggle = one_shot(Key::Space);
        let presence = one_shot(Key::H);

        if presence {
            let _ = self.sim_tx.send(SimInput::TogglePresence);
        }

        let pose = if self.window.is_key_down(Key::F) {
            SimPose::Fist
        } else if self.window.is_key_down(Key::O) {
            SimPose::Open
        } else {
            SimPose::Relaxed
        };
        if pose != self.sim_pose {
            self.sim_pose = pose;
            let _ = self.sim_tx.send(SimInput::Pose(pose));
        }

        if let Some((mx, _)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let x = mx / WIN_W as f32;
            if (x - self.sim_wrist_x).abs() > 1e-3 {
                self.sim_wrist_x = x;
                let _ = self.sim_tx.send(SimInput::WristX(x));
            }
        }

        if toggle { UiCommand::Toggle } else { UiCommand::None }
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState) {
        self.buf.fill(BG_COLOR);
        self.depth.fill(f32::INFINITY);

        let scene = app.scene().matrix();
        for layer in app.layers() {
            let glyph = layer.population.glyph;
            let entities = &layer.population.entities;
            for (t, e) in layer.animator.transforms(entities).zip(entities) {
                let world = scene.transform_point3(t.position);
                let Some(p) = self.camera.project(world) else { continue };
                let color = fog(e.color, p.depth);
                let (cx, cy) = (p.x as isize, p.y as isize);
                match glyph {
                    Glyph::Point => {
                        let r = (t.scale * 0.05 * p.px_per_unit) as isize;
                        self.fill_square(cx, cy, r.min(2), p.depth, color);
                    }
                    Glyph::Square => {
                        // Spin shows up as a shading flicker on the faces.
                        let lit = 0.7 + 0.3 * t.rotation.y.cos().abs();
                        let r = (t.scale * 0.5 * p.px_per_unit) as isize;
                        self.fill_square(cx, cy, r.max(1), p.depth, blend(color, 0xFF000000, 1.0 - lit));
                    }
                    Glyph::Disc => {
                        let r = (t.scale * 0.5 * p.px_per_unit) as isize;
                        self.fill_disc(cx, cy, r.max(1), p.depth, color);
                        self.plot(cx - r / 3, cy - r / 3, p.depth - 0.01, blend(color, 0xFFFFFFFF, 0.6));
                    }
                    Glyph::Star => {
                        let r = (t.scale * 0.8 * p.px_per_unit) as isize;
                        self.fill_diamond(cx, cy, r.max(2), p.depth, color);
                    }
                }
            }
        }

        // ── HUD ───────────────────────────────────────────────────────────
        self.fill_rect(0, WIN_H - HUD_H, WIN_W, HUD_H, HUD_BG);
        self.draw_label(&app.status_line(), 10, STATUS_Y, 2, TEXT_COLOR);
        self.draw_label(
            "space=toggle  h=hand  hold f=fist  hold o=open  mouse=wrist  q=quit",
            10, LEGEND_Y, 1, DIM_TEXT,
        );
        self.draw_label(app.state().name(), WIN_W - 120, 12, 2, GOLD_TEXT);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    /// Depth-tested pixel write inside the scene area.
    fn plot(&mut self, x: isize, y: isize, depth: f32, color: u32) {
        if x < 0 || y < 0 { return; }
        let (x, y) = (x as usize, y as usize);
        if x >= WIN_W || y >= WIN_H - HUD_H { return; }
        let i = y * WIN_W + x;
        if depth < self.depth[i] {
            self.depth[i] = depth;
            self.buf[i] = color;
        }
    }

    fn fill_square(&mut self, cx: isize, cy: isize, r: isize, depth: f32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                self.plot(cx + dx, cy + dy, depth, color);
            }
        }
    }

    fn fill_disc(&mut self, cx: isize, cy: isize, r: isize, depth: f32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.plot(cx + dx, cy + dy, depth, color);
                }
            }
        }
    }

    fn fill_diamond(&mut self, cx: isize, cy: isize, r: isize, depth: f32, color: u32) {
        for dy in -r..=r {
            let w = r - dy.abs();
            for dx in -w..=w {
                self.plot(cx + dx, cy + dy, depth, color);
            }
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Minimal bitmap font: 3×5 glyphs drawn at `scale`× size.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) == 0 { continue; }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.set_pixel(cx + col * scale + sx, y + row * scale + sy, color);
                        }
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
    match c.to_ascii_lowercase() {
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
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_centre() {
        let cam = Camera::new(800, 600);
        let p = cam.project(Vec3::ZERO).unwrap();
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 300.0).abs() < 1e-3);
        assert!((p.depth - CAMERA_Z).abs() < 1e-3);
    }

    #[test]
    fn unit_offset_matches_pixel_scale() {
        let cam = Camera::new(800, 600);
        let centre = cam.project(Vec3::ZERO).unwrap();
        let right = cam.project(Vec3::X).unwrap();
        assert!((right.x - centre.x - centre.px_per_unit).abs() < 1e-2);
        // Screen y grows downward.
        assert!(cam.project(Vec3::Y).unwrap().y < centre.y);
    }

    #[test]
    fn nearer_points_are_larger() {
        let cam = Camera::new(800, 600);
        let near = cam.project(Vec3::new(0.0, 0.0, 10.0)).unwrap();
        let far = cam.project(Vec3::new(0.0, 0.0, -10.0)).unwrap();
        assert!(near.px_per_unit > far.px_per_unit);
        assert!(near.depth < far.depth);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let cam = Camera::new(800, 600);
        assert_eq!(cam.project(Vec3::new(0.0, 0.0, 30.0)), None);
    }

    #[test]
    fn assembled_cone_fits_in_view() {
        let cam = Camera::new(WIN_W, WIN_H - HUD_H);
        for y in [-6.0f32, 6.8] {
            let p = cam.project(Vec3::new(0.0, y, 0.0)).unwrap();
            assert!(p.y > 0.0 && p.y < (WIN_H - HUD_H) as f32);
        }
    }

    #[test]
    fn fog_darkens_distant_colours() {
        let near = fog(0xFFFFFFFF, CAMERA_Z - 10.0);
        let far = fog(0xFFFFFFFF, CAMERA_Z + 30.0);
        assert_eq!(near, 0xFFFFFFFF);
        assert!((far & 0xFF) < 0x80);
    }

    #[test]
    fn label_font_ignores_case() {
        assert_eq!(char_glyph('Q'), char_glyph('q'));
    }
}
