//! Draws a [`Round`] into a [`PixelBuf`].
//!
//! World coordinates (800x600) are scaled to the terminal's pixel grid by a
//! [`Viewport`]; sprite detail (bird, pipe caps, hills) scales with the
//! pixel height. Everything outdoors is shaded by the current sky tint, so
//! pipes, hills and the bird darken together as night falls.

use crate::color::Rgb;
use crate::config::Tuning;
use crate::day_night::{self, SkyTint};
use crate::effects::BurstKind;
use crate::particles::Particles;
use crate::pixels::{PixelBuf, draw_number};
use crate::round::{Round, RoundState};
use crate::scenery::{Flyer, Scenery};

// ── Colors ──────────────────────────────────────────────────────────────────

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const CAP_RIM: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const SUN: Rgb = Rgb(255, 221, 87);
const MOON: Rgb = Rgb(226, 230, 240);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const CLOUD: Rgb = Rgb(250, 250, 255);
const FLYER: Rgb = Rgb(45, 45, 60);

/// Pipe cross-section from the left rim to the right rim.
const PIPE_STOPS: [(f64, Rgb); 5] = [
    (0.0, Rgb(74, 122, 26)),
    (0.25, Rgb(100, 170, 40)),
    (0.39, Rgb(145, 215, 62)),
    (0.62, Rgb(115, 191, 46)),
    (1.0, Rgb(74, 122, 26)),
];

/// How strongly the sky tint carries onto foreground objects.
const FOREGROUND_TINT: f64 = 0.6;

/// World-to-pixel mapping for one terminal size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pw: usize,
    pub ph: usize,
    sx: f64,
    sy: f64,
    /// Sprite scale, 1.0 at 48 pixel rows.
    pub scale: f64,
}

impl Viewport {
    pub fn new(pw: usize, ph: usize, t: &Tuning) -> Self {
        Self {
            pw,
            ph,
            sx: pw as f64 / t.world_width,
            sy: ph as f64 / t.world_height,
            scale: ph as f64 / 48.0,
        }
    }

    pub fn x(&self, wx: f64) -> i32 {
        (wx * self.sx).floor() as i32
    }

    pub fn y(&self, wy: f64) -> i32 {
        (wy * self.sy).floor() as i32
    }

    /// Horizontal length, at least one pixel.
    pub fn w(&self, ww: f64) -> i32 {
        ((ww * self.sx).round() as i32).max(1)
    }
}

pub fn draw(buf: &mut PixelBuf, view: &Viewport, round: &Round, particles: &Particles, scenery: &Scenery) {
    let t = round.tuning();
    let phase = round.day_night().phase();
    let tint = round.day_night().sky_tint();
    let sky_h = view.y(t.grass_top).clamp(0, view.ph as i32);

    draw_sky(buf, view, sky_h, tint);
    draw_stars(buf, view, particles, day_night::night_depth(phase));
    draw_celestial(buf, view, phase);
    draw_clouds(buf, view, scenery, tint);
    draw_hills(buf, view, sky_h, scenery.scroll, tint);
    for flyer in &scenery.flyers {
        draw_flyer(buf, view, flyer, scenery, tint);
    }
    draw_pipes(buf, view, round, tint);
    draw_ground(buf, view, sky_h, scenery.scroll);
    draw_particles(buf, view, particles);
    if round.state() != RoundState::Over {
        draw_bird(buf, view, round, scenery.frame, tint);
    }

    match round.state() {
        RoundState::Idle => draw_title(buf, view),
        RoundState::Running => draw_score(buf, view, round.score()),
        RoundState::Paused => {
            draw_score(buf, view, round.score());
            draw_paused(buf, view);
        }
        RoundState::Over => draw_game_over(buf, view, round.score(), round.best()),
    }
}

fn draw_sky(buf: &mut PixelBuf, view: &Viewport, sky_h: i32, tint: SkyTint) {
    for y in 0..sky_h {
        let t = (y as u32 * 256 / sky_h.max(1) as u32) as u16;
        let c = Rgb::mix(Rgb::lerp(SKY_TOP, SKY_BOT, t), tint.color, tint.alpha);
        for x in 0..view.pw as i32 {
            buf.set(x, y, c);
        }
    }
}

fn draw_stars(buf: &mut PixelBuf, view: &Viewport, particles: &Particles, depth: f64) {
    if depth <= 0.0 {
        return;
    }
    for p in particles.iter().filter(|p| p.kind == BurstKind::Star) {
        buf.blend(view.x(p.x), view.y(p.y), p.color, p.opacity() * depth);
    }
}

fn draw_celestial(buf: &mut PixelBuf, view: &Viewport, phase: f64) {
    let c = day_night::celestial(phase);
    let cx = view.x(c.x);
    let cy = view.y(c.y);
    let r = (2.5 * view.scale * c.scale).max(1.0) as i32;
    if c.sun_alpha > 0.0 {
        buf.blend_disc(cx, cy, r, SUN, c.sun_alpha);
    }
    if c.moon_alpha > 0.0 {
        buf.blend_disc(cx, cy, (r * 4 / 5).max(1), MOON, c.moon_alpha);
    }
}

/// Foreground color under the current sky.
fn lit(c: Rgb, tint: SkyTint) -> Rgb {
    Rgb::mix(c, tint.color, tint.alpha * FOREGROUND_TINT)
}

/// Piecewise-linear color ramp; `u` in 0..=1.
fn gradient(stops: &[(f64, Rgb)], u: f64) -> Rgb {
    let u = u.clamp(0.0, 1.0);
    for pair in stops.windows(2) {
        let ((u0, c0), (u1, c1)) = (pair[0], pair[1]);
        if u <= u1 {
            return Rgb::mix(c0, c1, (u - u0) / (u1 - u0));
        }
    }
    stops.last().map_or(WHITE, |&(_, c)| c)
}

fn draw_clouds(buf: &mut PixelBuf, view: &Viewport, scenery: &Scenery, tint: SkyTint) {
    let color = Rgb::mix(CLOUD, tint.color, tint.alpha);
    for cloud in &scenery.clouds {
        let w = cloud.width();
        let r = view.w(w * 0.22);
        let puffs = [(-0.25, 0.0), (0.0, -0.12), (0.25, 0.0)];
        for (dx, dy) in puffs {
            let cx = view.x(cloud.x + dx * w);
            let cy = view.y(cloud.y + dy * w);
            buf.blend_disc(cx, cy, r, color, 0.7);
        }
    }
}

fn draw_flyer(buf: &mut PixelBuf, view: &Viewport, flyer: &Flyer, scenery: &Scenery, tint: SkyTint) {
    let color = lit(FLYER, tint);
    let cx = view.x(flyer.x);
    let cy = view.y(flyer.y(scenery.time_ms));
    let span = (view.w(flyer.width()) / 2).max(1);
    // Wing tips up on frame 0, down on frame 1.
    let tip = if scenery.wing_frame() == 0 { -1 } else { 1 };
    buf.blend(cx, cy, color, flyer.alpha);
    for i in 1..=span {
        let dy = if i * 2 > span { tip } else { 0 };
        buf.blend(cx - i, cy + dy, color, flyer.alpha);
        buf.blend(cx + i, cy + dy, color, flyer.alpha);
    }
}

fn draw_hills(buf: &mut PixelBuf, view: &Viewport, base: i32, scroll: f64, tint: SkyTint) {
    let s = view.scale;
    let gx = scroll * view.pw as f64 / 800.0;
    let far = Rgb::mix(HILL_FAR, tint.color, tint.alpha);
    let near = Rgb::mix(HILL_NEAR, tint.color, tint.alpha);
    let layers = [
        (far, 0.02, 0.04, 1.7, 6.0, 3.0, 4.0),
        (near, 0.04, 0.06, 2.3, 4.0, 2.0, 2.0),
    ];
    for (color, parallax, freq, harmonic, amp, amp2, lift) in layers {
        for x in 0..view.pw as i32 {
            let fx = (x as f64 + gx * parallax) * freq;
            let h = (fx.sin() * amp + (fx * harmonic).sin() * amp2) * s;
            let top = base - h as i32 - (lift * s) as i32;
            for y in top..base {
                buf.set(x, y, color);
            }
        }
    }
}

fn draw_pipes(buf: &mut PixelBuf, view: &Viewport, round: &Round, tint: SkyTint) {
    let t = round.tuning();
    let lip = view.scale.max(1.0) as i32;
    let cap_h = (2.0 * view.scale).max(2.0) as i32;
    let pw = view.w(t.pipe_width);
    let floor = view.y(t.ground_line);
    let rim = lit(CAP_RIM, tint);

    // One shaded column per pixel, shared by every pair this frame.
    let body: Vec<Rgb> = (0..pw)
        .map(|x| lit(gradient(&PIPE_STOPS, x as f64 / (pw - 1).max(1) as f64), tint))
        .collect();
    let cap_w = pw + lip * 2;
    let cap: Vec<Rgb> = (0..cap_w)
        .map(|x| lit(gradient(&PIPE_STOPS, x as f64 / (cap_w - 1).max(1) as f64), tint))
        .collect();

    for pipe in round.obstacles() {
        let left = view.x(pipe.x - t.pipe_width / 2.0);
        let gap_top = view.y(pipe.gap_top());
        let gap_bot = view.y(pipe.gap_bottom());
        let upper = 0..gap_top - cap_h;
        let lower = (gap_bot + cap_h)..floor;

        for (x, &c) in body.iter().enumerate() {
            let x = left + x as i32;
            for y in upper.clone().chain(lower.clone()) {
                buf.set(x, y, c);
            }
        }

        for (x, &c) in cap.iter().enumerate() {
            let x = left - lip + x as i32;
            buf.fill_rect(x, gap_top - cap_h, 1, cap_h, c);
            buf.fill_rect(x, gap_bot, 1, cap_h, c);
            for y in [gap_top - cap_h, gap_top - 1, gap_bot, gap_bot + cap_h - 1] {
                buf.set(x, y, rim);
            }
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, view: &Viewport, gy: i32, scroll: f64) {
    let gx = scroll * view.pw as f64 / 800.0;
    let w = view.pw as i32;
    for x in 0..w {
        let alt = ((x as f64 + gx) as i32 / 3) % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        buf.set(x, gy + 1, GRASS);
    }
    for y in (gy + 2)..view.ph as i32 {
        for x in 0..w {
            let stripe = ((x as f64 + gx * 0.8) as i32 + (y - gy) * 2) % 12 < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn draw_particles(buf: &mut PixelBuf, view: &Viewport, particles: &Particles) {
    for p in particles.iter().filter(|p| p.kind != BurstKind::Star) {
        buf.blend(view.x(p.x), view.y(p.y), p.color, p.opacity());
    }
}

fn draw_bird(buf: &mut PixelBuf, view: &Viewport, round: &Round, frame: u64, tint: SkyTint) {
    let bird = round.bird();
    let s = view.scale;
    let px = |v: f64, min: f64| (v * s).max(min) as i32;

    let bob = match round.state() {
        RoundState::Idle => ((frame as f64 * 0.08).sin() * 3.0 * s) as i32,
        _ => 0,
    };
    let cx = view.x(bird.x);
    let cy = view.y(bird.y) + bob;
    // Nose up or down by one pixel at the tilt limits.
    let tilt = (bird.tilt() / 20.0).round() as i32;
    let flap = if frame % 8 < 4 { -1 } else { 1 };

    let (bw, bh) = (px(3.0, 2.0), px(2.0, 2.0));
    let eye = px(0.8, 1.0);
    let (beak_w, beak_h) = (px(2.5, 2.0), px(1.5, 1.0));
    let tail = px(1.5, 1.0);
    let ex = cx + bw - (1.5 * s) as i32;
    let ey = cy - bh + px(1.0, 1.0);
    let beak_y = cy - (0.5 * s) as i32 + tilt;

    // (x, y, w, h, color), back to front.
    let parts = [
        (cx - bw, cy - bh, bw * 2 + 1, bh * 2, BIRD_Y),
        (cx - bw + 1, cy - bh, bw * 2 - 2, px(0.8, 1.0), BIRD_HI),
        (cx - bw + 1, cy + flap + tilt, px(2.0, 1.0), px(1.5, 1.0), BIRD_WING),
        (ex, ey, eye + 1, eye + 1, BIRD_EYE),
        (ex + eye, ey + eye, 1, 1, BIRD_PUPIL),
        (cx + bw, beak_y, beak_w, beak_h / 2 + 1, BIRD_BEAK_HI),
        (cx + bw, beak_y + beak_h / 2 + 1, beak_w, beak_h / 2, BIRD_BEAK),
        (cx - bw - tail, cy - 1 - tilt, tail, 2, BIRD_WING),
    ];
    for (x, y, w, h, c) in parts {
        buf.fill_rect(x, y, w, h, lit(c, tint));
    }
}

fn draw_score(buf: &mut PixelBuf, view: &Viewport, score: u32) {
    draw_number(buf, view.pw as i32 / 2, 4, score, WHITE, SHADOW);
}

fn draw_title(buf: &mut PixelBuf, view: &Viewport) {
    let s = view.scale;
    let cx = view.pw as i32 / 2;
    let cy = view.ph as i32 / 4;
    let text = "FLAPPY";
    let char_w = (4.0 * s) as i32;
    let char_h = (6.0 * s) as i32;
    let sx = cx - text.len() as i32 * char_w / 2;

    for i in 0..text.len() as i32 {
        let bx = sx + i * char_w;
        buf.fill_rect(bx, cy, char_w - 1, char_h, BIRD_Y);
        buf.fill_rect(bx, cy, char_w - 1, 1, BIRD_HI);
    }

    // "SPACE TO FLAP" as a row of blocks
    let sub_y = cy + char_h + 4;
    let msg = "SPACE TO FLAP";
    let msg_x = cx - msg.len() as i32 * 2;
    for (i, ch) in msg.chars().enumerate() {
        if ch != ' ' {
            buf.fill_rect(msg_x + i as i32 * 4, sub_y, 3, 3, WHITE);
        }
    }
}

fn draw_paused(buf: &mut PixelBuf, view: &Viewport) {
    buf.dim();
    let s = view.scale;
    let cx = view.pw as i32 / 2;
    let cy = view.ph as i32 / 2;
    let bar_w = (2.0 * s).max(2.0) as i32;
    let bar_h = (8.0 * s).max(6.0) as i32;
    buf.fill_rect(cx - bar_w * 2, cy - bar_h / 2, bar_w, bar_h, WHITE);
    buf.fill_rect(cx + bar_w, cy - bar_h / 2, bar_w, bar_h, WHITE);
}

fn draw_game_over(buf: &mut PixelBuf, view: &Viewport, score: u32, best: u32) {
    let s = view.scale;
    let cx = view.pw as i32 / 2;
    let cy = view.ph as i32 / 2;
    let panel_w = (40.0 * s).max(30.0) as i32;
    let panel_h = (20.0 * s).max(16.0) as i32;

    buf.dim();

    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, DIRT);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, Rgb(220, 195, 120));

    draw_number(buf, cx, py + 4, score, WHITE, SHADOW);
    draw_number(buf, cx, py + 12, best, BIRD_Y, SHADOW);
}
