//! Half-block pixel buffer: two vertical pixels per terminal cell, drawn
//! as `▀` with the top pixel in the foreground and the bottom one in the
//! background.

use crate::color::Rgb;
use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb(0, 0, 0); w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, Rgb(0, 0, 0));
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Mixes `c` over the current pixel with opacity `alpha`.
    pub fn blend(&mut self, x: i32, y: i32, c: Rgb, alpha: f64) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            let i = y as usize * self.w + x as usize;
            self.px[i] = Rgb::mix(self.px[i], c, alpha);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn blend_disc(&mut self, cx: i32, cy: i32, r: i32, c: Rgb, alpha: f64) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.blend(cx + dx, cy + dy, c, alpha);
                }
            }
        }
    }

    /// Halves every pixel's brightness.
    pub fn dim(&mut self) {
        for p in &mut self.px {
            *p = p.darken();
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg: Option<Rgb> = None;
        let mut prev_bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top != bot && prev_fg != Some(top) {
                    queue!(out, style::SetForegroundColor(term_color(top)))?;
                    prev_fg = Some(top);
                }
                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                    prev_bg = Some(bot);
                }
                let glyph = if top == bot { ' ' } else { '\u{2580}' }; // ▀
                queue!(out, style::Print(glyph))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, fg: Rgb, shadow: Rgb) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, shadow);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Centered on `cx`; 3px per digit plus 1px spacing.
pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb, shadow: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, ch) in s.bytes().enumerate() {
        draw_digit(buf, start_x + i as i32 * 4, y, ch - b'0', fg, shadow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_ignores_out_of_bounds() {
        let mut buf = PixelBuf::new(4, 4);
        buf.set(-1, 0, Rgb(9, 9, 9));
        buf.set(4, 0, Rgb(9, 9, 9));
        buf.set(1, 1, Rgb(9, 9, 9));
        assert_eq!(buf.get(1, 1), Rgb(9, 9, 9));
        assert_eq!(buf.get(0, 0), Rgb(0, 0, 0));
    }

    #[test]
    fn test_render_emits_half_blocks() {
        let mut buf = PixelBuf::new(2, 2);
        buf.set(0, 0, Rgb(255, 0, 0));
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('\u{2580}'));
        assert!(text.contains(' '));
    }

    #[test]
    fn test_number_draws_every_digit() {
        let mut buf = PixelBuf::new(20, 8);
        draw_number(&mut buf, 10, 1, 42, Rgb(255, 255, 255), Rgb(1, 1, 1));
        let lit = (0..8)
            .flat_map(|y| (0..20).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get(x, y) == Rgb(255, 255, 255))
            .count();
        // "4" has 9 lit cells, "2" has 11.
        assert_eq!(lit, 20);
    }
}
