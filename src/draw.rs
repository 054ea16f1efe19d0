// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window showing the paper over the hidden layer.
// 2) The paper itself, with torn pixels letting the layer underneath through.
// 3) A crosshair that follows your mouse.
// 4) A tiny 5x7 bitmap font for the HUD.

use crate::gamma::LinearBlend;
use image::RgbImage;
use image::imageops::{self, FilterType};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use paper_tear::{Point, RandomSource, RasterSurface, TearError, TearResult, XorShift32};

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Stretch an RGB image to fill the buffer.
    pub fn from_rgb_image(img: &RgbImage, width: usize, height: usize) -> Self {
        let scaled = imageops::resize(img, width as u32, height as u32, FilterType::Triangle);
        let pixels = scaled
            .pixels()
            .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
            .collect();
        Self { width, height, pixels }
    }

    /// Diagonal two-tone gradient used when no reveal image was given.
    /// Visual: a warm sunset hiding under the paper.
    pub fn gradient(width: usize, height: usize) -> Self {
        let mut fb = Self::new(width, height);
        let span = (width + height).max(1) as f32;
        for y in 0..height {
            for x in 0..width {
                let t = (x + y) as f32 / span;
                let r = (255.0 * (1.0 - 0.3 * t)) as u32;
                let g = (120.0 + 60.0 * t) as u32;
                let b = (80.0 + 150.0 * t) as u32;
                fb.pixels[y * width + x] = (r << 16) | (g << 8) | b;
            }
        }
        fb
    }

    /// Off-white paper with faint grain.
    pub fn paper(width: usize, height: usize) -> Self {
        let mut rng = XorShift32::from_seed(0x9A9E5);
        let mut fb = Self::new(width, height);
        for px in &mut fb.pixels {
            let grain = rng.range(-6.0, 6.0) as i32;
            let [r, g, b] = [244, 239, 228].map(|c: i32| (c + grain).clamp(0, 255) as u32);
            *px = (r << 16) | (g << 8) | b;
        }
        fb
    }
}

pub struct Drawer {
    window: Window,
}

impl Drawer {
    /// Create a resizable window. Visual: an empty window with the given title appears.
    pub fn new(title: &str, width: usize, height: usize) -> TearResult<Self> {
        let opts = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, opts)
            .map_err(|e| TearError::window(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> TearResult<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| TearError::window(e.to_string()))
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current inner size; changes when the user drags the window border.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Mouse position in window pixels, unclamped: positions past the edge are
    /// passed through so the engine can end the tear there.
    pub fn mouse_pos(&self) -> Option<Point> {
        self.window
            .get_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| Point::new(x as f64, y as f64))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Visual: when pressed, the paper is whole again.
    pub fn r_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::R, KeyRepeat::No)
    }

    /// Visual: when pressed, a spiral tear unwinds from the center.
    pub fn a_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::A, KeyRepeat::No)
    }
}

/* ---------- Layer compositing ---------- */

/// Paper over the hidden layer, weighted by the surface alpha and the overall
/// cover opacity. Visual: torn pixels show `under`, intact ones show `paper`.
pub fn compose_paper(
    screen: &mut FrameBuffer,
    under: &FrameBuffer,
    paper: &FrameBuffer,
    surface: &RasterSurface,
    cover_opacity: f32,
    blend: &LinearBlend,
) {
    let alpha = surface.alpha();
    let len = screen.pixels.len().min(under.pixels.len()).min(paper.pixels.len()).min(alpha.len());
    for i in 0..len {
        let a = alpha[i] as f32 / 255.0 * cover_opacity;
        screen.pixels[i] = blend.mix(under.pixels[i], paper.pixels[i], a);
    }
}

/* ---------- Software drawing: pixels, crosshair, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// Thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Small crosshair centered at (cx,cy) with a gap in the middle.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (just what the HUD prints) ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),

        _ => None,
    }
}

/// One 5x7 character at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch) else {
        return;
    };
    for (offset, c) in [(1, 0x00_00_00_00), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + offset, y + ry as i32 + offset, c);
                }
            }
        }
    }
}

/// Text string in 5x7 glyphs with 1-pixel spacing. Unknown characters leave a gap.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intact_paper_hides_the_layer_and_torn_paper_shows_it() {
        let blend = LinearBlend::new();
        let under = FrameBuffer { width: 4, height: 1, pixels: vec![0x00_10_20_30; 4] };
        let paper = FrameBuffer { width: 4, height: 1, pixels: vec![0x00_F0_F0_F0; 4] };
        let mut surface = RasterSurface::new(4, 1);
        surface.erase_stroke(Point::new(0.0, 0.5), Point::new(1.0, 0.5), 1.0);
        let mut screen = FrameBuffer::new(4, 1);

        compose_paper(&mut screen, &under, &paper, &surface, 1.0, &blend);
        assert_eq!(screen.pixels[0], 0x00_10_20_30);
        assert_eq!(screen.pixels[3], 0x00_F0_F0_F0);

        compose_paper(&mut screen, &under, &paper, &surface, 0.0, &blend);
        assert!(screen.pixels.iter().all(|&p| p == 0x00_10_20_30));
    }

    #[test]
    fn image_is_stretched_to_buffer() {
        let img = RgbImage::from_pixel(2, 2, image::Rgb([255, 0, 0]));
        let fb = FrameBuffer::from_rgb_image(&img, 6, 3);
        assert_eq!(fb.pixels.len(), 18);
        for &p in &fb.pixels {
            assert!((p >> 16) & 0xFF >= 250, "{p:06x}");
            assert!((p >> 8) & 0xFF <= 5 && p & 0xFF <= 5, "{p:06x}");
        }
    }

    #[test]
    fn drawing_off_screen_is_safe() {
        let mut fb = FrameBuffer::new(10, 10);
        draw_crosshair(&mut fb, -5, 20, 12, 0x00_FF_CC_33);
        draw_text_5x7(&mut fb, 8, 8, "COVERED 12.5% | FPS: 60.0", 0x00_FF_FF_FF);
        draw_crosshair(&mut fb, 5, 5, 3, 0x00_FF_CC_33);
        assert_eq!(fb.pixels[5 * 10 + 5], 0x00_FF_CC_33);
    }

    #[test]
    fn hud_glyphs_cover_status_words() {
        for ch in "COVERED REVEALED AUTO TEAR RESET FPS: 0123456789.%|".chars() {
            assert!(glyph5x7(ch).is_some(), "missing glyph {ch:?}");
        }
    }
}
