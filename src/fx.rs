// FX: paper fragments and reveal sparkles, software-drawn with additive blending.
// Visual outcomes:
// - Small paper crumbs fall off the pointer while you tear.
// - When the paper gives way, a burst of white flecks drifts down over the
//   whole surface and the remaining paper fades out.

use crate::draw::FrameBuffer;
use paper_tear::{PresentationSink, RandomSource, XorShift32};

const REVEAL_PARTICLES: usize = 20;
const REVEAL_LIFE: f32 = 2.0; // seconds
const COVER_FADE: f32 = 0.6; // seconds for the leftover paper to vanish

// ----------------------------- additive drawing helpers --------------------------------

/// Additive blend one RGB triplet at (x,y) with saturation to 255.
#[inline]
fn add_rgb_saturating(fb: &mut FrameBuffer, x: i32, y: i32, rgb: [u8; 3]) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }

    let idx = y * fb.width + x;
    let old = fb.pixels[idx];
    let mut out = 0u32;
    for (c, shift) in rgb.iter().zip([16u32, 8, 0]) {
        let o = (old >> shift) & 0xFF;
        out |= (o + *c as u32).min(255) << shift;
    }
    fb.pixels[idx] = out;
}

/// Soft round glow disc centered at (cx,cy); `strength` in [0,1] scales brightness.
/// Visual: a fuzzy dot. Nearby pixels brighten more than far pixels.
fn draw_additive_disc(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, rgb: [u8; 3], strength: f32) {
    if radius <= 0 {
        return;
    }
    let r2 = (radius * radius) as f32;
    let sigma = radius as f32 * 0.5;
    let denom = 2.0 * sigma * sigma;

    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let d2 = dx * dx + dy * dy;
            if d2 > r2 {
                continue;
            }
            let w = (-d2 / denom).exp() * strength;
            let scaled = rgb.map(|c| (c as f32 * w).round().clamp(0.0, 255.0) as u8);
            add_rgb_saturating(fb, x, y, scaled);
        }
    }
}

// ----------------------------- particles ------------------------------------

/// One fleck. Visual: small glowing dot that falls a bit and fades out.
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32, // px/sec
    pub vy: f32,
    pub life: f32, // remaining seconds
    pub max_life: f32,
    pub size: f32, // radius at full life
    pub rgb: [u8; 3],
}

impl Particle {
    #[inline]
    fn alive(&self) -> bool {
        self.life > 0.0
    }
}

pub struct Fx {
    rng: XorShift32,
    particles: Vec<Particle>,
    max_particles: usize,
    width: f32,
    height: f32,
    fade: Option<f32>, // seconds since reveal
}

impl Fx {
    pub fn new(max_particles: usize, width: usize, height: usize) -> Self {
        Self {
            rng: XorShift32::from_seed(0xC0FFEE),
            particles: Vec::with_capacity(max_particles),
            max_particles,
            width: width as f32,
            height: height as f32,
            fade: None,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width as f32;
        self.height = height as f32;
    }

    /// Drop every particle and bring the paper back to full opacity.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.fade = None;
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// How much of the paper layer is still drawn: 1 until the reveal, then down to 0.
    pub fn cover_opacity(&self) -> f32 {
        match self.fade {
            None => 1.0,
            Some(t) => (1.0 - t / COVER_FADE).clamp(0.0, 1.0),
        }
    }

    fn push(&mut self, p: Particle) -> bool {
        if self.particles.len() >= self.max_particles {
            return false;
        }
        self.particles.push(p);
        true
    }

    /// Paper crumbs at the pointer.
    /// Visual: a few off-white bits tumble away from where you are tearing.
    pub fn spawn_fragments(&mut self, x: f32, y: f32, count: usize) {
        for _ in 0..count {
            let speed = self.rng.range(20.0, 70.0) as f32;
            let angle = self.rng.range(0.0, std::f64::consts::TAU) as f32;
            let max_life = self.rng.range(0.35, 0.75) as f32;
            let p = Particle {
                x,
                y,
                vx: speed * angle.cos(),
                vy: speed * angle.sin() - 15.0, // small upward kick
                life: max_life,
                max_life,
                size: self.rng.range(2.0, 4.0) as f32,
                rgb: [120, 110, 90],
            };
            if !self.push(p) {
                break;
            }
        }
    }

    /// White flecks scattered over the whole surface, falling ~200 px over their life.
    pub fn spawn_reveal_burst(&mut self, count: usize) {
        for _ in 0..count {
            let p = Particle {
                x: self.rng.range(0.0, self.width as f64) as f32,
                y: self.rng.range(0.0, self.height as f64) as f32,
                vx: self.rng.range(-10.0, 10.0) as f32,
                vy: 200.0 / REVEAL_LIFE,
                life: REVEAL_LIFE,
                max_life: REVEAL_LIFE,
                size: 3.0,
                rgb: [255, 255, 255],
            };
            if !self.push(p) {
                break;
            }
        }
    }

    /// Step simulation and render all FX on top of `fb` (additive).
    /// Visual: crumbs drift and fade, flecks fall, leftover paper thins out.
    pub fn update_and_render(&mut self, fb: &mut FrameBuffer, dt: f32) {
        if let Some(t) = &mut self.fade {
            *t += dt;
        }

        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];

            // Simple Euler with a little drag and gravity
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.vx *= 0.98;
            p.vy += 10.0 * dt;
            p.life -= dt;

            if p.alive() {
                let life01 = (p.life / p.max_life).clamp(0.0, 1.0);
                let radius = (p.size * life01 + 1.0) as i32;
                draw_additive_disc(fb, p.x as i32, p.y as i32, radius, p.rgb, 0.9 * life01);
                i += 1;
            } else {
                self.particles.swap_remove(i);
            }
        }
    }
}

impl PresentationSink for Fx {
    fn on_revealed(&mut self) {
        self.spawn_reveal_burst(REVEAL_PARTICLES);
        self.fade = Some(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_spawns_burst_and_starts_fade() {
        let mut fx = Fx::new(100, 64, 48);
        assert_eq!(fx.cover_opacity(), 1.0);
        fx.on_revealed();
        assert_eq!(fx.particle_count(), REVEAL_PARTICLES);
        let mut fb = FrameBuffer::new(64, 48);
        fx.update_and_render(&mut fb, 0.3);
        assert!(fx.cover_opacity() < 1.0 && fx.cover_opacity() > 0.0);
        fx.update_and_render(&mut fb, 0.5);
        assert_eq!(fx.cover_opacity(), 0.0);
    }

    #[test]
    fn particles_expire() {
        let mut fx = Fx::new(100, 64, 48);
        fx.spawn_fragments(10.0, 10.0, 8);
        assert_eq!(fx.particle_count(), 8);
        let mut fb = FrameBuffer::new(64, 48);
        for _ in 0..30 {
            fx.update_and_render(&mut fb, 0.1);
        }
        assert_eq!(fx.particle_count(), 0);
    }

    #[test]
    fn capacity_is_respected() {
        let mut fx = Fx::new(5, 64, 48);
        fx.spawn_fragments(1.0, 1.0, 50);
        fx.spawn_reveal_burst(50);
        assert_eq!(fx.particle_count(), 5);
    }

    #[test]
    fn clear_restores_cover() {
        let mut fx = Fx::new(50, 64, 48);
        fx.on_revealed();
        fx.clear();
        assert_eq!(fx.particle_count(), 0);
        assert_eq!(fx.cover_opacity(), 1.0);
    }

    #[test]
    fn glow_brightens_and_clips_at_edges() {
        let mut fb = FrameBuffer::new(8, 8);
        draw_additive_disc(&mut fb, 0, 0, 3, [255, 255, 255], 1.0);
        assert_ne!(fb.pixels[0], 0);
        assert_eq!(fb.pixels[7 * 8 + 7], 0);
    }
}
