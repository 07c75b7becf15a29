//! Confetti particles
//!
//! Turns `Burst` requests into short-lived particles. Purely visual, never
//! feeds back into the simulation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::layout::Viewport;
use crate::sim::Burst;

/// Maximum live particles
pub const MAX_PARTICLES: usize = 600;

/// Palette for bursts that don't bring their own colors
pub const DEFAULT_PALETTE: [u32; 6] = [0x26ccff, 0xa25afd, 0xff5e7e, 0x88ff5a, 0xfcff42, 0xffa62d];

const GRAVITY: f32 = 900.0;
const DRAG: f32 = 0.98;
const MIN_LAUNCH_SPEED: f32 = 250.0;
const MAX_LAUNCH_SPEED: f32 = 650.0;

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Parse `#rrggbb` (leading `#` optional)
pub fn parse_hex_color(s: &str) -> Option<u32> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Live confetti
#[derive(Debug, Clone)]
pub struct Confetti {
    pub particles: Vec<Particle>,
    rng: Pcg32,
}

impl Confetti {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Launch a burst. Particles beyond the cap are dropped.
    pub fn emit(&mut self, burst: &Burst, viewport: Viewport) {
        let origin = Vec2::new(burst.origin.x * viewport.width, burst.origin.y * viewport.height);
        let colors: Vec<u32> = burst.colors.iter().filter_map(|c| parse_hex_color(c)).collect();
        let palette: &[u32] = if colors.is_empty() { &DEFAULT_PALETTE } else { &colors };

        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        let count = (burst.particle_count as usize).min(room);
        let half_spread = burst.spread.to_radians() / 2.0;

        for _ in 0..count {
            // Straight up is -y in screen space
            let angle = -std::f32::consts::FRAC_PI_2 + self.rng.random_range(-half_spread..=half_spread);
            let speed = self.rng.random_range(MIN_LAUNCH_SPEED..MAX_LAUNCH_SPEED);
            let color = palette[self.rng.random_range(0..palette.len())];
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                size: self.rng.random_range(4.0..9.0),
            });
        }
    }

    /// Advance all particles and drop the dead ones
    pub fn update(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.vel.y += GRAVITY * dt;
            particle.vel *= DRAG;
            particle.life -= dt * 0.6; // ~1.7 second lifetime
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
