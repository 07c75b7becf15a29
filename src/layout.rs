//! Screen geometry
//!
//! Small screens get a narrower basket, slower falls and a longer spawn
//! interval. Everything viewport-dependent is resolved here once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Visible area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal centre, where the basket starts
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Convert a pixel position to a 0-1 fraction of the viewport
    pub fn normalize(&self, px: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(px.x / self.width, px.y / self.height)
    }
}

/// Per-viewport values derived from [`Tuning`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub viewport: Viewport,
    pub compact: bool,
    pub basket_width: f32,
    /// Pixels per second at speed 1.0
    pub fall_rate: f32,
    pub spawn_interval: f32,
    /// Catch band, open interval (top, bottom) in px
    pub catch_top: f32,
    pub catch_bottom: f32,
    /// Items at or below this y are dropped
    pub cull_y: f32,
}

impl Layout {
    pub fn new(tuning: &Tuning, viewport: Viewport) -> Self {
        let compact = viewport.width < tuning.compact_breakpoint;
        let pick = |compact_value: f32, wide_value: f32| {
            if compact { compact_value } else { wide_value }
        };
        let catch_top = viewport.height - tuning.catch_band_offset;

        Self {
            viewport,
            compact,
            basket_width: pick(tuning.basket_width_compact, tuning.basket_width_wide),
            fall_rate: pick(tuning.fall_rate_compact, tuning.fall_rate_wide),
            spawn_interval: pick(tuning.spawn_interval_compact, tuning.spawn_interval_wide),
            catch_top,
            catch_bottom: catch_top + tuning.catch_band_height,
            cull_y: viewport.height + tuning.cull_margin,
        }
    }

    /// Convert an item's percent-of-width x into pixels
    pub fn item_px_x(&self, x_percent: f32) -> f32 {
        x_percent * self.viewport.width / 100.0
    }
}
