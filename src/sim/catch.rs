//! Catch detection
//!
//! The basket catches anything whose position lands strictly inside a
//! rectangle: the basket's width around `basket_x`, and a fixed band near
//! the bottom of the screen.

use glam::Vec2;

use crate::layout::Layout;

/// Axis-aligned catch rectangle in screen px (open on all sides)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchZone {
    pub min: Vec2,
    pub max: Vec2,
}

impl CatchZone {
    /// Catch zone for a basket centred on `basket_x`
    pub fn for_basket(layout: &Layout, basket_x: f32) -> Self {
        let half = layout.basket_width / 2.0;
        Self {
            min: Vec2::new(basket_x - half, layout.catch_top),
            max: Vec2::new(basket_x + half, layout.catch_bottom),
        }
    }

    /// Strict containment, edges don't count
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpgt(self.min).all() && point.cmplt(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Viewport;
    use crate::tuning::Tuning;

    fn zone() -> CatchZone {
        let layout = Layout::new(&Tuning::default(), Viewport::new(1000.0, 800.0));
        CatchZone::for_basket(&layout, 500.0)
    }

    #[test]
    fn test_zone_geometry() {
        let zone = zone();
        assert_eq!(zone.min, Vec2::new(425.0, 700.0));
        assert_eq!(zone.max, Vec2::new(575.0, 760.0));
    }

    #[test]
    fn test_inside() {
        assert!(zone().contains(Vec2::new(500.0, 730.0)));
    }

    #[test]
    fn test_edges_are_open() {
        let zone = zone();
        assert!(!zone.contains(Vec2::new(425.0, 730.0)));
        assert!(!zone.contains(Vec2::new(575.0, 730.0)));
        assert!(!zone.contains(Vec2::new(500.0, 700.0)));
        assert!(!zone.contains(Vec2::new(500.0, 760.0)));
    }

    #[test]
    fn test_outside() {
        let zone = zone();
        assert!(!zone.contains(Vec2::new(300.0, 730.0)));
        assert!(!zone.contains(Vec2::new(500.0, 650.0)));
        assert!(!zone.contains(Vec2::new(500.0, 790.0)));
    }
}
