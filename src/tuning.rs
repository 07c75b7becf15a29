//! Game balance knobs
//!
//! Defaults reproduce the shipped game. A host may pass a partial JSON
//! object to override individual fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Points and puzzle reward for catching one item kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub points: u64,
    pub unlocks: usize,
}

/// All balance constants in one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Viewports narrower than this (px) use the compact values
    pub compact_breakpoint: f32,

    // === Basket ===
    pub basket_width_compact: f32,
    pub basket_width_wide: f32,
    /// Top of the catch band, measured up from the bottom edge (px)
    pub catch_band_offset: f32,
    /// Height of the catch band (px)
    pub catch_band_height: f32,

    // === Falling ===
    /// Fall rate at speed 1.0 (px/s)
    pub fall_rate_compact: f32,
    pub fall_rate_wide: f32,
    /// Items this far below the bottom edge are dropped (px)
    pub cull_margin: f32,

    // === Spawning ===
    /// Seconds between spawns
    pub spawn_interval_compact: f32,
    pub spawn_interval_wide: f32,
    /// Spawn height (px, negative = above the screen)
    pub spawn_y: f32,
    /// Horizontal spawn band, percent of screen width
    pub spawn_x_min: f32,
    pub spawn_x_span: f32,
    /// speed = speed_min + rand * speed_span + score / speed_score_divisor
    pub speed_min: f32,
    pub speed_span: f32,
    pub speed_score_divisor: f32,

    // === Rewards ===
    pub beer: Reward,
    pub wine: Reward,

    /// Seconds between the final piece and the win screen
    pub win_delay_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            compact_breakpoint: 600.0,

            basket_width_compact: 100.0,
            basket_width_wide: 150.0,
            catch_band_offset: 100.0,
            catch_band_height: 60.0,

            fall_rate_compact: 350.0,
            fall_rate_wide: 500.0,
            cull_margin: 100.0,

            spawn_interval_compact: 0.8,
            spawn_interval_wide: 0.6,
            spawn_y: -100.0,
            spawn_x_min: 10.0,
            spawn_x_span: 80.0,
            speed_min: 1.0,
            speed_span: 1.5,
            speed_score_divisor: 3000.0,

            beer: Reward {
                points: 10,
                unlocks: 1,
            },
            wine: Reward {
                points: 50,
                unlocks: 3,
            },

            win_delay_secs: 2.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the sim
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("compact_breakpoint", self.compact_breakpoint),
            ("basket_width_compact", self.basket_width_compact),
            ("basket_width_wide", self.basket_width_wide),
            ("catch_band_height", self.catch_band_height),
            ("fall_rate_compact", self.fall_rate_compact),
            ("fall_rate_wide", self.fall_rate_wide),
            ("spawn_interval_compact", self.spawn_interval_compact),
            ("spawn_interval_wide", self.spawn_interval_wide),
            ("speed_min", self.speed_min),
            ("speed_score_divisor", self.speed_score_divisor),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }

        let non_negative = [
            ("cull_margin", self.cull_margin),
            ("speed_span", self.speed_span),
            ("win_delay_secs", self.win_delay_secs),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }

        if !(0.0..=100.0).contains(&self.spawn_x_min)
            || !(0.0..=100.0).contains(&(self.spawn_x_min + self.spawn_x_span))
            || self.spawn_x_span < 0.0
        {
            return Err(TuningError::Invalid {
                field: "spawn_x_span",
                reason: "spawn band must stay within 0..=100 percent",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "win_delay_secs": 3.5, "wine": { "points": 75, "unlocks": 2 } }"#)
            .unwrap();
        assert_eq!(tuning.win_delay_secs, 3.5);
        assert_eq!(tuning.wine.points, 75);
        // Untouched fields keep their defaults
        assert_eq!(tuning.beer, Tuning::default().beer);
        assert_eq!(tuning.fall_rate_wide, 500.0);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Tuning::from_json("{}").unwrap(), Tuning::default());
    }

    #[test]
    fn test_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = Tuning::from_json(r#"{ "spawn_interval_wide": 0.0 }"#).unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "spawn_interval_wide"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_band_outside_screen() {
        let err = Tuning::from_json(r#"{ "spawn_x_min": 50.0, "spawn_x_span": 80.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "spawn_x_span", .. }));
    }
}
