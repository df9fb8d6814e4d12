//! Data-driven simulation constants
//!
//! `Tuning` mirrors every gameplay constant in [`crate::consts`]. Missing JSON
//! keys fall back to those defaults, so a tuning file can override just the
//! values being balanced.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Debris quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EffectQuality {
    Off,
    Low,
    #[default]
    High,
}

impl EffectQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectQuality::Off => "Off",
            EffectQuality::Low => "Low",
            EffectQuality::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(EffectQuality::Off),
            "low" => Some(EffectQuality::Low),
            "high" => Some(EffectQuality::High),
            _ => None,
        }
    }

    /// Maximum live debris particles for this preset
    pub fn max_effects(&self) -> usize {
        match self {
            EffectQuality::Off => 0,
            EffectQuality::Low => MAX_EFFECTS / 4,
            EffectQuality::High => MAX_EFFECTS,
        }
    }
}

/// Runtime-tunable simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    pub gravity: f32,
    pub floor_y: f32,

    // === Piles ===
    pub pile_radius: f32,
    pub pile_height: f32,

    // === Scoop ===
    pub pickup_radius: f32,
    pub pickup_max_height: f32,
    pub carry_jitter: f32,
    /// Probability (0.0 - 1.0) that a pickup produces debris and a dig sound
    pub dig_effect_chance: f64,

    // === Pits ===
    pub zone_radius: f32,

    // === Debris ===
    pub effect_burst: usize,
    pub effect_lifetime: f32,
    pub effect_spread: f32,
    pub effect_max_horizontal_speed: f32,
    pub effect_max_up_speed: f32,
    pub effect_quality: EffectQuality,

    // === Excavator ===
    pub drive_speed: f32,
    pub turn_speed: f32,
    pub arm_speed: f32,
    pub world_limit: f32,
    pub hydraulic_sound_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            floor_y: FLOOR_Y,

            pile_radius: PILE_RADIUS,
            pile_height: PILE_HEIGHT,

            pickup_radius: PICKUP_RADIUS,
            pickup_max_height: PICKUP_MAX_HEIGHT,
            carry_jitter: CARRY_JITTER,
            dig_effect_chance: DIG_EFFECT_CHANCE,

            zone_radius: ZONE_RADIUS,

            effect_burst: EFFECT_BURST,
            effect_lifetime: EFFECT_LIFETIME,
            effect_spread: EFFECT_SPREAD,
            effect_max_horizontal_speed: EFFECT_MAX_HORIZONTAL_SPEED,
            effect_max_up_speed: EFFECT_MAX_UP_SPEED,
            effect_quality: EffectQuality::High,

            drive_speed: DRIVE_SPEED,
            turn_speed: TURN_SPEED,
            arm_speed: ARM_SPEED,
            world_limit: WORLD_LIMIT,
            hydraulic_sound_chance: HYDRAULIC_SOUND_CHANCE,
        }
    }
}

impl Tuning {
    /// Parse a tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Effective debris cap
    pub fn max_effects(&self) -> usize {
        self.effect_quality.max_effects()
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("dig_effect_chance", self.dig_effect_chance)?;
        check_probability("hydraulic_sound_chance", self.hydraulic_sound_chance)?;

        let positive = [
            ("pile_radius", self.pile_radius),
            ("pickup_radius", self.pickup_radius),
            ("zone_radius", self.zone_radius),
            ("effect_lifetime", self.effect_lifetime),
            ("world_limit", self.world_limit),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                log::warn!("Rejected tuning: {} = {}", field, value);
                return Err(ConfigError::OutOfRange {
                    field,
                    value: value as f64,
                    expected: "> 0.0",
                });
            }
        }

        let non_negative = [
            ("pile_height", self.pile_height),
            ("carry_jitter", self.carry_jitter),
            ("effect_spread", self.effect_spread),
            ("effect_max_horizontal_speed", self.effect_max_horizontal_speed),
            ("effect_max_up_speed", self.effect_max_up_speed),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                log::warn!("Rejected tuning: {} = {}", field, value);
                return Err(ConfigError::OutOfRange {
                    field,
                    value: value as f64,
                    expected: ">= 0.0",
                });
            }
        }
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        log::warn!("Rejected tuning: {} = {}", field, value);
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "0.0..=1.0",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.gravity, -9.8);
        assert_eq!(t.floor_y, 0.15);
        assert_eq!(t.pickup_radius, 1.5);
        assert_eq!(t.zone_radius, 2.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "dig_effect_chance": 1.0 }"#).unwrap();
        assert_eq!(t.dig_effect_chance, 1.0);
        assert_eq!(t.pickup_max_height, PICKUP_MAX_HEIGHT);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "dig_effect_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "dig_effect_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_zone_radius() {
        let err = Tuning::from_json(r#"{ "zone_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "zone_radius", .. }));
    }

    #[test]
    fn test_debris_shape_overrides() {
        let t = Tuning::from_json(r#"{ "effect_spread": 0.5, "effect_max_up_speed": 6.0 }"#).unwrap();
        assert_eq!(t.effect_spread, 0.5);
        assert_eq!(t.effect_max_up_speed, 6.0);
        assert_eq!(t.effect_max_horizontal_speed, EFFECT_MAX_HORIZONTAL_SPEED);

        let err = Tuning::from_json(r#"{ "effect_spread": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "effect_spread", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_roundtrip_json() {
        let mut t = Tuning::default();
        t.effect_quality = EffectQuality::Low;
        let json = t.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), t);
    }

    #[test]
    fn test_quality_caps() {
        assert_eq!(EffectQuality::Off.max_effects(), 0);
        assert!(EffectQuality::Low.max_effects() < EffectQuality::High.max_effects());
        assert_eq!(EffectQuality::from_str("LOW"), Some(EffectQuality::Low));
        assert_eq!(EffectQuality::from_str("ultra"), None);
    }
}
