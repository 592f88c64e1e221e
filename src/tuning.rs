//! Data-driven game balance
//!
//! Defaults reproduce the shipped feel. Hosts may override any subset of
//! fields with a JSON object; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player movement (px per frame at full deflection)
    pub player_speed: f32,
    pub player_max_hp: f32,

    pub bullet_speed: f32,
    pub bullet_damage: f32,
    /// Player bullet lifetime (frames)
    pub bullet_lifetime: u32,

    /// Frames between shots
    pub fire_interval: u32,
    pub fire_interval_rapid: u32,

    /// Frames a timed powerup stays active
    pub powerup_duration: u32,
    /// Probability that a kill drops a powerup
    pub powerup_drop_chance: f32,
    pub heal_amount: f32,

    /// Frames between clearing a wave and starting the next
    pub wave_delay: u32,
    /// Enemies released in wave 1
    pub first_wave_quota: u32,

    /// Damage per frame while an enemy touches the player
    pub contact_damage: f32,
    pub boss_bullet_damage: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 7.0,
            player_max_hp: 100.0,

            bullet_speed: 18.0,
            bullet_damage: 20.0,
            bullet_lifetime: 80,

            fire_interval: 12,
            fire_interval_rapid: 4,

            powerup_duration: 400,
            powerup_drop_chance: 0.15,
            heal_amount: 25.0,

            wave_delay: 180,
            first_wave_quota: 5,

            contact_damage: 0.5,
            boss_bullet_damage: 10.0,
        }
    }
}

impl Tuning {
    /// Parse overrides; the caller decides whether to fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Fire interval for the current powerup state
    pub fn fire_interval(&self, rapid: bool) -> u32 {
        if rapid {
            self.fire_interval_rapid
        } else {
            self.fire_interval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 9.5, "wave_delay": 60 }"#).unwrap();
        assert_eq!(tuning.player_speed, 9.5);
        assert_eq!(tuning.wave_delay, 60);
        assert_eq!(tuning.bullet_damage, Tuning::default().bullet_damage);
        assert_eq!(tuning.first_wave_quota, 5);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("player_speed = 3").is_err());
    }

    #[test]
    fn test_fire_interval() {
        let tuning = Tuning::default();
        assert_eq!(tuning.fire_interval(false), 12);
        assert_eq!(tuning.fire_interval(true), 4);
    }
}
