//! Dune Blaster - A side-scrolling desert arcade shooter
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (entities, AI, collisions, waves)
//! - `platform`: Keyboard/pointer/touch input normalization
//! - `persistence`: Storage of the unlocked-character list
//! - `game`: Session state machine wrapping the simulation
//! - `snapshot`: Read-only view handed to renderers
//! - `tuning`: Data-driven game balance
//! - `web`: Browser bindings (wasm only)

pub mod cheat;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;
pub mod unlocks;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;
pub use unlocks::{CharacterId, Unlocks};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Simulation steps per second (one step per display frame)
    pub const FRAMES_PER_SEC: u32 = 60;

    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 720.0;
    /// Height of the sand strip at the bottom of the canvas
    pub const GROUND_HEIGHT: f32 = 120.0;
    /// y where particles bounce
    pub const GROUND_Y: f32 = CANVAS_HEIGHT - GROUND_HEIGHT;
    /// Top of the walkable band
    pub const HORIZON_Y: f32 = CANVAS_HEIGHT * 0.45;
    /// Gap kept between the walkable band and the ground line
    pub const GROUND_MARGIN: f32 = 30.0;
    /// Bottom of the walkable band
    pub const PLAYFIELD_MAX_Y: f32 = GROUND_Y - GROUND_MARGIN;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 55.0;
    pub const PLAYER_START_X: f32 = 150.0;
    /// Distance from player centre to the gun muzzle
    pub const MUZZLE_DISTANCE: f32 = 70.0;
    pub const MUZZLE_DROP: f32 = 5.0;
    pub const RECOIL_KICK: f32 = 8.0;
    pub const RECOIL_DECAY: f32 = 0.8;
    pub const MUZZLE_FLASH_FRAMES: u32 = 3;
    /// Extra angle of the side bullets while TRIPLE_SHOT is active (radians)
    pub const TRIPLE_SHOT_SPREAD: f32 = 0.15;

    /// Player bullet
    pub const BULLET_RADIUS: f32 = 10.0;

    /// Enemies spawn this far past the right edge
    pub const ENEMY_SPAWN_MARGIN: f32 = 80.0;
    /// Lead time (frames) fast enemies use when predicting the player
    pub const FAST_LEAD_FRAMES: f32 = 20.0;
    /// Nudge applied per overlapping neighbour
    pub const SEPARATION_PUSH: f32 = 0.5;
    pub const HIT_FLASH_FRAMES: u32 = 4;

    /// Boss defaults
    pub const BOSS_RADIUS: f32 = 130.0;
    pub const BOSS_SPEED: f32 = 2.0;
    pub const BOSS_VALUE: u32 = 5000;
    pub const BOSS_SPAWN_MARGIN: f32 = 150.0;
    /// Boss stops advancing once it is this close to the right edge
    pub const BOSS_STANDOFF: f32 = 200.0;
    pub const BOSS_SWAY_AMPLITUDE: f32 = 150.0;
    pub const BOSS_SWAY_FREQ: f32 = 0.02;
    pub const BOSS_TRACKING: f32 = 0.02;
    pub const BOSS_ATTACK_FRAMES: u32 = 120;
    pub const BOSS_BULLET_SPEED: f32 = 8.0;
    pub const BOSS_BULLET_RADIUS: f32 = 12.0;
    pub const BOSS_BULLET_LIFETIME: u32 = 140;
    pub const BOSS_MUZZLE_OFFSET: f32 = 80.0;
    pub const BOSS_SPREAD: [f32; 3] = [-0.3, 0.0, 0.3];
    /// Announcement-to-arrival delay (2 s)
    pub const BOSS_ARRIVAL_FRAMES: u32 = 2 * FRAMES_PER_SEC;
    /// How long the "DETECTED" banner stays up (3 s)
    pub const BOSS_WARNING_FRAMES: u32 = 3 * FRAMES_PER_SEC;
    /// Every Nth wave is a boss wave
    pub const BOSS_WAVE_INTERVAL: u32 = 3;

    /// Powerup pickup
    pub const POWERUP_RADIUS: f32 = 25.0;
    pub const POWERUP_LIFETIME: u32 = 600;

    /// Floating text
    pub const FLOATING_TEXT_LIFETIME: u32 = 50;
    pub const FLOATING_TEXT_RISE: f32 = 0.8;
    pub const FLOATING_TEXT_OFFSET: f32 = 30.0;
    /// Delay before the "NEW FIGHTER UNLOCKED!" notice (1 s)
    pub const UNLOCK_NOTICE_FRAMES: u32 = FRAMES_PER_SEC;

    /// Particle physics
    pub const PARTICLE_DRAG_X: f32 = 0.95;
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    pub const PARTICLE_BOUNCE: f32 = -0.6;
    pub const PARTICLE_SPIN: f32 = 0.1;
    pub const PARTICLE_MAX_LIFE: f32 = 50.0;

    /// Screen shake
    pub const SHAKE_FIRE: f32 = 2.0;
    pub const SHAKE_FIRE_CAP: f32 = 20.0;
    pub const SHAKE_CONTACT: f32 = 1.0;
    pub const SHAKE_PLAYER_HIT: f32 = 5.0;
    pub const SHAKE_KILL: f32 = 5.0;
    pub const SHAKE_BOSS_KILL: f32 = 30.0;
    pub const SHAKE_BOSS_ARRIVAL: f32 = 25.0;
    pub const SHAKE_DETONATION: f32 = 50.0;
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_FLOOR: f32 = 0.5;

    /// Background scroll speed (px per frame)
    pub const SCROLL_SPEED: f32 = 5.0;

    /// Colours (0xRRGGBB)
    pub mod colors {
        pub const WHITE: u32 = 0xffffff;
        pub const BULLET: u32 = 0xfacc15;
        pub const ENEMY_BASIC: u32 = 0xef4444;
        pub const ENEMY_BOSS: u32 = 0x581c87;
        pub const GOLD: u32 = 0xfbbf24;
        pub const GREEN: u32 = 0x00ff00;
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Uniform sample in `[min, max)`; returns `min` when the range is empty
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Dune Blaster core loaded");
}
