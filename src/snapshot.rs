//! Read-only view handed to renderers
//!
//! Borrowed straight from the world, so capturing one per frame costs a
//! handful of pointer copies. Serializes to JSON for JS-side renderers.

use serde::Serialize;

use crate::cheat::CheatView;
use crate::settings::Settings;
use crate::sim::{
    Bullet, Cloud, Enemy, EnemyKind, FloatingText, GamePhase, Particle, Player, Powerup, Star, World,
};
use crate::unlocks::CharacterId;

/// Health bar for the boss on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BossBar {
    pub name: &'static str,
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub particles: &'a [Particle],
    pub powerups: &'a [Powerup],
    pub texts: &'a [FloatingText],
    pub wave: u32,
    pub score: u64,
    pub hp: f32,
    pub max_hp: f32,
    pub boss: Option<BossBar>,
    /// "<NAME> DETECTED" while the warning banner is up
    pub boss_warning: Option<String>,
    /// Zero when the player disabled shake
    pub screen_shake: f32,
    pub scroll: f32,
    pub clouds: &'a [Cloud],
    pub stars: &'a [Star],
    pub cheat: Option<CheatView>,
    pub muted: bool,
    pub selected: CharacterId,
    pub unlocked: Vec<CharacterId>,
}

impl<'a> RenderSnapshot<'a> {
    /// Capture the world; session-level fields start at their defaults
    pub fn capture(world: &'a World, settings: &Settings) -> Self {
        let boss = world.boss().and_then(|e| match e.kind {
            EnemyKind::Boss { variant, .. } => Some(BossBar {
                name: variant.name(),
                hp: e.hp.max(0.0),
                max_hp: e.max_hp,
            }),
            _ => None,
        });
        let screen_shake = if settings.effective_screen_shake() {
            world.screen_shake
        } else {
            0.0
        };

        Self {
            phase: world.phase,
            player: &world.player,
            enemies: &world.enemies,
            bullets: &world.bullets,
            particles: &world.particles,
            powerups: &world.powerups,
            texts: &world.texts,
            wave: world.wave,
            score: world.player.score,
            hp: world.player.hp.max(0.0),
            max_hp: world.player.max_hp,
            boss,
            boss_warning: world
                .boss_warning
                .map(|w| format!("{} DETECTED", w.variant.name())),
            screen_shake,
            scroll: world.backdrop.scroll,
            clouds: &world.backdrop.clouds,
            stars: &world.backdrop.stars,
            cheat: None,
            muted: settings.muted,
            selected: CharacterId::Default,
            unlocked: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
