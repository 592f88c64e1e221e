//! Wave progression and spawning
//!
//! Progression is an explicit state machine:
//!
//! ```text
//! Spawning ──quota exhausted──▶ Clearing ──no enemies──▶ Intermission
//!     ▲                                                     │
//!     │◀──────────── delay expired, wave % 3 != 0 ──────────┤
//!     │                                                     ▼
//!     └──── boss killed ◀── BossActive ◀── arrival ── BossPending
//! ```
//!
//! Spawning never runs while a boss is pending or active.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::schedule::TaskHandle;
use super::state::{BossWarning, Enemy, EnemyKind, GameEvent, GamePhase, Powerup, PowerupKind, Task, World};
use crate::consts::*;
use crate::random_range;
use crate::unlocks::CharacterId;

/// Boss identities, fought in this order and then repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossVariant {
    Camel,
    TwoPac,
    Biggie,
    PostMalone,
    SlimShady,
    LilWayne,
}

impl BossVariant {
    pub const ROSTER: [BossVariant; 6] = [
        BossVariant::Camel,
        BossVariant::TwoPac,
        BossVariant::Biggie,
        BossVariant::PostMalone,
        BossVariant::SlimShady,
        BossVariant::LilWayne,
    ];

    /// Boss for a boss wave: `floor(wave / 3) - 1 mod 6`
    pub fn for_wave(wave: u32) -> Self {
        let index = (wave / BOSS_WAVE_INTERVAL).saturating_sub(1) as usize % Self::ROSTER.len();
        Self::ROSTER[index]
    }

    /// Fighter unlocked by defeating this boss
    pub fn character(&self) -> CharacterId {
        match self {
            BossVariant::Camel => CharacterId::Camel,
            BossVariant::TwoPac => CharacterId::TwoPac,
            BossVariant::Biggie => CharacterId::Biggie,
            BossVariant::PostMalone => CharacterId::PostMalone,
            BossVariant::SlimShady => CharacterId::SlimShady,
            BossVariant::LilWayne => CharacterId::LilWayne,
        }
    }

    pub fn name(&self) -> &'static str {
        self.character().display_name()
    }
}

/// Where the current wave is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveState {
    /// Enemies remain to be released
    Spawning { remaining: u32, spawn_timer: u32 },
    /// Quota released, enemies still alive
    Clearing,
    /// Field empty, counting down to the next wave
    Intermission { frames_left: u32 },
    /// Boss announced, not yet on screen
    BossPending { variant: BossVariant, arrival: TaskHandle },
    BossActive { variant: BossVariant },
}

/// Discriminant of `WaveState`, used for the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    Spawning,
    Clearing,
    Intermission,
    BossPending,
    BossActive,
}

/// Every legal wave transition
const TRANSITIONS: [(WavePhase, WavePhase); 6] = [
    (WavePhase::Spawning, WavePhase::Clearing),
    (WavePhase::Clearing, WavePhase::Intermission),
    (WavePhase::Intermission, WavePhase::Spawning),
    (WavePhase::Intermission, WavePhase::BossPending),
    (WavePhase::BossPending, WavePhase::BossActive),
    (WavePhase::BossActive, WavePhase::Spawning),
];

impl WaveState {
    pub fn phase(&self) -> WavePhase {
        match self {
            WaveState::Spawning { .. } => WavePhase::Spawning,
            WaveState::Clearing => WavePhase::Clearing,
            WaveState::Intermission { .. } => WavePhase::Intermission,
            WaveState::BossPending { .. } => WavePhase::BossPending,
            WaveState::BossActive { .. } => WavePhase::BossActive,
        }
    }

    /// Boss announced or on screen
    pub fn boss_engaged(&self) -> bool {
        matches!(self, WaveState::BossPending { .. } | WaveState::BossActive { .. })
    }

    pub fn can_transition(from: WavePhase, to: WavePhase) -> bool {
        TRANSITIONS.contains(&(from, to))
    }
}

/// Enemies released in a regular wave
pub fn wave_quota(wave: u32) -> u32 {
    6 + wave * 2
}

/// Frames between spawns in a wave
pub fn spawn_interval(wave: u32) -> u32 {
    60u32.saturating_sub(wave * 2).max(20)
}

/// Per-wave HP multiplier
pub fn hp_multiplier(wave: u32) -> f32 {
    1.0 + wave as f32 * 0.15
}

/// Base stats for a regular enemy class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub base_hp: f32,
    pub speed: f32,
    pub radius: f32,
    pub value: u32,
}

pub fn enemy_stats(kind: EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Fast => EnemyStats {
            base_hp: 25.0,
            speed: 5.0,
            radius: 40.0,
            value: 100,
        },
        EnemyKind::Tank => EnemyStats {
            base_hp: 150.0,
            speed: 1.2,
            radius: 75.0,
            value: 300,
        },
        EnemyKind::Basic | EnemyKind::Boss { .. } => EnemyStats {
            base_hp: 40.0,
            speed: 2.5,
            radius: 55.0,
            value: 50,
        },
    }
}

/// Pick a regular enemy class from a uniform roll in `[0, 1)`
pub fn roll_enemy_kind(wave: u32, roll: f32) -> EnemyKind {
    if wave > 2 && roll > 0.85 {
        EnemyKind::Tank
    } else if wave > 1 && roll > 0.7 {
        EnemyKind::Fast
    } else {
        EnemyKind::Basic
    }
}

impl World {
    /// Move to `next`, which must be a legal successor of the current state
    pub(crate) fn transition_wave(&mut self, next: WaveState) {
        let from = self.wave_state.phase();
        debug_assert!(
            WaveState::can_transition(from, next.phase()),
            "illegal wave transition {:?} -> {:?}",
            from,
            next.phase()
        );
        log::debug!("Wave {}: {:?} -> {:?}", self.wave, from, next.phase());
        self.wave_state = next;
    }

    /// Queue a regular wave's spawn quota
    fn begin_wave(&mut self) {
        self.transition_wave(WaveState::Spawning {
            remaining: wave_quota(self.wave),
            spawn_timer: spawn_interval(self.wave),
        });
        self.events.push(GameEvent::WaveStarted { wave: self.wave });
        log::info!("Wave {} started", self.wave);
    }

    /// Release one regular enemy just past the right edge
    pub fn spawn_enemy(&mut self) {
        let roll: f32 = self.rng.random();
        let kind = roll_enemy_kind(self.wave, roll);
        let stats = enemy_stats(kind);
        let hp = stats.base_hp * hp_multiplier(self.wave);
        let y = random_range(&mut self.rng, HORIZON_Y, PLAYFIELD_MAX_Y);
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(CANVAS_WIDTH + ENEMY_SPAWN_MARGIN, y),
            radius: stats.radius,
            rotation: 0.0,
            hp,
            max_hp: hp,
            speed: stats.speed,
            kind,
            value: stats.value,
            hit_flash: 0,
        });
        log::debug!("Spawned {} enemy #{} (hp {:.0})", kind.name(), id, hp);
    }

    /// Show the warning banner and schedule the boss's arrival
    fn announce_boss(&mut self) {
        let variant = BossVariant::for_wave(self.wave);
        let arrival = self
            .tasks
            .schedule(BOSS_ARRIVAL_FRAMES, Task::MaterializeBoss(variant));
        self.boss_warning = Some(BossWarning {
            variant,
            frames_left: BOSS_WARNING_FRAMES,
        });
        self.transition_wave(WaveState::BossPending { variant, arrival });
        self.events.push(GameEvent::BossAnnounced { variant });
        log::info!("Wave {}: {} DETECTED", self.wave, variant.name());
    }

    /// Cancel an announced boss that has not arrived yet and take the
    /// banner down. Returns true if an arrival was pending.
    pub fn abandon_boss(&mut self) -> bool {
        let WaveState::BossPending { variant, arrival } = self.wave_state else {
            return false;
        };
        self.boss_warning = None;
        let cancelled = self.tasks.cancel(arrival);
        if cancelled {
            log::debug!("{} arrival cancelled", variant.name());
        }
        cancelled
    }

    /// Bring the announced boss on screen
    pub fn materialize_boss(&mut self, variant: BossVariant) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if !matches!(self.wave_state, WaveState::BossPending { variant: v, .. } if v == variant) {
            log::warn!("Ignoring stale arrival of {}", variant.name());
            return;
        }
        let hp = 600.0 + self.wave as f32 * 150.0;
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(CANVAS_WIDTH + BOSS_SPAWN_MARGIN, CANVAS_HEIGHT / 2.0),
            radius: BOSS_RADIUS,
            rotation: 0.0,
            hp,
            max_hp: hp,
            speed: BOSS_SPEED,
            kind: EnemyKind::Boss {
                variant,
                attack_cooldown: BOSS_ATTACK_FRAMES,
            },
            value: BOSS_VALUE,
            hit_flash: 0,
        });
        self.screen_shake = SHAKE_BOSS_ARRIVAL;
        self.transition_wave(WaveState::BossActive { variant });
        self.events.push(GameEvent::BossArrived { variant });
    }

    /// Boss died: advance the wave and queue its quota
    pub fn on_boss_defeated(&mut self, variant: BossVariant) {
        log::info!("{} defeated on wave {}", variant.name(), self.wave);
        self.wave += 1;
        self.begin_wave();
    }

    /// Spawn-side bookkeeping for one frame
    pub fn update_waves(&mut self) {
        match self.wave_state {
            WaveState::Spawning { remaining: 0, .. } => {
                self.transition_wave(WaveState::Clearing);
            }
            WaveState::Spawning {
                remaining,
                spawn_timer: 0,
            } => {
                self.spawn_enemy();
                let remaining = remaining - 1;
                if remaining == 0 {
                    self.transition_wave(WaveState::Clearing);
                } else {
                    self.wave_state = WaveState::Spawning {
                        remaining,
                        spawn_timer: spawn_interval(self.wave),
                    };
                }
            }
            WaveState::Spawning {
                remaining,
                spawn_timer,
            } => {
                self.wave_state = WaveState::Spawning {
                    remaining,
                    spawn_timer: spawn_timer - 1,
                };
            }
            WaveState::Clearing => {
                if self.enemies.is_empty() {
                    self.transition_wave(WaveState::Intermission {
                        frames_left: self.tuning.wave_delay,
                    });
                    let text = format!("WAVE {}", self.wave + 1);
                    self.spawn_text(World::screen_center(), text, colors::WHITE);
                }
            }
            WaveState::Intermission { frames_left } => {
                let frames_left = frames_left.saturating_sub(1);
                if frames_left > 0 {
                    self.wave_state = WaveState::Intermission { frames_left };
                    return;
                }
                self.wave += 1;
                if self.wave % BOSS_WAVE_INTERVAL == 0 {
                    self.announce_boss();
                } else {
                    self.begin_wave();
                }
            }
            WaveState::BossPending { .. } | WaveState::BossActive { .. } => {}
        }
    }

    /// Maybe leave a pickup where an enemy died
    pub fn roll_powerup_drop(&mut self, pos: Vec2) {
        let roll: f32 = self.rng.random();
        if roll > self.tuning.powerup_drop_chance {
            return;
        }
        let kind = PowerupKind::ALL[self.rng.random_range(0..PowerupKind::ALL.len())];
        let id = self.next_entity_id();
        self.powerups.push(Powerup {
            id,
            pos,
            radius: POWERUP_RADIUS,
            kind,
            life: POWERUP_LIFETIME,
        });
        self.events.push(GameEvent::PowerupDropped { kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn playing_world() -> World {
        let mut world = World::with_seed(Tuning::default(), 42);
        world.start_run(CharacterId::Default);
        world
    }

    #[test]
    fn test_boss_roster_cycle() {
        let expected = [
            (3, BossVariant::Camel),
            (6, BossVariant::TwoPac),
            (9, BossVariant::Biggie),
            (12, BossVariant::PostMalone),
            (15, BossVariant::SlimShady),
            (18, BossVariant::LilWayne),
            (21, BossVariant::Camel),
        ];
        for (wave, variant) in expected {
            assert_eq!(BossVariant::for_wave(wave), variant, "wave {}", wave);
        }
    }

    #[test]
    fn test_boss_unlocks_matching_fighter() {
        assert_eq!(BossVariant::TwoPac.character(), CharacterId::TwoPac);
        assert_eq!(BossVariant::PostMalone.name(), "POST MALONE");
    }

    #[test]
    fn test_enemy_roll_thresholds() {
        assert_eq!(roll_enemy_kind(1, 0.99), EnemyKind::Basic);
        assert_eq!(roll_enemy_kind(2, 0.99), EnemyKind::Fast);
        assert_eq!(roll_enemy_kind(2, 0.7), EnemyKind::Basic);
        assert_eq!(roll_enemy_kind(3, 0.86), EnemyKind::Tank);
        assert_eq!(roll_enemy_kind(3, 0.8), EnemyKind::Fast);
        assert_eq!(roll_enemy_kind(10, 0.1), EnemyKind::Basic);
    }

    #[test]
    fn test_wave_formulas() {
        assert_eq!(wave_quota(2), 10);
        assert_eq!(spawn_interval(1), 58);
        assert_eq!(spawn_interval(25), 20);
        assert_eq!(spawn_interval(1000), 20);
        assert!((hp_multiplier(2) - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_transition_table() {
        assert!(WaveState::can_transition(WavePhase::Clearing, WavePhase::Intermission));
        assert!(!WaveState::can_transition(WavePhase::BossActive, WavePhase::Intermission));
        assert!(!WaveState::can_transition(WavePhase::BossPending, WavePhase::Spawning));
    }

    #[test]
    fn test_first_spawn_is_immediate() {
        let mut world = playing_world();
        world.update_waves();
        assert_eq!(world.enemies.len(), 1);
        let enemy = &world.enemies[0];
        assert_eq!(enemy.kind, EnemyKind::Basic);
        assert_eq!(enemy.pos.x, CANVAS_WIDTH + ENEMY_SPAWN_MARGIN);
        assert!(enemy.pos.y >= HORIZON_Y && enemy.pos.y <= PLAYFIELD_MAX_Y);
        assert!((enemy.hp - 40.0 * 1.15).abs() < 1e-4);
        assert_eq!(
            world.wave_state,
            WaveState::Spawning {
                remaining: 4,
                spawn_timer: 58
            }
        );
    }

    #[test]
    fn test_quota_exhaustion_then_intermission() {
        let mut world = playing_world();
        world.wave_state = WaveState::Spawning {
            remaining: 1,
            spawn_timer: 0,
        };
        world.update_waves();
        assert_eq!(world.wave_state, WaveState::Clearing);

        // Still alive: stay in Clearing
        world.update_waves();
        assert_eq!(world.wave_state, WaveState::Clearing);

        world.enemies.clear();
        world.update_waves();
        assert_eq!(world.wave_state, WaveState::Intermission { frames_left: 180 });
        assert_eq!(world.texts.last().map(|t| t.text.as_str()), Some("WAVE 2"));
    }

    #[test]
    fn test_intermission_starts_next_wave() {
        let mut world = playing_world();
        world.wave_state = WaveState::Intermission { frames_left: 3 };
        world.update_waves();
        world.update_waves();
        assert_eq!(world.wave, 1);
        world.update_waves();
        assert_eq!(world.wave, 2);
        assert_eq!(
            world.wave_state,
            WaveState::Spawning {
                remaining: 10,
                spawn_timer: 56
            }
        );
        assert!(world.events.contains(&GameEvent::WaveStarted { wave: 2 }));
    }

    #[test]
    fn test_third_wave_announces_boss() {
        let mut world = playing_world();
        world.wave = 2;
        world.wave_state = WaveState::Intermission { frames_left: 1 };
        world.update_waves();
        assert_eq!(world.wave, 3);
        let WaveState::BossPending { variant, arrival } = world.wave_state else {
            panic!("expected boss pending, got {:?}", world.wave_state);
        };
        assert_eq!(variant, BossVariant::Camel);
        assert!(world.tasks.is_pending(arrival));
        assert_eq!(world.boss_warning.map(|w| w.variant), Some(BossVariant::Camel));

        // No regular spawns while the boss is pending
        for _ in 0..10 {
            world.update_waves();
        }
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn test_death_abandons_pending_boss() {
        let mut world = playing_world();
        world.wave = 2;
        world.wave_state = WaveState::Intermission { frames_left: 1 };
        world.update_waves();
        let WaveState::BossPending { arrival, .. } = world.wave_state else {
            panic!("expected boss pending, got {:?}", world.wave_state);
        };

        world.end_run();
        assert!(!world.tasks.is_pending(arrival));
        assert!(world.boss_warning.is_none());
        assert!(!world.abandon_boss());
    }

    #[test]
    fn test_materialize_boss() {
        let mut world = playing_world();
        world.wave = 2;
        world.wave_state = WaveState::Intermission { frames_left: 1 };
        world.update_waves();
        world.materialize_boss(BossVariant::Camel);

        let boss = world.boss().expect("boss on screen");
        assert_eq!(boss.hp, 600.0 + 3.0 * 150.0);
        assert_eq!(boss.pos, Vec2::new(CANVAS_WIDTH + 150.0, CANVAS_HEIGHT / 2.0));
        assert_eq!(world.screen_shake, SHAKE_BOSS_ARRIVAL);
        assert_eq!(
            world.wave_state,
            WaveState::BossActive {
                variant: BossVariant::Camel
            }
        );
    }

    #[test]
    fn test_materialize_aborts_outside_playing() {
        let mut world = playing_world();
        world.wave = 2;
        world.wave_state = WaveState::Intermission { frames_left: 1 };
        world.update_waves();
        world.phase = GamePhase::Menu;
        world.materialize_boss(BossVariant::Camel);
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn test_boss_defeat_queues_next_wave() {
        let mut world = playing_world();
        world.wave = 3;
        world.wave_state = WaveState::BossActive {
            variant: BossVariant::Camel,
        };
        world.on_boss_defeated(BossVariant::Camel);
        assert_eq!(world.wave, 4);
        assert!(matches!(
            world.wave_state,
            WaveState::Spawning { remaining: 14, .. }
        ));
    }

    #[test]
    fn test_powerup_drop_rate_bounds() {
        let mut world = playing_world();
        world.tuning.powerup_drop_chance = 1.0;
        world.roll_powerup_drop(Vec2::new(500.0, 400.0));
        assert_eq!(world.powerups.len(), 1);

        world.tuning.powerup_drop_chance = -1.0;
        world.roll_powerup_drop(Vec2::new(500.0, 400.0));
        assert_eq!(world.powerups.len(), 1);
    }
}
