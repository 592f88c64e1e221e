//! Game state and core simulation types
//!
//! The `World` exclusively owns every entity collection. The step function
//! and the spawn helpers in `wave` mutate them; the session only resets a
//! run or posts announcement text.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::backdrop::Backdrop;
use super::collision::Circle;
use super::schedule::Scheduler;
use super::wave::{BossVariant, WaveState};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::unlocks::CharacterId;
use crate::{direction, random_range};

/// Top-level state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Choosing a fighter for the next run
    CharacterSelect,
    /// Active gameplay
    Playing,
    /// Run frozen; rendering continues
    Paused,
    /// Player HP reached zero
    GameOver,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Applied instantly, never stored on the player
    Heal,
    RapidFire,
    TripleShot,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Heal, PowerupKind::RapidFire, PowerupKind::TripleShot];

    /// Pickup label shown as floating text
    pub fn label(&self) -> &'static str {
        match self {
            PowerupKind::Heal => "HEAL",
            PowerupKind::RapidFire => "RAPID FIRE",
            PowerupKind::TripleShot => "TRIPLE SHOT",
        }
    }

    /// The timed effect this pickup grants, if any
    pub fn timed(&self) -> Option<TimedPowerup> {
        match self {
            PowerupKind::Heal => None,
            PowerupKind::RapidFire => Some(TimedPowerup::RapidFire),
            PowerupKind::TripleShot => Some(TimedPowerup::TripleShot),
        }
    }
}

/// Powerups that last for a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedPowerup {
    RapidFire,
    TripleShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerup {
    pub kind: TimedPowerup,
    pub frames_left: u32,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing / aim angle (radians)
    pub rotation: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub score: u64,
    /// Displacement applied this frame
    pub vel: Vec2,
    /// Frames until the next shot is allowed
    pub fire_cooldown: u32,
    pub powerup: Option<ActivePowerup>,
    pub character: CharacterId,
    /// Visual gun kick, decays multiplicatively
    pub recoil: f32,
    pub muzzle_flash: u32,
}

impl Player {
    pub fn new(character: CharacterId, max_hp: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYFIELD_MAX_Y),
            radius: PLAYER_RADIUS,
            rotation: 0.0,
            hp: max_hp,
            max_hp,
            score: 0,
            vel: Vec2::ZERO,
            fire_cooldown: 0,
            powerup: None,
            character,
            recoil: 0.0,
            muzzle_flash: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn has_powerup(&self, kind: TimedPowerup) -> bool {
        self.powerup.is_some_and(|p| p.kind == kind)
    }

    /// Clamp a position into the walkable band
    pub fn clamp_to_playfield(pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, CANVAS_WIDTH - radius),
            pos.y.clamp(HORIZON_Y, PLAYFIELD_MAX_Y),
        )
    }
}

impl Circle for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Enemy behaviour class; boss-only data lives in the boss variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Chases the player's current position
    Basic,
    /// Chases a predicted position
    Fast,
    /// Rolls left along the ground
    Tank,
    Boss {
        variant: BossVariant,
        /// Frames until the next volley
        attack_cooldown: u32,
    },
}

impl EnemyKind {
    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyKind::Boss { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Fast => "fast",
            EnemyKind::Tank => "tank",
            EnemyKind::Boss { .. } => "boss",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub kind: EnemyKind,
    /// Score awarded on death
    pub value: u32,
    /// Frames of damage flash remaining
    pub hit_flash: u32,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

impl Circle for Enemy {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    pub damage: f32,
    /// Frames left; 0 means expired or consumed
    pub life: u32,
    pub owner: BulletOwner,
    /// Visual heading only
    pub rotation: f32,
}

impl Bullet {
    pub fn is_live(&self) -> bool {
        self.life > 0
    }
}

impl Circle for Bullet {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Cosmetic debris
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub color: u32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerupKind,
    pub life: u32,
}

impl Circle for Powerup {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Rising text feedback (score popups, announcements)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    pub life: u32,
    pub vel: Vec2,
}

/// "<NAME> DETECTED" banner state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossWarning {
    pub variant: BossVariant,
    pub frames_left: u32,
}

/// Deferred work fired by the frame scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Bring an announced boss on screen
    MaterializeBoss(BossVariant),
    /// Floating text above the player's position at fire time
    AnnounceAtPlayer { text: String, color: u32 },
}

/// Things that happened during a step, for audio/UI/unlock hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { bullets: u32 },
    PlayerHit { damage: f32 },
    EnemyKilled { id: u32, kind: EnemyKind, value: u32, pos: Vec2 },
    BossAnnounced { variant: BossVariant },
    BossArrived { variant: BossVariant },
    BossDefeated { variant: BossVariant },
    PowerupDropped { kind: PowerupKind },
    PowerupCollected { kind: PowerupKind },
    WaveStarted { wave: u32 },
    GameOver { score: u64, wave: u32 },
}

/// Default particle cap (matches the Medium quality preset)
pub const DEFAULT_MAX_PARTICLES: usize = 500;

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct World {
    pub phase: GamePhase,
    pub tuning: Tuning,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub powerups: Vec<Powerup>,
    pub texts: Vec<FloatingText>,
    /// Current wave number (1-based)
    pub wave: u32,
    pub wave_state: WaveState,
    /// Frames simulated since the session started (drives boss sway)
    pub frame: u64,
    pub screen_shake: f32,
    pub backdrop: Backdrop,
    pub boss_warning: Option<BossWarning>,
    pub tasks: Scheduler<Task>,
    pub events: Vec<GameEvent>,
    pub max_particles: usize,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl World {
    /// New session on the title screen
    pub fn new(tuning: Tuning, mut rng: Pcg32) -> Self {
        let backdrop = Backdrop::new(&mut rng);
        let player = Player::new(CharacterId::Default, tuning.player_max_hp);
        Self {
            phase: GamePhase::Menu,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            powerups: Vec::new(),
            texts: Vec::new(),
            wave: 1,
            wave_state: WaveState::Spawning {
                remaining: tuning.first_wave_quota,
                spawn_timer: 0,
            },
            frame: 0,
            screen_shake: 0.0,
            backdrop,
            boss_warning: None,
            tasks: Scheduler::new(),
            events: Vec::new(),
            max_particles: DEFAULT_MAX_PARTICLES,
            tuning,
            rng,
            next_id: 1,
        }
    }

    /// Session with unpredictable random rolls
    pub fn from_entropy(tuning: Tuning) -> Self {
        Self::new(tuning, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Session with reproducible random rolls
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, Pcg32::seed_from_u64(seed))
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset everything for a fresh run and enter PLAYING
    pub fn start_run(&mut self, character: CharacterId) {
        let cancelled = self.tasks.cancel_all();
        if cancelled > 0 {
            log::debug!("Cancelled {} pending tasks on run start", cancelled);
        }
        self.player = Player::new(character, self.tuning.player_max_hp);
        self.enemies.clear();
        self.bullets.clear();
        self.particles.clear();
        self.powerups.clear();
        self.texts.clear();
        self.events.clear();
        self.screen_shake = 0.0;
        self.boss_warning = None;
        self.wave = 1;
        self.wave_state = WaveState::Spawning {
            remaining: self.tuning.first_wave_quota,
            spawn_timer: 0,
        };
        self.phase = GamePhase::Playing;
        log::info!("Run started as {}", character.display_name());
    }

    /// Leave PLAYING for good: end the run and drop pending timers
    pub fn end_run(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.abandon_boss();
        let cancelled = self.tasks.cancel_all();
        self.events.push(GameEvent::GameOver {
            score: self.player.score,
            wave: self.wave,
        });
        log::info!(
            "Game over at wave {} with score {} ({} pending tasks cancelled)",
            self.wave,
            self.player.score,
            cancelled
        );
    }

    /// The boss currently on screen, if any
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.kind.is_boss())
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.screen_shake += amount;
    }

    /// Burst of `count` particles flying out in random directions
    pub fn spawn_particles(&mut self, pos: Vec2, color: u32, count: u32, speed: f32, size: f32) {
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let angle = random_range(&mut self.rng, 0.0, std::f32::consts::TAU);
            let vel = random_range(&mut self.rng, 1.0, speed);
            self.particles.push(Particle {
                pos,
                radius: random_range(&mut self.rng, 1.0, size),
                rotation: random_range(&mut self.rng, 0.0, std::f32::consts::TAU),
                vel: direction(angle) * vel,
                life: random_range(&mut self.rng, 20.0, PARTICLE_MAX_LIFE),
                max_life: PARTICLE_MAX_LIFE,
                color,
                size,
            });
        }
    }

    /// Text that rises from just above `pos`
    pub fn spawn_text(&mut self, pos: Vec2, text: impl Into<String>, color: u32) {
        self.texts.push(FloatingText {
            pos: Vec2::new(pos.x, pos.y - FLOATING_TEXT_OFFSET),
            text: text.into(),
            color,
            life: FLOATING_TEXT_LIFETIME,
            vel: Vec2::new(0.0, -FLOATING_TEXT_RISE),
        });
    }

    /// Centre of the canvas, where announcements appear
    pub fn screen_center() -> Vec2 {
        Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_on_menu() {
        let world = World::with_seed(Tuning::default(), 1);
        assert_eq!(world.phase, GamePhase::Menu);
        assert_eq!(world.wave, 1);
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn test_start_run_resets_player_and_counters() {
        let mut world = World::with_seed(Tuning::default(), 1);
        world.player.hp = 3.0;
        world.player.score = 900;
        world.wave = 7;
        world.screen_shake = 12.0;
        world.tasks.schedule(30, Task::MaterializeBoss(BossVariant::Camel));

        world.start_run(CharacterId::Biggie);

        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.player.hp, 100.0);
        assert_eq!(world.player.max_hp, 100.0);
        assert_eq!(world.player.score, 0);
        assert_eq!(world.player.character, CharacterId::Biggie);
        assert_eq!(world.wave, 1);
        assert_eq!(world.screen_shake, 0.0);
        assert!(world.tasks.is_empty());
        assert!(matches!(
            world.wave_state,
            WaveState::Spawning { remaining: 5, spawn_timer: 0 }
        ));
    }

    #[test]
    fn test_end_run_cancels_tasks_once() {
        let mut world = World::with_seed(Tuning::default(), 1);
        world.start_run(CharacterId::Default);
        world.tasks.schedule(60, Task::MaterializeBoss(BossVariant::TwoPac));
        world.end_run();
        world.end_run();
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(world.tasks.is_empty());
        let overs = world
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_particle_cap() {
        let mut world = World::with_seed(Tuning::default(), 1);
        world.max_particles = 10;
        world.spawn_particles(Vec2::ZERO, 0xffffff, 50, 10.0, 10.0);
        assert_eq!(world.particles.len(), 10);
        for p in &world.particles {
            assert!(p.life >= 20.0 && p.life < PARTICLE_MAX_LIFE);
        }
    }

    #[test]
    fn test_heal_is_never_timed() {
        assert_eq!(PowerupKind::Heal.timed(), None);
        assert_eq!(PowerupKind::RapidFire.timed(), Some(TimedPowerup::RapidFire));
        assert_eq!(PowerupKind::TripleShot.label(), "TRIPLE SHOT");
    }

    #[test]
    fn test_clamp_to_playfield() {
        let p = Player::clamp_to_playfield(Vec2::new(-500.0, 5000.0), PLAYER_RADIUS);
        assert_eq!(p, Vec2::new(PLAYER_RADIUS, PLAYFIELD_MAX_Y));
        let p = Player::clamp_to_playfield(Vec2::new(9000.0, -10.0), PLAYER_RADIUS);
        assert_eq!(p, Vec2::new(CANVAS_WIDTH - PLAYER_RADIUS, HORIZON_Y));
    }
}
