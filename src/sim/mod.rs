//! Fixed-step simulation module
//!
//! All gameplay logic lives here:
//! - One step per display frame, no wall-clock time
//! - Seeded RNG owned by the world
//! - Delayed effects go through the frame scheduler
//! - No rendering or platform dependencies

pub mod backdrop;
pub mod collision;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod wave;

pub use backdrop::{Backdrop, Cloud, Star};
pub use collision::{Circle, circle_overlap, overlaps};
pub use schedule::{Scheduler, TaskHandle};
pub use state::{
    ActivePowerup, BossWarning, Bullet, BulletOwner, DEFAULT_MAX_PARTICLES, Enemy, EnemyKind,
    FloatingText, GameEvent, GamePhase, Particle, Player, Powerup, PowerupKind, Task, TimedPowerup,
    World,
};
pub use tick::{Aim, TickInput, tick};
pub use wave::{BossVariant, WavePhase, WaveState};
