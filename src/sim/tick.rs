//! Fixed-step simulation tick
//!
//! One call advances the world by exactly one display frame. Order matters:
//! player, scheduled tasks, spawning, bullets, enemies, hits, pickups,
//! then cosmetics.

use glam::Vec2;

use super::collision::{circle_overlap, overlaps, push_direction};
use super::state::{
    ActivePowerup, Bullet, BulletOwner, EnemyKind, GameEvent, GamePhase, Player, Task, TimedPowerup,
    World,
};
use crate::consts::*;
use crate::{angle_to, direction};

/// Where the player is aiming
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Aim {
    /// Keep the current facing
    #[default]
    Hold,
    /// Face a point on the canvas (mouse)
    Pointer(Vec2),
    /// Face an absolute angle (right stick)
    Angle(f32),
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    /// Desired movement; anything longer than 1 is clamped
    pub movement: Vec2,
    pub aim: Aim,
    /// Trigger held
    pub fire: bool,
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput) {
    // Backdrop animates in every phase
    world.backdrop.advance(&mut world.rng);
    world.frame += 1;

    if world.phase != GamePhase::Playing {
        return;
    }

    update_player(world, input);
    run_due_tasks(world);
    world.update_waves();

    // Bullets fly, then expire
    for bullet in world.bullets.iter_mut() {
        bullet.pos += bullet.vel;
        bullet.life = bullet.life.saturating_sub(1);
    }
    world.bullets.retain(Bullet::is_live);

    update_enemies(world);
    resolve_bullet_hits(world);
    world.enemies.retain(|e| e.is_alive());

    update_powerups(world);

    // Particles
    for p in world.particles.iter_mut() {
        p.pos += p.vel;
        p.vel.x *= PARTICLE_DRAG_X;
        p.vel.y += PARTICLE_GRAVITY;
        if p.pos.y > GROUND_Y {
            p.pos.y = GROUND_Y;
            p.vel.y *= PARTICLE_BOUNCE;
        }
        p.life -= 1.0;
        p.rotation += PARTICLE_SPIN;
    }
    world.particles.retain(|p| p.life > 0.0);

    // Floating text
    for t in world.texts.iter_mut() {
        t.pos += t.vel;
        t.life = t.life.saturating_sub(1);
    }
    world.texts.retain(|t| t.life > 0);

    // Decay screen shake
    if world.screen_shake > 0.0 {
        world.screen_shake *= SHAKE_DECAY;
    }
    if world.screen_shake < SHAKE_FLOOR {
        world.screen_shake = 0.0;
    }
}

/// Movement, aim, cooldowns and firing
fn update_player(world: &mut World, input: &TickInput) {
    let speed = world.tuning.player_speed;
    let player = &mut world.player;

    let movement = input.movement.clamp_length_max(1.0);
    let next = Player::clamp_to_playfield(player.pos + movement * speed, player.radius);
    player.vel = next - player.pos;
    player.pos = next;

    match input.aim {
        Aim::Hold => {}
        Aim::Pointer(target) => player.rotation = angle_to(player.pos, target),
        Aim::Angle(angle) => player.rotation = angle,
    }

    player.fire_cooldown = player.fire_cooldown.saturating_sub(1);
    player.muzzle_flash = player.muzzle_flash.saturating_sub(1);
    if player.recoil > 0.0 {
        player.recoil *= RECOIL_DECAY;
    }
    if let Some(active) = player.powerup.as_mut() {
        active.frames_left = active.frames_left.saturating_sub(1);
        if active.frames_left == 0 {
            player.powerup = None;
        }
    }

    if input.fire && player.fire_cooldown == 0 {
        fire(world);
    }
}

fn fire(world: &mut World) {
    let triple = world.player.has_powerup(TimedPowerup::TripleShot);
    let rapid = world.player.has_powerup(TimedPowerup::RapidFire);
    let offsets: &[f32] = if triple {
        &[0.0, -TRIPLE_SHOT_SPREAD, TRIPLE_SHOT_SPREAD]
    } else {
        &[0.0]
    };

    for &offset in offsets {
        let angle = world.player.rotation + offset;
        let muzzle = world.player.pos + direction(angle) * MUZZLE_DISTANCE + Vec2::new(0.0, MUZZLE_DROP);
        let id = world.next_entity_id();
        world.bullets.push(Bullet {
            id,
            pos: muzzle,
            radius: BULLET_RADIUS,
            vel: direction(angle) * world.tuning.bullet_speed,
            damage: world.tuning.bullet_damage,
            life: world.tuning.bullet_lifetime,
            owner: BulletOwner::Player,
            rotation: angle,
        });
        world.spawn_particles(muzzle, colors::WHITE, 5, 4.0, 3.0);
    }

    let player = &mut world.player;
    player.fire_cooldown = world.tuning.fire_interval(rapid);
    player.recoil = RECOIL_KICK;
    player.muzzle_flash = MUZZLE_FLASH_FRAMES;
    world.screen_shake = (world.screen_shake + SHAKE_FIRE).min(SHAKE_FIRE_CAP);
    world.events.push(GameEvent::ShotFired {
        bullets: offsets.len() as u32,
    });
}

fn run_due_tasks(world: &mut World) {
    for (_, task) in world.tasks.advance() {
        match task {
            Task::MaterializeBoss(variant) => world.materialize_boss(variant),
            Task::AnnounceAtPlayer { text, color } => {
                let pos = world.player.pos;
                world.spawn_text(pos, text, color);
            }
        }
    }

    if let Some(warning) = world.boss_warning.as_mut() {
        warning.frames_left = warning.frames_left.saturating_sub(1);
        if warning.frames_left == 0 {
            world.boss_warning = None;
        }
    }
}

/// Enemy AI, boss volleys and contact damage
fn update_enemies(world: &mut World) {
    let player_pos = world.player.pos;
    let player_vel = world.player.vel;
    let player_radius = world.player.radius;
    let sway_target = CANVAS_HEIGHT / 2.0 + (world.frame as f32 * BOSS_SWAY_FREQ).sin() * BOSS_SWAY_AMPLITUDE;
    let contact_damage = world.tuning.contact_damage;
    let boss_damage = world.tuning.boss_bullet_damage;

    // Separation reads positions from the start of the frame
    let bodies: Vec<(Vec2, f32)> = world.enemies.iter().map(|e| (e.pos, e.radius)).collect();
    let mut volleys: Vec<Vec2> = Vec::new();

    for (i, enemy) in world.enemies.iter_mut().enumerate() {
        let leads = enemy.kind == EnemyKind::Fast;
        let step = match &mut enemy.kind {
            EnemyKind::Basic | EnemyKind::Fast => {
                let target = if leads {
                    player_pos + player_vel * FAST_LEAD_FRAMES
                } else {
                    player_pos
                };
                let mut step = (target - enemy.pos).normalize_or_zero() * enemy.speed;
                for (j, &(other_pos, other_radius)) in bodies.iter().enumerate() {
                    if i != j && circle_overlap(enemy.pos, enemy.radius, other_pos, other_radius) {
                        step += push_direction(other_pos, enemy.pos) * SEPARATION_PUSH;
                    }
                }
                step
            }
            EnemyKind::Tank => {
                enemy.pos.y = GROUND_Y - enemy.radius + 10.0;
                Vec2::new(-enemy.speed, 0.0)
            }
            EnemyKind::Boss { attack_cooldown, .. } => {
                if *attack_cooldown > 0 {
                    *attack_cooldown -= 1;
                } else {
                    volleys.push(enemy.pos);
                    *attack_cooldown = BOSS_ATTACK_FRAMES;
                }
                if enemy.pos.x > CANVAS_WIDTH - BOSS_STANDOFF {
                    Vec2::new(-enemy.speed, 0.0)
                } else {
                    Vec2::new(0.0, (sway_target - enemy.pos.y) * BOSS_TRACKING)
                }
            }
        };

        if step != Vec2::ZERO && !enemy.kind.is_boss() {
            enemy.rotation = step.y.atan2(step.x);
        }
        enemy.pos += step;
        enemy.hit_flash = enemy.hit_flash.saturating_sub(1);

        // Contact damage stops once the player is down
        if world.player.hp > 0.0 && circle_overlap(player_pos, player_radius, enemy.pos, enemy.radius) {
            world.player.hp -= contact_damage;
            world.screen_shake += SHAKE_CONTACT;
        }
    }

    for origin in volleys {
        let muzzle = Vec2::new(origin.x - BOSS_MUZZLE_OFFSET, origin.y);
        let aim = angle_to(origin, player_pos);
        for offset in BOSS_SPREAD {
            let angle = aim + offset;
            let id = world.next_entity_id();
            world.bullets.push(Bullet {
                id,
                pos: muzzle,
                radius: BOSS_BULLET_RADIUS,
                vel: direction(angle) * BOSS_BULLET_SPEED,
                damage: boss_damage,
                life: BOSS_BULLET_LIFETIME,
                owner: BulletOwner::Enemy,
                rotation: angle,
            });
        }
    }

    if !world.player.is_alive() {
        world.end_run();
    }
}

/// Bullet-vs-player and bullet-vs-enemy hits, in bullet order
fn resolve_bullet_hits(world: &mut World) {
    for bi in 0..world.bullets.len() {
        // Nothing reaches the player once they are down
        if !world.player.is_alive() {
            break;
        }
        let bullet = &world.bullets[bi];
        if !bullet.is_live() {
            continue;
        }

        let owner = bullet.owner;
        match owner {
            BulletOwner::Enemy => {
                if overlaps(bullet, &world.player) {
                    let damage = bullet.damage;
                    world.bullets[bi].life = 0;
                    world.player.hp -= damage;
                    world.add_shake(SHAKE_PLAYER_HIT);
                    world.events.push(GameEvent::PlayerHit { damage });
                }
            }
            BulletOwner::Player => {
                // A bullet stops at the first live enemy it touches
                let Some(ei) = world.enemies.iter().position(|e| e.is_alive() && overlaps(bullet, e)) else {
                    continue;
                };
                let (pos, damage) = (bullet.pos, bullet.damage);
                world.bullets[bi].life = 0;

                let enemy = &mut world.enemies[ei];
                enemy.hp -= damage;
                enemy.hit_flash = HIT_FLASH_FRAMES;
                let killed = !enemy.is_alive();
                world.spawn_particles(pos, colors::BULLET, 4, 5.0, 3.0);
                if killed {
                    kill_enemy(world, ei);
                }
            }
        }
    }

    if !world.player.is_alive() {
        world.end_run();
    }
    world.bullets.retain(Bullet::is_live);
}

/// Score, effects and drops for an enemy that just reached 0 HP
fn kill_enemy(world: &mut World, index: usize) {
    let enemy = &world.enemies[index];
    let (id, kind, value, pos) = (enemy.id, enemy.kind, enemy.value, enemy.pos);

    world.player.score += u64::from(value);
    world.add_shake(if kind.is_boss() { SHAKE_BOSS_KILL } else { SHAKE_KILL });
    world.spawn_text(pos, format!("+{}", value), colors::WHITE);
    world.events.push(GameEvent::EnemyKilled { id, kind, value, pos });

    if let EnemyKind::Boss { variant, .. } = kind {
        world.spawn_particles(pos, colors::ENEMY_BOSS, 50, 10.0, 10.0);
        world.spawn_text(pos, format!("{} DEFEATED!", variant.name()), colors::GOLD);
        world.events.push(GameEvent::BossDefeated { variant });
        world.on_boss_defeated(variant);
    } else {
        world.spawn_particles(pos, colors::ENEMY_BASIC, 12, 6.0, 8.0);
    }

    world.roll_powerup_drop(pos);
}

/// Age pickups out, then collect any the player touches
fn update_powerups(world: &mut World) {
    for p in world.powerups.iter_mut() {
        p.life = p.life.saturating_sub(1);
    }
    world.powerups.retain(|p| p.life > 0);

    if !world.player.is_alive() {
        return;
    }

    let player = &world.player;
    let mut collected = Vec::new();
    world.powerups.retain(|p| {
        if overlaps(player, p) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        let pos = world.player.pos;
        world.spawn_text(pos, kind.label(), colors::GREEN);
        match kind.timed() {
            Some(timed) => {
                world.player.powerup = Some(ActivePowerup {
                    kind: timed,
                    frames_left: world.tuning.powerup_duration,
                });
            }
            None => {
                let player = &mut world.player;
                player.hp = (player.hp + world.tuning.heal_amount).min(player.max_hp);
            }
        }
        world.events.push(GameEvent::PowerupCollected { kind });
        log::debug!("Collected {}", kind.label());
    }
}
