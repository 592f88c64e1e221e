//! End-to-end runs through the public API

use dune_blaster::cheat::{CHEAT_DETONATION_FRAMES, CHEAT_SEQUENCE, CHEAT_WINDOW_FRAMES};
use dune_blaster::consts::*;
use dune_blaster::persistence::{MemoryStore, UnlockStore};
use dune_blaster::platform::Key;
use dune_blaster::sim::{
    ActivePowerup, Aim, Bullet, BulletOwner, EnemyKind, GamePhase, TickInput, TimedPowerup, WaveState,
    World, tick,
};
use dune_blaster::{CharacterId, Game, Settings, Tuning, Unlocks};
use glam::Vec2;
use proptest::prelude::*;

fn playing_world(seed: u64) -> World {
    let mut world = World::with_seed(Tuning::default(), seed);
    world.start_run(CharacterId::Default);
    world
}

fn enemy_bullet(world: &mut World, pos: Vec2, damage: f32) {
    let id = world.next_entity_id();
    world.bullets.push(Bullet {
        id,
        pos,
        radius: BOSS_BULLET_RADIUS,
        vel: Vec2::ZERO,
        damage,
        life: 100,
        owner: BulletOwner::Enemy,
        rotation: 0.0,
    });
}

#[test]
fn run_start_queues_first_wave() {
    let mut world = playing_world(1);
    assert_eq!(world.player.hp, 100.0);
    assert_eq!(world.player.max_hp, 100.0);
    assert_eq!(world.player.score, 0);
    assert_eq!(world.wave, 1);
    assert!(matches!(world.wave_state, WaveState::Spawning { remaining: 5, .. }));

    tick(&mut world, &TickInput::default());

    assert_eq!(world.enemies.len(), 1);
    let enemy = &world.enemies[0];
    assert_eq!(enemy.kind, EnemyKind::Basic);
    assert!(enemy.pos.x > CANVAS_WIDTH);
    assert!(enemy.pos.y >= HORIZON_Y && enemy.pos.y <= PLAYFIELD_MAX_Y);
}

#[test]
fn triple_shot_fans_three_bullets() {
    let mut world = playing_world(2);
    world.player.powerup = Some(ActivePowerup {
        kind: TimedPowerup::TripleShot,
        frames_left: 200,
    });
    let rotation = 0.4;
    tick(
        &mut world,
        &TickInput {
            aim: Aim::Angle(rotation),
            fire: true,
            ..Default::default()
        },
    );

    let mut angles: Vec<f32> = world
        .bullets
        .iter()
        .filter(|b| b.owner == BulletOwner::Player)
        .map(|b| b.rotation)
        .collect();
    angles.sort_by(f32::total_cmp);
    assert_eq!(angles.len(), 3);
    let expected = [rotation - 0.15, rotation, rotation + 0.15];
    for (got, want) in angles.iter().zip(expected) {
        assert!((got - want).abs() < 1e-5, "{} vs {}", got, want);
    }
}

#[test]
fn lethal_bullet_ends_run_in_same_step() {
    let mut world = playing_world(3);
    world.wave_state = WaveState::Spawning {
        remaining: 1,
        spawn_timer: 10_000,
    };
    world.player.hp = 10.0;
    let pos = world.player.pos;
    enemy_bullet(&mut world, pos, 10.0);
    enemy_bullet(&mut world, pos, 10.0);

    tick(&mut world, &TickInput::default());

    assert_eq!(world.phase, GamePhase::GameOver);
    // The second bullet never reaches a downed player
    assert_eq!(world.player.hp, 0.0);

    let frozen = world.player.clone();
    tick(
        &mut world,
        &TickInput {
            movement: Vec2::X,
            fire: true,
            ..Default::default()
        },
    );
    assert_eq!(world.player.pos, frozen.pos);
    assert_eq!(world.player.hp, frozen.hp);
}

#[test]
fn cheat_sequence_unlocks_all_fighters() {
    let mut game = Game::new(
        World::with_seed(Tuning::default(), 4),
        MemoryStore::new(),
        Settings::default(),
    );
    game.key_down("C", true);
    for _ in 0..120 {
        game.frame();
    }
    for key in CHEAT_SEQUENCE {
        let name = match key {
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowLeft => "ArrowLeft",
            _ => "ArrowRight",
        };
        game.key_down(name, false);
        game.key_up(name);
    }

    assert!(!game.cheat().is_open());
    for id in CharacterId::ALL {
        assert!(game.unlocks().is_unlocked(id));
    }
    // Persisted, and a fresh session sees the same list
    let stored = game.store().read().expect("memory store reads");
    let reloaded = Unlocks::from_json(stored.as_deref().unwrap_or("")).expect("valid payload");
    assert_eq!(&reloaded, game.unlocks());

    // Runs well past the window without detonating
    for _ in 0..CHEAT_WINDOW_FRAMES + CHEAT_DETONATION_FRAMES {
        game.frame();
    }
    assert_eq!(game.phase(), GamePhase::Menu);
    assert_eq!(game.world.screen_shake, 0.0);
}

#[test]
fn corrupt_unlock_data_falls_back_to_default() {
    let game = Game::new(
        World::with_seed(Tuning::default(), 5),
        MemoryStore::with_payload("{not json"),
        Settings::default(),
    );
    assert_eq!(game.unlocks().len(), 1);
    assert!(game.unlocks().is_unlocked(CharacterId::Default));
}

/// Autoplay input: aim at the nearest enemy and keep firing
fn autoplay(world: &World, movement: Vec2) -> TickInput {
    let target = world
        .enemies
        .iter()
        .map(|e| e.pos)
        .min_by(|a, b| {
            a.distance_squared(world.player.pos)
                .total_cmp(&b.distance_squared(world.player.pos))
        })
        .unwrap_or(Vec2::new(CANVAS_WIDTH, world.player.pos.y));
    TickInput {
        movement,
        aim: Aim::Pointer(target),
        fire: true,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn player_stays_in_playfield(
        seed in any::<u64>(),
        moves in prop::collection::vec((-50.0f32..50.0, -50.0f32..50.0), 1..300),
    ) {
        let mut world = playing_world(seed);
        for (x, y) in moves {
            let input = TickInput { movement: Vec2::new(x, y), ..Default::default() };
            tick(&mut world, &input);
            let p = world.player.pos;
            let r = world.player.radius;
            prop_assert!(p.x >= r && p.x <= CANVAS_WIDTH - r);
            prop_assert!(p.y >= HORIZON_Y && p.y <= PLAYFIELD_MAX_Y);
        }
    }

    #[test]
    fn bullet_lifetimes_only_count_down(seed in any::<u64>(), frames in 50usize..400) {
        let mut world = playing_world(seed);
        for _ in 0..frames {
            let before: Vec<(u32, u32)> = world.bullets.iter().map(|b| (b.id, b.life)).collect();
            let input = autoplay(&world, Vec2::ZERO);
            tick(&mut world, &input);

            for b in &world.bullets {
                prop_assert!(b.life > 0);
                if let Some(&(_, life)) = before.iter().find(|(id, _)| *id == b.id) {
                    prop_assert_eq!(b.life, life - 1);
                }
            }
        }
    }

    #[test]
    fn wave_counter_never_decreases(seed in any::<u64>(), sway in -1.0f32..1.0) {
        let mut world = playing_world(seed);
        world.tuning.player_max_hp = 10_000.0;
        world.player.hp = 10_000.0;
        world.player.max_hp = 10_000.0;
        world.tuning.wave_delay = 20;

        let mut last = world.wave;
        for frame in 0..3000u32 {
            let dir = if (frame / 90) % 2 == 0 { sway } else { -sway };
            let input = autoplay(&world, Vec2::new(0.0, dir));
            tick(&mut world, &input);
            prop_assert!(world.wave >= last);
            prop_assert!(world.wave - last <= 1);
            last = world.wave;
            if world.phase != GamePhase::Playing {
                break;
            }
        }
    }

    #[test]
    fn hp_never_rises_without_pickups(seed in any::<u64>(), frames in 100usize..600) {
        let mut world = playing_world(seed);
        world.tuning.powerup_drop_chance = -1.0;
        for _ in 0..frames {
            let before = world.player.hp;
            tick(&mut world, &TickInput::default());
            prop_assert!(world.player.hp <= before);
        }
    }

    #[test]
    fn hp_unchanged_when_nothing_touches_player(
        seed in any::<u64>(),
        moves in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0, any::<bool>()), 1..300),
    ) {
        let mut world = playing_world(seed);
        world.wave_state = WaveState::Spawning {
            remaining: 5,
            spawn_timer: 100_000,
        };
        let hp = world.player.hp;
        for (x, y, fire) in moves {
            let input = TickInput {
                movement: Vec2::new(x, y),
                aim: Aim::Angle(0.0),
                fire,
            };
            tick(&mut world, &input);
            prop_assert!(world.enemies.is_empty());
            prop_assert!(world.bullets.iter().all(|b| b.owner == BulletOwner::Player));
            prop_assert_eq!(world.player.hp, hp);
        }
    }

    #[test]
    fn unlocking_is_idempotent(picks in prop::collection::vec(0usize..7, 0..20)) {
        let mut unlocks = Unlocks::default();
        for i in &picks {
            unlocks.unlock(CharacterId::ALL[*i]);
        }
        let once = unlocks.clone();
        for i in &picks {
            prop_assert!(!unlocks.unlock(CharacterId::ALL[*i]));
        }
        prop_assert_eq!(&unlocks, &once);
        prop_assert!(unlocks.is_unlocked(CharacterId::Default));
        prop_assert!(unlocks.len() <= CharacterId::ALL.len());
    }
}
