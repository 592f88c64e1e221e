//! Dune Blaster entry point
//!
//! The browser build is driven from JS through the library's `WebGame`
//! export. Natively this runs a headless autoplay session and logs the
//! outcome, which is handy for balance checks:
//!
//! ```text
//! RUST_LOG=info dune-blaster [frames] [tuning.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dune_blaster::consts::*;
    use dune_blaster::persistence::MemoryStore;
    use dune_blaster::platform::Key;
    use dune_blaster::sim::{GameEvent, GamePhase, World};
    use dune_blaster::{Game, Settings, Tuning};
    use glam::Vec2;

    env_logger::init();
    log::info!("Dune Blaster (native) starting headless autoplay...");

    let mut args = std::env::args().skip(1);
    let frames: u32 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(120 * FRAMES_PER_SEC);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring {}: {}", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut game = Game::new(World::from_entropy(tuning), MemoryStore::new(), Settings::default());
    game.open_character_select();
    game.start_run();
    game.input.key_down(Key::Space);

    let mut kills = 0u32;
    for _ in 0..frames {
        // Aim at the closest enemy and drift toward its height
        let player = game.world.player.pos;
        let target = game
            .world
            .enemies
            .iter()
            .min_by(|a, b| a.pos.distance_squared(player).total_cmp(&b.pos.distance_squared(player)))
            .map(|e| e.pos);
        if let Some(target) = target {
            game.input.pointer_moved(target);
            let (up, down) = (target.y < player.y - 10.0, target.y > player.y + 10.0);
            if up {
                game.input.key_down(Key::W);
            } else {
                game.input.key_up(Key::W);
            }
            if down {
                game.input.key_down(Key::S);
            } else {
                game.input.key_up(Key::S);
            }
        } else {
            game.input.pointer_moved(Vec2::new(CANVAS_WIDTH, player.y));
        }

        game.frame();

        for event in game.drain_events() {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::BossArrived { variant } => log::info!("{} arrived", variant.name()),
                _ => {}
            }
        }
        if game.phase() == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "wave {} | score {} | kills {} | hp {:.0} | unlocked {}",
        game.world.wave,
        game.world.player.score,
        kills,
        game.world.player.hp.max(0.0),
        game.unlocks().len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start hook, this is just to satisfy the compiler
}
