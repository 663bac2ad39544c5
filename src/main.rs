//! Arena RPG entry point
//!
//! Runs a headless scripted session against the simulation core and prints
//! the final snapshot. Set `RUST_LOG=info` (or `debug`) to follow along.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arena_rpg::consts::MAX_FRAME_DT;
    use arena_rpg::persistence;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(300.0);

    log::info!("Arena RPG (headless) starting: seed {}, {}s", seed, seconds);
    let game = demo::run(seed, seconds, (1.0 / 60.0_f32).min(MAX_FRAME_DT));

    let player = game.player();
    log::info!(
        "Finished in chapter {} at level {} with {} gold",
        game.state().progress.chapter,
        player.level,
        player.gold
    );

    match persistence::encode(&game.export_snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless session on the web; embedders drive `Game` directly
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use arena_rpg::sim::GameEvent;
    use arena_rpg::{AbilitySlot, Game, ShopItem, StatKind};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const STAT_ROTATION: [StatKind; 4] = [StatKind::Atk, StatKind::Hp, StatKind::Def, StatKind::Spd];

    /// Drive a scripted player for `seconds` of game time
    pub fn run(seed: u64, seconds: f32, dt: f32) -> Game {
        let mut game = Game::new(seed);
        // Input script has its own stream so the simulation stays reproducible
        let mut script = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let frames = (seconds / dt) as u32;
        let mut stat_index = 0;

        game.set_attack_intent(true);
        for frame in 0..frames {
            if frame % 30 == 0 {
                game.set_movement_intent(
                    script.random_bool(0.5),
                    script.random_bool(0.5),
                    script.random_bool(0.5),
                    script.random_bool(0.5),
                );
            }
            game.set_ability_intent(AbilitySlot::Dash, frame % 180 == 0);
            game.set_ability_intent(AbilitySlot::RapidFire, frame % 240 == 0);
            game.set_ability_intent(AbilitySlot::Barrage, frame % 360 == 0);
            game.set_ability_intent(AbilitySlot::KnockbackOrAdvance, frame % 90 == 0);

            game.update(dt);

            for event in game.drain_events() {
                match event {
                    GameEvent::StoryIntro { chapter } => {
                        log::info!("Story for chapter {} (auto-dismissed)", chapter);
                        game.dismiss_story();
                    }
                    GameEvent::AwaitingAdvance { next } => {
                        log::info!("Continuing to chapter {}", next);
                        game.acknowledge();
                    }
                    GameEvent::LevelUp { level } => {
                        log::info!("Level up: {}", level);
                        while game.player().stat_points > 0 {
                            game.allocate_stat_point(STAT_ROTATION[stat_index % 4]);
                            stat_index += 1;
                        }
                    }
                    GameEvent::Victory => {
                        log::info!("Victory after {} frames", frame + 1);
                        return game;
                    }
                    GameEvent::PlayerDefeated => log::info!("Player defeated"),
                    other => log::debug!("{:?}", other),
                }
            }

            let player = game.player();
            if player.hp < player.max_hp * 0.3 {
                game.purchase(ShopItem::Heal);
            }
            game.purchase(ShopItem::Weapon);
        }
        game
    }
}
