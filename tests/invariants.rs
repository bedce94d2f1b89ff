//! Properties that hold for any seed and any input sequence

use proptest::prelude::*;

use invaders::sim::{GameEvent, Life};
use invaders::{Session, SimConfig, TickInput};

fn inputs() -> impl Strategy<Value = Vec<TickInput>> {
    prop::collection::vec(
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(move_left, move_right, fire)| {
            TickInput {
                move_left,
                move_right,
                fire,
            }
        }),
        1..800,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn session_invariants_hold(seed in any::<u64>(), inputs in inputs()) {
        let config = SimConfig::default();
        let mut session = Session::start(config.clone(), seed).unwrap();
        let mut score = 0;
        let mut interval = session.tick_interval();
        let mut player_hits = 0;
        let mut game_overs = 0;

        for input in &inputs {
            let was_running = session.is_running();
            let outcome = session.advance(input);
            let snap = session.snapshot();

            if !was_running {
                prop_assert!(outcome.events.is_empty());
                prop_assert!(!outcome.still_running);
                continue;
            }

            // Score rises by exactly one per destroyed enemy
            let destroyed = outcome
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
                .count() as u32;
            prop_assert!(destroyed <= 1);
            prop_assert_eq!(snap.score, score + destroyed);
            score = snap.score;

            // Interval only shrinks, never below the floor
            let now = session.tick_interval();
            prop_assert!(now <= interval);
            prop_assert!(snap.tick_interval_ms >= config.tick_floor_ms);
            interval = now;

            prop_assert_eq!(snap.enemies.len(), config.wave_size());
            prop_assert_eq!(snap.bombs.len(), config.wave_size());
            prop_assert!(snap.player.pos.x >= config.player_min_x);
            prop_assert!(snap.player.pos.x <= config.player_max_x());

            // Gone enemies never carry a new bomb
            for event in &outcome.events {
                if let GameEvent::BombFired { enemy, .. } = event {
                    prop_assert!(snap.enemies[*enemy].life != Life::Gone);
                }
            }

            player_hits += outcome
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
                .count();
            let over = outcome
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
            game_overs += over;
            prop_assert_eq!(outcome.still_running, over == 0);
            prop_assert_eq!(outcome.still_running, snap.running);
        }

        prop_assert!(player_hits <= 1);
        prop_assert!(game_overs <= 1);
    }

    #[test]
    fn same_seed_and_inputs_replay_exactly(seed in any::<u64>(), inputs in inputs()) {
        let mut a = Session::start(SimConfig::default(), seed).unwrap();
        let mut b = Session::start(SimConfig::default(), seed).unwrap();
        for input in &inputs {
            prop_assert_eq!(a.advance(input), b.advance(input));
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }
}
