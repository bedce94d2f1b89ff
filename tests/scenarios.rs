//! Whole-session scenarios driven through the public API

use std::time::Duration;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use invaders::sim::{DefeatCause, GameEvent, Life, ScriptedDice, Shot};
use invaders::{Session, SimConfig, TickInput};

fn idle() -> TickInput {
    TickInput::default()
}

fn single_enemy() -> SimConfig {
    SimConfig {
        grid_rows: 1,
        grid_columns: 1,
        ..Default::default()
    }
}

#[test]
fn clearing_a_wave_respawns_and_speeds_up() {
    let mut session = Session::start(single_enemy(), 11).unwrap();
    let mut dice = ScriptedDice::always(0);
    let target = session.state().formation.enemies[0].pos;
    session.state_mut().shot = Some(Shot::new(target));

    let outcome = session.advance_with(&idle(), &mut dice);
    assert!(matches!(
        outcome.events[..],
        [GameEvent::EnemyDestroyed { index: 0, .. }]
    ));
    assert_eq!(session.snapshot().enemies[0].life, Life::Exploding);

    let outcome = session.advance_with(&idle(), &mut dice);
    assert_eq!(
        outcome.events,
        vec![GameEvent::WaveCleared {
            wave: 1,
            tick_interval_ms: 16
        }]
    );
    let snap = session.snapshot();
    assert_eq!(snap.wave, 1);
    assert_eq!(snap.score, 1);
    assert_eq!(snap.enemies[0].life, Life::Alive);
    assert_eq!(snap.enemies[0].pos, session.config().grid_position(0, 0));
    assert_eq!(session.tick_interval(), Duration::from_millis(16));
}

#[test]
fn bomb_on_player_ends_the_session() {
    let mut session = Session::start(single_enemy(), 5).unwrap();
    let mut dice = ScriptedDice::always(0);
    let player = session.state().player.pos;
    session.state_mut().formation.enemies[0]
        .bomb
        .launch(player + IVec2::new(10, 10));

    let outcome = session.advance_with(&idle(), &mut dice);
    assert_eq!(outcome.events, vec![GameEvent::PlayerHit { pos: player }]);
    assert!(outcome.still_running);
    assert_eq!(session.snapshot().player.life, Life::Exploding);

    let outcome = session.advance_with(&idle(), &mut dice);
    assert!(!outcome.still_running);
    assert_eq!(
        outcome.events,
        vec![GameEvent::GameOver {
            cause: DefeatCause::PlayerDestroyed,
            score: 0
        }]
    );

    // Nothing moves after the end
    let before = session.snapshot();
    let outcome = session.advance_with(&TickInput { fire: true, ..idle() }, &mut dice);
    assert!(outcome.events.is_empty());
    assert_eq!(session.snapshot(), before);

    let summary = session.end();
    assert_eq!(summary.score, 0);
    assert_eq!(summary.ticks, 2);
}

#[test]
fn formation_reaching_the_ground_invades() {
    let config = SimConfig {
        descend_step: 150,
        enemy_speed: 10,
        ..single_enemy()
    };
    let mut session = Session::start(config, 9).unwrap();
    let mut dice = ScriptedDice::always(0);

    let mut last = None;
    for _ in 0..5_000 {
        let outcome = session.advance_with(&idle(), &mut dice);
        if !outcome.still_running {
            last = Some(outcome);
            break;
        }
    }
    let last = last.expect("formation never landed");
    assert_eq!(
        last.events.last(),
        Some(&GameEvent::GameOver {
            cause: DefeatCause::Invaded,
            score: 0
        })
    );
    assert!(!session.is_running());
    let ground = session.config().ground - session.config().enemy_height;
    assert!(session.snapshot().enemies[0].pos.y > ground);
}

#[test]
fn partial_config_drives_a_session() {
    let config = SimConfig::from_json(r#"{ "grid_rows": 2, "grid_columns": 3 }"#).unwrap();
    let session = Session::start(config, 1).unwrap();
    let snap = session.snapshot();
    assert_eq!(snap.enemies.len(), 6);
    assert_eq!(snap.enemies[4].pos, IVec2::new(150 + 44, 5 + 44));
}

#[test]
fn bomb_rate_matches_one_in_fifteen() {
    let mut session = Session::start(SimConfig::default(), 0).unwrap();
    let mut rng = Pcg32::seed_from_u64(0x5eed);
    let ticks = 2_000;
    let mut fired = 0usize;

    for _ in 0..ticks {
        // Every slot free, so every enemy gets a fair roll each tick
        for enemy in &mut session.state_mut().formation.enemies {
            enemy.bomb.deactivate();
        }
        let outcome = session.advance_with(&idle(), &mut rng);
        assert!(outcome.still_running);
        fired += outcome
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BombFired { .. }))
            .count();
    }

    let trials = ticks * session.config().wave_size();
    let rate = fired as f64 / trials as f64;
    assert!(
        (rate - 1.0 / 15.0).abs() < 0.006,
        "bomb rate {rate} too far from 1/15"
    );
}
