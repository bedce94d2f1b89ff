//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one frame. The steps run in
//! a fixed order and later steps read what earlier ones changed:
//! player, shot, formation turn, formation march, bombs, wave respawn.

use super::collision::anchor_hits;
use super::dice::Dice;
use super::state::{DefeatCause, GameEvent, GamePhase, GameState, Shot};

/// Player intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left direction held
    pub move_left: bool,
    /// Right direction held
    pub move_right: bool,
    /// Fire command (edge, not held state)
    pub fire: bool,
}

/// Result of one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// False once the session has ended
    pub still_running: bool,
    /// What happened this tick, in order
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    fn stopped(events: Vec<GameEvent>) -> Self {
        Self {
            still_running: false,
            events,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick<D: Dice + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    dice: &mut D,
) -> TickOutcome {
    let mut events = Vec::new();

    if state.phase == GamePhase::GameOver {
        return TickOutcome::stopped(events);
    }

    state.time_ticks += 1;

    // Enemies hit last tick have finished exploding
    state.formation.settle();

    // Player hit last tick: the explosion ends the session
    if state.player.life.settle() {
        log::info!(
            "Player destroyed at tick {} (score {}, wave {})",
            state.time_ticks,
            state.score,
            state.wave_index
        );
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver {
            cause: DefeatCause::PlayerDestroyed,
            score: state.score,
        });
        return TickOutcome::stopped(events);
    }

    if input.fire {
        fire(state, &mut events);
    }
    state
        .player
        .steer(input.move_left, input.move_right, state.config.player_speed);
    state.player.act(&state.config);

    update_shot(state, &mut events);

    state.formation.check_edges(&state.config);
    let invaded = state.formation.march(&state.config);

    update_bombs(state, dice, &mut events);

    check_wave_cleared(state, &mut events);

    if invaded {
        log::info!(
            "Enemies reached the ground at tick {} (score {}, wave {})",
            state.time_ticks,
            state.score,
            state.wave_index
        );
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver {
            cause: DefeatCause::Invaded,
            score: state.score,
        });
        return TickOutcome::stopped(events);
    }

    TickOutcome {
        still_running: true,
        events,
    }
}

/// Spawn a shot at the player unless one is already in flight
fn fire(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.shot.is_some() {
        return;
    }
    let pos = state.player.pos;
    state.shot = Some(Shot::new(pos));
    events.push(GameEvent::ShotFired { pos });
}

/// Resolve the shot against the grid, then move it up
fn update_shot(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(mut shot) = state.shot else {
        return;
    };

    let size = state.config.enemy_size();
    let hit = state
        .formation
        .enemies
        .iter()
        .position(|e| e.life.is_alive() && anchor_hits(shot.pos, e.pos, size));

    if let Some(index) = hit {
        let enemy = &mut state.formation.enemies[index];
        enemy.life.explode();
        state.score += 1;
        state.shot = None;
        log::debug!("Enemy {} destroyed at {} (score {})", index, enemy.pos, state.score);
        events.push(GameEvent::EnemyDestroyed {
            index,
            pos: enemy.pos,
        });
        return;
    }

    state.shot = shot.rise(state.config.shot_speed).then_some(shot);
}

/// Roll for new bombs, then move or resolve every bomb in flight
fn update_bombs<D: Dice + ?Sized>(
    state: &mut GameState,
    dice: &mut D,
    events: &mut Vec<GameEvent>,
) {
    let GameState {
        config,
        player,
        formation,
        ..
    } = state;
    let player_size = config.player_size();

    for (index, enemy) in formation.enemies.iter_mut().enumerate() {
        let roll = dice.roll(config.bomb_chance_sides);
        if roll == config.bomb_trigger && enemy.life.is_visible() && !enemy.bomb.active {
            enemy.bomb.launch(enemy.pos);
            events.push(GameEvent::BombFired {
                enemy: index,
                pos: enemy.pos,
            });
        }

        if !enemy.bomb.active {
            continue;
        }

        if player.life.is_visible() && anchor_hits(enemy.bomb.pos, player.pos, player_size) {
            if player.life.explode() {
                log::debug!("Player hit by bomb from enemy {}", index);
                events.push(GameEvent::PlayerHit { pos: player.pos });
            }
            enemy.bomb.deactivate();
        } else {
            enemy.bomb.fall(config);
        }
    }
}

/// Spawn a new wave once every enemy is gone and speed the game up
fn check_wave_cleared(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.formation.any_visible() {
        return;
    }

    state.wave_index += 1;
    state.formation.respawn(&state.config);

    let config = &state.config;
    if state.tick_interval_ms > config.tick_floor_ms {
        state.tick_interval_ms = state
            .tick_interval_ms
            .saturating_sub(config.tick_decrement_ms)
            .max(config.tick_floor_ms);
    }

    log::info!(
        "Wave {} cleared, tick interval now {}ms",
        state.wave_index,
        state.tick_interval_ms
    );
    events.push(GameEvent::WaveCleared {
        wave: state.wave_index,
        tick_interval_ms: state.tick_interval_ms,
    });
}
