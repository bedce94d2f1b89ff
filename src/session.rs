//! One play-through from first wave to game over
//!
//! Owns the game state and its seeded RNG. Front ends drive it with
//! [`Session::advance`] and draw from [`Session::snapshot`]. `state_mut` is
//! for tests and tools that need to stage a position.

use std::time::Duration;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::{
    ConfigError, Dice, Direction, GameState, Life, SimConfig, TickInput, TickOutcome, tick,
};

/// Position and life of a drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub pos: IVec2,
    pub life: Life,
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: EntityView,
    /// Row-major, one entry per grid slot (including gone enemies)
    pub enemies: Vec<EntityView>,
    pub shot: Option<IVec2>,
    /// One entry per enemy; `Some` while that enemy's bomb is falling
    pub bombs: Vec<Option<IVec2>>,
    pub direction: Direction,
    pub score: u32,
    pub wave: u32,
    pub tick_interval_ms: u64,
    pub time_ticks: u64,
    pub running: bool,
}

/// Final numbers handed to the high-score store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub waves_cleared: u32,
    pub ticks: u64,
    pub seed: u64,
}

/// A running game
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    rng: Pcg32,
    seed: u64,
}

impl Session {
    /// Validate the config and set up the first wave
    pub fn start(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!("Session started (seed {})", seed);
        Ok(Self {
            state: GameState::new(config),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        })
    }

    /// Run one tick with the session's own RNG
    pub fn advance(&mut self, input: &TickInput) -> TickOutcome {
        tick(&mut self.state, input, &mut self.rng)
    }

    /// Run one tick with an external random source
    pub fn advance_with<D: Dice + ?Sized>(&mut self, input: &TickInput, dice: &mut D) -> TickOutcome {
        tick(&mut self.state, input, dice)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            player: EntityView {
                pos: state.player.pos,
                life: state.player.life,
            },
            enemies: state
                .formation
                .enemies
                .iter()
                .map(|e| EntityView {
                    pos: e.pos,
                    life: e.life,
                })
                .collect(),
            shot: state.shot.map(|s| s.pos),
            bombs: state
                .formation
                .enemies
                .iter()
                .map(|e| e.bomb.active.then_some(e.bomb.pos))
                .collect(),
            direction: state.formation.direction,
            score: state.score,
            wave: state.wave_index,
            tick_interval_ms: state.tick_interval_ms,
            time_ticks: state.time_ticks,
            running: state.is_running(),
        }
    }

    /// Delay before the next tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.tick_interval_ms)
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.state.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Close the session and report the final score
    pub fn end(self) -> SessionSummary {
        let summary = SessionSummary {
            score: self.state.score,
            waves_cleared: self.state.wave_index,
            ticks: self.state.time_ticks,
            seed: self.seed,
        };
        log::info!(
            "Session ended: score {}, {} waves cleared, {} ticks",
            summary.score,
            summary.waves_cleared,
            summary.ticks
        );
        summary
    }
}
