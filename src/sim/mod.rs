//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Randomness only through an injected [`Dice`]
//! - Stable iteration order (row-major enemy grid)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod config;
pub mod dice;
pub mod formation;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, anchor_hits};
pub use config::{ConfigError, SimConfig};
pub use dice::{Dice, ScriptedDice};
pub use formation::{Direction, Formation};
pub use state::{
    Bomb, DefeatCause, Enemy, GameEvent, GamePhase, GameState, Life, Player, Shot,
};
pub use tick::{TickInput, TickOutcome, tick};
