//! Invaders - a fixed-timestep Space Invaders simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formation, collisions, tick)
//! - `session`: Session boundary around the simulation (start, advance, snapshot, end)
//! - `platform`: Frame clock and keyboard-to-intent mapping
//! - `renderer`: Terminal rendering of snapshots
//! - `audio`: Event-driven sound effects on a background worker
//! - `highscores`: `name:score` leaderboard persistence
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use session::{Session, SessionSummary, Snapshot};
pub use settings::Settings;
pub use sim::{GameEvent, SimConfig, TickInput, TickOutcome};

/// Game configuration constants
///
/// These are the defaults behind [`SimConfig`]; a session reads every value
/// through its config so tests and config files can override them.
pub mod consts {
    /// Board dimensions (pixels)
    pub const BOARD_WIDTH: i32 = 800;
    pub const BOARD_HEIGHT: i32 = 600;
    /// Y of the ground line; enemies crossing it win, bombs stop at it
    pub const GROUND: i32 = 540;

    /// Formation turns around when an enemy reaches these margins
    pub const BORDER_LEFT: i32 = 5;
    pub const BORDER_RIGHT: i32 = 60;

    /// Enemy grid
    pub const GRID_ROWS: usize = 4;
    pub const GRID_COLUMNS: usize = 6;
    pub const GRID_SPACING: i32 = 44;
    pub const ENEMY_INIT_X: i32 = 150;
    pub const ENEMY_INIT_Y: i32 = 5;
    pub const ENEMY_WIDTH: i32 = 40;
    pub const ENEMY_HEIGHT: i32 = 40;
    /// Horizontal pixels per tick
    pub const ENEMY_SPEED: i32 = 1;
    /// Vertical shift applied to the whole formation on each turn
    pub const DESCEND_STEP: i32 = 15;

    /// Player ship
    pub const PLAYER_WIDTH: i32 = 50;
    pub const PLAYER_HEIGHT: i32 = 50;
    pub const PLAYER_START_X: i32 = 375;
    pub const PLAYER_START_Y: i32 = 480;
    pub const PLAYER_SPEED: i32 = 2;
    pub const PLAYER_MIN_X: i32 = 2;

    /// Player shot moves up this many pixels per tick
    pub const SHOT_SPEED: i32 = 4;

    /// Enemy bombs
    pub const BOMB_HEIGHT: i32 = 5;
    pub const BOMB_SPEED: i32 = 1;
    /// Each enemy rolls `0..BOMB_CHANCE_SIDES` per tick and fires on `BOMB_TRIGGER`
    pub const BOMB_CHANCE_SIDES: u32 = 15;
    pub const BOMB_TRIGGER: u32 = 5;

    /// Tick interval (milliseconds); shrinks by the decrement on every cleared wave
    pub const INITIAL_TICK_MS: u64 = 17;
    pub const TICK_FLOOR_MS: u64 = 0;
    pub const TICK_DECREMENT_MS: u64 = 1;

    /// Maximum ticks the frame clock releases per poll
    pub const MAX_SUBSTEPS: u32 = 8;
}
