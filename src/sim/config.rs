//! Simulation configuration
//!
//! Fixed for the lifetime of a session. Defaults come from [`crate::consts`];
//! a JSON file may override any subset of fields.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a configuration cannot drive a session
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: i64 },
    #[error("enemy grid must have at least one row and one column")]
    EmptyGrid,
    #[error("ground line {ground} must lie inside the board height {height}")]
    GroundOutOfBoard { ground: i32, height: i32 },
    #[error("side margins leave no room to move (left {left}, right {right}, width {width})")]
    NoSweepRoom { left: i32, right: i32, width: i32 },
    #[error("bomb trigger {trigger} can never be rolled on 0..{sides}")]
    UnreachableTrigger { trigger: u32, sides: u32 },
    #[error("tick floor {floor}ms is above the initial interval {initial}ms")]
    FloorAboveInitial { floor: u64, initial: u64 },
}

/// Every tunable of the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub board_width: i32,
    pub board_height: i32,
    pub ground: i32,
    pub border_left: i32,
    pub border_right: i32,

    pub grid_rows: usize,
    pub grid_columns: usize,
    pub grid_spacing: i32,
    pub enemy_init_x: i32,
    pub enemy_init_y: i32,
    pub enemy_width: i32,
    pub enemy_height: i32,
    pub enemy_speed: i32,
    pub descend_step: i32,

    pub player_width: i32,
    pub player_height: i32,
    pub player_start_x: i32,
    pub player_start_y: i32,
    pub player_speed: i32,
    pub player_min_x: i32,

    pub shot_speed: i32,

    pub bomb_height: i32,
    pub bomb_speed: i32,
    pub bomb_chance_sides: u32,
    pub bomb_trigger: u32,

    pub initial_tick_ms: u64,
    pub tick_floor_ms: u64,
    pub tick_decrement_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            ground: GROUND,
            border_left: BORDER_LEFT,
            border_right: BORDER_RIGHT,

            grid_rows: GRID_ROWS,
            grid_columns: GRID_COLUMNS,
            grid_spacing: GRID_SPACING,
            enemy_init_x: ENEMY_INIT_X,
            enemy_init_y: ENEMY_INIT_Y,
            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_speed: ENEMY_SPEED,
            descend_step: DESCEND_STEP,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_start_x: PLAYER_START_X,
            player_start_y: PLAYER_START_Y,
            player_speed: PLAYER_SPEED,
            player_min_x: PLAYER_MIN_X,

            shot_speed: SHOT_SPEED,

            bomb_height: BOMB_HEIGHT,
            bomb_speed: BOMB_SPEED,
            bomb_chance_sides: BOMB_CHANCE_SIDES,
            bomb_trigger: BOMB_TRIGGER,

            initial_tick_ms: INITIAL_TICK_MS,
            tick_floor_ms: TICK_FLOOR_MS,
            tick_decrement_ms: TICK_DECREMENT_MS,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Check the values can drive a session without breaking invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("grid_spacing", self.grid_spacing),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("enemy_speed", self.enemy_speed),
            ("descend_step", self.descend_step),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("shot_speed", self.shot_speed),
            ("bomb_height", self.bomb_height),
            ("bomb_speed", self.bomb_speed),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(ConfigError::NotPositive {
                    field,
                    value: value as i64,
                });
            }
        }
        if self.bomb_chance_sides == 0 {
            return Err(ConfigError::NotPositive {
                field: "bomb_chance_sides",
                value: 0,
            });
        }
        if self.grid_rows == 0 || self.grid_columns == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.ground <= 0 || self.ground > self.board_height {
            return Err(ConfigError::GroundOutOfBoard {
                ground: self.ground,
                height: self.board_height,
            });
        }
        if self.border_left >= self.board_width - self.border_right {
            return Err(ConfigError::NoSweepRoom {
                left: self.border_left,
                right: self.border_right,
                width: self.board_width,
            });
        }
        if self.bomb_trigger >= self.bomb_chance_sides {
            return Err(ConfigError::UnreachableTrigger {
                trigger: self.bomb_trigger,
                sides: self.bomb_chance_sides,
            });
        }
        if self.tick_floor_ms > self.initial_tick_ms {
            return Err(ConfigError::FloorAboveInitial {
                floor: self.tick_floor_ms,
                initial: self.initial_tick_ms,
            });
        }
        Ok(())
    }

    pub fn enemy_size(&self) -> IVec2 {
        IVec2::new(self.enemy_width, self.enemy_height)
    }

    pub fn player_size(&self) -> IVec2 {
        IVec2::new(self.player_width, self.player_height)
    }

    pub fn player_start(&self) -> IVec2 {
        IVec2::new(self.player_start_x, self.player_start_y)
    }

    /// Rightmost x the player may occupy
    pub fn player_max_x(&self) -> i32 {
        self.board_width - 2 * self.player_width
    }

    /// Enemies at or past this x turn the formation around
    pub fn right_edge(&self) -> i32 {
        self.board_width - self.border_right
    }

    /// Number of enemies in a full wave
    pub fn wave_size(&self) -> usize {
        self.grid_rows * self.grid_columns
    }

    /// Spawn position of the enemy at grid (row, column)
    pub fn grid_position(&self, row: usize, column: usize) -> IVec2 {
        IVec2::new(
            self.enemy_init_x + self.grid_spacing * column as i32,
            self.enemy_init_y + self.grid_spacing * row as i32,
        )
    }
}
