//! Game state and core simulation types
//!
//! Everything the update loop owns lives here; rendering and audio only ever
//! see it through snapshots and events.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::formation::{Direction, Formation};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the simulation
    Playing,
    /// Session ended; ticks are no-ops
    GameOver,
}

/// Two-phase removal of a hit entity
///
/// A hit entity explodes for exactly one tick and is hidden on the next.
/// Alive and Exploding entities are both visible: they are drawn and still
/// take part in collisions, formation moves and bomb launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Life {
    #[default]
    Alive,
    Exploding,
    Gone,
}

impl Life {
    pub fn is_visible(self) -> bool {
        !matches!(self, Life::Gone)
    }

    pub fn is_alive(self) -> bool {
        matches!(self, Life::Alive)
    }

    /// Start the explosion; returns false if the entity was already hit
    pub fn explode(&mut self) -> bool {
        if *self == Life::Alive {
            *self = Life::Exploding;
            true
        } else {
            false
        }
    }

    /// Finish an explosion started on the previous tick
    pub fn settle(&mut self) -> bool {
        if *self == Life::Exploding {
            *self = Life::Gone;
            true
        } else {
            false
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: IVec2,
    /// Horizontal velocity from held keys (-speed, 0, +speed)
    pub dx: i32,
    pub life: Life,
}

impl Player {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            pos: config.player_start(),
            dx: 0,
            life: Life::Alive,
        }
    }

    /// Set velocity from held direction keys; both or neither means stop
    pub fn steer(&mut self, move_left: bool, move_right: bool, speed: i32) {
        self.dx = match (move_left, move_right) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0,
        };
    }

    /// Apply velocity, clamped to the playable band
    pub fn act(&mut self, config: &SimConfig) {
        self.pos.x = (self.pos.x + self.dx)
            .min(config.player_max_x())
            .max(config.player_min_x);
    }
}

/// The player's projectile; at most one exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    pub pos: IVec2,
}

impl Shot {
    pub fn new(pos: IVec2) -> Self {
        Self { pos }
    }

    /// Move up; returns false once the shot has left the top of the board
    pub fn rise(&mut self, speed: i32) -> bool {
        self.pos.y -= speed;
        self.pos.y >= 0
    }
}

/// An enemy's bomb slot, reused for every bomb that enemy drops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: IVec2,
    pub active: bool,
}

impl Bomb {
    pub fn launch(&mut self, from: IVec2) {
        self.pos = from;
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Move down; deactivates on reaching the ground line
    pub fn fall(&mut self, config: &SimConfig) {
        self.pos.y += config.bomb_speed;
        if self.pos.y >= config.ground - config.bomb_height {
            self.active = false;
        }
    }
}

/// A member of the enemy grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: IVec2,
    pub life: Life,
    pub bomb: Bomb,
}

impl Enemy {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            life: Life::Alive,
            bomb: Bomb::default(),
        }
    }

    /// Step sideways in the formation's direction
    pub fn march(&mut self, direction: Direction, speed: i32) {
        self.pos.x += direction.sign() * speed;
    }

    /// True once the enemy has descended onto the player's line
    pub fn has_landed(&self, config: &SimConfig) -> bool {
        self.pos.y > config.ground - config.enemy_height
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatCause {
    /// A bomb destroyed the player
    PlayerDestroyed,
    /// An enemy reached the ground line
    Invaded,
}

/// Semantic occurrences of a tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player fired a new shot
    ShotFired { pos: IVec2 },
    /// A shot hit an enemy, which is now exploding
    EnemyDestroyed { index: usize, pos: IVec2 },
    /// An enemy dropped a bomb
    BombFired { enemy: usize, pos: IVec2 },
    /// A bomb hit the player, who is now exploding
    PlayerHit { pos: IVec2 },
    /// The last enemy was gone and a fresh wave spawned
    WaveCleared { wave: u32, tick_interval_ms: u64 },
    /// The session ended
    GameOver { cause: DefeatCause, score: u32 },
}

/// Complete game state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: SimConfig,
    pub player: Player,
    /// The single in-flight player shot
    pub shot: Option<Shot>,
    pub formation: Formation,
    /// One point per destroyed enemy
    pub score: u32,
    /// Waves cleared so far
    pub wave_index: u32,
    /// Delay between ticks; shrinks on every cleared wave
    pub tick_interval_ms: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
}

impl GameState {
    /// Fresh session state: full wave, score zero, initial interval
    pub fn new(config: SimConfig) -> Self {
        Self {
            player: Player::new(&config),
            shot: None,
            formation: Formation::spawn(&config),
            score: 0,
            wave_index: 0,
            tick_interval_ms: config.initial_tick_ms,
            time_ticks: 0,
            phase: GamePhase::Playing,
            config,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Number of bombs currently in flight
    pub fn active_bombs(&self) -> usize {
        self.formation
            .enemies
            .iter()
            .filter(|e| e.bomb.active)
            .count()
    }
}
