//! The enemy grid and its shared sweep
//!
//! All enemies share one horizontal direction. When any of them reaches a side
//! margin the whole grid turns and drops by the descend step. The turn is
//! guarded by the current direction, so it fires once per crossing no matter
//! how many enemies stand past the margin.

use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::state::Enemy;

/// Shared horizontal direction of the formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Moving left (-x)
    Reverse,
    /// Moving right (+x)
    Advance,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Reverse => -1,
            Direction::Advance => 1,
        }
    }
}

/// One wave of enemies plus the state they share
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    /// Row-major grid; indices are stable for the life of a wave
    pub enemies: Vec<Enemy>,
    pub direction: Direction,
}

impl Formation {
    /// First wave of a session. The sweep starts moving left.
    pub fn spawn(config: &SimConfig) -> Self {
        let mut formation = Self {
            enemies: Vec::with_capacity(config.wave_size()),
            direction: Direction::Reverse,
        };
        formation.respawn(config);
        formation
    }

    /// Replace every enemy with a fresh grid at the spawn offsets.
    ///
    /// Bomb slots start inactive, so bombs still falling from the old wave
    /// disappear. The sweep direction carries over.
    pub fn respawn(&mut self, config: &SimConfig) {
        self.enemies.clear();
        for row in 0..config.grid_rows {
            for column in 0..config.grid_columns {
                self.enemies.push(Enemy::new(config.grid_position(row, column)));
            }
        }
    }

    /// Finish last tick's explosions; returns how many enemies were removed
    pub fn settle(&mut self) -> usize {
        self.enemies
            .iter_mut()
            .map(|e| e.life.settle())
            .filter(|&settled| settled)
            .count()
    }

    /// Turn around at the side margins, dropping the grid once per turn.
    ///
    /// Every enemy is checked, including ones already gone: a dead enemy keeps
    /// its last position and can still trigger a turn. Returns the number of
    /// turns taken this tick.
    pub fn check_edges(&mut self, config: &SimConfig) -> u32 {
        let mut turns = 0;
        for i in 0..self.enemies.len() {
            let x = self.enemies[i].pos.x;

            if x >= config.right_edge() && self.direction != Direction::Reverse {
                self.direction = Direction::Reverse;
                self.descend(config.descend_step);
                turns += 1;
            }

            if x <= config.border_left && self.direction != Direction::Advance {
                self.direction = Direction::Advance;
                self.descend(config.descend_step);
                turns += 1;
            }
        }
        if turns > 0 {
            log::trace!("Formation turned {:?} ({} turns)", self.direction, turns);
        }
        turns
    }

    /// Shift every enemy down
    pub fn descend(&mut self, step: i32) {
        for enemy in &mut self.enemies {
            enemy.pos.y += step;
        }
    }

    /// Move visible enemies sideways; returns true if any had already landed
    pub fn march(&mut self, config: &SimConfig) -> bool {
        let mut landed = false;
        for enemy in self.enemies.iter_mut().filter(|e| e.life.is_visible()) {
            if enemy.has_landed(config) {
                landed = true;
            }
            enemy.march(self.direction, config.enemy_speed);
        }
        landed
    }

    pub fn any_visible(&self) -> bool {
        self.enemies.iter().any(|e| e.life.is_visible())
    }

    pub fn visible_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.life.is_visible()).count()
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::sim::state::Life;

    fn ys(formation: &Formation) -> Vec<i32> {
        formation.enemies.iter().map(|e| e.pos.y).collect()
    }

    #[test]
    fn test_spawn_layout() {
        let config = SimConfig::default();
        let formation = Formation::spawn(&config);
        assert_eq!(formation.enemies.len(), 24);
        assert_eq!(formation.direction, Direction::Reverse);
        assert_eq!(formation.enemies[0].pos, IVec2::new(150, 5));
        assert_eq!(formation.enemies[7].pos, IVec2::new(150 + 44, 5 + 44));
        assert!(formation.enemies.iter().all(|e| !e.bomb.active));
    }

    #[test]
    fn test_turn_at_right_edge_descends_once() {
        let config = SimConfig::default();
        let mut formation = Formation::spawn(&config);
        formation.direction = Direction::Advance;
        // Whole last column past the margin: four enemies cross together
        for enemy in formation.enemies.iter_mut() {
            enemy.pos.x += config.right_edge() - (150 + 44 * 5);
        }
        let before = ys(&formation);

        assert_eq!(formation.check_edges(&config), 1);
        assert_eq!(formation.direction, Direction::Reverse);
        let after = ys(&formation);
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(a - b, config.descend_step);
        }

        // Still past the margin on the next tick: no second drop
        assert_eq!(formation.check_edges(&config), 0);
        assert_eq!(ys(&formation), after);
    }

    #[test]
    fn test_turn_at_left_edge() {
        let config = SimConfig::default();
        let mut formation = Formation::spawn(&config);
        let shift = formation.enemies[0].pos.x - config.border_left;
        for enemy in formation.enemies.iter_mut() {
            enemy.pos.x -= shift;
        }
        assert_eq!(formation.check_edges(&config), 1);
        assert_eq!(formation.direction, Direction::Advance);
        assert_eq!(formation.enemies[0].pos.y, 5 + config.descend_step);
    }

    #[test]
    fn test_gone_enemy_still_counts_for_edges() {
        let config = SimConfig::default();
        let mut formation = Formation::spawn(&config);
        formation.direction = Direction::Advance;
        formation.enemies[5].life = Life::Gone;
        formation.enemies[5].pos.x = config.right_edge();
        assert_eq!(formation.check_edges(&config), 1);
        assert_eq!(formation.direction, Direction::Reverse);
    }

    #[test]
    fn test_march_skips_gone_and_detects_landing() {
        let config = SimConfig::default();
        let mut formation = Formation::spawn(&config);
        formation.enemies[0].life = Life::Gone;
        let x0 = formation.enemies[0].pos.x;
        let x1 = formation.enemies[1].pos.x;

        assert!(!formation.march(&config));
        assert_eq!(formation.enemies[0].pos.x, x0);
        assert_eq!(formation.enemies[1].pos.x, x1 - 1);

        formation.enemies[3].pos.y = config.ground - config.enemy_height + 1;
        assert!(formation.march(&config));
    }

    #[test]
    fn test_settle_and_visibility() {
        let config = SimConfig::default();
        let mut formation = Formation::spawn(&config);
        formation.enemies[2].life = Life::Exploding;
        formation.enemies[4].life = Life::Gone;
        assert_eq!(formation.visible_count(), 23);
        assert_eq!(formation.settle(), 1);
        assert_eq!(formation.visible_count(), 22);

        for enemy in formation.enemies.iter_mut() {
            enemy.life = Life::Gone;
        }
        assert!(!formation.any_visible());
        formation.respawn(&config);
        assert_eq!(formation.visible_count(), 24);
    }
}
