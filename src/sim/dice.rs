//! Random source for enemy bomb launches
//!
//! The tick only ever asks for one uniform integer per enemy, so the seam is a
//! single method. Any `rand::Rng` works; tests can script the rolls.

use std::collections::VecDeque;

use rand::Rng;

pub trait Dice {
    /// Uniform integer in `0..sides`
    fn roll(&mut self, sides: u32) -> u32;
}

impl<R: Rng + ?Sized> Dice for R {
    fn roll(&mut self, sides: u32) -> u32 {
        self.random_range(0..sides)
    }
}

/// Plays back a fixed sequence of rolls, then repeats `fallback`
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = u32>, fallback: u32) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback,
        }
    }

    /// A source that always rolls `value`
    pub fn always(value: u32) -> Self {
        Self {
            rolls: VecDeque::new(),
            fallback: value,
        }
    }

    /// Rolls not yet consumed
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rolls.pop_front().unwrap_or(self.fallback) % sides
    }
}
