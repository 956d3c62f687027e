//! Dice-notation damage/heal formulas.
//!
//! `NdS+M`: N independent uniform draws in [1, S] plus a flat modifier.
//! Rolling is pure of battle state; actions invoke it from within a
//! frame-event effect, never earlier.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("invalid dice formula '{0}'")]
    Invalid(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceFormula {
    pub rolls: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceFormula {
    pub fn new(rolls: u32, sides: u32, modifier: i32) -> Self {
        Self {
            rolls,
            sides,
            modifier,
        }
    }

    /// Smallest possible result.
    pub fn min(&self) -> i32 {
        self.rolls as i32 + self.modifier
    }

    /// Largest possible result.
    pub fn max(&self) -> i32 {
        (self.rolls * self.sides) as i32 + self.modifier
    }

    /// Roll the formula with the given RNG.
    pub fn roll(&self, rng: &mut impl Rng) -> i32 {
        let mut total = self.modifier;
        for _ in 0..self.rolls {
            total += rng.gen_range(1..=self.sides) as i32;
        }
        total
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.rolls, self.sides)?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "{}", self.modifier)?;
        }
        Ok(())
    }
}

impl FromStr for DiceFormula {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DiceError::Invalid(s.to_string());
        let (rolls, rest) = s.split_once(['d', 'D']).ok_or_else(err)?;
        let rolls: u32 = rolls.trim().parse().map_err(|_| err())?;

        let (sides, modifier) = if let Some((sides, m)) = rest.split_once('+') {
            (sides, m.trim().parse::<i32>().map_err(|_| err())?)
        } else if let Some((sides, m)) = rest.split_once('-') {
            (sides, -m.trim().parse::<i32>().map_err(|_| err())?)
        } else {
            (rest, 0)
        };
        let sides: u32 = sides.trim().parse().map_err(|_| err())?;
        if sides == 0 {
            return Err(err());
        }
        Ok(DiceFormula::new(rolls, sides, modifier))
    }
}
