use crate::{GameError, Result};
use std::fmt;
use std::str::FromStr;

/// Every die in the game has exactly this many faces.
pub const FACES: usize = 6;

/// A six-sided die. Face order is kept as supplied, it only matters for
/// display and for addressing faces by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Die {
    faces: [u64; FACES],
}

impl Die {
    pub fn new(faces: [u64; FACES]) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[u64] {
        &self.faces
    }

    pub fn face(&self, index: usize) -> u64 {
        self.faces[index]
    }

    /// Bare comma-separated form, the same shape the CLI accepts.
    pub fn label(&self) -> String {
        self.faces
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Die {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let mut faces = Vec::with_capacity(FACES);
        for token in s.split(',') {
            let face: u64 = token.parse().map_err(|_| {
                GameError::invalid_spec(s, format!("'{token}' is not a non-negative integer"))
            })?;
            faces.push(face);
        }
        let count = faces.len();
        let faces: [u64; FACES] = faces.try_into().map_err(|_| GameError::WrongFaceCount {
            spec: s.to_string(),
            found: count,
        })?;
        Ok(Self { faces })
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label())
    }
}

/// The dice still up for grabs. Removal renumbers the remaining dice
/// contiguously from zero, which is exactly how they are presented to the
/// human when choosing.
#[derive(Debug, Clone)]
pub struct DicePool {
    dice: Vec<Die>,
}

impl DicePool {
    /// Parse the startup dice arguments. At least 3 dice, each with exactly
    /// 6 non-negative integer faces.
    pub fn parse(args: &[String]) -> Result<Self> {
        if args.len() < 3 {
            return Err(GameError::NotEnoughDice(args.len()));
        }
        let dice = args
            .iter()
            .map(|arg| arg.parse())
            .collect::<Result<Vec<Die>>>()?;
        Ok(Self { dice })
    }

    pub fn new(dice: Vec<Die>) -> Self {
        Self { dice }
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    /// Take a die out of the pool. The indices of the remaining dice shift
    /// down to stay contiguous.
    pub fn remove(&mut self, index: usize) -> Result<Die> {
        if index >= self.dice.len() {
            return Err(GameError::NoSuchDie(index));
        }
        Ok(self.dice.remove(index))
    }
}
