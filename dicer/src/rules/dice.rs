use serde::{Deserialize, Serialize};

use crate::error::{DicerError, Result};

/// Most dice a single roll may throw.
pub const MAX_DICE: u32 = 100;
/// Most faces a die may have. Balanced mode keeps one deck slot per face.
pub const MAX_FACES: u32 = 1000;

/// How many dice to roll and how many faces each one has.
///
/// Valid specs have `1..=MAX_DICE` dice of `2..=MAX_FACES` faces, so a sum
/// always fits in a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct DieSpec {
    pub count: u32,
    pub faces: u32,
}

impl Default for DieSpec {
    fn default() -> Self {
        Self { count: 2, faces: 6 }
    }
}

impl DieSpec {
    pub fn new(count: u32, faces: u32) -> Result<Self> {
        let spec = Self { count, faces };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.count < 1 {
            return Err(DicerError::invalid(
                "dice count",
                self.count,
                "at least one die is required",
            ));
        }
        if self.count > MAX_DICE {
            return Err(DicerError::invalid(
                "dice count",
                self.count,
                "too many dice for one roll",
            ));
        }
        if self.faces < 2 {
            return Err(DicerError::invalid(
                "dice faces",
                self.faces,
                "a die needs at least two faces",
            ));
        }
        if self.faces > MAX_FACES {
            return Err(DicerError::invalid(
                "dice faces",
                self.faces,
                "too many faces on one die",
            ));
        }
        Ok(())
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)
    }
}

impl std::fmt::Display for DieSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pretty_print(f)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RngMode {
    /// Every face is drawn independently with replacement.
    #[default]
    Uniform,
    /// Faces are dealt from a shuffled deck holding one copy of each face.
    Balanced,
}

/// Whether the presentation layer shows the sum or every die. The core
/// never reads it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Total,
    Individual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// One value per die, in draw order.
    pub values: Vec<u32>,
    pub sum: u32,
}

impl RollResult {
    pub fn new(values: Vec<u32>) -> Self {
        let sum = values.iter().sum();
        Self { values, sum }
    }

    pub fn dice_count(&self) -> usize {
        self.values.len()
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, roll) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", roll)?;
        }
        write!(f, "] = {}", self.sum)
    }
}
