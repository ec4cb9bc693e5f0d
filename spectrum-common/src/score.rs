//! Four-counter reputation vector
//!
//! Two bipolar axes: autism/normie (how distinctive versus conventional a
//! participant reads) and nice/toxic (warm versus abrasive). Counters start at
//! [`ScoreVector::PRIOR`] and move by one per applied reaction. They are not
//! clamped and may go negative.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-identity reputation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub autism: i64,
    pub normie: i64,
    pub nice: i64,
    pub toxic: i64,
}

/// One counter of a [`ScoreVector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Autism,
    Normie,
    Nice,
    Toxic,
}

impl ScoreField {
    pub const ALL: [ScoreField; 4] = [
        ScoreField::Autism,
        ScoreField::Normie,
        ScoreField::Nice,
        ScoreField::Toxic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreField::Autism => "autism",
            ScoreField::Normie => "normie",
            ScoreField::Nice => "nice",
            ScoreField::Toxic => "toxic",
        }
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScoreVector {
    /// Prior every counter starts at on first observation
    pub const PRIOR: i64 = 2;

    pub const fn new(autism: i64, normie: i64, nice: i64, toxic: i64) -> Self {
        Self {
            autism,
            normie,
            nice,
            toxic,
        }
    }

    /// Freshly observed identity
    pub const fn prior() -> Self {
        Self::new(Self::PRIOR, Self::PRIOR, Self::PRIOR, Self::PRIOR)
    }

    pub fn get(&self, field: ScoreField) -> i64 {
        match field {
            ScoreField::Autism => self.autism,
            ScoreField::Normie => self.normie,
            ScoreField::Nice => self.nice,
            ScoreField::Toxic => self.toxic,
        }
    }

    /// Apply `delta` to exactly one counter
    pub fn apply(&mut self, field: ScoreField, delta: i64) {
        let counter = match field {
            ScoreField::Autism => &mut self.autism,
            ScoreField::Normie => &mut self.normie,
            ScoreField::Nice => &mut self.nice,
            ScoreField::Toxic => &mut self.toxic,
        };
        *counter += delta;
    }
}

impl Default for ScoreVector {
    fn default() -> Self {
        Self::prior()
    }
}
