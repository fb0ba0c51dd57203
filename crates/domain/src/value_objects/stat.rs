//! Stat value object - the three character stats a die face can show.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Character stat shown on a die face and required by enemies.
///
/// The declaration order is significant: random stat draws index into
/// [`Stat::ALL`], so reordering variants changes every seeded combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Force,
    Dexterite,
    Intelligence,
}

impl Stat {
    /// Every stat, in draw order.
    pub const ALL: [Stat; 3] = [Stat::Force, Stat::Dexterite, Stat::Intelligence];

    /// Wire name of the stat.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::Dexterite => "dexterite",
            Self::Intelligence => "intelligence",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force" => Ok(Self::Force),
            "dexterite" => Ok(Self::Dexterite),
            "intelligence" => Ok(Self::Intelligence),
            other => Err(DomainError::validation(format!("Unknown stat: {other}"))),
        }
    }
}
