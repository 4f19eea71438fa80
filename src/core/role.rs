//! Role and faction definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Winning faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Werewolf,
    Villager,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Werewolf => write!(f, "Werewolves"),
            Side::Villager => write!(f, "Villagers"),
        }
    }
}

/// The six roles of the classic setup
///
/// Seer, witch, hunter, and guard are "god" roles: they side with the
/// villagers but carry a night or death power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Werewolf,
    Villager,
    Seer,
    Witch,
    Hunter,
    Guard,
}

impl Role {
    pub fn side(&self) -> Side {
        match self {
            Role::Werewolf => Side::Werewolf,
            _ => Side::Villager,
        }
    }

    pub fn is_wolf(&self) -> bool {
        matches!(self, Role::Werewolf)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Werewolf => "Werewolf",
            Role::Villager => "Villager",
            Role::Seer => "Seer",
            Role::Witch => "Witch",
            Role::Hunter => "Hunter",
            Role::Guard => "Guard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
