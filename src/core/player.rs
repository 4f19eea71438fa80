//! The per-seat player record

use crate::core::{PlayerId, Role};
use serde::{Deserialize, Serialize};

/// One seat at the table
///
/// `notes` and `reasoning` are private to this player: notes hold
/// role-channel feedback (e.g. seer check results), reasoning holds the
/// hidden thought trace returned by the player's actor. Neither is ever
/// shown to other players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub alive: bool,
    pub notes: Vec<String>,
    pub reasoning: Vec<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: String, role: Role) -> Self {
        Player {
            id,
            name,
            role,
            alive: true,
            notes: Vec::new(),
            reasoning: Vec::new(),
        }
    }
}
