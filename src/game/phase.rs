//! Phase and turn-state machine vocabulary
//!
//! `TurnType` enumerates every station of the match loop. The scheduler
//! only ever inspects the predicates here; the mapping from a turn to its
//! successor lives in `scheduler.rs` and the settle handlers.

use crate::core::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Night or day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Night,
    Day,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Night => write!(f, "Night"),
            Phase::Day => write!(f, "Day"),
        }
    }
}

/// Direction the speaking order walks around the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechDirection {
    Clockwise,
    CounterClockwise,
}

/// Every station of the turn machine
///
/// Night actions run in the fixed order of `NIGHT_ORDER`; the day walks
/// announcement -> discussion -> vote -> settle, with the sheriff
/// election spliced in on the first day and PK (tie-break) rounds and
/// death cascades spliced in on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnType {
    GuardProtect,
    WolfKill,
    SeerCheck,
    WitchAction,
    NightSettle,
    DayAnnouncement,
    Discussion,
    Voting,
    VotingSettle,
    SheriffNomination,
    SheriffDiscussion,
    SheriffVoting,
    SheriffSettle,
    PkDiscussion,
    PkVoting,
    LastWords,
    HunterShoot,
    HunterAnnouncement,
    SheriffTransfer,
    ExecutionAnnouncement,
}

/// The fixed wake order of the night
pub const NIGHT_ORDER: [TurnType; 4] = [
    TurnType::GuardProtect,
    TurnType::WolfKill,
    TurnType::SeerCheck,
    TurnType::WitchAction,
];

impl TurnType {
    /// Turns resolved by an engine handler rather than a player
    pub fn is_settle(&self) -> bool {
        matches!(
            self,
            TurnType::NightSettle
                | TurnType::DayAnnouncement
                | TurnType::SheriffSettle
                | TurnType::VotingSettle
                | TurnType::HunterAnnouncement
                | TurnType::ExecutionAnnouncement
        )
    }

    /// Turns where players act one at a time from the action queue
    pub fn is_serial(&self) -> bool {
        matches!(
            self,
            TurnType::Discussion
                | TurnType::PkDiscussion
                | TurnType::SheriffNomination
                | TurnType::SheriffDiscussion
                | TurnType::LastWords
        )
    }

    /// Turns where all eligible players submit ballots simultaneously
    pub fn is_batch(&self) -> bool {
        matches!(
            self,
            TurnType::Voting | TurnType::PkVoting | TurnType::SheriffVoting
        )
    }

    pub fn is_night_action(&self) -> bool {
        NIGHT_ORDER.contains(self)
    }

    /// The role that wakes for a night-action turn
    pub fn night_role(&self) -> Option<Role> {
        match self {
            TurnType::GuardProtect => Some(Role::Guard),
            TurnType::WolfKill => Some(Role::Werewolf),
            TurnType::SeerCheck => Some(Role::Seer),
            TurnType::WitchAction => Some(Role::Witch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnType::GuardProtect => "guard_protect",
            TurnType::WolfKill => "wolf_kill",
            TurnType::SeerCheck => "seer_check",
            TurnType::WitchAction => "witch_action",
            TurnType::NightSettle => "night_settle",
            TurnType::DayAnnouncement => "day_announcement",
            TurnType::Discussion => "discussion",
            TurnType::Voting => "voting",
            TurnType::VotingSettle => "voting_settle",
            TurnType::SheriffNomination => "sheriff_nomination",
            TurnType::SheriffDiscussion => "sheriff_discussion",
            TurnType::SheriffVoting => "sheriff_voting",
            TurnType::SheriffSettle => "sheriff_settle",
            TurnType::PkDiscussion => "pk_discussion",
            TurnType::PkVoting => "pk_voting",
            TurnType::LastWords => "last_words",
            TurnType::HunterShoot => "hunter_shoot",
            TurnType::HunterAnnouncement => "hunter_announcement",
            TurnType::SheriffTransfer => "sheriff_transfer",
            TurnType::ExecutionAnnouncement => "execution_announcement",
        }
    }
}

impl fmt::Display for TurnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
