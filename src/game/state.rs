//! The canonical match record
//!
//! One `GameState` per match. Resolvers and the scheduler read it and
//! return `StateDelta`s; only `GameState::commit` (in `delta.rs`) writes.

use crate::core::{Player, PlayerId, Role, Side};
use crate::game::logger::GameLogger;
use crate::game::phase::{Phase, SpeechDirection, TurnType};
use crate::{EngineError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

/// Slot keys for the shared night-action blackboard
///
/// Presence of a key means the owning step has acted this night; a `None`
/// value is an explicit pass. Cleared at night settle and at day close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NightActionKey {
    WolfKill,
    GuardProtect,
    WitchSave,
    WitchPoison,
    SeerCheck,
    HunterShoot,
    SheriffTransfer,
}

/// Who produced a history event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    System,
    Player(PlayerId),
}

/// One entry of the public transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub source: EventSource,
    pub body: String,
}

impl Event {
    pub fn system(body: impl Into<String>) -> Self {
        Event {
            source: EventSource::System,
            body: body.into(),
        }
    }

    pub fn speech(player: PlayerId, body: impl Into<String>) -> Self {
        Event {
            source: EventSource::Player(player),
            body: body.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            EventSource::System => write!(f, "[System] {}", self.body),
            EventSource::Player(id) => write!(f, "[Player {}] {}", id, self.body),
        }
    }
}

/// The single authoritative state of a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub phase: Phase,
    pub turn: TurnType,
    /// Starts at 1, incremented once per full night/day cycle
    pub day_count: u32,

    /// The one player currently owed a turn, if any
    pub current_actor: Option<PlayerId>,
    /// Serial speakers remaining in the current step
    pub action_queue: VecDeque<PlayerId>,
    /// Snapshot of ballot-eligible players for the current batch step
    pub parallel_batch: Vec<PlayerId>,

    pub night_actions: FxHashMap<NightActionKey, Option<PlayerId>>,
    /// Ballots of the current vote; `None` target is an abstention
    pub votes: FxHashMap<PlayerId, Option<PlayerId>>,

    pub witch_save_available: bool,
    pub witch_poison_available: bool,
    /// Guard may not protect the same player two nights running
    pub last_guarded: Option<PlayerId>,
    pub hunter_can_shoot: bool,

    pub sheriff: Option<PlayerId>,
    pub speech_direction: Option<SpeechDirection>,
    pub election_candidates: Vec<PlayerId>,
    /// Tied candidates of a PK (tie-break) round; cleared by the next settle
    pub pk_candidates: Vec<PlayerId>,

    pub pending_last_words: Vec<PlayerId>,
    pub pending_hunter: Option<PlayerId>,
    pub pending_badge_transfer: bool,
    /// Where the turn machine resumes once the death cascade drains
    pub cascade_return: Option<TurnType>,

    /// Provisional night deaths, applied and announced at day break
    pub last_night_dead: Vec<PlayerId>,
    /// Provisional execution, applied at the execution announcement
    pub last_execution: Option<PlayerId>,

    pub history: Vec<Event>,
    /// Rolling long-term memory text maintained by the summarizer
    pub summary: String,

    pub game_over: bool,
    pub winner: Option<Side>,

    /// Seeded RNG; interior mutability so tie-breaks can draw through a
    /// shared borrow. Serialized with the state for replay.
    pub rng: RefCell<ChaCha12Rng>,

    #[serde(skip, default)]
    pub logger: GameLogger,
}

impl GameState {
    /// Build a fresh match from a seating-ordered roster.
    /// IDs are assigned 1..=N; the first night opens with the guard.
    pub fn new(roster: Vec<(String, Role)>) -> Self {
        let players = roster
            .into_iter()
            .enumerate()
            .map(|(i, (name, role))| Player::new(PlayerId::new(i as u32 + 1), name, role))
            .collect();
        GameState {
            players,
            phase: Phase::Night,
            turn: TurnType::GuardProtect,
            day_count: 1,
            current_actor: None,
            action_queue: VecDeque::new(),
            parallel_batch: Vec::new(),
            night_actions: FxHashMap::default(),
            votes: FxHashMap::default(),
            witch_save_available: true,
            witch_poison_available: true,
            last_guarded: None,
            hunter_can_shoot: true,
            sheriff: None,
            speech_direction: None,
            election_candidates: Vec::new(),
            pk_candidates: Vec::new(),
            pending_last_words: Vec::new(),
            pending_hunter: None,
            pending_badge_transfer: false,
            cascade_return: None,
            last_night_dead: Vec::new(),
            last_execution: None,
            history: Vec::new(),
            summary: String::new(),
            game_over: false,
            winner: None,
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(0)),
            logger: GameLogger::default(),
        }
    }

    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = RefCell::new(ChaCha12Rng::seed_from_u64(seed));
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(EngineError::PlayerNotFound(id.as_u32()))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(EngineError::PlayerNotFound(id.as_u32()))
    }

    /// Living seat numbers in ascending order
    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.players.iter().filter(|p| p.alive).map(|p| p.id).collect()
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id && p.alive)
    }

    /// First living holder of a role (the pack spokesman for wolves)
    pub fn living_role_holder(&self, role: Role) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.alive && p.role == role)
            .map(|p| p.id)
    }

    pub fn living_wolves(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.alive && p.role.is_wolf())
            .map(|p| p.id)
            .collect()
    }

    /// Last `n` transcript events
    pub fn history_tail(&self, n: usize) -> &[Event] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Discussion order for the current table
    pub fn speech_queue(&self) -> Vec<PlayerId> {
        let sheriff = self.sheriff.filter(|s| self.is_alive(*s));
        speech_order(
            &self.alive_ids(),
            sheriff,
            self.speech_direction.unwrap_or(SpeechDirection::Clockwise),
        )
    }
}

/// Ring order for a discussion round.
///
/// With a living sheriff the walk starts at the seat after the sheriff in
/// the given direction and the sheriff speaks last; otherwise ascending
/// seat order. `alive` must be ascending.
pub fn speech_order(
    alive: &[PlayerId],
    sheriff: Option<PlayerId>,
    direction: SpeechDirection,
) -> Vec<PlayerId> {
    let anchor = match sheriff.and_then(|s| alive.iter().position(|id| *id == s)) {
        Some(pos) => pos,
        None => return alive.to_vec(),
    };
    let n = alive.len();
    let mut order = Vec::with_capacity(n);
    for step in 1..=n {
        let idx = match direction {
            SpeechDirection::Clockwise => (anchor + step) % n,
            SpeechDirection::CounterClockwise => (anchor + n - step % n) % n,
        };
        order.push(alive[idx]);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<PlayerId> {
        raw.iter().map(|i| PlayerId::new(*i)).collect()
    }

    #[test]
    fn test_speech_order_no_sheriff() {
        let alive = ids(&[1, 2, 3, 4]);
        assert_eq!(speech_order(&alive, None, SpeechDirection::Clockwise), alive);
    }

    #[test]
    fn test_speech_order_clockwise_wraps() {
        let alive = ids(&[1, 2, 3]);
        let order = speech_order(&alive, Some(PlayerId::new(2)), SpeechDirection::Clockwise);
        assert_eq!(order, ids(&[3, 1, 2]));
    }

    #[test]
    fn test_speech_order_counter_clockwise_wraps() {
        let alive = ids(&[1, 2, 3]);
        let order = speech_order(
            &alive,
            Some(PlayerId::new(2)),
            SpeechDirection::CounterClockwise,
        );
        assert_eq!(order, ids(&[1, 3, 2]));
    }

    #[test]
    fn test_speech_order_dead_sheriff_falls_back() {
        let alive = ids(&[1, 3, 5]);
        let order = speech_order(&alive, Some(PlayerId::new(2)), SpeechDirection::Clockwise);
        assert_eq!(order, ids(&[1, 3, 5]));
    }

    #[test]
    fn test_new_game_opens_on_night_one() {
        let state = GameState::new(vec![
            ("Alpha".to_string(), Role::Werewolf),
            ("Beta".to_string(), Role::Seer),
        ]);
        assert_eq!(state.phase, Phase::Night);
        assert_eq!(state.turn, TurnType::GuardProtect);
        assert_eq!(state.day_count, 1);
        assert_eq!(state.alive_ids(), ids(&[1, 2]));
        assert_eq!(state.living_role_holder(Role::Seer), Some(PlayerId::new(2)));
        assert_eq!(state.living_role_holder(Role::Guard), None);
        assert!(state.witch_save_available && state.witch_poison_available);
        assert!(state.hunter_can_shoot);
    }

    #[test]
    fn test_history_tail() {
        let mut state = GameState::new(vec![("Alpha".to_string(), Role::Villager)]);
        for i in 0..5 {
            state.history.push(Event::system(format!("e{i}")));
        }
        assert_eq!(state.history_tail(2).len(), 2);
        assert_eq!(state.history_tail(2)[0].body, "e3");
        assert_eq!(state.history_tail(99).len(), 5);
    }
}
