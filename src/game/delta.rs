//! State updates as explicit deltas
//!
//! Every resolver, handler, and the scheduler is a pure function from
//! `&GameState` to a `StateDelta`; the driver commits deltas one at a
//! time. Each field carries a named merge policy:
//!
//! - replace: scalar fields, `Some(new)` overwrites
//! - upsert-by-key: `night_actions` / `votes`, later writers win per key
//! - append: `history`, per-player `notes` / `reasoning`
//! - deaths: one-way alive -> dead flips
//!
//! Clears and removals apply before upserts so a delta can atomically
//! reset a map and seed it again.

use crate::core::{PlayerId, Side};
use crate::game::phase::{Phase, SpeechDirection, TurnType};
use crate::game::state::{Event, GameState, NightActionKey};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single atomic update to the match state
///
/// `Option<Option<T>>` fields distinguish "leave alone" (outer `None`)
/// from "set to empty" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateDelta {
    pub phase: Option<Phase>,
    pub turn: Option<TurnType>,
    pub day_count: Option<u32>,

    pub current_actor: Option<Option<PlayerId>>,
    pub action_queue: Option<VecDeque<PlayerId>>,
    pub parallel_batch: Option<Vec<PlayerId>>,

    pub clear_night_actions: bool,
    pub remove_night_actions: Vec<NightActionKey>,
    pub night_actions: Vec<(NightActionKey, Option<PlayerId>)>,

    pub clear_votes: bool,
    pub votes: Vec<(PlayerId, Option<PlayerId>)>,

    pub witch_save_available: Option<bool>,
    pub witch_poison_available: Option<bool>,
    pub last_guarded: Option<Option<PlayerId>>,
    pub hunter_can_shoot: Option<bool>,

    pub sheriff: Option<Option<PlayerId>>,
    pub speech_direction: Option<Option<SpeechDirection>>,
    pub election_candidates: Option<Vec<PlayerId>>,
    pub pk_candidates: Option<Vec<PlayerId>>,

    pub pending_last_words: Option<Vec<PlayerId>>,
    pub pending_hunter: Option<Option<PlayerId>>,
    pub pending_badge_transfer: Option<bool>,
    pub cascade_return: Option<Option<TurnType>>,

    pub last_night_dead: Option<Vec<PlayerId>>,
    pub last_execution: Option<Option<PlayerId>>,

    pub history: Vec<Event>,
    pub notes: Vec<(PlayerId, String)>,
    pub reasoning: Vec<(PlayerId, String)>,
    /// Players whose alive flag flips to false in this commit
    pub deaths: Vec<PlayerId>,

    pub summary: Option<String>,
    pub game_over: Option<bool>,
    pub winner: Option<Option<Side>>,
}

impl StateDelta {
    /// Append a game-master announcement to the transcript
    pub fn announce(&mut self, body: impl Into<String>) {
        self.history.push(Event::system(body));
    }

    /// Append a player speech to the transcript
    pub fn speak(&mut self, player: PlayerId, body: impl Into<String>) {
        self.history.push(Event::speech(player, body));
    }
}

/// Replace-policy merge for plain scalar fields
fn replace<T>(slot: &mut T, update: Option<T>) {
    if let Some(value) = update {
        *slot = value;
    }
}

impl GameState {
    /// Apply a delta. Order matters: clears, then removals, then
    /// upserts, then scalar replaces, then appends, then deaths.
    pub fn commit(&mut self, delta: StateDelta) {
        if delta.clear_night_actions {
            self.night_actions.clear();
        }
        for key in &delta.remove_night_actions {
            self.night_actions.remove(key);
        }
        for (key, target) in delta.night_actions {
            self.night_actions.insert(key, target);
        }

        if delta.clear_votes {
            self.votes.clear();
        }
        for (voter, target) in delta.votes {
            self.votes.insert(voter, target);
        }

        replace(&mut self.phase, delta.phase);
        replace(&mut self.turn, delta.turn);
        replace(&mut self.day_count, delta.day_count);
        replace(&mut self.current_actor, delta.current_actor);
        replace(&mut self.action_queue, delta.action_queue);
        replace(&mut self.parallel_batch, delta.parallel_batch);
        replace(&mut self.witch_save_available, delta.witch_save_available);
        replace(&mut self.witch_poison_available, delta.witch_poison_available);
        replace(&mut self.last_guarded, delta.last_guarded);
        replace(&mut self.hunter_can_shoot, delta.hunter_can_shoot);
        replace(&mut self.sheriff, delta.sheriff);
        replace(&mut self.speech_direction, delta.speech_direction);
        replace(&mut self.election_candidates, delta.election_candidates);
        replace(&mut self.pk_candidates, delta.pk_candidates);
        replace(&mut self.pending_last_words, delta.pending_last_words);
        replace(&mut self.pending_hunter, delta.pending_hunter);
        replace(&mut self.pending_badge_transfer, delta.pending_badge_transfer);
        replace(&mut self.cascade_return, delta.cascade_return);
        replace(&mut self.last_night_dead, delta.last_night_dead);
        replace(&mut self.last_execution, delta.last_execution);
        replace(&mut self.summary, delta.summary);
        replace(&mut self.game_over, delta.game_over);
        replace(&mut self.winner, delta.winner);

        self.history.extend(delta.history);
        for (id, note) in delta.notes {
            if let Ok(player) = self.player_mut(id) {
                player.notes.push(note);
            }
        }
        for (id, thought) in delta.reasoning {
            if let Ok(player) = self.player_mut(id) {
                player.reasoning.push(thought);
            }
        }
        for id in delta.deaths {
            if let Ok(player) = self.player_mut(id) {
                player.alive = false;
            }
        }
    }
}
