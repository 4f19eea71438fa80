//! The actor boundary
//!
//! Actors are the pluggable decision policies behind each seat. The
//! engine hands an actor an `ActorContext` snapshot of exactly what that
//! player may know, receives a closed-union `ActorReply`, and merges the
//! reply into a `StateDelta` here. All validation happens at the merge:
//! an illegal or wrong-shaped reply degrades to the step's default
//! (pass, abstain, or silence) and never errors the match.

use crate::core::{PlayerId, Role};
use crate::game::delta::StateDelta;
use crate::game::phase::{Phase, SpeechDirection, TurnType};
use crate::game::state::{Event, GameState, NightActionKey};
use crate::Result;
use serde::{Deserialize, Serialize};

/// How many transcript events an actor sees verbatim
const HISTORY_WINDOW: usize = 20;

/// Everything a seat is allowed to know when deciding
///
/// Owned snapshot: batch steps fan these out across threads, so nothing
/// in here borrows the game state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    pub player: PlayerId,
    pub name: String,
    pub role: Role,
    pub phase: Phase,
    pub turn: TurnType,
    pub day: u32,
    pub alive: Vec<PlayerId>,
    pub sheriff: Option<PlayerId>,
    /// Fellow living wolves (wolves only)
    pub teammates: Vec<PlayerId>,
    /// Tonight's kill target (witch only, during her action)
    pub wolf_kill: Option<PlayerId>,
    pub save_available: bool,
    pub poison_available: bool,
    pub candidates: Vec<PlayerId>,
    pub pk_candidates: Vec<PlayerId>,
    /// Recent public transcript
    pub history: Vec<Event>,
    /// This seat's private notes (seer results etc.)
    pub notes: Vec<String>,
    /// Rolling summary of everything older than the history window
    pub summary: String,
}

impl ActorContext {
    pub fn for_player(state: &GameState, id: PlayerId) -> Result<Self> {
        let player = state.player(id)?;
        let teammates = if player.role.is_wolf() {
            state
                .living_wolves()
                .into_iter()
                .filter(|w| *w != id)
                .collect()
        } else {
            Vec::new()
        };
        let wolf_kill = if player.role == Role::Witch && state.turn == TurnType::WitchAction {
            state
                .night_actions
                .get(&NightActionKey::WolfKill)
                .copied()
                .flatten()
        } else {
            None
        };
        Ok(ActorContext {
            player: id,
            name: player.name.clone(),
            role: player.role,
            phase: state.phase,
            turn: state.turn,
            day: state.day_count,
            alive: state.alive_ids(),
            sheriff: state.sheriff,
            teammates,
            wolf_kill,
            save_available: state.witch_save_available,
            poison_available: state.witch_poison_available,
            candidates: state.election_candidates.clone(),
            pk_candidates: state.pk_candidates.clone(),
            history: state.history_tail(HISTORY_WINDOW).to_vec(),
            notes: player.notes.clone(),
            summary: state.summary.clone(),
        })
    }
}

/// What a night power does with its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NightActionKind {
    Kill,
    Protect,
    Check,
    Save,
    Poison,
    Shoot,
    TransferBadge,
    /// Tear up the badge instead of passing it
    RipBadge,
    Pass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightReply {
    pub action: NightActionKind,
    pub target: Option<PlayerId>,
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteReply {
    /// `None` is an abstention
    pub target: Option<PlayerId>,
    pub reasoning: Option<String>,
}

/// Side action attached to a day speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayAction {
    /// Stand for sheriff (nomination step only)
    Run,
    /// Withdraw a standing candidacy
    QuitElection,
    /// Sheriff sets the speaking direction
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayReply {
    pub speech: String,
    pub action: Option<DayAction>,
    pub reasoning: Option<String>,
}

/// Closed union of everything an actor may answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActorReply {
    Night(NightReply),
    Vote(VoteReply),
    Day(DayReply),
}

impl ActorReply {
    /// The harmless default a failing or absent actor falls back to
    pub fn default_for(turn: TurnType) -> Self {
        if turn.is_batch() {
            return ActorReply::Vote(VoteReply {
                target: None,
                reasoning: None,
            });
        }
        if turn.is_serial() {
            return ActorReply::Day(DayReply {
                speech: "(remains silent)".to_string(),
                action: None,
                reasoning: None,
            });
        }
        ActorReply::Night(NightReply {
            action: NightActionKind::Pass,
            target: None,
            reasoning: None,
        })
    }
}

/// A pluggable decision policy for one seat.
///
/// `decide` takes `&self` and implementors must be `Send + Sync` so
/// ballot batches can fan out in parallel.
pub trait Actor: Send + Sync {
    fn decide(&self, ctx: &ActorContext) -> Result<ActorReply>;
}

/// Compresses old transcript into the rolling summary after each day
/// break. Failure keeps the previous summary.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, day: u32, previous: &str, recent: &[Event]) -> Result<String>;
}

/// Fold one actor's reply into a delta for the current turn.
///
/// Always clears `current_actor`; invalid targets are dropped rather
/// than rejected so a confused actor costs itself its action, nothing
/// more.
pub fn merge_reply(state: &GameState, player: PlayerId, reply: ActorReply) -> StateDelta {
    let turn = state.turn;
    let reply = normalize(turn, reply);

    let mut delta = StateDelta::default();
    delta.current_actor = Some(None);

    match reply {
        ActorReply::Night(night) => {
            if let Some(thought) = night.reasoning {
                delta.reasoning.push((player, thought));
            }
            merge_night(state, player, turn, night.action, night.target, &mut delta);
        }
        ActorReply::Vote(vote) => {
            if let Some(thought) = vote.reasoning {
                delta.reasoning.push((player, thought));
            }
            let target = vote.target.filter(|t| valid_vote_target(state, turn, *t));
            delta.votes.push((player, target));
        }
        ActorReply::Day(day) => {
            if let Some(thought) = day.reasoning {
                delta.reasoning.push((player, thought));
            }
            if !day.speech.is_empty() {
                delta.speak(player, day.speech);
            }
            merge_day_action(state, player, turn, day.action, &mut delta);
        }
    }
    delta
}

/// A wrong-shaped reply for the step degrades to the step default
fn normalize(turn: TurnType, reply: ActorReply) -> ActorReply {
    let fits = match (&reply, turn) {
        (ActorReply::Vote(_), t) if t.is_batch() => true,
        (ActorReply::Day(_), t) if t.is_serial() => true,
        (ActorReply::Night(_), t) => {
            t.is_night_action() || t == TurnType::HunterShoot || t == TurnType::SheriffTransfer
        }
        _ => false,
    };
    if fits {
        reply
    } else {
        ActorReply::default_for(turn)
    }
}

fn merge_night(
    state: &GameState,
    player: PlayerId,
    turn: TurnType,
    action: NightActionKind,
    target: Option<PlayerId>,
    delta: &mut StateDelta,
) {
    let living = |t: &PlayerId| state.is_alive(*t);
    match turn {
        TurnType::GuardProtect => {
            let target = target
                .filter(living)
                .filter(|_| action == NightActionKind::Protect)
                // protecting the same player two nights running is void
                .filter(|t| state.last_guarded != Some(*t));
            delta.night_actions.push((NightActionKey::GuardProtect, target));
        }
        TurnType::WolfKill => {
            let target = target
                .filter(living)
                .filter(|_| action == NightActionKind::Kill);
            delta.night_actions.push((NightActionKey::WolfKill, target));
        }
        TurnType::SeerCheck => {
            let target = target
                .filter(living)
                .filter(|t| *t != player)
                .filter(|_| action == NightActionKind::Check);
            if let Some(checked) = target {
                // the check result is private role-channel feedback
                if let Ok(suspect) = state.player(checked) {
                    let verdict = if suspect.role.is_wolf() {
                        "a werewolf"
                    } else {
                        "not a werewolf"
                    };
                    delta.notes.push((
                        player,
                        format!("Night {}: {} ({}) is {}.", state.day_count, suspect.name, checked, verdict),
                    ));
                }
            }
            delta.night_actions.push((NightActionKey::SeerCheck, target));
        }
        TurnType::WitchAction => match action {
            NightActionKind::Save
                if state.witch_save_available
                    && target.is_some()
                    && target == wolf_kill_slot(state) =>
            {
                delta.night_actions.push((NightActionKey::WitchSave, target));
            }
            NightActionKind::Poison if state.witch_poison_available => {
                let target = target.filter(living).filter(|t| *t != player);
                match target {
                    Some(_) => delta.night_actions.push((NightActionKey::WitchPoison, target)),
                    None => delta.night_actions.push((NightActionKey::WitchSave, None)),
                }
            }
            _ => delta.night_actions.push((NightActionKey::WitchSave, None)),
        },
        TurnType::HunterShoot => {
            let target = target
                .filter(living)
                .filter(|t| *t != player)
                .filter(|_| action == NightActionKind::Shoot);
            delta.night_actions.push((NightActionKey::HunterShoot, target));
        }
        TurnType::SheriffTransfer => {
            let target = target
                .filter(living)
                .filter(|t| *t != player)
                .filter(|_| action == NightActionKind::TransferBadge);
            delta.night_actions.push((NightActionKey::SheriffTransfer, target));
        }
        _ => {
            // night reply on a day step: normalize() only lets this
            // happen for night turns, so nothing to record
        }
    }
}

fn wolf_kill_slot(state: &GameState) -> Option<PlayerId> {
    state
        .night_actions
        .get(&NightActionKey::WolfKill)
        .copied()
        .flatten()
}

fn valid_vote_target(state: &GameState, turn: TurnType, target: PlayerId) -> bool {
    if !state.is_alive(target) {
        return false;
    }
    match turn {
        TurnType::PkVoting => state.pk_candidates.contains(&target),
        TurnType::SheriffVoting => state.election_candidates.contains(&target),
        _ => true,
    }
}

fn merge_day_action(
    state: &GameState,
    player: PlayerId,
    turn: TurnType,
    action: Option<DayAction>,
    delta: &mut StateDelta,
) {
    match (turn, action) {
        (TurnType::SheriffNomination, Some(DayAction::Run)) => {
            let mut candidates = state.election_candidates.clone();
            if !candidates.contains(&player) {
                candidates.push(player);
                candidates.sort();
            }
            delta.election_candidates = Some(candidates);
        }
        (TurnType::SheriffNomination, Some(DayAction::QuitElection)) => {
            let candidates = state
                .election_candidates
                .iter()
                .copied()
                .filter(|c| *c != player)
                .collect();
            delta.election_candidates = Some(candidates);
        }
        (TurnType::Discussion, Some(DayAction::Clockwise)) if state.sheriff == Some(player) => {
            delta.speech_direction = Some(Some(SpeechDirection::Clockwise));
        }
        (TurnType::Discussion, Some(DayAction::CounterClockwise))
            if state.sheriff == Some(player) =>
        {
            delta.speech_direction = Some(Some(SpeechDirection::CounterClockwise));
        }
        _ => {}
    }
}
