//! Turn scheduling
//!
//! `route` decides who owes the next move; `advance` performs the
//! no-actor transitions (night wake order, serial queue popping, batch
//! coverage checks, step successors). Neither applies deaths or counts
//! votes; settle handlers own those. Every handler consumes its step by
//! changing `turn`, so both functions are safe to call repeatedly.

use crate::core::PlayerId;
use crate::game::announce;
use crate::game::cascade;
use crate::game::delta::StateDelta;
use crate::game::phase::{TurnType, NIGHT_ORDER};
use crate::game::state::{GameState, NightActionKey};
use crate::{EngineError, Result};
use smallvec::SmallVec;

/// What the driver should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Game over; stop the loop
    Finished,
    /// One player owes a decision
    Actor(PlayerId),
    /// These players owe simultaneous ballots
    Batch(SmallVec<[PlayerId; 12]>),
    /// An engine handler resolves this turn
    Handler(TurnType),
    /// No actor owed; call `advance`
    Advance,
}

/// Classify the current state. Pure and idempotent.
pub fn route(state: &GameState) -> Route {
    if state.game_over {
        return Route::Finished;
    }
    if let Some(id) = state.current_actor {
        return Route::Actor(id);
    }
    if state.turn.is_settle() {
        return Route::Handler(state.turn);
    }
    if state.turn == TurnType::SheriffTransfer
        && state.night_actions.contains_key(&NightActionKey::SheriffTransfer)
    {
        return Route::Handler(TurnType::SheriffTransfer);
    }
    if state.turn.is_batch() {
        let outstanding: SmallVec<[PlayerId; 12]> = state
            .parallel_batch
            .iter()
            .copied()
            .filter(|id| state.is_alive(*id) && !state.votes.contains_key(id))
            .collect();
        if outstanding.is_empty() {
            return Route::Advance;
        }
        return Route::Batch(outstanding);
    }
    Route::Advance
}

/// Perform the next no-actor transition.
pub fn advance(state: &GameState) -> Result<StateDelta> {
    let mut delta = StateDelta::default();

    if state.turn.is_night_action() {
        // Walk the wake order from the current station; a step is done
        // once its blackboard slot exists (a pass writes `None`). Steps
        // whose role has no living holder are skipped silently.
        let start = NIGHT_ORDER
            .iter()
            .position(|t| *t == state.turn)
            .unwrap_or(0);
        for step in NIGHT_ORDER[start..].iter().copied() {
            if night_step_done(state, step) {
                continue;
            }
            if let Some(actor) = night_actor(state, step) {
                delta.turn = Some(step);
                delta.current_actor = Some(Some(actor));
                return Ok(delta);
            }
        }
        delta.turn = Some(TurnType::NightSettle);
        return Ok(delta);
    }

    if state.turn.is_serial() {
        let mut queue = state.action_queue.clone();
        if let Some(next) = queue.pop_front() {
            delta.action_queue = Some(queue);
            delta.current_actor = Some(Some(next));
            return Ok(delta);
        }
        return serial_successor(state);
    }

    if state.turn.is_batch() {
        // route() found no outstanding ballots: coverage is complete
        delta.parallel_batch = Some(Vec::new());
        delta.turn = Some(match state.turn {
            TurnType::SheriffVoting => TurnType::SheriffSettle,
            _ => TurnType::VotingSettle,
        });
        return Ok(delta);
    }

    if state.turn == TurnType::HunterShoot
        && state.night_actions.contains_key(&NightActionKey::HunterShoot)
    {
        delta.turn = Some(TurnType::HunterAnnouncement);
        return Ok(delta);
    }

    Err(EngineError::CorruptState(format!(
        "no transition from turn {}",
        state.turn
    )))
}

fn night_step_done(state: &GameState, step: TurnType) -> bool {
    let has = |key| state.night_actions.contains_key(&key);
    match step {
        TurnType::GuardProtect => has(NightActionKey::GuardProtect),
        TurnType::WolfKill => has(NightActionKey::WolfKill),
        TurnType::SeerCheck => has(NightActionKey::SeerCheck),
        // the witch acts at most once per night, with either potion
        TurnType::WitchAction => has(NightActionKey::WitchSave) || has(NightActionKey::WitchPoison),
        _ => true,
    }
}

fn night_actor(state: &GameState, step: TurnType) -> Option<PlayerId> {
    step.night_role().and_then(|role| state.living_role_holder(role))
}

/// Successor of a serial step whose queue has drained
fn serial_successor(state: &GameState) -> Result<StateDelta> {
    let mut delta = StateDelta::default();
    match state.turn {
        TurnType::Discussion => {
            delta.turn = Some(TurnType::Voting);
            delta.parallel_batch = Some(state.alive_ids());
            delta.clear_votes = true;
        }
        TurnType::PkDiscussion => {
            let mut voters: Vec<PlayerId> = state
                .alive_ids()
                .into_iter()
                .filter(|id| !state.pk_candidates.contains(id))
                .collect();
            if voters.is_empty() {
                // degenerate table where everyone is tied: all vote
                voters = state.alive_ids();
            }
            delta.turn = Some(TurnType::PkVoting);
            delta.parallel_batch = Some(voters);
            delta.clear_votes = true;
        }
        TurnType::SheriffNomination => {
            if state.election_candidates.is_empty() {
                delta.announce(announce::nobody_ran());
                delta.turn = Some(TurnType::DayAnnouncement);
            } else {
                let mut candidates = state.election_candidates.clone();
                candidates.sort();
                delta.action_queue = Some(candidates.into_iter().collect());
                delta.turn = Some(TurnType::SheriffDiscussion);
            }
        }
        TurnType::SheriffDiscussion => {
            let voters: Vec<PlayerId> = state
                .alive_ids()
                .into_iter()
                .filter(|id| !state.election_candidates.contains(id))
                .collect();
            if voters.is_empty() {
                // everyone ran, so nobody may vote
                delta.announce(announce::badge_lost());
                delta.election_candidates = Some(Vec::new());
                delta.turn = Some(TurnType::DayAnnouncement);
            } else {
                delta.turn = Some(TurnType::SheriffVoting);
                delta.parallel_batch = Some(voters);
                delta.clear_votes = true;
            }
        }
        TurnType::LastWords => {
            let resume = state.cascade_return.unwrap_or(TurnType::Discussion);
            cascade::route_hooks(
                &mut delta,
                state,
                &[],
                state.pending_hunter,
                state.pending_badge_transfer,
                resume,
            );
        }
        other => {
            return Err(EngineError::CorruptState(format!(
                "serial successor requested for turn {}",
                other
            )))
        }
    }
    Ok(delta)
}
