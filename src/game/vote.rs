//! Vote tallying and settle handlers
//!
//! One tally routine serves both the sheriff election and the daily
//! execution vote; the two settle handlers differ in tie policy and in
//! what a winner means.

use crate::core::{PlayerId, Role};
use crate::game::cascade;
use crate::game::delta::StateDelta;
use crate::game::phase::TurnType;
use crate::game::state::GameState;
use crate::game::announce;
use rand::Rng;
use rustc_hash::FxHashMap;

/// Result of counting one ballot map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Winner(PlayerId),
    /// All top-weight candidates, ascending by seat
    Tie(Vec<PlayerId>),
    /// Every ballot was an abstention (or none were cast)
    NoVotes,
}

/// Count ballots. The sitting sheriff's ballot weighs 1.5; weights are
/// held in tenths (15 vs 10) so comparison stays exact. Pass
/// `sheriff = None` for the election itself, where every ballot is 1.0.
pub fn tally(
    votes: &FxHashMap<PlayerId, Option<PlayerId>>,
    sheriff: Option<PlayerId>,
) -> VoteOutcome {
    let mut weights: FxHashMap<PlayerId, u32> = FxHashMap::default();
    for (voter, target) in votes {
        if let Some(target) = target {
            let w = if sheriff == Some(*voter) { 15 } else { 10 };
            *weights.entry(*target).or_insert(0) += w;
        }
    }
    let Some(top) = weights.values().copied().max() else {
        return VoteOutcome::NoVotes;
    };
    let mut leaders: Vec<PlayerId> = weights
        .iter()
        .filter(|(_, w)| **w == top)
        .map(|(id, _)| *id)
        .collect();
    leaders.sort();
    if leaders.len() == 1 {
        VoteOutcome::Winner(leaders[0])
    } else {
        VoteOutcome::Tie(leaders)
    }
}

/// Settle the first-day sheriff election.
///
/// A tie is broken by a uniform random draw from the match RNG; with no
/// ballots at all the badge is simply lost for the rest of the match.
pub fn settle_election(state: &GameState) -> StateDelta {
    let mut delta = StateDelta::default();

    match tally(&state.votes, None) {
        VoteOutcome::Winner(winner) => {
            delta.sheriff = Some(Some(winner));
            delta.announce(announce::sheriff_elected(state, winner));
        }
        VoteOutcome::Tie(tied) => {
            let pick = {
                let mut rng = state.rng.borrow_mut();
                tied[rng.gen_range(0..tied.len())]
            };
            delta.announce(announce::election_tie(state, &tied));
            delta.sheriff = Some(Some(pick));
            delta.announce(announce::sheriff_elected(state, pick));
        }
        VoteOutcome::NoVotes => {
            delta.announce(announce::badge_lost());
        }
    }

    delta.clear_votes = true;
    delta.parallel_batch = Some(Vec::new());
    delta.election_candidates = Some(Vec::new());
    delta.turn = Some(TurnType::DayAnnouncement);
    delta
}

/// Settle a day execution vote (first round or PK re-vote).
///
/// A first-round tie escalates to a PK round among the tied; a tie in
/// the re-vote executes nobody. A winner's death stays provisional until
/// the execution announcement, but their cascade hooks are armed now.
pub fn settle_execution(state: &GameState) -> StateDelta {
    let mut delta = StateDelta::default();
    let pk_round = !state.pk_candidates.is_empty();

    match tally(&state.votes, state.sheriff) {
        VoteOutcome::Winner(victim) => {
            delta.last_execution = Some(Some(victim));
            delta.announce(announce::voted_out(state, victim));

            let hunter = state
                .player(victim)
                .ok()
                .filter(|p| p.role == Role::Hunter && state.hunter_can_shoot)
                .map(|p| p.id);
            let badge = state.sheriff == Some(victim);
            cascade::route_hooks(
                &mut delta,
                state,
                &[victim],
                hunter,
                badge,
                TurnType::ExecutionAnnouncement,
            );
        }
        VoteOutcome::Tie(tied) if !pk_round => {
            delta.announce(announce::pk_tie(state, &tied));
            delta.pk_candidates = Some(tied.clone());
            delta.action_queue = Some(tied.into_iter().collect());
            delta.turn = Some(TurnType::PkDiscussion);
        }
        VoteOutcome::Tie(_) => {
            delta.announce(announce::pk_deadlock());
            delta.turn = Some(TurnType::ExecutionAnnouncement);
        }
        VoteOutcome::NoVotes => {
            delta.announce(announce::no_execution());
            delta.turn = Some(TurnType::ExecutionAnnouncement);
        }
    }

    if pk_round {
        delta.pk_candidates = Some(Vec::new());
    }
    delta.clear_votes = true;
    delta.parallel_batch = Some(Vec::new());
    delta
}
