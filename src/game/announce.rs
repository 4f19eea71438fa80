//! Game-master announcements
//!
//! All public narration strings are built here, plus the two settle
//! handlers that consume provisional deaths: the day break announcement
//! and the execution announcement that closes the day.

use crate::core::{PlayerId, Side};
use crate::game::cascade;
use crate::game::delta::StateDelta;
use crate::game::phase::{Phase, TurnType};
use crate::game::state::GameState;

/// "Name (seat)" for announcements; falls back to the bare seat number
/// for unknown ids rather than erroring in a formatting path.
fn seat(state: &GameState, id: PlayerId) -> String {
    match state.player(id) {
        Ok(player) => format!("{} ({})", player.name, id),
        Err(_) => format!("player {}", id),
    }
}

fn seats(state: &GameState, ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|id| seat(state, *id))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn night_toll(state: &GameState, dead: &[PlayerId]) -> String {
    format!(
        "Day {} breaks. Last night, {} died.",
        state.day_count,
        seats(state, dead)
    )
}

pub fn peaceful_night(state: &GameState) -> String {
    format!("Day {} breaks. It was a peaceful night; nobody died.", state.day_count)
}

pub fn sheriff_elected(state: &GameState, winner: PlayerId) -> String {
    format!("{} is elected sheriff.", seat(state, winner))
}

pub fn election_tie(state: &GameState, tied: &[PlayerId]) -> String {
    format!(
        "The sheriff election is tied between {}. The badge is drawn by lot.",
        seats(state, tied)
    )
}

pub fn badge_lost() -> String {
    "No sheriff was elected. The badge is lost for the rest of the game.".to_string()
}

pub fn nobody_ran() -> String {
    "Nobody ran for sheriff. The badge is lost for the rest of the game.".to_string()
}

pub fn voted_out(state: &GameState, victim: PlayerId) -> String {
    format!("The village has voted to execute {}.", seat(state, victim))
}

pub fn pk_tie(state: &GameState, tied: &[PlayerId]) -> String {
    format!(
        "The vote is tied between {}. They will plead their case before a final vote.",
        seats(state, tied)
    )
}

pub fn pk_deadlock() -> String {
    "The final vote is still tied. Nobody is executed today.".to_string()
}

pub fn no_execution() -> String {
    "No votes were cast. Nobody is executed today.".to_string()
}

pub fn hunter_shot(state: &GameState, hunter: PlayerId, victim: PlayerId) -> String {
    format!(
        "{} was the hunter and takes {} down in a final shot.",
        seat(state, hunter),
        seat(state, victim)
    )
}

pub fn hunter_holds_fire(state: &GameState, hunter: PlayerId) -> String {
    format!("{} was the hunter but holds fire.", seat(state, hunter))
}

pub fn badge_passed(state: &GameState, holder: PlayerId, successor: PlayerId) -> String {
    format!(
        "With their dying act, sheriff {} passes the badge to {}.",
        seat(state, holder),
        seat(state, successor)
    )
}

pub fn badge_discarded(state: &GameState, holder: PlayerId) -> String {
    format!(
        "With their dying act, sheriff {} tears up the badge. There will be no sheriff.",
        seat(state, holder)
    )
}

pub fn victory(side: Side) -> String {
    format!("The game is over. The {} win!", side)
}

pub fn night_falls(next_day: u32) -> String {
    format!("Night falls. Everyone closes their eyes. (Night {})", next_day)
}

/// Day break: apply and announce the provisional night deaths, then hand
/// off to the cascade (last words on day one, hunter, badge) before open
/// discussion.
pub fn day_announcement(state: &GameState) -> StateDelta {
    let mut delta = StateDelta::default();

    let dead: Vec<PlayerId> = state
        .last_night_dead
        .iter()
        .copied()
        .filter(|id| state.is_alive(*id))
        .collect();
    if dead.is_empty() {
        delta.announce(peaceful_night(state));
    } else {
        delta.deaths = dead.clone();
        delta.announce(night_toll(state, &dead));
    }
    delta.last_night_dead = Some(Vec::new());

    // A victim may have been elected sheriff after the night resolved
    // (day-one election runs with deaths still hidden), so re-check the
    // badge against the deaths announced here.
    let badge = state.pending_badge_transfer
        || state.sheriff.map(|s| dead.contains(&s)).unwrap_or(false);

    cascade::route_hooks(
        &mut delta,
        state,
        &state.pending_last_words,
        state.pending_hunter,
        badge,
        TurnType::Discussion,
    );
    delta
}

/// Day close: apply and announce the provisional execution, then send
/// the table back into night.
pub fn execution_announcement(state: &GameState) -> StateDelta {
    let mut delta = StateDelta::default();

    if let Some(victim) = state.last_execution.filter(|id| state.is_alive(*id)) {
        delta.deaths.push(victim);
    }
    delta.last_execution = Some(None);

    delta.announce(night_falls(state.day_count + 1));
    delta.phase = Some(Phase::Night);
    delta.day_count = Some(state.day_count + 1);
    delta.turn = Some(TurnType::GuardProtect);
    delta.current_actor = Some(None);
    delta.action_queue = Some(Default::default());
    delta.parallel_batch = Some(Vec::new());
    delta.clear_night_actions = true;
    delta.clear_votes = true;
    delta.cascade_return = Some(None);
    delta.pending_last_words = Some(Vec::new());
    delta.pending_hunter = Some(None);
    delta.pending_badge_transfer = Some(false);
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;

    fn day_state(roles: &[Role]) -> GameState {
        let mut state = GameState::new(
            roles
                .iter()
                .enumerate()
                .map(|(i, r)| (format!("P{}", i + 1), *r))
                .collect(),
        );
        state.phase = Phase::Day;
        state
    }

    #[test]
    fn test_day_break_applies_night_deaths() {
        let mut state = day_state(&[Role::Werewolf, Role::Villager, Role::Seer]);
        state.turn = TurnType::DayAnnouncement;
        state.last_night_dead = vec![PlayerId::new(2)];
        let delta = day_announcement(&state);
        assert_eq!(delta.deaths, vec![PlayerId::new(2)]);
        assert_eq!(delta.last_night_dead, Some(vec![]));
        assert_eq!(delta.turn, Some(TurnType::Discussion));
        let queue: Vec<PlayerId> = delta.action_queue.unwrap().into_iter().collect();
        assert_eq!(queue, vec![PlayerId::new(1), PlayerId::new(3)]);
    }

    #[test]
    fn test_peaceful_night_announced() {
        let mut state = day_state(&[Role::Werewolf, Role::Villager, Role::Seer]);
        state.turn = TurnType::DayAnnouncement;
        let delta = day_announcement(&state);
        assert!(delta.deaths.is_empty());
        assert!(delta.history[0].body.contains("peaceful night"));
    }

    #[test]
    fn test_day_break_enters_cascade_before_discussion() {
        let mut state = day_state(&[Role::Werewolf, Role::Hunter, Role::Seer]);
        state.turn = TurnType::DayAnnouncement;
        state.last_night_dead = vec![PlayerId::new(2)];
        state.pending_hunter = Some(PlayerId::new(2));
        let delta = day_announcement(&state);
        assert_eq!(delta.turn, Some(TurnType::HunterShoot));
        assert_eq!(delta.cascade_return, Some(Some(TurnType::Discussion)));
    }

    #[test]
    fn test_execution_announcement_closes_the_day() {
        let mut state = day_state(&[Role::Werewolf, Role::Villager, Role::Seer]);
        state.turn = TurnType::ExecutionAnnouncement;
        state.day_count = 2;
        state.last_execution = Some(PlayerId::new(1));
        let delta = execution_announcement(&state);
        assert_eq!(delta.deaths, vec![PlayerId::new(1)]);
        assert_eq!(delta.phase, Some(Phase::Night));
        assert_eq!(delta.day_count, Some(3));
        assert_eq!(delta.turn, Some(TurnType::GuardProtect));
        assert!(delta.clear_night_actions && delta.clear_votes);
    }

    #[test]
    fn test_no_execution_still_advances_night() {
        let mut state = day_state(&[Role::Werewolf, Role::Villager]);
        state.turn = TurnType::ExecutionAnnouncement;
        let delta = execution_announcement(&state);
        assert!(delta.deaths.is_empty());
        assert_eq!(delta.phase, Some(Phase::Night));
        assert_eq!(delta.day_count, Some(2));
    }
}
