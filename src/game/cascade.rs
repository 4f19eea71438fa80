//! Death cascade management
//!
//! Any death can unlock follow-up turns, in fixed priority: last words,
//! then the hunter's retaliation shot, then the dead sheriff's badge
//! transfer. The cascade remembers where the turn machine resumes in
//! `cascade_return` and drains one hook at a time; a hunter shot may
//! itself add a badge transfer to the drain.

use crate::core::PlayerId;
use crate::game::announce;
use crate::game::delta::StateDelta;
use crate::game::phase::{SpeechDirection, TurnType};
use crate::game::state::{speech_order, GameState, NightActionKey};
use crate::Result;

/// Arm the next pending hook, or resume normal play.
///
/// Writes the pending flags and the turn transition into `delta`.
/// `resume` is where play continues once every hook has drained; when it
/// is `Discussion` the speaking queue is rebuilt here, against the alive
/// set as it will stand after this delta's deaths apply.
pub fn route_hooks(
    delta: &mut StateDelta,
    state: &GameState,
    last_words: &[PlayerId],
    hunter: Option<PlayerId>,
    badge: bool,
    resume: TurnType,
) {
    delta.pending_hunter = Some(hunter);
    delta.pending_badge_transfer = Some(badge);

    if !last_words.is_empty() {
        let mut speakers = last_words.to_vec();
        speakers.sort();
        delta.pending_last_words = Some(speakers.clone());
        delta.cascade_return = Some(Some(resume));
        delta.turn = Some(TurnType::LastWords);
        delta.action_queue = Some(speakers.into_iter().collect());
        delta.current_actor = Some(None);
        return;
    }
    delta.pending_last_words = Some(Vec::new());

    if let Some(hunter) = hunter {
        delta.cascade_return = Some(Some(resume));
        delta.turn = Some(TurnType::HunterShoot);
        delta.current_actor = Some(Some(hunter));
        // stale slot from an earlier cascade the same day
        delta.remove_night_actions.push(NightActionKey::HunterShoot);
        return;
    }

    let holder = effective_sheriff(delta, state);
    if badge {
        if let Some(holder) = holder {
            delta.cascade_return = Some(Some(resume));
            delta.turn = Some(TurnType::SheriffTransfer);
            delta.current_actor = Some(Some(holder));
            delta.remove_night_actions.push(NightActionKey::SheriffTransfer);
            return;
        }
        delta.pending_badge_transfer = Some(false);
    }

    delta.cascade_return = Some(None);
    delta.turn = Some(resume);
    delta.current_actor = Some(None);
    if resume == TurnType::Discussion {
        delta.action_queue = Some(discussion_queue(delta, state).into_iter().collect());
    }
}

/// Handle the hunter's shot announcement.
///
/// The shot kills immediately (no provisional window and no last words
/// for the victim); the trigger is spent whether or not it fired. A shot
/// sheriff still passes the badge.
pub fn hunter_announcement(state: &GameState) -> Result<StateDelta> {
    let target = state
        .night_actions
        .get(&NightActionKey::HunterShoot)
        .copied()
        .flatten();
    let hunter = state.pending_hunter.ok_or_else(|| {
        crate::EngineError::CorruptState("hunter announcement with no pending hunter".into())
    })?;

    let mut delta = StateDelta::default();
    delta.hunter_can_shoot = Some(false);
    delta.remove_night_actions.push(NightActionKey::HunterShoot);

    let mut badge = state.pending_badge_transfer;
    match target.filter(|t| state.is_alive(*t)) {
        Some(victim) => {
            delta.deaths.push(victim);
            delta.announce(announce::hunter_shot(state, hunter, victim));
            if state.sheriff == Some(victim) {
                badge = true;
            }
        }
        None => delta.announce(announce::hunter_holds_fire(state, hunter)),
    }

    let resume = state.cascade_return.unwrap_or(TurnType::Discussion);
    route_hooks(&mut delta, state, &[], None, badge, resume);
    Ok(delta)
}

/// Handle the dying sheriff's badge decision.
///
/// The submitted slot either names a living successor or is an explicit
/// pass, which retires the badge for the rest of the match.
pub fn badge_transfer(state: &GameState) -> Result<StateDelta> {
    let holder = state.sheriff.ok_or_else(|| {
        crate::EngineError::CorruptState("badge transfer with no sheriff".into())
    })?;
    let choice = state
        .night_actions
        .get(&NightActionKey::SheriffTransfer)
        .copied()
        .flatten()
        .filter(|t| state.is_alive(*t) && *t != holder);

    let mut delta = StateDelta::default();
    delta.sheriff = Some(choice);
    delta.remove_night_actions.push(NightActionKey::SheriffTransfer);
    match choice {
        Some(successor) => delta.announce(announce::badge_passed(state, holder, successor)),
        None => delta.announce(announce::badge_discarded(state, holder)),
    }

    let resume = state.cascade_return.unwrap_or(TurnType::Discussion);
    route_hooks(&mut delta, state, &[], None, false, resume);
    Ok(delta)
}

/// Sheriff as it will stand after this delta commits
fn effective_sheriff(delta: &StateDelta, state: &GameState) -> Option<PlayerId> {
    match delta.sheriff {
        Some(updated) => updated,
        None => state.sheriff,
    }
}

/// Discussion order against the post-commit table: this delta's deaths
/// are excluded and its sheriff/direction updates honored.
fn discussion_queue(delta: &StateDelta, state: &GameState) -> Vec<PlayerId> {
    let alive: Vec<PlayerId> = state
        .alive_ids()
        .into_iter()
        .filter(|id| !delta.deaths.contains(id))
        .collect();
    let sheriff = effective_sheriff(delta, state).filter(|s| alive.contains(s));
    let direction = match delta.speech_direction {
        Some(updated) => updated,
        None => state.speech_direction,
    }
    .unwrap_or(SpeechDirection::Clockwise);
    speech_order(&alive, sheriff, direction)
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
        state.phase = crate::game::phase::Phase::Day;
        state
    }

    #[test]
    fn test_last_words_take_priority() {
        let state = day_state(&[Role::Villager, Role::Hunter, Role::Seer]);
        let mut delta = StateDelta::default();
        route_hooks(
            &mut delta,
            &state,
            &[PlayerId::new(2)],
            Some(PlayerId::new(2)),
            true,
            TurnType::Discussion,
        );
        assert_eq!(delta.turn, Some(TurnType::LastWords));
        assert_eq!(delta.pending_hunter, Some(Some(PlayerId::new(2))));
        assert_eq!(delta.pending_badge_transfer, Some(true));
        assert_eq!(delta.cascade_return, Some(Some(TurnType::Discussion)));
    }

    #[test]
    fn test_hunter_before_badge() {
        let mut state = day_state(&[Role::Villager, Role::Hunter, Role::Seer]);
        state.sheriff = Some(PlayerId::new(2));
        let mut delta = StateDelta::default();
        route_hooks(
            &mut delta,
            &state,
            &[],
            Some(PlayerId::new(2)),
            true,
            TurnType::Discussion,
        );
        assert_eq!(delta.turn, Some(TurnType::HunterShoot));
        assert_eq!(delta.current_actor, Some(Some(PlayerId::new(2))));
        assert_eq!(delta.pending_badge_transfer, Some(true));
    }

    #[test]
    fn test_drained_cascade_resumes_discussion() {
        let state = day_state(&[Role::Villager, Role::Hunter, Role::Seer]);
        let mut delta = StateDelta::default();
        delta.deaths.push(PlayerId::new(2));
        route_hooks(&mut delta, &state, &[], None, false, TurnType::Discussion);
        assert_eq!(delta.turn, Some(TurnType::Discussion));
        assert_eq!(delta.cascade_return, Some(None));
        // queue excludes this delta's own deaths
        let queue: Vec<PlayerId> = delta.action_queue.unwrap().into_iter().collect();
        assert_eq!(queue, vec![PlayerId::new(1), PlayerId::new(3)]);
    }

    #[test]
    fn test_badge_with_no_sheriff_is_dropped() {
        let state = day_state(&[Role::Villager, Role::Villager]);
        let mut delta = StateDelta::default();
        route_hooks(&mut delta, &state, &[], None, true, TurnType::ExecutionAnnouncement);
        assert_eq!(delta.turn, Some(TurnType::ExecutionAnnouncement));
        assert_eq!(delta.pending_badge_transfer, Some(false));
    }

    #[test]
    fn test_hunter_shot_kills_and_chains_badge() {
        let mut state = day_state(&[Role::Hunter, Role::Villager, Role::Seer, Role::Witch]);
        state.sheriff = Some(PlayerId::new(2));
        state.pending_hunter = Some(PlayerId::new(1));
        state.cascade_return = Some(TurnType::Discussion);
        state.turn = TurnType::HunterShoot;
        state
            .night_actions
            .insert(NightActionKey::HunterShoot, Some(PlayerId::new(2)));

        let delta = hunter_announcement(&state).unwrap();
        assert_eq!(delta.deaths, vec![PlayerId::new(2)]);
        assert_eq!(delta.hunter_can_shoot, Some(false));
        // victim held the badge: transfer chains before discussion
        assert_eq!(delta.turn, Some(TurnType::SheriffTransfer));
        assert_eq!(delta.current_actor, Some(Some(PlayerId::new(2))));
    }

    #[test]
    fn test_hunter_may_hold_fire() {
        let mut state = day_state(&[Role::Hunter, Role::Villager]);
        state.pending_hunter = Some(PlayerId::new(1));
        state.turn = TurnType::HunterShoot;
        state.night_actions.insert(NightActionKey::HunterShoot, None);

        let delta = hunter_announcement(&state).unwrap();
        assert!(delta.deaths.is_empty());
        assert_eq!(delta.hunter_can_shoot, Some(false));
        assert_eq!(delta.turn, Some(TurnType::Discussion));
    }

    #[test]
    fn test_badge_transfer_names_successor() {
        let mut state = day_state(&[Role::Villager, Role::Seer, Role::Witch]);
        state.sheriff = Some(PlayerId::new(1));
        state.cascade_return = Some(TurnType::ExecutionAnnouncement);
        state.turn = TurnType::SheriffTransfer;
        state
            .night_actions
            .insert(NightActionKey::SheriffTransfer, Some(PlayerId::new(3)));

        let delta = badge_transfer(&state).unwrap();
        assert_eq!(delta.sheriff, Some(Some(PlayerId::new(3))));
        assert_eq!(delta.turn, Some(TurnType::ExecutionAnnouncement));
        assert_eq!(delta.cascade_return, Some(None));
    }

    #[test]
    fn test_badge_discard_retires_badge() {
        let mut state = day_state(&[Role::Villager, Role::Seer]);
        state.sheriff = Some(PlayerId::new(1));
        state.turn = TurnType::SheriffTransfer;
        state.night_actions.insert(NightActionKey::SheriffTransfer, None);

        let delta = badge_transfer(&state).unwrap();
        assert_eq!(delta.sheriff, Some(None));
        assert_eq!(delta.turn, Some(TurnType::Discussion));
    }
}
