//! Night resolution
//!
//! Runs once per night at `NightSettle`, after every waking role has
//! written its slot on the night-action blackboard. Deaths computed here
//! are provisional: the alive flags stay untouched until the day
//! announcement so the village (including tonight's victims) can hold
//! the first-day sheriff election in the dark.

use crate::core::Role;
use crate::game::delta::StateDelta;
use crate::game::phase::{Phase, TurnType};
use crate::game::state::{GameState, NightActionKey};

/// Resolve the night's submitted actions into provisional deaths.
///
/// Kill/protect/save interaction: the wolf victim survives iff exactly
/// one of guard protection and witch save landed on them. Both at once
/// is fatal, as is neither (deliberate rule: the guard's shield and the
/// witch's antidote cancel out). Poison is independent and always fatal.
pub fn resolve(state: &GameState) -> StateDelta {
    let kill = slot(state, NightActionKey::WolfKill);
    let protect = slot(state, NightActionKey::GuardProtect);
    let save = slot(state, NightActionKey::WitchSave);
    let poison = slot(state, NightActionKey::WitchPoison);

    let mut dead = Vec::new();
    if let Some(victim) = kill {
        let guarded = protect == Some(victim);
        let saved = save == Some(victim);
        if guarded == saved {
            dead.push(victim);
        }
    }
    if let Some(victim) = poison {
        if !dead.contains(&victim) {
            dead.push(victim);
        }
    }
    dead.sort();

    let mut delta = StateDelta::default();

    // First-night victims get last words at day break; later nights do not.
    delta.pending_last_words = Some(if state.day_count == 1 { dead.clone() } else { Vec::new() });

    for victim in &dead {
        let is_hunter = state
            .player(*victim)
            .map(|p| p.role == Role::Hunter)
            .unwrap_or(false);
        // A poisoned hunter's trigger is suppressed.
        if is_hunter && state.hunter_can_shoot && poison != Some(*victim) {
            delta.pending_hunter = Some(Some(*victim));
        }
        if state.sheriff == Some(*victim) {
            delta.pending_badge_transfer = Some(true);
        }
    }

    // Potions are spent on use, not on pass.
    if save.is_some() {
        delta.witch_save_available = Some(false);
    }
    if poison.is_some() {
        delta.witch_poison_available = Some(false);
    }

    delta.last_guarded = Some(protect);
    delta.last_night_dead = Some(dead);
    delta.clear_night_actions = true;
    delta.phase = Some(Phase::Day);

    if state.day_count == 1 && state.sheriff.is_none() {
        // Day one opens with the sheriff election, deaths still hidden.
        delta.turn = Some(TurnType::SheriffNomination);
        delta.action_queue = Some(state.alive_ids().into_iter().collect());
        delta.election_candidates = Some(Vec::new());
    } else {
        delta.turn = Some(TurnType::DayAnnouncement);
    }
    delta.current_actor = Some(None);

    delta
}

fn slot(state: &GameState, key: NightActionKey) -> Option<crate::core::PlayerId> {
    state.night_actions.get(&key).copied().flatten()
}
