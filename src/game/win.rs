//! Win-condition evaluation

use crate::core::Side;
use crate::game::state::GameState;

/// Check whether either faction has won.
///
/// Villagers win when no wolf is left alive; wolves win at parity, when
/// they equal or outnumber the living non-wolves. Pure; the driver calls
/// this before every step so a mid-cascade kill ends the game at once.
pub fn evaluate(state: &GameState) -> Option<Side> {
    let mut wolves = 0usize;
    let mut others = 0usize;
    for player in state.players.iter().filter(|p| p.alive) {
        if player.role.is_wolf() {
            wolves += 1;
        } else {
            others += 1;
        }
    }
    if wolves == 0 {
        Some(Side::Villager)
    } else if wolves >= others {
        Some(Side::Werewolf)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerId, Role};

    fn state_with(roles: &[Role]) -> GameState {
        GameState::new(
            roles
                .iter()
                .enumerate()
                .map(|(i, r)| (format!("P{}", i + 1), *r))
                .collect(),
        )
    }

    #[test]
    fn test_villagers_win_when_wolves_gone() {
        let mut state = state_with(&[Role::Werewolf, Role::Villager, Role::Seer]);
        assert_eq!(evaluate(&state), None);
        state.player_mut(PlayerId::new(1)).unwrap().alive = false;
        assert_eq!(evaluate(&state), Some(Side::Villager));
    }

    #[test]
    fn test_wolves_win_at_parity() {
        let mut state = state_with(&[Role::Werewolf, Role::Werewolf, Role::Villager, Role::Witch]);
        assert_eq!(evaluate(&state), None);
        state.player_mut(PlayerId::new(4)).unwrap().alive = false;
        // 2 wolves vs 1 villager
        assert_eq!(evaluate(&state), Some(Side::Werewolf));
    }

    #[test]
    fn test_wolves_win_when_outnumbering() {
        let mut state = state_with(&[Role::Werewolf, Role::Werewolf, Role::Villager]);
        assert_eq!(evaluate(&state), Some(Side::Werewolf));
        state.player_mut(PlayerId::new(3)).unwrap().alive = false;
        assert_eq!(evaluate(&state), Some(Side::Werewolf));
    }

    #[test]
    fn test_gods_count_as_villagers() {
        let state = state_with(&[Role::Werewolf, Role::Seer, Role::Witch, Role::Hunter]);
        // 1 wolf vs 3 gods: still running
        assert_eq!(evaluate(&state), None);
    }
}
