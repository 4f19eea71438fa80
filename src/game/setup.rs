//! Roster construction
//!
//! The classic 12-seat table: four wolves, four plain villagers, and the
//! four gods (seer, witch, hunter, guard). Role assignment is a seeded
//! shuffle so a match is reproducible from its seed alone.

use crate::core::Role;
use crate::game::state::GameState;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Seat names, in seating order
pub const CLASSIC_NAMES: [&str; 12] = [
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu",
];

/// The classic 12-player role list, unshuffled
pub fn classic_roles() -> Vec<Role> {
    let mut roles = vec![Role::Werewolf; 4];
    roles.extend(vec![Role::Villager; 4]);
    roles.extend([Role::Seer, Role::Witch, Role::Hunter, Role::Guard]);
    roles
}

/// A fresh classic match with seeded role assignment
pub fn new_classic_game(seed: u64) -> GameState {
    let mut roles = classic_roles();
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    roles.shuffle(&mut rng);

    let roster = CLASSIC_NAMES
        .iter()
        .zip(roles)
        .map(|(name, role)| (name.to_string(), role))
        .collect();
    let mut state = GameState::new(roster);
    // separate stream for in-match draws (election tie-breaks)
    state.seed_rng(seed.wrapping_add(0x5DEECE66D));
    state
}

/// A match with roles fixed in seating order; for tests and scenarios
pub fn new_game_with_roles(roles: &[Role], seed: u64) -> GameState {
    let roster = roles
        .iter()
        .enumerate()
        .map(|(i, role)| {
            let name = CLASSIC_NAMES
                .get(i)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("Seat{}", i + 1));
            (name, *role)
        })
        .collect();
    let mut state = GameState::new(roster);
    state.seed_rng(seed);
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_role_distribution() {
        let roles = classic_roles();
        assert_eq!(roles.len(), 12);
        assert_eq!(roles.iter().filter(|r| r.is_wolf()).count(), 4);
        assert_eq!(roles.iter().filter(|r| **r == Role::Villager).count(), 4);
        for god in [Role::Seer, Role::Witch, Role::Hunter, Role::Guard] {
            assert_eq!(roles.iter().filter(|r| **r == god).count(), 1);
        }
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = new_classic_game(17);
        let b = new_classic_game(17);
        for (pa, pb) in a.players.iter().zip(&b.players) {
            assert_eq!(pa.role, pb.role);
            assert_eq!(pa.name, pb.name);
        }
    }

    #[test]
    fn test_different_seeds_usually_differ() {
        let a = new_classic_game(1);
        let b = new_classic_game(2);
        let same = a
            .players
            .iter()
            .zip(&b.players)
            .all(|(pa, pb)| pa.role == pb.role);
        assert!(!same, "two seeds dealt identical tables");
    }

    #[test]
    fn test_fixed_roles_keep_order() {
        let state = new_game_with_roles(&[Role::Seer, Role::Werewolf], 0);
        assert_eq!(state.players[0].role, Role::Seer);
        assert_eq!(state.players[0].name, "Alpha");
        assert_eq!(state.players[1].role, Role::Werewolf);
    }
}
