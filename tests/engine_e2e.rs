//! End-to-end matches: termination, determinism, and PK escalation

use werewolf_engine::core::{PlayerId, Role, Side};
use werewolf_engine::game::{
    setup, ActorReply, Event, GameEndReason, GameLoop, GameResult, OutputMode, RandomActor,
    ScriptedActor, TurnType, VerbosityLevel, VoteReply,
};

fn run_random(seed: u64) -> (Vec<Event>, GameResult) {
    let mut game = setup::new_classic_game(seed);
    game.logger.set_output_mode(OutputMode::Memory);
    let seats = game.alive_ids();

    let mut game_loop = GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Silent)
        .with_max_steps(20_000);
    for id in seats {
        let actor_seed = seed ^ (id.as_u32() as u64).wrapping_mul(0x9E3779B97F4A7C15);
        game_loop = game_loop.with_actor(id, Box::new(RandomActor::new(actor_seed)));
    }
    let result = game_loop.run().unwrap();
    (game.history.clone(), result)
}

#[test]
fn random_match_terminates_with_a_winner() {
    for seed in [0, 7, 42, 1234] {
        let (history, result) = run_random(seed);
        assert!(
            matches!(result.end_reason, GameEndReason::Victory(_)),
            "seed {seed} did not finish: {:?}",
            result
        );
        assert!(result.winner.is_some());
        assert!(result.days >= 1);
        // the victory announcement is the last transcript entry
        let last = history.last().expect("empty transcript");
        assert!(last.body.contains("win"), "unexpected closer: {}", last.body);
    }
}

#[test]
fn same_seed_replays_identically() {
    let (history_a, result_a) = run_random(7);
    let (history_b, result_b) = run_random(7);
    similar_asserts::assert_eq!(history_a, history_b);
    assert_eq!(result_a, result_b);
}

#[test]
fn different_seeds_diverge() {
    let (history_a, _) = run_random(1);
    let (history_b, _) = run_random(2);
    assert_ne!(history_a, history_b);
}

fn vote(target: u32) -> ActorReply {
    ActorReply::Vote(VoteReply {
        target: Some(PlayerId::new(target)),
        reasoning: None,
    })
}

#[test]
fn tied_vote_escalates_to_pk_round() {
    // Three seats: villager, wolf, seer. The wolf passes the night, the
    // first vote splits 1 vs 2 with the seer abstaining.
    let mut game = setup::new_game_with_roles(&[Role::Villager, Role::Werewolf, Role::Seer], 5);
    game.logger.set_output_mode(OutputMode::Memory);

    let p1 = ScriptedActor::new().on(1, TurnType::Voting, vote(2));
    let p2 = ScriptedActor::new().on(1, TurnType::Voting, vote(1));
    // the seer abstains in round one, then breaks the PK on the wolf
    let p3 = ScriptedActor::new().on(1, TurnType::PkVoting, vote(2));

    let mut game_loop = GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Silent)
        .with_actor(PlayerId::new(1), Box::new(p1))
        .with_actor(PlayerId::new(2), Box::new(p2))
        .with_actor(PlayerId::new(3), Box::new(p3));

    let mut reached_pk = false;
    for _ in 0..200 {
        if !game_loop.step().unwrap() {
            break;
        }
        if game_loop.game().turn == TurnType::PkDiscussion {
            reached_pk = true;
            break;
        }
    }
    assert!(reached_pk, "first-round tie never escalated");

    let state = game_loop.game();
    assert_eq!(state.pk_candidates, vec![PlayerId::new(1), PlayerId::new(2)]);
    let queue: Vec<PlayerId> = state.action_queue.iter().copied().collect();
    assert_eq!(queue, vec![PlayerId::new(1), PlayerId::new(2)]);

    // only the bystander votes in the re-vote, executing the wolf
    let result = game_loop.run().unwrap();
    assert_eq!(result.winner, Some(Side::Villager));
}

#[test]
fn pk_revote_tie_executes_nobody() {
    // Four seats so the PK re-vote can itself tie: two bystanders split
    // their ballots between the tied pair.
    let roles = [Role::Villager, Role::Werewolf, Role::Seer, Role::Witch];
    let mut game = setup::new_game_with_roles(&roles, 5);
    game.logger.set_output_mode(OutputMode::Memory);

    let p1 = ScriptedActor::new().on(1, TurnType::Voting, vote(2));
    let p2 = ScriptedActor::new().on(1, TurnType::Voting, vote(1));
    let p3 = ScriptedActor::new().on(1, TurnType::PkVoting, vote(1));
    let p4 = ScriptedActor::new().on(1, TurnType::PkVoting, vote(2));

    let mut game_loop = GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Silent)
        .with_actor(PlayerId::new(1), Box::new(p1))
        .with_actor(PlayerId::new(2), Box::new(p2))
        .with_actor(PlayerId::new(3), Box::new(p3))
        .with_actor(PlayerId::new(4), Box::new(p4));

    // run until the day closes into night two
    for _ in 0..300 {
        if !game_loop.step().unwrap() {
            break;
        }
        if game_loop.game().day_count == 2 {
            break;
        }
    }

    let state = game_loop.game();
    assert_eq!(state.day_count, 2, "match never reached night two");
    // the deadlock spared everyone
    assert_eq!(state.alive_ids().len(), 4);
    assert!(state.pk_candidates.is_empty());
    assert!(state
        .history
        .iter()
        .any(|e| e.body.contains("still tied")));
}
