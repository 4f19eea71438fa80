//! Random baseline actor
//!
//! Plays every role with legal but uninformed choices. Deterministic:
//! each decision draws from an RNG derived from the actor seed and the
//! visible context, so the same seed and game always replay the same
//! match. Useful as a benchmark opponent and for smoke tests.

use crate::core::PlayerId;
use crate::game::actor::{
    Actor, ActorContext, ActorReply, DayAction, DayReply, NightActionKind, NightReply, VoteReply,
};
use crate::game::phase::TurnType;
use crate::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

pub struct RandomActor {
    seed: u64,
}

impl RandomActor {
    pub fn new(seed: u64) -> Self {
        RandomActor { seed }
    }

    /// Fresh RNG per decision, keyed on who/when/what so replays agree
    /// regardless of call order within a batch.
    fn rng_for(&self, ctx: &ActorContext) -> ChaCha12Rng {
        let mix = self.seed
            ^ (ctx.player.as_u32() as u64).wrapping_mul(0x9E3779B97F4A7C15)
            ^ ((ctx.day as u64) << 32)
            ^ ((ctx.turn as u8 as u64) << 16)
            ^ ctx.history.len() as u64;
        ChaCha12Rng::seed_from_u64(mix)
    }
}

fn pick(rng: &mut ChaCha12Rng, pool: &[PlayerId]) -> Option<PlayerId> {
    if pool.is_empty() {
        None
    } else {
        Some(pool[rng.gen_range(0..pool.len())])
    }
}

fn night(action: NightActionKind, target: Option<PlayerId>) -> ActorReply {
    ActorReply::Night(NightReply {
        action,
        target,
        reasoning: None,
    })
}

impl Actor for RandomActor {
    fn decide(&self, ctx: &ActorContext) -> Result<ActorReply> {
        let mut rng = self.rng_for(ctx);
        let others: Vec<PlayerId> = ctx
            .alive
            .iter()
            .copied()
            .filter(|id| *id != ctx.player)
            .collect();

        let reply = match ctx.turn {
            TurnType::GuardProtect => {
                night(NightActionKind::Protect, pick(&mut rng, &ctx.alive))
            }
            TurnType::WolfKill => {
                let prey: Vec<PlayerId> = others
                    .iter()
                    .copied()
                    .filter(|id| !ctx.teammates.contains(id))
                    .collect();
                night(NightActionKind::Kill, pick(&mut rng, &prey))
            }
            TurnType::SeerCheck => night(NightActionKind::Check, pick(&mut rng, &others)),
            TurnType::WitchAction => {
                if ctx.save_available && ctx.wolf_kill.is_some() && rng.gen_bool(0.5) {
                    night(NightActionKind::Save, ctx.wolf_kill)
                } else if ctx.poison_available && rng.gen_bool(0.3) {
                    night(NightActionKind::Poison, pick(&mut rng, &others))
                } else {
                    night(NightActionKind::Pass, None)
                }
            }
            TurnType::HunterShoot => night(NightActionKind::Shoot, pick(&mut rng, &others)),
            TurnType::SheriffTransfer => {
                if rng.gen_bool(0.2) {
                    night(NightActionKind::RipBadge, None)
                } else {
                    night(NightActionKind::TransferBadge, pick(&mut rng, &others))
                }
            }
            TurnType::Voting => {
                let target = if rng.gen_bool(0.1) {
                    None
                } else {
                    pick(&mut rng, &others)
                };
                ActorReply::Vote(VoteReply {
                    target,
                    reasoning: None,
                })
            }
            TurnType::PkVoting => ActorReply::Vote(VoteReply {
                target: pick(&mut rng, &ctx.pk_candidates),
                reasoning: None,
            }),
            TurnType::SheriffVoting => ActorReply::Vote(VoteReply {
                target: pick(&mut rng, &ctx.candidates),
                reasoning: None,
            }),
            TurnType::SheriffNomination => {
                let run = rng.gen_bool(0.3);
                ActorReply::Day(DayReply {
                    speech: if run {
                        "I will run for sheriff.".to_string()
                    } else {
                        "I will not run.".to_string()
                    },
                    action: run.then_some(DayAction::Run),
                    reasoning: None,
                })
            }
            TurnType::Discussion => {
                // a fresh sheriff picks a direction once
                let action = if ctx.sheriff == Some(ctx.player) {
                    Some(if rng.gen_bool(0.5) {
                        DayAction::Clockwise
                    } else {
                        DayAction::CounterClockwise
                    })
                } else {
                    None
                };
                ActorReply::Day(DayReply {
                    speech: format!("I have nothing solid to share on day {}.", ctx.day),
                    action,
                    reasoning: None,
                })
            }
            _ => {
                // remaining serial steps are plain speeches
                ActorReply::Day(DayReply {
                    speech: "I rest my case.".to_string(),
                    action: None,
                    reasoning: None,
                })
            }
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use crate::game::phase::Phase;
    use crate::game::state::Event;

    fn ctx(turn: TurnType) -> ActorContext {
        ActorContext {
            player: PlayerId::new(1),
            name: "Alpha".to_string(),
            role: Role::Werewolf,
            phase: Phase::Night,
            turn,
            day: 1,
            alive: vec![PlayerId::new(1), PlayerId::new(2), PlayerId::new(3)],
            sheriff: None,
            teammates: vec![PlayerId::new(2)],
            wolf_kill: None,
            save_available: true,
            poison_available: true,
            candidates: Vec::new(),
            pk_candidates: Vec::new(),
            history: Vec::new(),
            notes: Vec::new(),
            summary: String::new(),
        }
    }

    #[test]
    fn test_same_context_same_choice() {
        let actor = RandomActor::new(9);
        let a = actor.decide(&ctx(TurnType::WolfKill)).unwrap();
        let b = actor.decide(&ctx(TurnType::WolfKill)).unwrap();
        match (a, b) {
            (ActorReply::Night(x), ActorReply::Night(y)) => assert_eq!(x.target, y.target),
            _ => panic!("wolf kill must be a night reply"),
        }
    }

    #[test]
    fn test_wolf_spares_the_pack() {
        let actor = RandomActor::new(0);
        for i in 0..32 {
            let mut c = ctx(TurnType::WolfKill);
            c.history.push(Event::system(format!("jitter {i}")));
            match actor.decide(&c).unwrap() {
                ActorReply::Night(reply) => {
                    assert_eq!(reply.action, NightActionKind::Kill);
                    assert_eq!(reply.target, Some(PlayerId::new(3)));
                }
                _ => panic!("wolf kill must be a night reply"),
            }
        }
    }

    #[test]
    fn test_pk_ballot_stays_on_candidates() {
        let actor = RandomActor::new(3);
        let mut c = ctx(TurnType::PkVoting);
        c.pk_candidates = vec![PlayerId::new(2), PlayerId::new(3)];
        for i in 0..16 {
            c.history.push(Event::system(format!("jitter {i}")));
            match actor.decide(&c).unwrap() {
                ActorReply::Vote(vote) => {
                    assert!(c.pk_candidates.contains(&vote.target.unwrap()));
                }
                _ => panic!("pk voting must be a vote reply"),
            }
        }
    }
}
