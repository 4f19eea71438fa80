//! Scripted actor for deterministic testing
//!
//! Follows a (day, turn) -> reply table; any step without an entry falls
//! back to the step's default (pass, abstain, silence).

use crate::game::actor::{Actor, ActorContext, ActorReply};
use crate::game::phase::TurnType;
use crate::Result;
use rustc_hash::FxHashMap;

/// An actor that follows a predetermined script
#[derive(Default)]
pub struct ScriptedActor {
    replies: FxHashMap<(u32, TurnType), ActorReply>,
}

impl ScriptedActor {
    pub fn new() -> Self {
        ScriptedActor {
            replies: FxHashMap::default(),
        }
    }

    /// Schedule a reply for one step of one day
    pub fn on(mut self, day: u32, turn: TurnType, reply: ActorReply) -> Self {
        self.replies.insert((day, turn), reply);
        self
    }
}

impl Actor for ScriptedActor {
    fn decide(&self, ctx: &ActorContext) -> Result<ActorReply> {
        Ok(self
            .replies
            .get(&(ctx.day, ctx.turn))
            .cloned()
            .unwrap_or_else(|| ActorReply::default_for(ctx.turn)))
    }
}
