//! The match driver
//!
//! Owns the loop: win check, route, collect decisions (fanning ballot
//! batches out with rayon), run settle handlers, commit deltas. The
//! driver is the only writer of the game state.

use crate::core::{PlayerId, Side};
use crate::game::actor::{Actor, ActorContext, ActorReply, Summarizer};
use crate::game::delta::StateDelta;
use crate::game::phase::TurnType;
use crate::game::scheduler::{self, Route};
use crate::game::state::GameState;
use crate::game::{announce, cascade, night, vote, win};
use crate::{EngineError, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How much narration the match prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum VerbosityLevel {
    /// No output at all
    Silent,
    /// Game start, victory, step-limit aborts
    Minimal,
    /// Announcements and speeches (default)
    #[default]
    Normal,
    /// Routing and per-step detail
    Verbose,
}

impl FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" => Ok(VerbosityLevel::Silent),
            "minimal" => Ok(VerbosityLevel::Minimal),
            "normal" => Ok(VerbosityLevel::Normal),
            "verbose" => Ok(VerbosityLevel::Verbose),
            other => Err(format!("unknown verbosity level: {other}")),
        }
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    Victory(Side),
    /// Safety valve tripped before either side won
    StepLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Option<Side>,
    pub days: u32,
    pub steps: u64,
    pub end_reason: GameEndReason,
}

/// Drives one match to completion
pub struct GameLoop<'a> {
    game: &'a mut GameState,
    actors: FxHashMap<PlayerId, Box<dyn Actor>>,
    summarizer: Option<Box<dyn Summarizer>>,
    max_steps: u64,
    steps: u64,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        GameLoop {
            game,
            actors: FxHashMap::default(),
            summarizer: None,
            max_steps: 10_000,
            steps: 0,
        }
    }

    /// Attach the decision policy for one seat. Seats without an actor
    /// play every step's default.
    pub fn with_actor(mut self, id: PlayerId, actor: Box<dyn Actor>) -> Self {
        self.actors.insert(id, actor);
        self
    }

    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Safety valve: abort after this many loop iterations
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.game.logger.set_verbosity(verbosity);
        self
    }

    pub fn game(&self) -> &GameState {
        self.game
    }

    /// Run until a side wins or the step limit trips
    pub fn run(&mut self) -> Result<GameResult> {
        self.game.logger.minimal(&format!(
            "=== Werewolf: {} players, night 1 ===",
            self.game.players.len()
        ));
        loop {
            if self.steps >= self.max_steps {
                self.game.logger.minimal("Step limit reached, aborting match");
                return Ok(GameResult {
                    winner: self.game.winner,
                    days: self.game.day_count,
                    steps: self.steps,
                    end_reason: GameEndReason::StepLimit,
                });
            }
            if !self.step()? {
                let side = self.game.winner.ok_or_else(|| {
                    EngineError::CorruptState("match finished without a winner".into())
                })?;
                return Ok(GameResult {
                    winner: Some(side),
                    days: self.game.day_count,
                    steps: self.steps,
                    end_reason: GameEndReason::Victory(side),
                });
            }
        }
    }

    /// One loop iteration. Returns false once the match is over.
    pub fn step(&mut self) -> Result<bool> {
        self.steps += 1;

        // Fresh win check before every step: a mid-cascade shot can end
        // the game with hooks still pending.
        if !self.game.game_over {
            if let Some(side) = win::evaluate(self.game) {
                let mut delta = StateDelta::default();
                delta.game_over = Some(true);
                delta.winner = Some(Some(side));
                delta.announce(announce::victory(side));
                self.commit(delta);
            }
        }

        match scheduler::route(self.game) {
            Route::Finished => Ok(false),
            Route::Actor(id) => {
                let ctx = ActorContext::for_player(self.game, id)?;
                let reply = self.decide(id, &ctx);
                let delta = crate::game::actor::merge_reply(self.game, id, reply);
                self.commit(delta);
                Ok(true)
            }
            Route::Batch(ids) => {
                let contexts: Vec<(PlayerId, ActorContext)> = ids
                    .iter()
                    .map(|id| ActorContext::for_player(self.game, *id).map(|ctx| (*id, ctx)))
                    .collect::<Result<_>>()?;
                self.game.logger.verbose(&format!(
                    "Fanning out {} ballots for {}",
                    contexts.len(),
                    self.game.turn
                ));
                let actors = &self.actors;
                let replies: Vec<(PlayerId, ActorReply)> = contexts
                    .par_iter()
                    .map(|(id, ctx)| (*id, decide_with(actors, *id, ctx)))
                    .collect();
                // ballots merge sequentially; slots are key-disjoint so
                // completion order does not matter
                for (id, reply) in replies {
                    let delta = crate::game::actor::merge_reply(self.game, id, reply);
                    self.commit(delta);
                }
                Ok(true)
            }
            Route::Handler(turn) => {
                let delta = self.run_handler(turn)?;
                self.commit(delta);
                Ok(true)
            }
            Route::Advance => {
                let delta = scheduler::advance(self.game)?;
                self.commit(delta);
                Ok(true)
            }
        }
    }

    fn decide(&self, id: PlayerId, ctx: &ActorContext) -> ActorReply {
        decide_with(&self.actors, id, ctx)
    }

    fn run_handler(&mut self, turn: TurnType) -> Result<StateDelta> {
        self.game.logger.verbose(&format!("Settle handler: {}", turn));
        match turn {
            TurnType::NightSettle => Ok(night::resolve(self.game)),
            TurnType::DayAnnouncement => {
                let mut delta = announce::day_announcement(self.game);
                if let Some(summarizer) = &self.summarizer {
                    let tail = self.game.history_tail(30);
                    if let Ok(summary) =
                        summarizer.summarize(self.game.day_count, &self.game.summary, tail)
                    {
                        delta.summary = Some(summary);
                    }
                }
                Ok(delta)
            }
            TurnType::SheriffSettle => Ok(vote::settle_election(self.game)),
            TurnType::VotingSettle => Ok(vote::settle_execution(self.game)),
            TurnType::ExecutionAnnouncement => Ok(announce::execution_announcement(self.game)),
            TurnType::HunterAnnouncement => cascade::hunter_announcement(self.game),
            TurnType::SheriffTransfer => cascade::badge_transfer(self.game),
            other => Err(EngineError::CorruptState(format!(
                "no handler for turn {}",
                other
            ))),
        }
    }

    /// Commit a delta, narrating its transcript events first
    fn commit(&mut self, delta: StateDelta) {
        for event in &delta.history {
            self.game.logger.normal(&event.to_string());
        }
        self.game.commit(delta);
    }
}

/// A failing or absent actor plays the step default, never errors.
fn decide_with(
    actors: &FxHashMap<PlayerId, Box<dyn Actor>>,
    id: PlayerId,
    ctx: &ActorContext,
) -> ActorReply {
    match actors.get(&id) {
        Some(actor) => actor.decide(ctx).unwrap_or_else(|_| ActorReply::default_for(ctx.turn)),
        None => ActorReply::default_for(ctx.turn),
    }
}
