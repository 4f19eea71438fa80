//! Game engine: state machine, resolvers, and the match driver

pub mod actor;
pub mod announce;
pub mod cascade;
pub mod delta;
pub mod game_loop;
pub mod logger;
pub mod night;
pub mod phase;
pub mod random_actor;
pub mod scheduler;
pub mod scripted_actor;
pub mod setup;
pub mod state;
pub mod vote;
pub mod win;

pub use actor::{Actor, ActorContext, ActorReply, DayAction, DayReply, NightActionKind, NightReply, Summarizer, VoteReply};
pub use delta::StateDelta;
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use phase::{Phase, SpeechDirection, TurnType, NIGHT_ORDER};
pub use random_actor::RandomActor;
pub use scheduler::Route;
pub use scripted_actor::ScriptedActor;
pub use state::{Event, EventSource, GameState, NightActionKey};
pub use vote::VoteOutcome;
