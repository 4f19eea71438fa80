//! Werewolf game-master engine
//!
//! A deterministic state machine for running Werewolf/Mafia matches with
//! pluggable AI players. The engine owns phase progression, simultaneous
//! night-action resolution, weighted vote tallying, post-death cascades,
//! and win evaluation; player decision policies live behind the `Actor`
//! trait.

pub mod core;
pub mod error;
pub mod game;

pub use error::{EngineError, Result};
