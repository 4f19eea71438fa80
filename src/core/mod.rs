//! Core types: player identity, roles, and the player record

pub mod entity;
pub mod player;
pub mod role;

pub use entity::PlayerId;
pub use player::Player;
pub use role::{Role, Side};
