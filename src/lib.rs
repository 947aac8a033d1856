//! Alien Invasion: a fixed-timestep Space Invaders clone.
//!
//! The library is the whole simulation and knows nothing about terminals;
//! `main.rs` polls input, calls [`compute::tick`] sixty times a second and
//! hands the resulting state to the renderer.

pub mod collision;
pub mod compute;
pub mod entities;
pub mod fleet;
pub mod high_score;
pub mod scoreboard;
pub mod settings;
pub mod shields;
pub mod stats;
