//! Meteorfall - Meteor Impact Simulation Core
//!
//! A library crate computing atmospheric entry trajectories, impact points
//! and blast effects for the globe visualizer and its collaborators.

pub mod blast;
pub mod catalog;
pub mod config;
pub mod framing;
pub mod geodesy;
pub mod heat_disk;
pub mod narrative;
pub mod rings;
pub mod simulation;
pub mod trajectory;
pub mod types;

#[cfg(test)]
pub mod test_utils;
