//! Game Module
//!
//! Contains game-specific systems that build on top of the engine:
//! authored world construction and save-file persistence.

pub mod save;
pub mod world;

pub use save::{SaveError, SaveFile, VehicleSnapshot};
pub use world::{SlidingGate, World, WorldConfig, GATE_PASSABLE_OPEN};
