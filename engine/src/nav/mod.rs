//! Terrain and structure navigation
//!
//! Answers the one question everything in the world keeps asking: what is
//! the walkable elevation here? The base terrain is a pure analytic
//! heightfield; elevated structures (decks, floors, ramps, bridges) are
//! registered as walkable surfaces layered above it.

pub mod heightfield;
pub mod surfaces;

pub use heightfield::Heightfield;
pub use surfaces::{
    RampAxis, Support, SurfaceIndex, SurfaceRect, WalkableSurface, DROP_TOLERANCE,
    STEP_UP_TOLERANCE,
};
