//! Static-world collision
//!
//! Horizontal movement is blocked by axis-aligned solid volumes (walls,
//! trunks, fences) plus a handful of dynamic volumes (doors, gates) whose
//! participation is toggled by external state. Resolution is positional:
//! an iterative corrector pushes a mover's vertical cylinder out of every
//! enabled volume it overlaps.

pub mod resolver;
pub mod volumes;

pub use resolver::{resolve_horizontal, MAX_RESOLVE_PASSES};
pub use volumes::{Aabb, BlockingVolumeSet};
