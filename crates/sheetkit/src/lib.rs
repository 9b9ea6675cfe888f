//! Draggable bottom-sheet interaction controller.
//!
//! Maps a one-axis drag gesture stream and release velocities onto three
//! discrete rest positions (collapsed, half-expanded, expanded) with a
//! damped-spring settle and boundary resistance. The crate is
//! host-agnostic: the UI layer feeds gesture events into
//! [`SheetAnimator`], binds the live offset to whatever transform or
//! constraint it renders with, and pumps frames through
//! [`sheetkit_core::Runtime`] from its render loop.

pub mod animator;
pub mod gesture_constants;
pub mod position;
pub mod resistance;
pub mod velocity_tracker;

#[cfg(test)]
mod tests;

pub use animator::{Phase, SheetAnimator, SheetConfig};
pub use position::{Direction, OffsetTable, OffsetTableError, RestState};
pub use resistance::Resistance;
pub use velocity_tracker::VelocityTracker1D;

pub use sheetkit_animation::SpringSpec;
pub use sheetkit_core::{FrameClock, Runtime, RuntimeHandle};
