//! Core frame-scheduling plumbing for sheetkit.
//!
//! Animations in this workspace never read a wall clock. They register
//! one-shot callbacks against a [`Runtime`], and the host delivers frames by
//! calling [`RuntimeHandle::drain_frame_callbacks`] with the frame time from
//! its render loop. Tests drive the same API with synthetic timestamps, so
//! every animation is deterministic.

mod frame_clock;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use runtime::{FrameCallbackId, Runtime, RuntimeHandle};
