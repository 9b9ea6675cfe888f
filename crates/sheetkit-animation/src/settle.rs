//! Settle animation driver.
//!
//! Drives one damped-spring settle between two offsets using the runtime's
//! frame callbacks. At most one settle is logically active: starting a new
//! one synchronously supersedes the previous, and a generation counter
//! rejects any frame a superseded settle managed to leave in flight.

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

use sheetkit_core::{FrameCallbackRegistration, FrameClock};

use crate::spring::SpringSpec;

struct SettleState {
    generation: u64,
    start_offset: f32,
    target_offset: f32,
    spec: SpringSpec,
    /// Initial velocity in target distances per second.
    velocity: f32,
    start_fraction: f32,
    /// Completion fraction as of the most recently rendered frame.
    last_fraction: f32,
    start_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_frame: Rc<dyn Fn(f32)>,
    on_end: Option<Box<dyn FnOnce()>>,
}

enum Step {
    Continue(f32, Rc<dyn Fn(f32)>),
    Finish(f32, Rc<dyn Fn(f32)>, Option<Box<dyn FnOnce()>>),
}

/// Owns the single settle-animation slot.
pub struct SettleAnimation {
    state: Rc<RefCell<Option<SettleState>>>,
    generation: Rc<Cell<u64>>,
    frame_clock: FrameClock,
}

impl SettleAnimation {
    pub fn new(frame_clock: FrameClock) -> Self {
        Self {
            state: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
            frame_clock,
        }
    }

    /// Starts a settle from `start_offset` to `target_offset`, superseding
    /// any settle already in flight.
    ///
    /// `velocity` seeds the spring in target distances per second.
    /// `start_fraction` seeds the completion fraction, so a handoff from an
    /// interrupted settle can shorten the window; 1.0 (or more) completes on
    /// the first frame. `on_frame` fires with the rendered offset on every
    /// frame including the last; `on_end` fires once at true completion and
    /// never fires if this settle is superseded first.
    pub fn start<F, G>(
        &self,
        start_offset: f32,
        target_offset: f32,
        velocity: f32,
        start_fraction: f32,
        spec: SpringSpec,
        on_frame: F,
        on_end: G,
    ) where
        F: Fn(f32) + 'static,
        G: FnOnce() + 'static,
    {
        self.cancel();

        let generation = self.generation.get();
        let start_fraction = start_fraction.clamp(0.0, 1.0);
        *self.state.borrow_mut() = Some(SettleState {
            generation,
            start_offset,
            target_offset,
            spec,
            velocity,
            start_fraction,
            last_fraction: start_fraction,
            start_time_nanos: None,
            registration: None,
            on_frame: Rc::new(on_frame),
            on_end: Some(Box::new(on_end)),
        });

        schedule_next_frame(
            Rc::clone(&self.state),
            Rc::clone(&self.generation),
            self.frame_clock.clone(),
            generation,
        );
    }

    /// Synchronously stops and discards the settle in flight, if any. Its
    /// pending frame callback is cancelled and its `on_end` never fires.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
        if let Some(state) = self.state.borrow_mut().take() {
            log::trace!("superseding settle toward {}", state.target_offset);
            drop(state.registration);
        }
    }

    /// Completion fraction of the in-flight settle as of the last rendered
    /// frame, or `None` when idle.
    pub fn fraction_complete(&self) -> Option<f32> {
        self.state.borrow().as_ref().map(|anim| anim.last_fraction)
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_some()
    }
}

fn schedule_next_frame(
    state: Rc<RefCell<Option<SettleState>>>,
    generation: Rc<Cell<u64>>,
    frame_clock: FrameClock,
    expected_generation: u64,
) {
    let registration = frame_clock.with_frame_nanos({
        let state = Rc::clone(&state);
        let generation = Rc::clone(&generation);
        let frame_clock = frame_clock.clone();
        move |frame_time_nanos| {
            if generation.get() != expected_generation {
                log::trace!("dropping stale settle frame (generation {expected_generation})");
                return;
            }

            let step = {
                let mut guard = state.borrow_mut();
                let Some(anim) = guard.as_mut() else {
                    return;
                };
                anim.registration = None;

                let start_time = *anim.start_time_nanos.get_or_insert(frame_time_nanos);
                let elapsed_secs =
                    frame_time_nanos.saturating_sub(start_time) as f32 / 1_000_000_000.0;
                let fraction =
                    (anim.start_fraction + elapsed_secs / anim.spec.duration_secs()).min(1.0);
                anim.last_fraction = fraction;

                if fraction >= 1.0 {
                    let target = anim.target_offset;
                    let on_frame = Rc::clone(&anim.on_frame);
                    let on_end = anim.on_end.take();
                    *guard = None;
                    Step::Finish(target, on_frame, on_end)
                } else {
                    let displacement = anim.spec.displacement(fraction, anim.velocity);
                    let offset = anim.start_offset
                        + (anim.target_offset - anim.start_offset) * displacement;
                    Step::Continue(offset, Rc::clone(&anim.on_frame))
                }
            };

            // Callbacks run with the state borrow released; they may query
            // or even restart the animation re-entrantly.
            match step {
                Step::Continue(offset, on_frame) => {
                    on_frame(offset);
                    if generation.get() == expected_generation {
                        schedule_next_frame(state, generation, frame_clock, expected_generation);
                    }
                }
                Step::Finish(target, on_frame, on_end) => {
                    on_frame(target);
                    // A frame listener that immediately starts a new settle
                    // supersedes this completion notification.
                    if generation.get() == expected_generation {
                        if let Some(on_end) = on_end {
                            on_end();
                        }
                    }
                }
            }
        }
    });

    let mut guard = state.borrow_mut();
    if let Some(anim) = guard.as_mut() {
        if anim.generation == expected_generation {
            anim.registration = Some(registration);
            return;
        }
    }
    // Superseded while scheduling: dropping the registration cancels it.
}

#[cfg(test)]
#[path = "tests/settle_tests.rs"]
mod tests;
