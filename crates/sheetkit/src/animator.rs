//! The drag-to-settle state machine.
//!
//! [`SheetAnimator`] owns the live offset and the single settle slot. The
//! host feeds gesture events in, binds [`SheetAnimator::offset`] (or the
//! frame listener argument) to its rendering transform, and pumps frames
//! through the runtime. All methods take `&self`; state lives behind
//! interior mutability because settle frames mutate it from closures.

use std::cell::RefCell;
use std::rc::Rc;

use sheetkit_animation::{SettleAnimation, SpringSpec};
use sheetkit_core::FrameClock;

use crate::gesture_constants::{CONTAINMENT_MARGIN_RATIO, MIN_SETTLE_DISTANCE};
use crate::position::{Direction, OffsetTable, RestState};
use crate::resistance::Resistance;

/// Tuning for a sheet animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetConfig {
    /// Out-of-bounds drag behavior. Clamped mode also refuses gestures
    /// whose origin lies outside the containment range; elastic mode
    /// admits any origin.
    pub resistance: Resistance,
    /// Spring driving every settle.
    pub spring: SpringSpec,
    /// Padding around the rest bounds accepted as a drag origin
    /// (clamped mode only).
    pub containment_margin: f32,
}

impl SheetConfig {
    pub fn new() -> Self {
        Self {
            resistance: Resistance::Clamped,
            spring: SpringSpec::sheet(),
            containment_margin: 0.0,
        }
    }

    pub fn with_resistance(mut self, resistance: Resistance) -> Self {
        self.resistance = resistance;
        self
    }

    pub fn with_spring(mut self, spring: SpringSpec) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_containment_margin(mut self, margin: f32) -> Self {
        self.containment_margin = margin;
        self
    }

    /// Derives the containment margin from a reference extent, the
    /// companion to [`OffsetTable::from_extent`].
    pub fn with_containment_for_extent(self, extent: f32) -> Self {
        self.with_containment_margin(extent * CONTAINMENT_MARGIN_RATIO)
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Current phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    /// A drag session is active; `origin` is the live offset captured at
    /// drag begin.
    Dragging { origin: f32 },
    Settling,
}

struct AnimatorState {
    table: OffsetTable,
    config: SheetConfig,
    offset: f32,
    phase: Phase,
}

/// Drag-and-settle controller for one sheet.
///
/// The sheet starts parked at [`RestState::Collapsed`]; call
/// [`SheetAnimator::prepare`] to play the entrance settle, or
/// [`SheetAnimator::snap_to`] to position it without animating.
pub struct SheetAnimator {
    state: Rc<RefCell<AnimatorState>>,
    settle: SettleAnimation,
    listener: Rc<dyn Fn(f32)>,
    settled_listener: RefCell<Option<Rc<dyn Fn(RestState)>>>,
}

impl SheetAnimator {
    /// Creates a controller over `table`, reporting every committed offset
    /// change through `listener`.
    ///
    /// The listener fires on every drag update and settle frame, including
    /// repeats across superseded settles; it must tolerate multiple
    /// invocations per logical move.
    pub fn new(
        table: OffsetTable,
        config: SheetConfig,
        frame_clock: FrameClock,
        listener: impl Fn(f32) + 'static,
    ) -> Self {
        let offset = table.offset(RestState::Collapsed);
        Self {
            state: Rc::new(RefCell::new(AnimatorState {
                table,
                config,
                offset,
                phase: Phase::Idle,
            })),
            settle: SettleAnimation::new(frame_clock),
            listener: Rc::new(listener),
            settled_listener: RefCell::new(None),
        }
    }

    /// Registers a listener fired once whenever a settle truly completes
    /// at a rest state. A superseded settle never reports.
    pub fn on_settled(&self, listener: impl Fn(RestState) + 'static) {
        *self.settled_listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Plays the entrance settle into the collapsed rest position.
    pub fn prepare(&self) {
        self.settle_to(RestState::Collapsed);
    }

    /// The live offset the host binds to its rendering transform.
    pub fn offset(&self) -> f32 {
        self.state.borrow().offset
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn table(&self) -> OffsetTable {
        self.state.borrow().table
    }

    /// The rest state the sheet currently sits at, if it is at one.
    pub fn rest_state(&self) -> Option<RestState> {
        let state = self.state.borrow();
        state.table.rest_state_at(state.offset, MIN_SETTLE_DISTANCE)
    }

    /// Swaps the offset table at runtime. The live offset is untouched;
    /// the new table applies from the next gesture or settle.
    pub fn reconfigure(&self, table: OffsetTable) {
        self.state.borrow_mut().table = table;
    }

    /// Opens a drag session at the current live offset.
    ///
    /// In clamped mode the gesture is silently dropped when the origin
    /// lies outside the containment range; an in-flight settle then keeps
    /// running. An accepted drag freezes any settle at its current
    /// rendered offset.
    pub fn drag_began(&self) {
        {
            let state = self.state.borrow();
            if state.config.resistance == Resistance::Clamped {
                let range = state.table.containment(state.config.containment_margin);
                if !range.contains(&state.offset) {
                    log::debug!(
                        "drag ignored: origin {} outside containment {:?}",
                        state.offset,
                        range
                    );
                    return;
                }
            }
        }

        self.settle.cancel();
        let mut state = self.state.borrow_mut();
        let origin = state.offset;
        state.phase = Phase::Dragging { origin };
    }

    /// Applies a drag delta relative to the session origin.
    pub fn drag_changed(&self, delta: f32) {
        let update = {
            let mut state = self.state.borrow_mut();
            let Phase::Dragging { origin } = state.phase else {
                log::trace!("drag update with no active session");
                return;
            };
            let proposed = origin + delta;
            let applied = state.config.resistance.displace(
                proposed,
                state.table.expanded(),
                state.table.collapsed(),
            );
            if applied == state.offset {
                None
            } else {
                state.offset = applied;
                Some(applied)
            }
        };

        if let Some(offset) = update {
            (self.listener)(offset);
        }
    }

    /// Closes the drag session and settles toward the rest state the
    /// release velocity selects.
    pub fn drag_ended(&self, velocity: f32) {
        let target = {
            let mut state = self.state.borrow_mut();
            if !matches!(state.phase, Phase::Dragging { .. }) {
                log::trace!("drag release with no active session");
                return;
            }
            let direction = Direction::from_velocity(velocity);
            let target = state.table.rest_target(direction, state.offset);
            state.phase = Phase::Settling;
            state.table.offset(target)
        };
        self.start_settle(target, velocity);
    }

    /// Abandons the drag session; the sheet settles as a zero-velocity
    /// release would.
    pub fn drag_cancelled(&self) {
        self.drag_ended(0.0);
    }

    /// Programmatic move straight to a rest state, as if released there.
    pub fn settle_to(&self, rest: RestState) {
        let target = {
            let mut state = self.state.borrow_mut();
            state.phase = Phase::Settling;
            state.table.offset(rest)
        };
        self.start_settle(target, 0.0);
    }

    /// Programmatic move equivalent to a swipe in `direction` without a
    /// drag.
    pub fn settle_toward(&self, direction: Direction) {
        let target = {
            let mut state = self.state.borrow_mut();
            let target = state.table.rest_target(direction, state.offset);
            state.phase = Phase::Settling;
            state.table.offset(target)
        };
        self.start_settle(target, 0.0);
    }

    /// Moves to a rest state immediately, without animating.
    pub fn snap_to(&self, rest: RestState) {
        self.settle.cancel();
        let offset = {
            let mut state = self.state.borrow_mut();
            let offset = state.table.offset(rest);
            state.offset = offset;
            state.phase = Phase::Idle;
            offset
        };
        (self.listener)(offset);
    }

    fn start_settle(&self, target: f32, velocity: f32) {
        let (current, spring) = {
            let state = self.state.borrow();
            (state.offset, state.config.spring)
        };

        // Hand off from any outgoing settle: the replacement starts at the
        // current rendered offset, with its starting progress seeded as
        // the complement of the superseded settle's completion fraction.
        let start_fraction = self
            .settle
            .fraction_complete()
            .map_or(0.0, |fraction| 1.0 - fraction);

        let distance = (target - current).abs();
        let seed = if distance < MIN_SETTLE_DISTANCE {
            0.0
        } else {
            (velocity / distance).abs()
        };

        let frame_state = Rc::clone(&self.state);
        let frame_listener = Rc::clone(&self.listener);
        let end_state = Rc::clone(&self.state);
        let settled_listener = self.settled_listener.borrow().clone();
        self.settle.start(
            current,
            target,
            seed,
            start_fraction,
            spring,
            move |offset| {
                frame_state.borrow_mut().offset = offset;
                frame_listener(offset);
            },
            move || {
                let rest = {
                    let mut state = end_state.borrow_mut();
                    state.phase = Phase::Idle;
                    state.table.rest_state_at(target, MIN_SETTLE_DISTANCE)
                };
                if let (Some(listener), Some(rest)) = (settled_listener, rest) {
                    listener(rest);
                }
            },
        );
    }
}
