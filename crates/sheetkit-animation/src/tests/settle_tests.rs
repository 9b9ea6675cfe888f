use super::*;

use sheetkit_core::Runtime;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const FRAME_NANOS: u64 = 16_666_667; // ~60 FPS

struct Harness {
    runtime: Runtime,
    now: u64,
}

impl Harness {
    fn new() -> Self {
        Self {
            runtime: Runtime::new(),
            now: 0,
        }
    }

    fn settle(&self) -> SettleAnimation {
        SettleAnimation::new(self.runtime.handle().frame_clock())
    }

    fn pump(&mut self, frames: u32) {
        for _ in 0..frames {
            self.now += FRAME_NANOS;
            self.runtime.handle().drain_frame_callbacks(self.now);
        }
    }
}

fn recorder() -> (Rc<RefCell<Vec<f32>>>, impl Fn(f32) + Clone + 'static) {
    let offsets = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&offsets);
    (offsets, move |offset| sink.borrow_mut().push(offset))
}

#[test]
fn settles_to_target_and_fires_end_once() {
    let mut harness = Harness::new();
    let settle = harness.settle();
    let (offsets, on_frame) = recorder();
    let ended = Rc::new(Cell::new(0u32));
    let ended_slot = Rc::clone(&ended);

    settle.start(0.0, 100.0, 0.0, 0.0, SpringSpec::sheet(), on_frame, move || {
        ended_slot.set(ended_slot.get() + 1)
    });
    harness.pump(40);

    assert_eq!(offsets.borrow().last().copied(), Some(100.0));
    assert_eq!(ended.get(), 1);
    assert!(!settle.is_running());
    assert!(settle.fraction_complete().is_none());
}

#[test]
fn on_frame_fires_every_drain_while_running() {
    let mut harness = Harness::new();
    let settle = harness.settle();
    let (offsets, on_frame) = recorder();

    settle.start(0.0, 100.0, 0.0, 0.0, SpringSpec::sheet(), on_frame, || {});
    harness.pump(5);

    assert_eq!(offsets.borrow().len(), 5);
    assert!(settle.is_running());
}

#[test]
fn cancel_stops_frames_and_suppresses_end() {
    let mut harness = Harness::new();
    let settle = harness.settle();
    let (offsets, on_frame) = recorder();
    let ended = Rc::new(Cell::new(false));
    let ended_slot = Rc::clone(&ended);

    settle.start(0.0, 100.0, 0.0, 0.0, SpringSpec::sheet(), on_frame, move || {
        ended_slot.set(true)
    });
    harness.pump(3);
    settle.cancel();
    let frames_before_cancel = offsets.borrow().len();
    harness.pump(40);

    assert_eq!(offsets.borrow().len(), frames_before_cancel);
    assert!(!ended.get());
    assert!(!settle.is_running());
}

#[test]
fn new_start_supersedes_previous_settle() {
    let mut harness = Harness::new();
    let settle = harness.settle();
    let (offsets, on_frame) = recorder();
    let first_ended = Rc::new(Cell::new(false));
    let first_ended_slot = Rc::clone(&first_ended);

    settle.start(0.0, 100.0, 0.0, 0.0, SpringSpec::sheet(), on_frame, move || {
        first_ended_slot.set(true)
    });
    harness.pump(5);

    let handoff = offsets.borrow().last().copied().unwrap();
    let (replacement_offsets, on_frame) = recorder();
    let second_ended = Rc::new(Cell::new(false));
    let second_ended_slot = Rc::clone(&second_ended);
    settle.start(
        handoff,
        -50.0,
        0.0,
        0.0,
        SpringSpec::sheet(),
        on_frame,
        move || second_ended_slot.set(true),
    );
    harness.pump(60);

    assert!(!first_ended.get(), "superseded settle must not complete");
    assert!(second_ended.get());
    assert_eq!(replacement_offsets.borrow().last().copied(), Some(-50.0));
}

#[test]
fn start_fraction_one_completes_on_first_frame() {
    let mut harness = Harness::new();
    let settle = harness.settle();
    let (offsets, on_frame) = recorder();
    let ended = Rc::new(Cell::new(false));
    let ended_slot = Rc::clone(&ended);

    settle.start(0.0, 100.0, 0.0, 1.0, SpringSpec::sheet(), on_frame, move || {
        ended_slot.set(true)
    });
    harness.pump(1);

    assert_eq!(offsets.borrow().as_slice(), &[100.0]);
    assert!(ended.get());
}

#[test]
fn zero_distance_settle_stays_finite_and_completes() {
    let mut harness = Harness::new();
    let settle = harness.settle();
    let (offsets, on_frame) = recorder();
    let ended = Rc::new(Cell::new(false));
    let ended_slot = Rc::clone(&ended);

    settle.start(
        100.0,
        100.0,
        0.0,
        0.0,
        SpringSpec::sheet(),
        on_frame,
        move || ended_slot.set(true),
    );
    harness.pump(40);

    assert!(offsets.borrow().iter().all(|offset| *offset == 100.0));
    assert!(ended.get());
}

#[test]
fn fraction_complete_advances_with_frames() {
    let mut harness = Harness::new();
    let settle = harness.settle();

    settle.start(0.0, 100.0, 0.0, 0.0, SpringSpec::sheet(), |_| {}, || {});
    harness.pump(2);
    let early = settle.fraction_complete().unwrap();
    harness.pump(10);
    let later = settle.fraction_complete().unwrap();

    assert!(later > early, "fraction {later} should advance past {early}");
}

#[test]
fn frame_listener_may_restart_the_settle() {
    let mut harness = Harness::new();
    let settle = Rc::new(harness.settle());
    let first_ended = Rc::new(Cell::new(false));
    let first_ended_slot = Rc::clone(&first_ended);
    let restarted = Rc::new(Cell::new(false));

    let settle_inner = Rc::clone(&settle);
    let restarted_slot = Rc::clone(&restarted);
    let (offsets, record) = recorder();
    settle.start(
        0.0,
        100.0,
        0.0,
        0.0,
        SpringSpec::sheet(),
        move |offset| {
            if !restarted_slot.get() {
                restarted_slot.set(true);
                settle_inner.start(
                    offset,
                    25.0,
                    0.0,
                    0.0,
                    SpringSpec::sheet(),
                    record.clone(),
                    || {},
                );
            }
        },
        move || first_ended_slot.set(true),
    );
    harness.pump(60);

    assert!(restarted.get());
    assert!(!first_ended.get());
    assert_eq!(offsets.borrow().last().copied(), Some(25.0));
}
