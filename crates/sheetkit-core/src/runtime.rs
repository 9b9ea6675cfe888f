//! Frame-callback registry.
//!
//! Callbacks are one-shot: a drain removes every callback registered before
//! it started and invokes each with the frame time. Anything an animation
//! registers while a drain is in flight runs on the next drain.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Identifier for a registered frame callback.
pub type FrameCallbackId = u64;

type FrameCallback = Box<dyn FnOnce(u64)>;

struct RuntimeInner {
    next_id: FrameCallbackId,
    callbacks: FxHashMap<FrameCallbackId, FrameCallback>,
    /// Registration order; cancelled ids stay here until the next drain
    /// skips over them.
    order: Vec<FrameCallbackId>,
}

impl RuntimeInner {
    fn new() -> Self {
        Self {
            next_id: 1,
            callbacks: FxHashMap::default(),
            order: Vec::new(),
        }
    }
}

/// Owns the frame-callback registry.
///
/// The host keeps the `Runtime` alive for the lifetime of the surface and
/// pumps [`RuntimeHandle::drain_frame_callbacks`] once per rendered frame.
/// Handles weakly reference the registry, so registrations issued after the
/// runtime is gone become inert instead of erroring.
pub struct Runtime {
    inner: Rc<RefCell<RuntimeInner>>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RuntimeInner::new())),
        }
    }

    /// Returns a cloneable handle for registering and draining callbacks.
    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable, weak handle to a [`Runtime`].
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RefCell<RuntimeInner>>,
}

impl RuntimeHandle {
    /// Registers a one-shot frame callback.
    ///
    /// Returns `None` when the owning [`Runtime`] has been dropped.
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        let inner = self.inner.upgrade()?;
        let mut inner = inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.callbacks.insert(id, Box::new(callback));
        inner.order.push(id);
        log::trace!("registered frame callback {id}");
        Some(id)
    }

    /// Removes a pending frame callback. No-op if it already fired.
    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            if inner.borrow_mut().callbacks.remove(&id).is_some() {
                log::trace!("cancelled frame callback {id}");
            }
        }
    }

    /// Delivers one frame: invokes, in registration order, every callback
    /// registered before this call.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        // Snapshot first so callbacks may register for the next frame
        // without being drained in this one.
        let due: SmallVec<[FrameCallbackId; 8]> = inner.borrow_mut().order.drain(..).collect();
        for id in due {
            let callback = inner.borrow_mut().callbacks.remove(&id);
            if let Some(callback) = callback {
                callback(frame_time_nanos);
            }
        }
    }

    /// Returns a [`crate::FrameClock`] bound to this runtime.
    pub fn frame_clock(&self) -> crate::FrameClock {
        crate::FrameClock::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn callbacks_fire_once_in_registration_order() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = Rc::clone(&seen);
            handle.register_frame_callback(move |_| seen.borrow_mut().push(tag));
        }

        handle.drain_frame_callbacks(16);
        assert_eq!(*seen.borrow(), vec!["a", "b", "c"]);

        handle.drain_frame_callbacks(32);
        assert_eq!(seen.borrow().len(), 3, "callbacks are one-shot");
    }

    #[test]
    fn callback_receives_frame_time() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        let time = Rc::new(RefCell::new(0u64));
        let time_slot = Rc::clone(&time);

        handle.register_frame_callback(move |nanos| *time_slot.borrow_mut() = nanos);
        handle.drain_frame_callbacks(16_666_667);

        assert_eq!(*time.borrow(), 16_666_667);
    }

    #[test]
    fn cancelled_callback_never_fires() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        let fired = Rc::new(RefCell::new(false));
        let fired_slot = Rc::clone(&fired);

        let id = handle
            .register_frame_callback(move |_| *fired_slot.borrow_mut() = true)
            .unwrap();
        handle.cancel_frame_callback(id);
        handle.drain_frame_callbacks(16);

        assert!(!*fired.borrow());
    }

    #[test]
    fn registration_during_drain_runs_next_frame() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        let count = Rc::new(RefCell::new(0u32));

        let count_outer = Rc::clone(&count);
        let handle_inner = handle.clone();
        handle.register_frame_callback(move |_| {
            *count_outer.borrow_mut() += 1;
            let count_inner = Rc::clone(&count_outer);
            handle_inner.register_frame_callback(move |_| {
                *count_inner.borrow_mut() += 1;
            });
        });

        handle.drain_frame_callbacks(16);
        assert_eq!(*count.borrow(), 1);
        handle.drain_frame_callbacks(32);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn handle_outliving_runtime_is_inert() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        drop(runtime);

        assert!(handle.register_frame_callback(|_| {}).is_none());
        handle.drain_frame_callbacks(16);
    }
}
