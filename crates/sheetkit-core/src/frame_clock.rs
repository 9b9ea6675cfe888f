use crate::runtime::{FrameCallbackId, RuntimeHandle};

/// Per-frame scheduling facade over a [`crate::Runtime`].
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    /// Schedules `callback` for the next frame, passing the frame time in
    /// nanoseconds. Dropping the returned registration cancels delivery.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        match self.runtime.register_frame_callback(callback) {
            Some(id) => FrameCallbackRegistration::new(self.runtime.clone(), id),
            None => FrameCallbackRegistration::inactive(self.runtime.clone()),
        }
    }
}

/// Keeps a pending frame callback alive; cancels it on drop.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(runtime: RuntimeHandle, id: FrameCallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Runtime;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn dropping_registration_cancels_delivery() {
        let runtime = Runtime::new();
        let clock = runtime.handle().frame_clock();
        let fired = Rc::new(Cell::new(false));
        let fired_slot = Rc::clone(&fired);

        let registration = clock.with_frame_nanos(move |_| fired_slot.set(true));
        drop(registration);
        runtime.handle().drain_frame_callbacks(16);

        assert!(!fired.get());
    }

    #[test]
    fn kept_registration_delivers() {
        let runtime = Runtime::new();
        let clock = runtime.handle().frame_clock();
        let fired = Rc::new(Cell::new(false));
        let fired_slot = Rc::clone(&fired);

        let _registration = clock.with_frame_nanos(move |_| fired_slot.set(true));
        runtime.handle().drain_frame_callbacks(16);

        assert!(fired.get());
    }

    #[test]
    fn registration_against_dropped_runtime_is_inactive() {
        let runtime = Runtime::new();
        let clock = runtime.handle().frame_clock();
        drop(runtime);

        let registration = clock.with_frame_nanos(|_| panic!("must never fire"));
        registration.cancel();
    }
}
