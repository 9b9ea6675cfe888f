//! Release-velocity estimation from raw drag samples.
//!
//! Hosts whose gesture source already reports a release velocity (most
//! platform pan recognizers do) can hand it straight to
//! [`crate::SheetAnimator::drag_ended`]. Hosts that only see positioned
//! pointer samples feed them in during the drag and ask for the velocity at
//! release. The estimator uses the impulse strategy: velocity is derived
//! from the kinetic energy the samples impart rather than a least-squares
//! fit, which behaves better on jittery touch input.

/// Ring buffer capacity for drag samples.
const HISTORY_SIZE: usize = 20;

/// Samples older than this no longer contribute to the estimate.
const HORIZON_MS: i64 = 100;

/// A gap this long between consecutive samples means the pointer stopped;
/// anything older is discarded.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// One-dimensional velocity tracker over absolute positions.
#[derive(Clone)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Records a positioned sample at `time_ms`.
    pub fn record(&mut self, time_ms: i64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, position });
    }

    /// Estimated velocity in position units per second.
    ///
    /// Returns 0.0 with fewer than two usable samples or when the pointer
    /// is judged to have stopped.
    pub fn velocity(&self) -> f32 {
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;

        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };
        let mut previous = newest;
        let mut current_index = self.index;

        while let Some(sample) = self.samples[current_index] {
            let age = (newest.time_ms - sample.time_ms) as f32;
            let gap = (previous.time_ms - sample.time_ms) as f32;
            if age > HORIZON_MS as f32 || gap > ASSUME_STOPPED_MS as f32 {
                break;
            }

            positions[count] = sample.position;
            times[count] = -age;
            previous = sample;

            current_index = if current_index == 0 {
                HISTORY_SIZE - 1
            } else {
                current_index - 1
            };
            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }
        }

        if count < 2 {
            return 0.0;
        }

        // Times are in milliseconds; scale to per-second.
        impulse_velocity(&positions, &times, count) * 1_000.0
    }

    /// Estimated velocity clamped into `[-max_velocity, max_velocity]`.
    pub fn velocity_capped(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }

        let velocity = self.velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    /// Estimated velocity capped to [`crate::gesture_constants::MAX_FLING_VELOCITY`],
    /// ready to hand to [`crate::SheetAnimator::drag_ended`].
    pub fn release_velocity(&self) -> f32 {
        self.velocity_capped(crate::gesture_constants::MAX_FLING_VELOCITY)
    }

    /// Discards all recorded samples.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

/// Impulse-strategy velocity over samples ordered newest first, with
/// `times` holding negated ages in milliseconds.
fn impulse_velocity(
    positions: &[f32; HISTORY_SIZE],
    times: &[f32; HISTORY_SIZE],
    count: usize,
) -> f32 {
    if count < 2 {
        return 0.0;
    }

    let mut work = 0.0f32;
    let oldest = count - 1;
    let mut next_time = times[oldest];

    for i in (1..=oldest).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let delta = positions[i] - positions[i - 1];
        let v_curr = delta / (current_time - next_time);
        let v_prev = velocity_from_kinetic_energy(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }

    velocity_from_kinetic_energy(work)
}

/// Inverts E = 0.5 * m * v^2 with unit mass, keeping the sign of the work.
#[inline]
fn velocity_from_kinetic_energy(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}
