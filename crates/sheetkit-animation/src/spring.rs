//! Damped-spring response curve.
//!
//! Unlike a free-running physics spring, a settle is duration-bounded: the
//! natural frequency is derived from the duration so the motion is visually
//! at rest when the animation window closes. That keeps the completion
//! fraction well-defined, which the interruption handoff relies on.

/// Residual envelope amplitude at the end of the settle window.
const REST_ENVELOPE: f32 = 1e-3;

/// Lower bound on the damping ratio. Below this the derived oscillation
/// frequency explodes.
const MIN_DAMPING_RATIO: f32 = 0.1;

/// Spring configuration for a settle animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Settle duration in milliseconds.
    pub duration_millis: u64,
    /// Damping ratio. 1.0 = critically damped, < 1.0 = under-damped
    /// (slight bounce). Values above 1.0 are treated as critically damped.
    pub damping_ratio: f32,
}

impl SpringSpec {
    pub fn new(duration_millis: u64, damping_ratio: f32) -> Self {
        Self {
            duration_millis,
            damping_ratio,
        }
    }

    /// Default sheet settle: 450 ms, lightly under-damped.
    pub fn sheet() -> Self {
        Self::new(450, 0.8)
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration_millis.max(1) as f32 / 1_000.0
    }

    /// Normalized displacement toward the target at `fraction` of the
    /// settle window.
    ///
    /// `velocity` is the initial velocity in target distances per second
    /// (0.0 starts from rest; 1.0 would traverse the whole remaining
    /// distance in one second if undamped). Returns 0.0 at fraction 0 and
    /// exactly 1.0 from fraction 1 onward.
    pub fn displacement(&self, fraction: f32, velocity: f32) -> f32 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }

        let zeta = self.damping_ratio.clamp(MIN_DAMPING_RATIO, 1.0);
        // Decay rate in normalized time: the envelope e^(-lambda * f)
        // reaches REST_ENVELOPE at fraction 1.
        let lambda = -REST_ENVELOPE.ln();
        let v0 = velocity * self.duration_secs();
        let envelope = (-lambda * fraction).exp();

        if zeta < 1.0 {
            let omega = lambda / zeta;
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let phase = omega_d * fraction;
            1.0 - envelope * (phase.cos() + (lambda - v0) / omega_d * phase.sin())
        } else {
            1.0 - envelope * (1.0 + (lambda - v0) * fraction)
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::sheet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_endpoints() {
        let spec = SpringSpec::sheet();
        assert_eq!(spec.displacement(0.0, 0.0), 0.0);
        assert_eq!(spec.displacement(1.0, 0.0), 1.0);
        assert_eq!(spec.displacement(1.5, 3.0), 1.0);
    }

    #[test]
    fn displacement_is_near_target_at_window_end() {
        for zeta in [0.5, 0.8, 1.0] {
            let spec = SpringSpec::new(450, zeta);
            let end = spec.displacement(0.999, 0.0);
            assert!(
                (end - 1.0).abs() < 0.01,
                "zeta={zeta}: displacement {end} should be near 1.0"
            );
        }
    }

    #[test]
    fn displacement_never_swings_back_significantly() {
        let spec = SpringSpec::sheet();
        let mut max_seen = 0.0f32;
        for i in 0..=100 {
            let d = spec.displacement(i as f32 / 100.0, 0.0);
            assert!(
                d > max_seen - 0.02,
                "displacement {d} fell more than 2% below prior max {max_seen}"
            );
            max_seen = max_seen.max(d);
        }
    }

    #[test]
    fn velocity_seed_speeds_up_early_motion() {
        let spec = SpringSpec::sheet();
        let from_rest = spec.displacement(0.1, 0.0);
        let seeded = spec.displacement(0.1, 5.0);
        assert!(
            seeded > from_rest,
            "seeded start {seeded} should outrun rest start {from_rest}"
        );
    }

    #[test]
    fn extreme_damping_ratios_stay_finite() {
        for zeta in [0.0, 0.01, 2.5] {
            let spec = SpringSpec::new(450, zeta);
            for i in 0..=20 {
                let d = spec.displacement(i as f32 / 20.0, 10.0);
                assert!(d.is_finite(), "zeta={zeta} produced non-finite {d}");
            }
        }
    }

    #[test]
    fn zero_duration_does_not_divide_by_zero() {
        let spec = SpringSpec::new(0, 0.8);
        assert!(spec.duration_secs() > 0.0);
        assert!(spec.displacement(0.5, 1.0).is_finite());
    }
}
