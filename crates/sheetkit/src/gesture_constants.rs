//! Shared gesture tuning constants.
//!
//! These values are in logical pixels (or whatever consistent axis unit the
//! host feeds in). They are deliberately kept in one place so the drag and
//! settle paths cannot drift apart.

/// Fraction of a reference extent used to pad the drag containment range.
///
/// A drag may begin slightly past the rest bounds (for example while the
/// sheet is still settling back from an overscroll) without being dropped.
pub const CONTAINMENT_MARGIN_RATIO: f32 = 0.01;

/// Maximum release velocity in logical pixels per second.
///
/// Matches Android's default maximum fling velocity (ViewConfiguration) on
/// a baseline density. Hosts with real flings should cap tracker output to
/// this before handing it to the animator.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Remaining settle distances below this count as already settled when
/// seeding the spring velocity, keeping the seed finite.
pub const MIN_SETTLE_DISTANCE: f32 = 1e-3;

/// Exponent of the rubber-band attenuation applied to overscroll excess.
/// Sub-linear, so resistance grows the further the sheet is pulled past its
/// bounds.
pub const RESISTANCE_EXPONENT: f32 = 0.6;
