//! Rest positions and the offset table.
//!
//! The drag axis points from expansion toward collapse: smaller offsets sit
//! closer to full expansion. All zone arithmetic lives here so the animator
//! never touches raw boundary comparisons.

use std::fmt;
use std::ops::RangeInclusive;

/// Extent ratio for the derived collapsed offset.
const COLLAPSED_EXTENT_RATIO: f32 = 0.7;
/// Extent ratio for the derived half-expanded offset.
const HALF_EXPANDED_EXTENT_RATIO: f32 = 0.4;

/// Discrete rest positions, ordered `Expanded < HalfExpanded < Collapsed`
/// along the drag axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestState {
    Expanded,
    HalfExpanded,
    Collapsed,
}

/// Swipe direction along the drag axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    TowardExpanded,
    TowardCollapsed,
}

impl Direction {
    /// Classifies a release velocity. Positive velocity moves toward the
    /// collapsed end; zero and negative velocities resolve toward
    /// expansion.
    pub fn from_velocity(velocity: f32) -> Self {
        if velocity > 0.0 {
            Direction::TowardCollapsed
        } else {
            Direction::TowardExpanded
        }
    }
}

/// Rejected offset-table constructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetTableError {
    /// Offsets are not ordered `expanded <= half_expanded <= collapsed`.
    NotMonotonic,
    /// An offset is NaN or infinite.
    NotFinite,
}

impl fmt::Display for OffsetTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetTableError::NotMonotonic => {
                write!(f, "offsets must satisfy expanded <= half_expanded <= collapsed")
            }
            OffsetTableError::NotFinite => write!(f, "offsets must be finite"),
        }
    }
}

impl std::error::Error for OffsetTableError {}

/// Maps each [`RestState`] to its offset along the drag axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetTable {
    expanded: f32,
    half_expanded: f32,
    collapsed: f32,
}

impl OffsetTable {
    /// Builds a table from explicit offsets.
    pub fn new(
        expanded: f32,
        half_expanded: f32,
        collapsed: f32,
    ) -> Result<Self, OffsetTableError> {
        if !(expanded.is_finite() && half_expanded.is_finite() && collapsed.is_finite()) {
            return Err(OffsetTableError::NotFinite);
        }
        if !(expanded <= half_expanded && half_expanded <= collapsed) {
            return Err(OffsetTableError::NotMonotonic);
        }
        Ok(Self {
            expanded,
            half_expanded,
            collapsed,
        })
    }

    /// Derives the collapsed and half-expanded offsets from a reference
    /// extent (typically the host surface height), keeping `expanded` where
    /// the caller puts it.
    pub fn from_extent(extent: f32, expanded: f32) -> Result<Self, OffsetTableError> {
        Self::new(
            expanded,
            extent * HALF_EXPANDED_EXTENT_RATIO,
            extent * COLLAPSED_EXTENT_RATIO,
        )
    }

    pub fn offset(&self, state: RestState) -> f32 {
        match state {
            RestState::Expanded => self.expanded,
            RestState::HalfExpanded => self.half_expanded,
            RestState::Collapsed => self.collapsed,
        }
    }

    pub fn expanded(&self) -> f32 {
        self.expanded
    }

    pub fn half_expanded(&self) -> f32 {
        self.half_expanded
    }

    pub fn collapsed(&self) -> f32 {
        self.collapsed
    }

    /// The margin-padded range of offsets a drag may start from.
    pub fn containment(&self, margin: f32) -> RangeInclusive<f32> {
        (self.expanded - margin)..=(self.collapsed + margin)
    }

    /// Resolves the rest state a release should settle into.
    ///
    /// The axis partitions into zones bounded by the three rest offsets.
    /// Within a zone the sheet advances to the adjacent rest state in the
    /// swipe direction; past either outer boundary it returns to the
    /// nearest rest state regardless of direction. Single-level hysteresis:
    /// a release never skips a rest state, no matter how far the drag went
    /// inside its zone.
    pub fn rest_target(&self, direction: Direction, current: f32) -> RestState {
        if current < self.expanded {
            RestState::Expanded
        } else if current < self.half_expanded {
            match direction {
                Direction::TowardExpanded => RestState::Expanded,
                Direction::TowardCollapsed => RestState::HalfExpanded,
            }
        } else if current <= self.collapsed {
            match direction {
                Direction::TowardExpanded => RestState::HalfExpanded,
                Direction::TowardCollapsed => RestState::Collapsed,
            }
        } else {
            RestState::Collapsed
        }
    }

    /// The rest state whose offset matches `offset` within `tolerance`, if
    /// any.
    pub fn rest_state_at(&self, offset: f32, tolerance: f32) -> Option<RestState> {
        [
            RestState::Expanded,
            RestState::HalfExpanded,
            RestState::Collapsed,
        ]
        .into_iter()
        .find(|state| (self.offset(*state) - offset).abs() <= tolerance)
    }
}
