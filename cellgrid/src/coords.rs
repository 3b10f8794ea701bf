//! Identifiers, world positions and cell coordinates.

use std::fmt;

/// Identifier of a tracked entity (one per connected player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Identifier of a world instance. Each channel owns its own grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelId(pub u32);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel#{}", self.0)
    }
}

/// Position on the world plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
}

impl WorldPosition {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Integer cell index pair.
///
/// Signed so that window arithmetic near the low edge never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn key(self) -> CellKey {
        CellKey::from_coord(self)
    }

    /// Chebyshev distance in cells.
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy {
            dx
        } else {
            dy
        }
    }

    /// Returns `true` if `other` lies within `range` cells of `self`.
    #[must_use]
    pub const fn within(self, other: Self, range: u32) -> bool {
        self.chebyshev_distance(other) <= range
    }

    /// Every cell within `range` cells of `self`, row by row.
    ///
    /// The window is clipped at the edges of the `i32` coordinate space.
    pub fn window(self, range: u32) -> impl Iterator<Item = CellCoord> {
        let range = i32::try_from(range).unwrap_or(i32::MAX);
        let x0 = self.x.saturating_sub(range);
        let x1 = self.x.saturating_add(range);
        let y0 = self.y.saturating_sub(range);
        let y1 = self.y.saturating_add(range);
        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| CellCoord { x, y }))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid table key: `(x & 0xFFFF) | (y << 16)`.
///
/// Collision-free only while both coordinates lie in `0..=0xFFFF`. The
/// default cell bias centers realistic worlds well inside that range; the
/// precondition is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u32);

impl CellKey {
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn from_coord(coord: CellCoord) -> Self {
        Self((coord.x as u32 & 0xFFFF) | ((coord.y as u32) << 16))
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
