//! Error types for grid configuration and visibility tracking.

use std::fmt;

use crate::coords::{EntityId, WorldPosition};

/// Errors returned by [`VisibilityTracker`](crate::VisibilityTracker) operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisibilityError {
    /// `join` on an entity that is already linked.
    AlreadyLinked { entity: EntityId },

    /// `update` on an entity that never joined or already left.
    NotLinked { entity: EntityId },

    /// Position has a NaN or infinite coordinate.
    NonFinitePosition {
        entity: EntityId,
        position: WorldPosition,
    },
}

impl fmt::Display for VisibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyLinked { entity } => write!(f, "{entity} is already linked"),
            Self::NotLinked { entity } => write!(f, "{entity} is not linked"),
            Self::NonFinitePosition { entity, position } => {
                write!(
                    f,
                    "{entity} has non-finite position ({}, {})",
                    position.x, position.y
                )
            }
        }
    }
}

impl std::error::Error for VisibilityError {}

/// Invalid [`GridConfig`](crate::GridConfig) value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Cell size must be finite and positive.
    InvalidCellSize(f64),
    /// Cell bias must be finite.
    InvalidCellBias(f64),
    /// View range must lie in `0..=MAX_VIEW_RANGE`.
    InvalidViewRange(i32),
    /// A cell capacity must admit at least one cell.
    InvalidMaxCells(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize(size) => write!(f, "invalid cell size {size}"),
            Self::InvalidCellBias(bias) => write!(f, "invalid cell bias {bias}"),
            Self::InvalidViewRange(range) => write!(f, "invalid view range {range}"),
            Self::InvalidMaxCells(max) => write!(f, "invalid cell capacity {max}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_error_display() {
        let err = VisibilityError::NotLinked {
            entity: EntityId(4),
        };
        assert_eq!(err.to_string(), "entity#4 is not linked");

        let err = VisibilityError::NonFinitePosition {
            entity: EntityId(1),
            position: WorldPosition::new(f32::NAN, 0.0),
        };
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::InvalidViewRange(-1).to_string(),
            "invalid view range -1"
        );
    }
}
