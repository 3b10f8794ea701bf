//! Grid configuration.

use crate::error::ConfigError;

/// Largest accepted view range; a window is `(2r + 1)^2` cells.
pub const MAX_VIEW_RANGE: i32 = 64;

/// Fixed parameters of one channel's grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// World units per cell edge.
    pub cell_size: f64,

    /// Offset added to `position / cell_size` so typical worlds map to
    /// non-negative cell indices.
    pub cell_bias: f64,

    /// Chebyshev radius, in cells, an entity observes around its home cell.
    pub view_range: i32,

    /// Retention cap on loaded cells; `None` keeps every cell for the
    /// lifetime of the channel.
    pub max_cells: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 25.0,
            cell_bias: 32768.0,
            view_range: 2,
            max_cells: None,
        }
    }
}

impl GridConfig {
    /// Creates a small configuration for tests: one-unit cells, no bias.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            cell_size: 1.0,
            cell_bias: 0.0,
            view_range: 1,
            max_cells: Some(256),
        }
    }

    /// Default geometry with no retention cap.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_cells: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !self.cell_bias.is_finite() {
            return Err(ConfigError::InvalidCellBias(self.cell_bias));
        }
        if !(0..=MAX_VIEW_RANGE).contains(&self.view_range) {
            return Err(ConfigError::InvalidViewRange(self.view_range));
        }
        if self.max_cells == Some(0) {
            return Err(ConfigError::InvalidMaxCells(0));
        }
        Ok(())
    }

    /// View range as an unsigned radius. Only meaningful after `validate`.
    #[must_use]
    pub fn view_radius(&self) -> u32 {
        u32::try_from(self.view_range).unwrap_or(0)
    }
}
