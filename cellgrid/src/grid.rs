//! Lazily populated cell table for one channel.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::coords::{CellCoord, CellKey, EntityId};

/// One square partition of world space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    pub(crate) players: HashSet<EntityId>,
    pub(crate) observers: HashSet<EntityId>,
}

impl Cell {
    fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            players: HashSet::new(),
            observers: HashSet::new(),
        }
    }

    /// Coordinates most recently supplied for this cell's key.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Entities whose home cell is this cell.
    #[must_use]
    pub const fn players(&self) -> &HashSet<EntityId> {
        &self.players
    }

    /// Entities whose view window covers this cell.
    #[must_use]
    pub const fn observers(&self) -> &HashSet<EntityId> {
        &self.observers
    }

    /// No players and no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.observers.is_empty()
    }
}

/// Cell table owned by one channel.
///
/// Cells are created on first access and kept in insertion order. With a
/// capacity set, creating a cell past the cap first evicts the oldest empty
/// cells. Running over the cap with nothing evictable is logged once, when
/// the grid first goes over.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    cells: HashMap<CellKey, Cell>,
    loaded: VecDeque<CellKey>,
    max_cells: Option<usize>,
    over_capacity: bool,
}

impl CellGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity_limit(max_cells: Option<usize>) -> Self {
        Self {
            max_cells,
            ..Self::default()
        }
    }

    /// Returns the cell for `coord`, creating it if needed.
    ///
    /// An existing cell has its stored coordinates refreshed to `coord`.
    /// Never fails: past the capacity with nothing evictable the cell is still
    /// created and a warning is logged.
    pub fn get_or_create(&mut self, coord: CellCoord) -> &mut Cell {
        let key = coord.key();
        if !self.cells.contains_key(&key) {
            self.make_room();
            self.loaded.push_back(key);
            trace!(x = coord.x, y = coord.y, "cell loaded");
        }
        let cell = self.cells.entry(key).or_insert_with(|| Cell::new(coord));
        cell.coord = coord;
        cell
    }

    /// Read-only lookup; `None` if the cell was never created.
    #[must_use]
    pub fn try_get(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord.key())
    }

    pub fn try_get_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.cells.get_mut(&coord.key())
    }

    /// Loaded cells in creation order.
    pub fn loaded_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.loaded.iter().filter_map(|key| self.cells.get(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub const fn max_cells(&self) -> Option<usize> {
        self.max_cells
    }

    /// True while more cells are loaded than the cap allows.
    #[must_use]
    pub const fn is_over_capacity(&self) -> bool {
        self.over_capacity
    }

    /// Drops every empty cell. Returns how many were removed.
    pub fn evict_empty(&mut self) -> usize {
        let before = self.cells.len();
        let cells = &mut self.cells;
        self.loaded.retain(|key| {
            let empty = cells.get(key).map_or(true, Cell::is_empty);
            if empty {
                cells.remove(key);
            }
            !empty
        });
        self.refresh_over_capacity();
        before - self.cells.len()
    }

    fn make_room(&mut self) {
        let Some(max_cells) = self.max_cells else {
            return;
        };
        while self.cells.len() >= max_cells {
            if !self.evict_oldest_empty() {
                if !self.over_capacity {
                    warn!(
                        loaded = self.cells.len(),
                        max_cells, "cell capacity exceeded with no empty cell to evict"
                    );
                }
                self.over_capacity = true;
                return;
            }
        }
        if self.over_capacity {
            debug!(loaded = self.cells.len(), max_cells, "cell count back under capacity");
            self.over_capacity = false;
        }
    }

    fn refresh_over_capacity(&mut self) {
        if self.over_capacity && self.max_cells.is_some_and(|max| self.cells.len() <= max) {
            debug!(loaded = self.cells.len(), "cell count back under capacity");
            self.over_capacity = false;
        }
    }

    fn evict_oldest_empty(&mut self) -> bool {
        let position = self.loaded.iter().position(|key| {
            self.cells
                .get(key)
                .map_or(true, Cell::is_empty)
        });
        let Some(position) = position else {
            return false;
        };
        if let Some(key) = self.loaded.remove(position) {
            if let Some(cell) = self.cells.remove(&key) {
                trace!(x = cell.coord.x, y = cell.coord.y, "cell evicted");
            }
        }
        true
    }
}
