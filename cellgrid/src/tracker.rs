//! Per-channel visibility tracking over a [`CellGrid`].

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::GridConfig;
use crate::coords::{CellCoord, ChannelId, EntityId, WorldPosition};
use crate::error::{ConfigError, VisibilityError};
use crate::grid::CellGrid;
use crate::sink::VisibilitySink;

/// Link state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    Unlinked,
    /// Linked with the given home cell.
    Linked(CellCoord),
}

/// Outcome of a position update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Home cell did not change.
    Unchanged,
    Moved { from: CellCoord, to: CellCoord },
}

/// Summary of one [`VisibilityTracker::tick`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub moved: usize,
    pub unchanged: usize,
    /// Entries for unlinked entities or with non-finite positions.
    pub skipped: usize,
}

/// Tracks which entities observe which cells within one channel.
///
/// Each linked entity is in the player-list of its home cell and in the
/// notify-list of every cell within `view_range` of it. All mutation goes
/// through `&mut self`, so one pass over the channel completes before the
/// next begins.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    channel: ChannelId,
    config: GridConfig,
    grid: CellGrid,
    links: HashMap<EntityId, CellCoord>,
}

impl VisibilityTracker {
    pub fn new(channel: ChannelId, config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            channel,
            grid: CellGrid::with_capacity_limit(config.max_cells),
            config,
            links: HashMap::new(),
        })
    }

    #[must_use]
    pub const fn channel(&self) -> ChannelId {
        self.channel
    }

    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub const fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Drops every cell with no players and no observers.
    pub fn evict_empty_cells(&mut self) -> usize {
        self.grid.evict_empty()
    }

    #[must_use]
    pub fn linkage(&self, entity: EntityId) -> Linkage {
        self.links
            .get(&entity)
            .map_or(Linkage::Unlinked, |home| Linkage::Linked(*home))
    }

    #[must_use]
    pub fn linked_count(&self) -> usize {
        self.links.len()
    }

    /// Linked entities and their home cells, in no particular order.
    pub fn linked(&self) -> impl Iterator<Item = (EntityId, CellCoord)> + '_ {
        self.links.iter().map(|(entity, home)| (*entity, *home))
    }

    /// Home cell for `position`: `floor(position / cell_size + cell_bias)`
    /// per axis, saturating at the `i32` range.
    ///
    /// `None` if either coordinate is not finite.
    #[must_use]
    pub fn home_cell(&self, position: WorldPosition) -> Option<CellCoord> {
        if !position.is_finite() {
            return None;
        }
        Some(CellCoord::new(
            self.axis_cell(position.x),
            self.axis_cell(position.y),
        ))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn axis_cell(&self, value: f32) -> i32 {
        (f64::from(value) / self.config.cell_size + self.config.cell_bias).floor() as i32
    }

    fn checked_home(
        &self,
        entity: EntityId,
        position: WorldPosition,
    ) -> Result<CellCoord, VisibilityError> {
        self.home_cell(position)
            .ok_or(VisibilityError::NonFinitePosition { entity, position })
    }

    /// Links `entity` at `position` and introduces it to every cell in its
    /// view window.
    pub fn join(
        &mut self,
        entity: EntityId,
        position: WorldPosition,
        sink: &mut impl VisibilitySink,
    ) -> Result<CellCoord, VisibilityError> {
        if self.links.contains_key(&entity) {
            return Err(VisibilityError::AlreadyLinked { entity });
        }
        let home = self.checked_home(entity, position)?;

        self.grid.get_or_create(home).players.insert(entity);
        for coord in home.window(self.config.view_radius()) {
            self.observe(entity, coord, sink);
        }
        self.links.insert(entity, home);

        debug!(
            channel = self.channel.0,
            entity = entity.0,
            x = home.x,
            y = home.y,
            "entity joined"
        );
        Ok(home)
    }

    /// Re-evaluates the home cell of a linked entity.
    ///
    /// On a cell change, cells leaving the view window are discarded before
    /// cells entering it are introduced.
    pub fn update(
        &mut self,
        entity: EntityId,
        position: WorldPosition,
        sink: &mut impl VisibilitySink,
    ) -> Result<Transition, VisibilityError> {
        let Some(&from) = self.links.get(&entity) else {
            return Err(VisibilityError::NotLinked { entity });
        };
        let to = self.checked_home(entity, position)?;
        if to == from {
            return Ok(Transition::Unchanged);
        }

        let range = self.config.view_radius();
        for coord in from.window(range).filter(|c| !to.within(*c, range)) {
            self.unobserve(entity, coord, sink);
        }
        for coord in to.window(range).filter(|c| !from.within(*c, range)) {
            self.observe(entity, coord, sink);
        }

        if let Some(cell) = self.grid.try_get_mut(from) {
            cell.players.remove(&entity);
        }
        self.grid.get_or_create(to).players.insert(entity);
        self.links.insert(entity, to);

        trace!(
            channel = self.channel.0,
            entity = entity.0,
            from_x = from.x,
            from_y = from.y,
            to_x = to.x,
            to_y = to.y,
            "home cell changed"
        );
        Ok(Transition::Moved { from, to })
    }

    /// Unlinks `entity`, discarding it from every cell in its view window.
    ///
    /// Returns `false` if the entity was not linked.
    pub fn leave(&mut self, entity: EntityId, sink: &mut impl VisibilitySink) -> bool {
        let Some(home) = self.links.remove(&entity) else {
            return false;
        };
        for coord in home.window(self.config.view_radius()) {
            self.unobserve(entity, coord, sink);
        }
        if let Some(cell) = self.grid.try_get_mut(home) {
            cell.players.remove(&entity);
        }

        debug!(
            channel = self.channel.0,
            entity = entity.0,
            x = home.x,
            y = home.y,
            "entity left"
        );
        true
    }

    /// Applies a batch of position updates in order.
    ///
    /// Unlinked entities and non-finite positions are skipped.
    pub fn tick<I>(&mut self, positions: I, sink: &mut impl VisibilitySink) -> TickReport
    where
        I: IntoIterator<Item = (EntityId, WorldPosition)>,
    {
        let mut report = TickReport::default();
        for (entity, position) in positions {
            match self.update(entity, position, sink) {
                Ok(Transition::Moved { .. }) => report.moved += 1,
                Ok(Transition::Unchanged) => report.unchanged += 1,
                Err(_) => report.skipped += 1,
            }
        }
        report
    }

    fn observe(&mut self, entity: EntityId, coord: CellCoord, sink: &mut impl VisibilitySink) {
        let cell = self.grid.get_or_create(coord);
        cell.observers.insert(entity);
        sink.introduce_entity_to_observers(self.channel, entity, &cell.observers);
        sink.introduce_observers_to_entity(self.channel, entity, &cell.observers);
    }

    fn unobserve(&mut self, entity: EntityId, coord: CellCoord, sink: &mut impl VisibilitySink) {
        let Some(cell) = self.grid.try_get_mut(coord) else {
            return;
        };
        if cell.observers.remove(&entity) && !cell.observers.is_empty() {
            sink.discard_entity_from_observers(self.channel, entity, &cell.observers);
            sink.discard_observers_from_entity(self.channel, entity, &cell.observers);
        }
    }
}
