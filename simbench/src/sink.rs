use std::collections::HashSet;

use cellgrid::{ChannelId, EntityId, VisibilitySink};

/// Counts notifications and the observer fan-out they would cost to deliver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingSink {
    pub introductions: u64,
    pub discards: u64,
    /// Sum of observer-set sizes over every call.
    pub fanout: u64,
}

impl CountingSink {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn add(&mut self, observers: &HashSet<EntityId>) {
        self.fanout += observers.len() as u64;
    }
}

impl VisibilitySink for CountingSink {
    fn introduce_entity_to_observers(
        &mut self,
        _channel: ChannelId,
        _entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.introductions += 1;
        self.add(observers);
    }

    fn introduce_observers_to_entity(
        &mut self,
        _channel: ChannelId,
        _entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.add(observers);
    }

    fn discard_entity_from_observers(
        &mut self,
        _channel: ChannelId,
        _entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.discards += 1;
        self.add(observers);
    }

    fn discard_observers_from_entity(
        &mut self,
        _channel: ChannelId,
        _entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.add(observers);
    }
}
