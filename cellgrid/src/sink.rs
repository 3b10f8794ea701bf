//! Notification sink the tracker reports visibility changes to.

use std::collections::HashSet;

use crate::coords::{ChannelId, EntityId};

/// Receives visibility changes as they are computed.
///
/// `observers` is the affected cell's notify-list after the change. For
/// introductions it includes `entity` itself.
pub trait VisibilitySink {
    /// Tell every observer of the cell about `entity`.
    fn introduce_entity_to_observers(
        &mut self,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    );

    /// Tell `entity` about the cell's observers.
    fn introduce_observers_to_entity(
        &mut self,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    );

    /// Tell the cell's remaining observers to forget `entity`.
    fn discard_entity_from_observers(
        &mut self,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    );

    /// Tell `entity` to forget the cell's remaining observers.
    fn discard_observers_from_entity(
        &mut self,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    );
}

/// Sink that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl VisibilitySink for NullSink {
    fn introduce_entity_to_observers(&mut self, _: ChannelId, _: EntityId, _: &HashSet<EntityId>) {}

    fn introduce_observers_to_entity(&mut self, _: ChannelId, _: EntityId, _: &HashSet<EntityId>) {}

    fn discard_entity_from_observers(&mut self, _: ChannelId, _: EntityId, _: &HashSet<EntityId>) {}

    fn discard_observers_from_entity(&mut self, _: ChannelId, _: EntityId, _: &HashSet<EntityId>) {}
}

/// Kind of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    IntroduceEntityToObservers,
    IntroduceObserversToEntity,
    DiscardEntityFromObservers,
    DiscardObserversFromEntity,
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub channel: ChannelId,
    pub entity: EntityId,
    /// Observer count at the time of the call.
    pub observer_count: usize,
}

/// Sink that keeps every call in order; used by tools and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub notifications: Vec<Notification>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls of `kind`.
    #[must_use]
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.notifications.iter().filter(|n| n.kind == kind).count()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn record(
        &mut self,
        kind: NotificationKind,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.notifications.push(Notification {
            kind,
            channel,
            entity,
            observer_count: observers.len(),
        });
    }
}

impl VisibilitySink for RecordingSink {
    fn introduce_entity_to_observers(
        &mut self,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.record(
            NotificationKind::IntroduceEntityToObservers,
            channel,
            entity,
            observers,
        );
    }

    fn introduce_observers_to_entity(
        &mut self,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.record(
            NotificationKind::IntroduceObserversToEntity,
            channel,
            entity,
            observers,
        );
    }

    fn discard_entity_from_observers(
        &mut self,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.record(
            NotificationKind::DiscardEntityFromObservers,
            channel,
            entity,
            observers,
        );
    }

    fn discard_observers_from_entity(
        &mut self,
        channel: ChannelId,
        entity: EntityId,
        observers: &HashSet<EntityId>,
    ) {
        self.record(
            NotificationKind::DiscardObserversFromEntity,
            channel,
            entity,
            observers,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_counts_by_kind() {
        let mut sink = RecordingSink::new();
        let observers: HashSet<EntityId> = [EntityId(1), EntityId(2)].into_iter().collect();
        sink.introduce_entity_to_observers(ChannelId(0), EntityId(1), &observers);
        sink.introduce_observers_to_entity(ChannelId(0), EntityId(1), &observers);
        sink.discard_entity_from_observers(ChannelId(0), EntityId(1), &observers);

        assert_eq!(sink.count(NotificationKind::IntroduceEntityToObservers), 1);
        assert_eq!(sink.count(NotificationKind::DiscardObserversFromEntity), 0);
        assert_eq!(sink.notifications[0].observer_count, 2);

        let taken = sink.take();
        assert_eq!(taken.len(), 3);
        assert!(sink.notifications.is_empty());
    }
}
