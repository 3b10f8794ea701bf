//! Cell-grid interest management for cellnet.
//!
//! A channel's world plane is cut into square cells. Each connected entity
//! has a home cell and observes every cell within a Chebyshev view range of
//! it. [`VisibilityTracker`] keeps those registrations in step with entity
//! movement and reports every change to a [`VisibilitySink`].
//!
//! # Design Principles
//!
//! - **Owned per channel** - There is no global grid; each tracker owns its
//!   channel's [`CellGrid`].
//! - **Incremental** - A move only touches the cells entering or leaving the
//!   view window, and discards are reported before introductions.
//! - **Fail-soft lookups** - Removing from a cell that was never created is a
//!   no-op.
//!
//! # Example
//!
//! ```
//! use cellgrid::{ChannelId, EntityId, GridConfig, RecordingSink, VisibilityTracker, WorldPosition};
//!
//! let mut tracker = VisibilityTracker::new(ChannelId(1), GridConfig::default()).unwrap();
//! let mut sink = RecordingSink::new();
//! let home = tracker.join(EntityId(7), WorldPosition::new(0.0, 0.0), &mut sink).unwrap();
//! assert_eq!((home.x, home.y), (32768, 32768));
//! assert_eq!(sink.notifications.len(), 50);
//! ```

mod config;
mod coords;
mod error;
mod grid;
mod schedule;
mod sink;
mod tracker;

pub use config::{GridConfig, MAX_VIEW_RANGE};
pub use coords::{CellCoord, CellKey, ChannelId, EntityId, WorldPosition};
pub use error::{ConfigError, VisibilityError};
pub use grid::{Cell, CellGrid};
pub use schedule::{TickSchedule, DEFAULT_TICK_INTERVAL};
pub use sink::{Notification, NotificationKind, NullSink, RecordingSink, VisibilitySink};
pub use tracker::{Linkage, TickReport, Transition, VisibilityTracker};
