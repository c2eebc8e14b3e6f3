//! Eventing - Synchronous Publish/Subscribe
//!
//! All coordination flows through typed events on the `EventBus`. UI and
//! renderer collaborators only ever call `publish`/`subscribe`; nothing
//! outside this crate reaches into coordination internals directly.

pub mod app_event;
pub mod bus;

pub use app_event::{AppEvent, Event, EventKind};
pub use bus::{BusDiagnostics, EventBus, SubscriptionHandle};
