mod catalog;
mod events;
mod ids;
mod notification;
mod queue;
mod track;

pub use catalog::CatalogCategory;
pub use events::{EngineEvent, EventSink, FocusChange};
pub use ids::TrackId;
pub use notification::{Notification, NotificationAction};
pub use queue::PersistedQueue;
pub use track::TrackDescriptor;
