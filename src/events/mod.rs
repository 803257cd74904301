mod event_bus;
mod types;

pub use event_bus::{EventBus, EventBusStats, EventFilter, EventSubscriber};
pub use types::{EventPayload, EventPriority, EventType, Notice, NoticeLevel, ProgressEvent};
