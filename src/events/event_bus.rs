use super::types::{EventPayload, EventPriority, EventType, Notice, ProgressEvent};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::trace;

use crate::models::{CourseId, VideoId};

/// Event subscriber handle
pub struct EventSubscriber {
    receiver: broadcast::Receiver<ProgressEvent>,
    filter: Option<EventFilter>,
}

impl EventSubscriber {
    fn new(receiver: broadcast::Receiver<ProgressEvent>, filter: Option<EventFilter>) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next event matching the filter
    pub async fn recv(&mut self) -> Result<ProgressEvent> {
        loop {
            let event = self.receiver.recv().await?;

            if let Some(ref filter) = self.filter {
                if filter.matches(&event) {
                    return Ok(event);
                }
            } else {
                return Ok(event);
            }
        }
    }

    /// Try to receive without blocking
    pub fn try_recv(&mut self) -> Result<Option<ProgressEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(ref filter) = self.filter {
                        if filter.matches(&event) {
                            return Ok(Some(event));
                        }
                        // Filtered out, keep draining
                    } else {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Event filter for selective subscription
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    event_types: Option<Vec<EventType>>,
    min_priority: Option<EventPriority>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = Some(types);
        self
    }

    pub fn with_min_priority(mut self, priority: EventPriority) -> Self {
        self.min_priority = Some(priority);
        self
    }

    pub fn matches(&self, event: &ProgressEvent) -> bool {
        if let Some(ref types) = self.event_types
            && !types.contains(&event.event_type)
        {
            return false;
        }

        if let Some(min_priority) = self.min_priority
            && event.priority < min_priority
        {
            return false;
        }

        true
    }
}

/// Broadcast bus carrying progress and player events to subscribed views.
///
/// This is the in-process leg of the store's `subscribeToChanges`
/// capability: dashboards subscribe here and re-fetch on notification.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<ProgressEvent>,
    stats: Arc<RwLock<EventBusStats>>,
}

#[derive(Debug, Default, Clone)]
pub struct EventBusStats {
    pub total_events: u64,
    pub dropped_events: u64,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);

        Self {
            sender,
            stats: Arc::new(RwLock::new(EventBusStats::default())),
        }
    }

    /// Publish an event to all subscribers
    pub async fn publish(&self, event: ProgressEvent) -> Result<()> {
        trace!(
            "Publishing event: {:?} with priority {:?}",
            event.event_type, event.priority
        );

        let mut stats = self.stats.write().await;
        stats.total_events += 1;

        if self.sender.send(event).is_err() {
            // No subscribers is normal, don't log
            stats.dropped_events += 1;
        }

        Ok(())
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), None)
    }

    /// Subscribe with a filter
    pub fn subscribe_filtered(&self, filter: EventFilter) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), Some(filter))
    }

    /// Subscribe to specific event types
    pub fn subscribe_to_types(&self, types: Vec<EventType>) -> EventSubscriber {
        self.subscribe_filtered(EventFilter::new().with_types(types))
    }

    /// Get current subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get event bus statistics
    pub async fn get_stats(&self) -> EventBusStats {
        self.stats.read().await.clone()
    }

    /// Emit a milestone reached event
    pub async fn emit_milestone_reached(
        &self,
        course_id: CourseId,
        video_id: VideoId,
        progress: u8,
    ) -> Result<()> {
        let event = ProgressEvent::new(
            EventType::MilestoneReached,
            EventPayload::Progress {
                course_id,
                video_id: Some(video_id),
                progress: Some(progress),
                error: None,
            },
        );
        self.publish(event).await
    }

    /// Emit a video completed event
    pub async fn emit_video_completed(
        &self,
        course_id: CourseId,
        video_id: VideoId,
        progress: u8,
    ) -> Result<()> {
        let event = ProgressEvent::new(
            EventType::VideoCompleted,
            EventPayload::Progress {
                course_id,
                video_id: Some(video_id),
                progress: Some(progress),
                error: None,
            },
        );
        self.publish(event).await
    }

    /// Emit a course completed event
    pub async fn emit_course_completed(&self, course_id: CourseId) -> Result<()> {
        let event = ProgressEvent::new(
            EventType::CourseCompleted,
            EventPayload::Progress {
                course_id,
                video_id: None,
                progress: Some(crate::constants::COURSE_COMPLETE_PERCENT),
                error: None,
            },
        )
        .with_priority(EventPriority::High);
        self.publish(event).await
    }

    /// Emit a progress saved event
    pub async fn emit_progress_saved(&self, course_id: CourseId, progress: u8) -> Result<()> {
        let event = ProgressEvent::new(
            EventType::ProgressSaved,
            EventPayload::Progress {
                course_id,
                video_id: None,
                progress: Some(progress),
                error: None,
            },
        );
        self.publish(event).await
    }

    /// Emit a progress save failed event
    pub async fn emit_save_failed(&self, course_id: CourseId, error: String) -> Result<()> {
        let event = ProgressEvent::new(
            EventType::ProgressSaveFailed,
            EventPayload::Progress {
                course_id,
                video_id: None,
                progress: None,
                error: Some(error),
            },
        )
        .with_priority(EventPriority::High);
        self.publish(event).await
    }

    /// Emit a user-facing notice
    pub async fn emit_notice(&self, notice: Notice) -> Result<()> {
        let priority = match notice.level {
            super::types::NoticeLevel::Error => EventPriority::High,
            super::types::NoticeLevel::Info => EventPriority::Normal,
        };
        let event =
            ProgressEvent::new(EventType::Notice, EventPayload::Notice(notice)).with_priority(priority);
        self.publish(event).await
    }

    /// Emit a controls visibility change
    pub async fn emit_controls_hidden(&self) -> Result<()> {
        let event = ProgressEvent::new(
            EventType::ControlsHidden,
            EventPayload::Controls { visible: false },
        )
        .with_priority(EventPriority::Low);
        self.publish(event).await
    }
}
