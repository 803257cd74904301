use serde::{Deserialize, Serialize};

use crate::models::{CourseId, VideoId};

/// Progress change event fanned out to subscribed views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub id: String,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub priority: EventPriority,
}

impl ProgressEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            payload,
            timestamp: chrono::Utc::now(),
            priority: EventPriority::Normal,
        }
    }

    pub fn with_priority(mut self, priority: EventPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Event types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
    // Milestone and completion events
    MilestoneReached,
    VideoCompleted,
    CourseCompleted,

    // Persistence events
    ProgressSaved,
    ProgressSaveFailed,

    // Player surface events
    ControlsHidden,
    Notice,
}

impl EventType {
    /// Get a string representation for filtering/routing
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::MilestoneReached => "progress.milestone_reached",
            EventType::VideoCompleted => "progress.video_completed",
            EventType::CourseCompleted => "progress.course_completed",
            EventType::ProgressSaved => "progress.saved",
            EventType::ProgressSaveFailed => "progress.save_failed",
            EventType::ControlsHidden => "player.controls_hidden",
            EventType::Notice => "player.notice",
        }
    }
}

/// Event payload containing specific data for each event type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Progress {
        course_id: CourseId,
        video_id: Option<VideoId>,
        progress: Option<u8>,
        error: Option<String>,
    },
    Controls {
        visible: bool,
    },
    Notice(Notice),
}

/// Toast-style message surfaced to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Event priority for processing order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub enum EventPriority {
    Low = 0,
    Normal = 1,
    High = 2,
}
