mod remote;

pub use remote::RemoteProgressStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::constants::COURSE_COMPLETE_PERCENT;
use crate::models::{CourseId, UserId, VideoId};

/// Per-user, per-course completion state owned by the progress store.
///
/// There is exactly one record per `(user_id, course_id)` pair. The store
/// applies no locking: concurrent writers race and the last submission wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgressRecord {
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Integer percentage in `[0, 100]`.
    pub progress: u8,
    /// Most recent video whose milestone was crossed.
    pub last_watched_video_id: Option<VideoId>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl CourseProgressRecord {
    /// A course counts as complete once progress reaches 100 or the record
    /// was explicitly marked.
    pub fn is_complete(&self) -> bool {
        self.completed || self.progress >= COURSE_COMPLETE_PERCENT
    }
}

/// A new absolute progress value for one course, produced by the
/// aggregator when a video crosses its milestone or ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSubmission {
    pub course_id: CourseId,
    pub video_id: VideoId,
    /// The new absolute course progress, not a delta.
    pub progress: u8,
    pub completed: bool,
}

/// Notification that a `(user, course)` record changed. Carries no record
/// data: consumers re-fetch rather than apply deltas.
#[derive(Debug, Clone)]
pub struct ProgressChange {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Remote facade persisting and broadcasting course completion state.
#[async_trait]
pub trait ProgressStore: Send + Sync + std::fmt::Debug {
    /// Fetch the progress record for one course, if any exists.
    async fn get_course_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseProgressRecord>>;

    /// Fetch all progress records for a user, for dashboard views.
    async fn list_course_progress(&self, user_id: &UserId) -> Result<Vec<CourseProgressRecord>>;

    /// Persist a new absolute progress value. Callers treat failures as
    /// non-fatal: playback continues and the user sees a notification.
    async fn submit(&self, user_id: &UserId, submission: &ProgressSubmission) -> Result<()>;

    /// Subscribe to the store's change feed.
    fn subscribe(&self) -> broadcast::Receiver<ProgressChange>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(progress: u8, completed: bool) -> CourseProgressRecord {
        CourseProgressRecord {
            user_id: "user1".into(),
            course_id: "course1".into(),
            progress,
            last_watched_video_id: None,
            completed,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_completion_from_progress() {
        assert!(!record(99, false).is_complete());
        assert!(record(100, false).is_complete());
    }

    #[test]
    fn test_completion_from_explicit_mark() {
        assert!(record(33, true).is_complete());
    }

    #[test]
    fn test_submission_wire_format() {
        let submission = ProgressSubmission {
            course_id: "course1".into(),
            video_id: "video2".into(),
            progress: 7,
            completed: false,
        };

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "courseId": "course1",
                "videoId": "video2",
                "progress": 7,
                "completed": false,
            })
        );
    }
}
