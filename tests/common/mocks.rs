use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast;

use coursetrack::models::{CourseId, UserId};
use coursetrack::store::{CourseProgressRecord, ProgressChange, ProgressStore, ProgressSubmission};

/// In-memory progress store with switchable error injection.
#[derive(Debug)]
pub struct MockProgressStore {
    records: Mutex<HashMap<(UserId, CourseId), CourseProgressRecord>>,
    submissions: Mutex<Vec<(UserId, ProgressSubmission)>>,
    error_mode: Mutex<Option<String>>,
    /// Artificial latency applied to submits, to exercise in-flight behavior.
    submit_delay: Mutex<Option<Duration>>,
    changes: broadcast::Sender<ProgressChange>,
}

impl Default for MockProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProgressStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            records: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            error_mode: Mutex::new(None),
            submit_delay: Mutex::new(None),
            changes,
        }
    }

    pub fn inject_error(&self, error: &str) {
        *self.error_mode.lock().unwrap() = Some(error.to_string());
    }

    pub fn clear_error(&self) {
        *self.error_mode.lock().unwrap() = None;
    }

    pub fn set_submit_delay(&self, delay: Duration) {
        *self.submit_delay.lock().unwrap() = Some(delay);
    }

    pub fn submissions(&self) -> Vec<(UserId, ProgressSubmission)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn record_for(&self, user_id: &UserId, course_id: &CourseId) -> Option<CourseProgressRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(user_id.clone(), course_id.clone()))
            .cloned()
    }

    fn fail_if_requested(&self) -> Result<()> {
        if let Some(error) = self.error_mode.lock().unwrap().as_ref() {
            return Err(anyhow!("{}", error));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for MockProgressStore {
    async fn get_course_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseProgressRecord>> {
        self.fail_if_requested()?;
        Ok(self.record_for(user_id, course_id))
    }

    async fn list_course_progress(&self, user_id: &UserId) -> Result<Vec<CourseProgressRecord>> {
        self.fail_if_requested()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn submit(&self, user_id: &UserId, submission: &ProgressSubmission) -> Result<()> {
        let delay = *self.submit_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.fail_if_requested()?;

        self.records.lock().unwrap().insert(
            (user_id.clone(), submission.course_id.clone()),
            CourseProgressRecord {
                user_id: user_id.clone(),
                course_id: submission.course_id.clone(),
                progress: submission.progress,
                last_watched_video_id: Some(submission.video_id.clone()),
                completed: submission.completed,
                updated_at: Utc::now(),
            },
        );

        self.submissions
            .lock()
            .unwrap()
            .push((user_id.clone(), submission.clone()));

        let _ = self.changes.send(ProgressChange {
            user_id: user_id.clone(),
            course_id: submission.course_id.clone(),
        });

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProgressChange> {
        self.changes.subscribe()
    }
}
