use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::Config;
use crate::events::{EventBus, Notice};
use crate::models::{UserId, Video};
use crate::player::{ControlsVisibility, Effect, PlaybackSession, SubmitTrigger};
use crate::store::{ProgressStore, ProgressSubmission};

/// Drives a playback session against the progress store.
///
/// Owns the session, the store capability and the user identity — both
/// passed in explicitly rather than resolved from any ambient context —
/// applies transitions, and executes the effects they produce. Store
/// submissions are fire-and-forget: playback never waits on persistence,
/// and failures surface as a notice instead of propagating.
pub struct ProgressCoordinator {
    session: PlaybackSession,
    store: Arc<dyn ProgressStore>,
    events: Arc<EventBus>,
    user_id: UserId,
    controls: ControlsVisibility,
    volume_step: f64,
    /// Outstanding submission tasks. Unloading the player leaves these
    /// running; only `flush` awaits them.
    submissions: Vec<JoinHandle<()>>,
}

impl ProgressCoordinator {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        events: Arc<EventBus>,
        user_id: UserId,
        config: &Config,
    ) -> Self {
        let controls = ControlsVisibility::new(
            Duration::from_secs(config.playback.controls_hide_secs),
            Arc::clone(&events),
        );

        Self {
            session: PlaybackSession::new(),
            store,
            events,
            user_id,
            controls,
            volume_step: config.playback.volume_step,
            submissions: Vec::new(),
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn controls(&mut self) -> &mut ControlsVisibility {
        &mut self.controls
    }

    /// Load a video for playback. `total_videos` is the owning course's
    /// video count; `last_in_course` marks the course's final video.
    pub async fn load(&mut self, video: Video, total_videos: u32, last_in_course: bool) {
        let effects = self.session.load(video, total_videos, last_in_course);
        self.apply(effects).await;
    }

    /// Tear down the player view. Cancels the controls inactivity timer;
    /// in-flight submissions keep running to completion.
    pub fn unload(&mut self) {
        self.controls.cancel();
        self.session.unload();
    }

    pub async fn metadata_loaded(&mut self, duration: f64) {
        let effects = self.session.on_metadata_loaded(duration);
        self.apply(effects).await;
    }

    pub async fn position_update(&mut self, current_time: f64) {
        let effects = self.session.on_position_update(current_time);
        self.apply(effects).await;
    }

    pub async fn ended(&mut self) {
        let effects = self.session.on_ended();
        self.apply(effects).await;
    }

    pub fn toggle_play(&mut self) -> bool {
        self.session.toggle_play()
    }

    pub fn seek(&mut self, position: f64) -> f64 {
        self.session.seek(position)
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.session.set_volume(volume);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.session.toggle_mute()
    }

    pub fn volume_up(&mut self) -> f64 {
        let step = self.volume_step;
        self.session.volume_up(step)
    }

    pub fn volume_down(&mut self) -> f64 {
        let step = self.volume_step;
        self.session.volume_down(step)
    }

    /// Request the opposite fullscreen state. Returns the state the host
    /// should now request; a host failure is reported back through
    /// [`fullscreen_failed`](Self::fullscreen_failed).
    pub async fn toggle_fullscreen(&mut self) -> bool {
        let effects = self.session.toggle_fullscreen();
        self.apply(effects).await;
        self.session.is_fullscreen()
    }

    pub fn fullscreen_failed(&mut self, error: &str) {
        self.session.on_fullscreen_error(error);
    }

    /// Await all outstanding submissions, e.g. on shutdown.
    pub async fn flush(&mut self) {
        for handle in self.submissions.drain(..) {
            let _ = handle.await;
        }
    }

    async fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    submission,
                    trigger,
                } => {
                    self.publish_progress_events(&submission, trigger).await;
                    self.spawn_submit(submission);
                }
                Effect::Notify(notice) => {
                    let _ = self.events.emit_notice(notice).await;
                }
                Effect::SetFullscreen(fullscreen) => {
                    debug!("Requesting fullscreen: {}", fullscreen);
                }
            }
        }
    }

    async fn publish_progress_events(&self, submission: &ProgressSubmission, trigger: SubmitTrigger) {
        match trigger {
            SubmitTrigger::Milestone => {
                let _ = self
                    .events
                    .emit_milestone_reached(
                        submission.course_id.clone(),
                        submission.video_id.clone(),
                        submission.progress,
                    )
                    .await;
            }
            SubmitTrigger::Ended => {
                let _ = self
                    .events
                    .emit_video_completed(
                        submission.course_id.clone(),
                        submission.video_id.clone(),
                        submission.progress,
                    )
                    .await;
            }
        }

        if submission.completed {
            let _ = self
                .events
                .emit_course_completed(submission.course_id.clone())
                .await;
        }
    }

    fn spawn_submit(&mut self, submission: ProgressSubmission) {
        let store = Arc::clone(&self.store);
        let events = Arc::clone(&self.events);
        let user_id = self.user_id.clone();

        let handle = tokio::spawn(async move {
            match store.submit(&user_id, &submission).await {
                Ok(()) => {
                    debug!(
                        "Saved progress {}% for course {}",
                        submission.progress, submission.course_id
                    );
                    let _ = events
                        .emit_progress_saved(submission.course_id.clone(), submission.progress)
                        .await;
                }
                Err(e) => {
                    // No retry: local playback is unaffected, the user just
                    // sees a non-blocking notice.
                    warn!(
                        "Failed to save progress for course {}: {:#}",
                        submission.course_id, e
                    );
                    let _ = events
                        .emit_save_failed(submission.course_id.clone(), e.to_string())
                        .await;
                    let _ = events
                        .emit_notice(Notice::error("Your progress could not be saved"))
                        .await;
                }
            }
        });

        self.submissions.retain(|h| !h.is_finished());
        self.submissions.push(handle);
    }
}
