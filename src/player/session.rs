use tracing::{debug, warn};

use super::milestone::{MilestoneEvaluator, watched_percent};
use super::volume::VolumeControl;
use crate::events::Notice;
use crate::models::Video;
use crate::progress::ProgressAggregator;
use crate::store::ProgressSubmission;

/// Side effects produced by session transitions. The embedding layer
/// executes them; the session itself performs no I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Persist a new absolute course-progress value.
    Submit {
        submission: ProgressSubmission,
        trigger: SubmitTrigger,
    },
    /// Surface a toast-style message to the user.
    Notify(Notice),
    /// Ask the host to enter or leave fullscreen presentation.
    SetFullscreen(bool),
}

/// What caused a progress submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitTrigger {
    /// The watch milestone was crossed mid-playback.
    Milestone,
    /// Playback reached the end of the stream.
    Ended,
}

/// Transient state of the single video currently loaded in the player.
///
/// Modeled as explicit transition functions, each returning the effects it
/// produced, so milestone and completion behavior is testable without a
/// media host. One session exists per player view; loading another video
/// resets it in place.
#[derive(Debug)]
pub struct PlaybackSession {
    video: Option<Video>,
    /// Whether the loaded video is the last one of its course; forwarded
    /// as the `completed` flag when playback ends.
    last_in_course: bool,
    /// Seconds; clamped to `[0, duration]` once the duration is known.
    current_time: f64,
    /// Seconds; `0.0` until the media host reports metadata.
    duration: f64,
    is_playing: bool,
    is_fullscreen: bool,
    volume: VolumeControl,
    milestone: MilestoneEvaluator,
    aggregator: ProgressAggregator,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self {
            video: None,
            last_in_course: false,
            current_time: 0.0,
            duration: 0.0,
            is_playing: false,
            is_fullscreen: false,
            volume: VolumeControl::new(),
            milestone: MilestoneEvaluator::new(),
            aggregator: ProgressAggregator::new(1),
        }
    }

    /// Load a video for playback, resetting all transient state and
    /// re-arming the milestone. `total_videos` is the owning course's
    /// video count (callers guarantee at least 1); `last_in_course` marks
    /// the course's final video.
    pub fn load(&mut self, video: Video, total_videos: u32, last_in_course: bool) -> Vec<Effect> {
        debug!("Loading video {} ({})", video.id, video.title);
        self.video = Some(video);
        self.last_in_course = last_in_course;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.is_playing = false;
        self.milestone.reset();
        self.aggregator = ProgressAggregator::new(total_videos);
        Vec::new()
    }

    /// Tear the session down without a replacement video.
    pub fn unload(&mut self) {
        self.video = None;
        self.last_in_course = false;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.is_playing = false;
        self.milestone.reset();
    }

    /// The media host finished loading stream metadata. Non-positive
    /// durations are treated as still unknown.
    pub fn on_metadata_loaded(&mut self, duration: f64) -> Vec<Effect> {
        if !duration.is_finite() || duration <= 0.0 {
            return Vec::new();
        }
        self.duration = duration;
        self.current_time = self.current_time.min(duration);
        Vec::new()
    }

    /// Position update from the media host. Runs the milestone evaluator
    /// while the duration is known; the first crossing produces a submit
    /// effect carrying the aggregated course progress.
    pub fn on_position_update(&mut self, current_time: f64) -> Vec<Effect> {
        let current_time = if current_time.is_finite() {
            current_time
        } else {
            0.0
        };
        self.current_time = if self.duration > 0.0 {
            current_time.clamp(0.0, self.duration)
        } else {
            current_time.max(0.0)
        };

        let Some(video) = &self.video else {
            return Vec::new();
        };

        if let Some(percentage) = self.milestone.evaluate(self.current_time, self.duration) {
            let progress = self.aggregator.incremental_progress(percentage);
            return vec![Effect::Submit {
                submission: ProgressSubmission {
                    course_id: video.course_id.clone(),
                    video_id: video.id.clone(),
                    progress,
                    completed: false,
                },
                trigger: SubmitTrigger::Milestone,
            }];
        }

        Vec::new()
    }

    /// Playback reached the end of the stream. Always submits the video's
    /// full contribution, whether or not the milestone already fired, and
    /// acknowledges completion to the user.
    pub fn on_ended(&mut self) -> Vec<Effect> {
        self.is_playing = false;
        if self.duration > 0.0 {
            self.current_time = self.duration;
        }

        let Some(video) = &self.video else {
            return Vec::new();
        };

        self.milestone.force_crossed();

        vec![
            Effect::Submit {
                submission: ProgressSubmission {
                    course_id: video.course_id.clone(),
                    video_id: video.id.clone(),
                    progress: self.aggregator.video_contribution(),
                    completed: self.last_in_course,
                },
                trigger: SubmitTrigger::Ended,
            },
            Effect::Notify(Notice::info(format!("Finished \"{}\"", video.title))),
        ]
    }

    /// Flip play/pause. A session with no loaded video stays paused.
    pub fn toggle_play(&mut self) -> bool {
        if self.video.is_some() {
            self.is_playing = !self.is_playing;
        }
        self.is_playing
    }

    /// Jump to a position, clamped to `[0, duration]`. Milestone
    /// evaluation happens on the next position update, not here.
    pub fn seek(&mut self, position: f64) -> f64 {
        let position = if position.is_finite() { position } else { 0.0 };
        self.current_time = position.clamp(0.0, self.duration.max(0.0));
        self.current_time
    }

    /// Request the opposite fullscreen state from the host. The flag flips
    /// optimistically; a host failure reverts it via
    /// [`on_fullscreen_error`](Self::on_fullscreen_error).
    pub fn toggle_fullscreen(&mut self) -> Vec<Effect> {
        self.is_fullscreen = !self.is_fullscreen;
        vec![Effect::SetFullscreen(self.is_fullscreen)]
    }

    /// The host denied or failed the last fullscreen request. Logged and
    /// rolled back; playback state is untouched.
    pub fn on_fullscreen_error(&mut self, error: &str) {
        warn!("Fullscreen request failed: {}", error);
        self.is_fullscreen = !self.is_fullscreen;
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume.set_volume(volume);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.volume.toggle_mute()
    }

    pub fn volume_up(&mut self, step: f64) -> f64 {
        self.volume.volume_up(step)
    }

    pub fn volume_down(&mut self, step: f64) -> f64 {
        self.volume.volume_down(step)
    }

    pub fn video(&self) -> Option<&Video> {
        self.video.as_ref()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn volume(&self) -> &VolumeControl {
        &self.volume
    }

    pub fn milestone_crossed(&self) -> bool {
        self.milestone.crossed()
    }

    /// Integer percentage of the loaded video watched so far.
    pub fn watched_percent(&self) -> u8 {
        watched_percent(self.current_time, self.duration)
    }

    /// Maximum course progress this video can contribute.
    pub fn video_contribution(&self) -> u8 {
        self.aggregator.video_contribution()
    }
}
