use tracing::debug;

use crate::constants::MILESTONE_PERCENT;

/// Decides, at most once per loaded video, whether enough of it has been
/// watched to count toward course progress.
///
/// Level-triggered: every position update is compared against the fixed
/// threshold, so a seek straight past it still crosses on the next update.
/// Re-armed only by loading a video.
#[derive(Debug, Clone, Default)]
pub struct MilestoneEvaluator {
    crossed: bool,
}

impl MilestoneEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm for a newly loaded video.
    pub fn reset(&mut self) {
        self.crossed = false;
    }

    pub fn crossed(&self) -> bool {
        self.crossed
    }

    /// Latch without evaluating, used when playback reaches the end.
    pub fn force_crossed(&mut self) {
        self.crossed = true;
    }

    /// Evaluate a position update. Returns the watched-percentage snapshot
    /// on the first crossing, `None` otherwise. Updates arriving before
    /// the duration is known are ignored.
    pub fn evaluate(&mut self, current_time: f64, duration: f64) -> Option<u8> {
        if duration <= 0.0 {
            return None;
        }

        let percentage = watched_percent(current_time, duration);
        if !self.crossed && percentage >= MILESTONE_PERCENT {
            self.crossed = true;
            debug!("Milestone crossed at {}% watched", percentage);
            return Some(percentage);
        }

        None
    }
}

/// Integer percentage of the video watched, `floor(t / d * 100)`.
pub(crate) fn watched_percent(current_time: f64, duration: f64) -> u8 {
    if duration <= 0.0 {
        return 0;
    }
    (current_time / duration * 100.0).floor().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crosses_once_at_threshold() {
        let mut evaluator = MilestoneEvaluator::new();

        // 200s video: threshold is the first update with t >= 50
        assert_eq!(evaluator.evaluate(49.9, 200.0), None);
        assert_eq!(evaluator.evaluate(50.0, 200.0), Some(25));
        assert!(evaluator.crossed());

        // Never fires again for the same load
        assert_eq!(evaluator.evaluate(60.0, 200.0), None);
        assert_eq!(evaluator.evaluate(200.0, 200.0), None);
    }

    #[test]
    fn test_reset_rearms_exactly_once() {
        let mut evaluator = MilestoneEvaluator::new();
        assert_eq!(evaluator.evaluate(100.0, 200.0), Some(50));

        evaluator.reset();
        assert!(!evaluator.crossed());
        assert_eq!(evaluator.evaluate(55.0, 200.0), Some(27));
        assert_eq!(evaluator.evaluate(56.0, 200.0), None);
    }

    #[test]
    fn test_ignored_until_duration_known() {
        let mut evaluator = MilestoneEvaluator::new();
        assert_eq!(evaluator.evaluate(30.0, 0.0), None);
        assert_eq!(evaluator.evaluate(30.0, -1.0), None);
        assert!(!evaluator.crossed());
    }

    #[test]
    fn test_seek_past_threshold_still_crosses() {
        let mut evaluator = MilestoneEvaluator::new();
        assert_eq!(evaluator.evaluate(1.0, 100.0), None);
        // Jump straight from 1s to 80s
        assert_eq!(evaluator.evaluate(80.0, 100.0), Some(80));
    }

    #[test]
    fn test_force_crossed_blocks_evaluation() {
        let mut evaluator = MilestoneEvaluator::new();
        evaluator.force_crossed();
        assert_eq!(evaluator.evaluate(90.0, 100.0), None);
    }

    #[test]
    fn test_watched_percent_floors() {
        assert_eq!(watched_percent(26.0, 100.0), 26);
        assert_eq!(watched_percent(49.9, 200.0), 24);
        assert_eq!(watched_percent(0.0, 100.0), 0);
        assert_eq!(watched_percent(100.0, 100.0), 100);
        // Out-of-range positions clamp rather than overflow
        assert_eq!(watched_percent(150.0, 100.0), 100);
        assert_eq!(watched_percent(-5.0, 100.0), 0);
    }
}
