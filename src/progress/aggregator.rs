/// Converts one video's watched percentage into the course-level progress
/// value submitted to the store.
///
/// Submitted values are per-video absolutes, not sums across the course:
/// each video can push course progress up to its own contribution and no
/// further. The store receives the result as the new absolute progress.
#[derive(Debug, Clone)]
pub struct ProgressAggregator {
    total_videos: u32,
}

impl ProgressAggregator {
    /// `total_videos` is the video count of the owning course; callers
    /// guarantee at least 1.
    pub fn new(total_videos: u32) -> Self {
        Self {
            total_videos: total_videos.max(1),
        }
    }

    /// Maximum share of course completion attributable to one video,
    /// `floor(100 / total_videos)`.
    pub fn video_contribution(&self) -> u8 {
        (100 / self.total_videos) as u8
    }

    /// Course progress for a partially watched video,
    /// `ceil(percentage / 100 * contribution)`.
    pub fn incremental_progress(&self, percentage: u8) -> u8 {
        let contribution = self.video_contribution() as u32;
        (percentage as u32 * contribution).div_ceil(100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_bounds() {
        for total in 1..=200 {
            let contribution = ProgressAggregator::new(total).video_contribution();
            assert!(contribution <= 100, "total={}", total);
        }
        assert_eq!(ProgressAggregator::new(1).video_contribution(), 100);
        assert_eq!(ProgressAggregator::new(3).video_contribution(), 33);
        assert_eq!(ProgressAggregator::new(4).video_contribution(), 25);
        assert_eq!(ProgressAggregator::new(101).video_contribution(), 0);
    }

    #[test]
    fn test_incremental_progress_rounds_up() {
        // 26% of a 25-point video: ceil(6.5) = 7
        let aggregator = ProgressAggregator::new(4);
        assert_eq!(aggregator.incremental_progress(26), 7);
    }

    #[test]
    fn test_incremental_progress_full_watch() {
        let aggregator = ProgressAggregator::new(4);
        assert_eq!(aggregator.incremental_progress(100), 25);

        let aggregator = ProgressAggregator::new(1);
        assert_eq!(aggregator.incremental_progress(100), 100);
    }

    #[test]
    fn test_incremental_progress_never_exceeds_contribution() {
        for total in 1..=20 {
            let aggregator = ProgressAggregator::new(total);
            for pct in 0..=100 {
                assert!(
                    aggregator.incremental_progress(pct) <= aggregator.video_contribution(),
                    "total={} pct={}",
                    total,
                    pct
                );
            }
        }
    }

    #[test]
    fn test_zero_total_clamps_to_one() {
        // Callers guarantee >= 1, but a zero must not divide by zero.
        let aggregator = ProgressAggregator::new(0);
        assert_eq!(aggregator.video_contribution(), 100);
    }
}
