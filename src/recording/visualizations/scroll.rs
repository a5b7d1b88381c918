//! Horizontal scroll animation for the bar display.
//!
//! Each overflow of the bar buffer advances the translation target by one
//! pitch; the offset then glides there linearly over a fixed duration. The
//! duration is tuned slightly shorter than the metering interval so every
//! scroll settles before the next bar arrives and bars never visibly jump.
//! Reading the offset is pure, so re-rendering cannot re-trigger anything.

use std::time::{Duration, Instant};

/// Animates the horizontal translation of the bar container.
#[derive(Debug)]
pub struct ScrollAnimator {
    from: f32,
    target: f32,
    started: Option<Instant>,
    duration: Duration,
}

impl ScrollAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            from: 0.0,
            target: 0.0,
            started: None,
            duration,
        }
    }

    /// Starts a linear glide from the current offset to one pitch further.
    ///
    /// Called once per overflow event. If the previous glide has not finished
    /// (it should have, given the duration is below the metering interval),
    /// the new one starts from wherever the offset currently is.
    pub fn trigger(&mut self, pitch: f32, now: Instant) {
        let current = self.offset_at(now);
        self.from = current;
        self.target = current + pitch;
        self.started = Some(now);
    }

    /// The translation offset at the given instant, in cells.
    pub fn offset_at(&self, now: Instant) -> f32 {
        match self.started {
            None => self.target,
            Some(started) => {
                let elapsed = now.saturating_duration_since(started);
                if elapsed >= self.duration {
                    self.target
                } else {
                    let frac = elapsed.as_secs_f32() / self.duration.as_secs_f32();
                    self.from + frac * (self.target - self.from)
                }
            }
        }
    }

    /// Returns the offset to zero with no animation.
    pub fn reset(&mut self) {
        self.from = 0.0;
        self.target = 0.0;
        self.started = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: Duration = Duration::from_millis(470);

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_offset_stays_zero_without_trigger() {
        let animator = ScrollAnimator::new(DURATION);
        let t0 = Instant::now();
        assert_close(animator.offset_at(t0), 0.0);
        assert_close(animator.offset_at(t0 + Duration::from_secs(5)), 0.0);
    }

    #[test]
    fn test_linear_glide_over_duration() {
        let mut animator = ScrollAnimator::new(DURATION);
        let t0 = Instant::now();
        animator.trigger(3.0, t0);

        assert_close(animator.offset_at(t0), 0.0);
        assert_close(animator.offset_at(t0 + DURATION / 2), 1.5);
        assert_close(animator.offset_at(t0 + DURATION), 3.0);
        // Holds at the target after completion
        assert_close(animator.offset_at(t0 + Duration::from_secs(2)), 3.0);
    }

    #[test]
    fn test_each_trigger_advances_one_pitch() {
        let mut animator = ScrollAnimator::new(DURATION);
        let t0 = Instant::now();
        animator.trigger(3.0, t0);
        // Next metering tick arrives after the previous glide has settled
        let t1 = t0 + Duration::from_millis(500);
        animator.trigger(3.0, t1);
        assert_close(animator.offset_at(t1), 3.0);
        assert_close(animator.offset_at(t1 + DURATION), 6.0);
    }

    #[test]
    fn test_trigger_midflight_continues_from_current_offset() {
        let mut animator = ScrollAnimator::new(DURATION);
        let t0 = Instant::now();
        animator.trigger(3.0, t0);
        let mid = t0 + DURATION / 2;
        animator.trigger(3.0, mid);
        assert_close(animator.offset_at(mid), 1.5);
        assert_close(animator.offset_at(mid + DURATION), 4.5);
    }

    #[test]
    fn test_rereading_does_not_advance_state() {
        let mut animator = ScrollAnimator::new(DURATION);
        let t0 = Instant::now();
        animator.trigger(3.0, t0);
        let probe = t0 + DURATION / 4;
        let first = animator.offset_at(probe);
        let second = animator.offset_at(probe);
        assert_close(first, second);
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut animator = ScrollAnimator::new(DURATION);
        let t0 = Instant::now();
        animator.trigger(3.0, t0);
        animator.reset();
        assert_close(animator.offset_at(t0 + DURATION), 0.0);
    }
}
