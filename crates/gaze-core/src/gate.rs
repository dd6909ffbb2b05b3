//! Minimum-interval admission control for pointer work.
//!
//! Events closer together than `1/fps` are dropped, not queued: this is a
//! rate ceiling, never a scheduler.

use instant::Instant;
use std::time::Duration;

/// Pure form of the gate: is `elapsed` long enough at `fps`?
#[inline]
pub fn should_update(elapsed: Duration, fps: f64) -> bool {
    elapsed >= min_interval(fps)
}

#[inline]
pub fn min_interval(fps: f64) -> Duration {
    if fps.is_finite() && fps > 0.0 {
        Duration::from_secs_f64(1.0 / fps)
    } else {
        Duration::ZERO
    }
}

#[derive(Clone, Debug)]
pub struct FrameRateGate {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameRateGate {
    pub fn new(fps: f64) -> Self {
        Self {
            interval: min_interval(fps),
            last: None,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn last_update(&self) -> Option<Instant> {
        self.last
    }

    /// Admit or drop an event observed at `now`; admitted events restart the interval.
    pub fn admit(&mut self, now: Instant) -> bool {
        let open = match self.last {
            None => true,
            // a clock that went backwards keeps the gate closed
            Some(last) => now >= last && now.duration_since(last) >= self.interval,
        };
        if open {
            self.last = Some(now);
        }
        open
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_gate_matches_sixty_fps_interval() {
        assert!(!should_update(Duration::from_millis(10), 60.0));
        assert!(should_update(Duration::from_millis(17), 60.0));
        assert!(should_update(Duration::ZERO, 0.0));
    }

    #[test]
    fn dropped_events_do_not_restart_interval() {
        let mut gate = FrameRateGate::new(60.0);
        let t0 = Instant::now();
        assert!(gate.admit(t0));
        assert!(!gate.admit(t0 + Duration::from_millis(10)));
        // 17ms after the last admitted event, not after the dropped one
        assert!(gate.admit(t0 + Duration::from_millis(17)));
    }
}
