/// Cubic ease-in-out on `t` in \[0, 1\]; inputs outside are clamped.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = 1.0 - t;
        1.0 - 4.0 * u * u * u
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSample {
    pub y: f32,
    pub finished: bool,
}

/// Time-based scroll from `start_y` to `target_y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothScroll {
    start_y: f32,
    target_y: f32,
    started_at_ms: f64,
    duration_ms: f64,
}

impl SmoothScroll {
    pub fn new(start_y: f32, target_y: f32, started_at_ms: f64, duration_ms: f64) -> Self {
        Self {
            start_y,
            target_y,
            started_at_ms,
            duration_ms,
        }
    }

    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    /// Position for the frame at `now_ms`. Once progress reaches 1 the target is
    /// returned exactly, never an interpolated value.
    pub fn sample(&self, now_ms: f64) -> ScrollSample {
        let progress = if self.duration_ms > 0.0 {
            (now_ms - self.started_at_ms) / self.duration_ms
        } else {
            1.0
        };
        if progress >= 1.0 {
            return ScrollSample {
                y: self.target_y,
                finished: true,
            };
        }
        let eased = ease_in_out_cubic(progress.max(0.0) as f32);
        ScrollSample {
            y: self.start_y + (self.target_y - self.start_y) * eased,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_fixed_points() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.25) - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let s = SmoothScroll::new(0.0, 400.0, 10.0, 0.0);
        assert_eq!(
            s.sample(10.0),
            ScrollSample {
                y: 400.0,
                finished: true
            }
        );
    }

    #[test]
    fn midpoint_is_halfway() {
        let s = SmoothScroll::new(100.0, 300.0, 0.0, 1000.0);
        let mid = s.sample(500.0);
        assert!(!mid.finished);
        assert!((mid.y - 200.0).abs() < 1e-3);
    }
}
