//! Navigation bar scroll state.
//!
//! Scroll events only raise a flag; the work happens once in the next
//! animation frame.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// What the navbar should look like after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavUpdate {
    pub scrolled: bool,
    /// `Some(true)` hides the bar, `Some(false)` shows it, `None` leaves it alone.
    pub hidden: Option<bool>,
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavThresholds {
    /// Offset past which the navbar gets its `scrolled` treatment.
    pub scrolled_after: f32,
    /// Offset past which scrolling down hides the bar. `None` disables auto-hide.
    pub hide_after: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NavScroll {
    last_y: f32,
    frame_scheduled: bool,
}

impl NavScroll {
    pub fn new(initial_y: f32) -> Self {
        Self {
            last_y: initial_y,
            frame_scheduled: false,
        }
    }

    /// Record a scroll event. Returns `true` only when no frame was pending yet.
    pub fn request_frame(&mut self) -> bool {
        if self.frame_scheduled {
            return false;
        }
        self.frame_scheduled = true;
        true
    }

    pub fn frame_scheduled(&self) -> bool {
        self.frame_scheduled
    }

    pub fn last_y(&self) -> f32 {
        self.last_y
    }

    /// Run the pending frame against the current offset `y`.
    pub fn on_frame(&mut self, y: f32, thresholds: &NavThresholds) -> NavUpdate {
        let direction = if y > self.last_y {
            Direction::Down
        } else {
            Direction::Up
        };
        let update = if y > thresholds.scrolled_after {
            let hidden = thresholds.hide_after.and_then(|hide| {
                if direction == Direction::Down && y > hide {
                    Some(true)
                } else if direction == Direction::Up || y < hide {
                    Some(false)
                } else {
                    None
                }
            });
            NavUpdate {
                scrolled: true,
                hidden,
                direction,
            }
        } else {
            NavUpdate {
                scrolled: false,
                hidden: thresholds.hide_after.map(|_| false),
                direction,
            }
        };
        self.last_y = y;
        self.frame_scheduled = false;
        update
    }
}

/// Hero parallax shift for offset `y`, or `None` once the hero is out of view.
#[inline]
pub fn parallax_shift(y: f32, viewport_height: f32, rate: f32) -> Option<f32> {
    (y < viewport_height).then_some(y * rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELEGANT: NavThresholds = NavThresholds {
        scrolled_after: 100.0,
        hide_after: Some(200.0),
    };

    #[test]
    fn coalesces_until_frame_runs() {
        let mut s = NavScroll::new(0.0);
        assert!(s.request_frame());
        assert!(!s.request_frame());
        assert!(!s.request_frame());
        s.on_frame(10.0, &ELEGANT);
        assert!(s.request_frame());
    }

    #[test]
    fn hides_on_down_past_threshold_and_shows_on_up() {
        let mut s = NavScroll::new(0.0);
        let down = s.on_frame(350.0, &ELEGANT);
        assert_eq!(down.direction, Direction::Down);
        assert!(down.scrolled);
        assert_eq!(down.hidden, Some(true));
        let up = s.on_frame(300.0, &ELEGANT);
        assert_eq!(up.direction, Direction::Up);
        assert_eq!(up.hidden, Some(false));
    }

    #[test]
    fn below_threshold_resets() {
        let mut s = NavScroll::new(400.0);
        let top = s.on_frame(20.0, &ELEGANT);
        assert!(!top.scrolled);
        assert_eq!(top.hidden, Some(false));
    }

    #[test]
    fn between_thresholds_scrolling_down_shows_bar() {
        let mut s = NavScroll::new(100.0);
        let u = s.on_frame(150.0, &ELEGANT);
        assert!(u.scrolled);
        assert_eq!(u.hidden, Some(false));
    }

    #[test]
    fn without_auto_hide_only_scrolled_changes() {
        let t = NavThresholds {
            scrolled_after: 50.0,
            hide_after: None,
        };
        let mut s = NavScroll::new(0.0);
        let u = s.on_frame(500.0, &t);
        assert!(u.scrolled);
        assert_eq!(u.hidden, None);
        assert_eq!(s.on_frame(0.0, &t).hidden, None);
    }

    #[test]
    fn parallax_stops_past_first_screen() {
        let shift = parallax_shift(100.0, 800.0, -0.3).unwrap_or_default();
        assert!((shift + 30.0).abs() < 1e-4);
        assert_eq!(parallax_shift(900.0, 800.0, -0.3), None);
    }
}
