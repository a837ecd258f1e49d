//! Property tests for the motion and input helpers.
//!
//! Verifies:
//! 1. The easing curve is monotonic and pinned at 0, 0.5 and 1
//! 2. A smooth scroll lands exactly on its target whatever the frame timing
//! 3. The same holds when the controller drives the scroll
//! 4. The key window always holds the most recent ten codes
//! 5. Counters always finish on the exact number from the text

use proptest::prelude::*;
use site_fx_core::constants::{COUNTER_TICK_MS, KEY_BUFFER_LEN};
use site_fx_core::counter::CounterTween;
use site_fx_core::konami::KONAMI_CODE;
use site_fx_core::{
    ease_in_out_cubic, Controller, FakeSurface, KeySequence, SiteConfig, SmoothScroll, Surface,
};

proptest! {
    #[test]
    fn easing_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(ease_in_out_cubic(lo) <= ease_in_out_cubic(hi));
    }

    #[test]
    fn easing_stays_in_unit_range(t in -2.0f32..3.0) {
        let e = ease_in_out_cubic(t);
        prop_assert!((0.0..=1.0).contains(&e));
    }
}

#[test]
fn easing_fixed_points() {
    assert_eq!(ease_in_out_cubic(0.0), 0.0);
    assert_eq!(ease_in_out_cubic(0.5), 0.5);
    assert_eq!(ease_in_out_cubic(1.0), 1.0);
}

proptest! {
    #[test]
    fn smooth_scroll_lands_on_target(
        start in -5_000.0f32..5_000.0,
        target in -5_000.0f32..5_000.0,
        duration in 0.0f64..3_000.0,
        gaps in prop::collection::vec(0.5f64..120.0, 1..64),
    ) {
        let scroll = SmoothScroll::new(start, target, 1_000.0, duration);
        let mut now = 1_000.0;
        let mut landed = None;
        // cycle through the jittered gaps until the animation reports done
        for gap in gaps.iter().cycle().take(20_000) {
            now += gap;
            let sample = scroll.sample(now);
            if sample.finished {
                landed = Some(sample.y);
                break;
            }
        }
        prop_assert_eq!(landed, Some(target));
    }

    #[test]
    fn controller_scroll_lands_on_target(
        target in 0.0f32..20_000.0,
        duration in 1.0f64..2_000.0,
        gaps in prop::collection::vec(1.0f64..80.0, 1..32),
    ) {
        let mut c = Controller::new(FakeSurface::new(), SiteConfig::elegant(), 5);
        c.start(0.0);
        c.smooth_scroll_to(target, duration);
        let mut now = 0.0;
        for gap in gaps.iter().cycle().take(5_000) {
            if !c.is_scrolling() {
                break;
            }
            now += gap;
            c.frame(now);
        }
        prop_assert!(!c.is_scrolling());
        prop_assert_eq!(c.surface().scroll_y(), target);
    }

    #[test]
    fn key_window_keeps_latest(codes in prop::collection::vec(0u32..30, 0..40)) {
        // codes below 30 never complete the sequence
        let mut keys = KeySequence::new(&KONAMI_CODE);
        for code in &codes {
            prop_assert!(!keys.push(*code));
        }
        let keep = codes.len().min(KEY_BUFFER_LEN);
        prop_assert_eq!(keys.buffer(), &codes[codes.len() - keep..]);
    }

    #[test]
    fn counter_finishes_on_exact_target(target in 0u64..5_000_000, duration in 0.0f64..4_000.0) {
        let text = format!("{target}+");
        let Some(mut tween) = CounterTween::from_text(&text, duration, COUNTER_TICK_MS) else {
            return Err(TestCaseError::fail("digits not found"));
        };
        let mut last = None;
        for _ in 0..10_000 {
            let frame = tween.step();
            if frame.done {
                last = Some(frame.text);
                break;
            }
        }
        prop_assert_eq!(last, Some(text));
    }
}
