use super::*;

fn schedule() -> AnimationSchedule {
    AnimationSchedule::new(&VideoConfig::default()).unwrap()
}

#[test]
fn counters_hold_zero_before_count_window() {
    for t in [0.0, 1.0, 4.0, 4.999] {
        assert_eq!(AnimationSchedule::displayed_value(1121, t), 0);
    }
}

#[test]
fn counters_reach_final_at_and_after_count_end() {
    for t in [8.0, 8.5, 10.0, 15.0] {
        assert_eq!(AnimationSchedule::displayed_value(1121, t), 1121);
    }
}

#[test]
fn counters_interpolate_linearly_with_floor() {
    assert_eq!(AnimationSchedule::displayed_value(300, 5.0), 0);
    assert_eq!(AnimationSchedule::displayed_value(300, 6.5), 150);
    assert_eq!(AnimationSchedule::displayed_value(10, 7.0), 6);
}

#[test]
fn counters_are_monotonic_over_every_frame() {
    let s = schedule();
    for final_value in [0u64, 1, 7, 213, 1121, 9_999_999] {
        let mut prev = 0;
        for f in 0..s.total_frames() {
            let v = AnimationSchedule::displayed_value(final_value, s.time_of(FrameIndex(f)));
            assert!(v >= prev, "value decreased at frame {f}");
            assert!(v <= final_value);
            prev = v;
        }
        assert_eq!(prev, final_value);
    }
}

#[test]
fn highlight_never_on_both_columns_and_only_for_winner() {
    let s = schedule();
    let spec = ComparisonSpec::new("Goals", "A", "B", 213, 1121).unwrap();
    for f in 0..s.total_frames() {
        let st = s.state_at(&spec, FrameIndex(f));
        let t = s.time_of(FrameIndex(f));
        assert!(!st.is_highlighted(Side::A));
        assert_eq!(st.is_highlighted(Side::B), t >= 8.0);
    }
}

#[test]
fn tie_never_highlights() {
    let s = schedule();
    let spec = ComparisonSpec::new("Goals", "A", "B", 50, 50).unwrap();
    for f in 0..s.total_frames() {
        let st = s.state_at(&spec, FrameIndex(f));
        assert_eq!(st.winner, None);
        assert!(!st.is_highlighted(Side::A) && !st.is_highlighted(Side::B));
    }
}

#[test]
fn highlight_follows_configured_mark_start() {
    let cfg = VideoConfig {
        total_duration: 12,
        mark_start: 9.0,
        ..VideoConfig::default()
    };
    let s = AnimationSchedule::new(&cfg).unwrap();
    assert_eq!(s.total_frames(), 360);
    assert!(!s.highlight_active(8.999));
    assert!(s.highlight_active(9.0));
    assert_eq!(s.frame_range().len_frames(), 360);
}

#[test]
fn frame_counters_use_exact_steps() {
    let s = schedule();
    // 153 / 30 s is not exact in binary floating point.
    assert_eq!(s.displayed_at_frame(300, FrameIndex(153)), 10);
    assert_eq!(s.displayed_at_frame(300, FrameIndex(150)), 0);
    assert_eq!(s.displayed_at_frame(300, FrameIndex(195)), 150);
    assert_eq!(s.displayed_at_frame(300, FrameIndex(239)), 296);
    assert_eq!(s.displayed_at_frame(300, FrameIndex(240)), 300);
    assert_eq!(s.displayed_at_frame(u64::MAX, FrameIndex(299)), u64::MAX);

    let spec = ComparisonSpec::new("Goals", "A", "B", 300, 0).unwrap();
    assert_eq!(s.state_at(&spec, FrameIndex(153)).displayed, [10, 0]);
}

#[test]
fn frame_counters_match_the_time_curve_on_exact_times() {
    let s = schedule();
    for f in (0..s.total_frames()).step_by(15) {
        let t = s.time_of(FrameIndex(f));
        assert_eq!(
            s.displayed_at_frame(1121, FrameIndex(f)),
            AnimationSchedule::displayed_value(1121, t),
            "frame {f}"
        );
    }
}
