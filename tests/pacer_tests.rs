// Frame pacer integration tests
//
// Feeds scripted frame durations through the pacer and checks the budget,
// sleeps and frame-skip transitions frame by frame.

use calcboy::timing::{FramePacer, SkipChange};

/// (frame duration, expected sleep, expected budget, expected skip flag)
fn run_trace(pacer: &mut FramePacer, trace: &[(u64, u32, u32, bool)]) {
    for (frame, &(duration, sleep, budget, skip)) in trace.iter().enumerate() {
        let pace = pacer.end_frame(duration);
        assert_eq!(pace.sleep_ms, sleep, "sleep after frame {}", frame + 1);
        assert_eq!(pacer.time_budget(), budget, "budget after frame {}", frame + 1);
        assert_eq!(pacer.frame_skip_active(), skip, "skip after frame {}", frame + 1);
    }
}

#[test]
fn test_slow_then_fast_frames() {
    let mut pacer = FramePacer::new(16, true);
    run_trace(
        &mut pacer,
        &[
            (20, 0, 4, false),
            (8, 4, 0, false),
            (8, 8, 0, false),
            (8, 8, 0, false),
        ],
    );
}

#[test]
fn test_slack_is_absorbed_by_budget() {
    let mut pacer = FramePacer::new(16, true);
    run_trace(
        &mut pacer,
        &[
            (26, 0, 10, false),
            // fast by 6, budget 10 covers it
            (10, 0, 4, false),
            // fast by 4, budget 4 covers it exactly
            (12, 0, 0, false),
            (12, 4, 0, false),
        ],
    );
}

#[test]
fn test_sustained_slowness_enables_skip() {
    let mut pacer = FramePacer::new(16, true);
    run_trace(
        &mut pacer,
        &[
            (24, 0, 8, false),
            (24, 0, 16, true),
            (40, 0, 16, true),
            // budget pays back first
            (0, 0, 0, true),
            // no debt left: sleep and stop skipping
            (6, 10, 0, false),
        ],
    );
}

#[test]
fn test_sleep_never_exceeds_target() {
    let mut pacer = FramePacer::new(16, true);
    for duration in [0u64, 3, 15, 40, 1, 16, 100, 2] {
        let pace = pacer.end_frame(duration);
        assert!(pace.sleep_ms <= 16);
        assert!(pacer.time_budget() <= 16);
    }
}

#[test]
fn test_skip_transitions_are_reported_once() {
    let mut pacer = FramePacer::new(16, true);
    let changes: Vec<SkipChange> = [40u64, 40, 40, 0, 0, 0]
        .iter()
        .map(|&d| pacer.end_frame(d).skip)
        .collect();
    assert_eq!(
        changes,
        vec![
            SkipChange::Enabled,
            SkipChange::Unchanged,
            SkipChange::Unchanged,
            SkipChange::Unchanged,
            SkipChange::Disabled,
            SkipChange::Unchanged,
        ]
    );
}

#[test]
fn test_without_auto_skip_flag_never_changes() {
    let mut pacer = FramePacer::new(16, false);
    run_trace(&mut pacer, &[(50, 0, 16, false), (0, 0, 0, false), (0, 16, 0, false)]);
}

#[test]
fn test_custom_target() {
    let mut pacer = FramePacer::new(20, true);
    run_trace(&mut pacer, &[(25, 0, 5, false), (10, 5, 0, false)]);
}
