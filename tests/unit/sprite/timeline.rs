use super::*;
use crate::sprite::dsl::SpriteBuilder;

fn frames_1_2_1() -> Vec<SpriteFrame> {
    vec![
        SpriteFrame::new("a", 1.0),
        SpriteFrame::new("b", 2.0).with_transition("fade", 0.5),
        SpriteFrame::new("c", 1.0),
    ]
}

fn still(frame1: usize, frame2: usize, offset: f64) -> TimelineState<'static> {
    TimelineState {
        transition: None,
        offset,
        frame1,
        frame2,
    }
}

#[test]
fn length_sums_static_and_incoming_windows() {
    let tl = SpriteTimeline::new(frames_1_2_1(), false).unwrap();
    assert_eq!(tl.length(), 4.5);

    // Frame 0's window follows the last frame.
    let mut frames = frames_1_2_1();
    frames[0] = SpriteFrame::new("a", 1.0).with_transition("dissolve", 0.25);
    let tl = SpriteTimeline::new(frames, true).unwrap();
    assert_eq!(tl.length(), 4.75);
}

#[test]
fn length_ignores_half_declared_transitions() {
    let mut frames = frames_1_2_1();
    frames[2].transition = Some("fade".to_string());
    frames[1].transition = None;
    let tl = SpriteTimeline::new(frames, false).unwrap();
    assert_eq!(tl.length(), 4.0);
}

#[test]
fn non_looping_samples() {
    let tl = SpriteTimeline::new(frames_1_2_1(), false).unwrap();

    assert_eq!(tl.state_for_time(0.5).unwrap(), still(0, 1, 0.5));

    let s = tl.state_for_time(1.25).unwrap();
    assert_eq!(s.transition, Some("fade"));
    assert_eq!((s.frame1, s.frame2), (0, 1));
    assert!((s.offset - 0.5).abs() < 1e-12);

    assert_eq!(tl.state_for_time(2.5).unwrap(), still(1, 2, 0.5));
    assert_eq!(tl.state_for_time(100.0).unwrap(), still(2, 2, 1.0));
    assert_eq!(tl.state_for_time(4.5).unwrap(), still(2, 2, 1.0));
}

#[test]
fn negative_time_clamps_to_start_when_not_looping() {
    let tl = SpriteTimeline::new(frames_1_2_1(), false).unwrap();
    assert_eq!(tl.state_for_time(-3.0).unwrap(), still(0, 1, 0.0));
}

#[test]
fn looping_wraps_modulo_length() {
    let tl = SpriteBuilder::new()
        .looping(true)
        .still("a", 1.0)
        .still("b", 1.0)
        .still("c", 2.0)
        .build()
        .unwrap();
    assert_eq!(tl.length(), 4.0);
    assert_eq!(
        tl.state_for_time(4.5).unwrap(),
        tl.state_for_time(0.5).unwrap()
    );
    assert_eq!(
        tl.state_for_time(9.0).unwrap(),
        tl.state_for_time(1.0).unwrap()
    );
    assert_eq!(
        tl.state_for_time(-0.5).unwrap(),
        tl.state_for_time(3.5).unwrap()
    );
    assert_eq!(tl.state_for_time(3.5).unwrap(), still(2, 0, 0.75));
}

#[test]
fn looping_plays_wrap_transition() {
    let tl = SpriteBuilder::new()
        .looping(true)
        .frame(SpriteFrame::new("a", 1.0).with_transition("circle", 1.0))
        .still("b", 1.0)
        .build()
        .unwrap();
    assert_eq!(tl.length(), 3.0);
    let s = tl.state_for_time(2.5).unwrap();
    assert_eq!(s.transition, Some("circle"));
    assert_eq!((s.frame1, s.frame2), (1, 0));
    assert_eq!(s.offset, 0.5);
}

#[test]
fn zero_duration_frames_are_skipped() {
    let tl = SpriteTimeline::new(
        vec![
            SpriteFrame::new("a", 0.0),
            SpriteFrame::new("b", 1.0),
            SpriteFrame::new("c", 1.0),
        ],
        false,
    )
    .unwrap();
    assert_eq!(tl.state_for_time(0.0).unwrap(), still(1, 2, 0.0));
}

#[test]
fn zero_length_timeline_shows_first_frame() {
    let tl = SpriteTimeline::new(
        vec![SpriteFrame::new("a", 0.0), SpriteFrame::new("b", 0.0)],
        true,
    )
    .unwrap();
    assert_eq!(tl.length(), 0.0);
    assert_eq!(tl.state_for_time(12.0).unwrap(), still(0, 0, 0.0));
}

#[test]
fn contract_errors_fail_fast() {
    let empty = SpriteTimeline::new(Vec::new(), false).unwrap();
    assert!(matches!(
        empty.state_for_time(0.0),
        Err(LanternError::Timeline(_))
    ));

    let tl = SpriteTimeline::new(frames_1_2_1(), false).unwrap();
    assert!(matches!(
        tl.state_for_time(f64::NAN),
        Err(LanternError::Validation(_))
    ));
    assert!(matches!(
        tl.time_for_frame(4),
        Err(LanternError::Validation(_))
    ));
}

#[test]
fn time_for_frame_is_monotonic_from_zero() {
    let tl = SpriteTimeline::new(frames_1_2_1(), false).unwrap();
    assert_eq!(tl.time_for_frame(0).unwrap(), 0.0);
    let times: Vec<f64> = (0..=tl.len()).map(|i| tl.time_for_frame(i).unwrap()).collect();
    assert_eq!(times, vec![0.0, 1.5, 3.5, 4.5]);
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(times[tl.len()], tl.length());

    assert_eq!(tl.start_time_for_frame(10.0, 2).unwrap(), 6.5);
    assert_eq!(
        tl.state_for_time(tl.time_for_frame(2).unwrap()).unwrap(),
        still(2, 0, 0.0)
    );
}

#[test]
fn push_recomputes_length() {
    let mut tl = SpriteTimeline::new(frames_1_2_1(), false).unwrap();
    tl.push_frame(SpriteFrame::new("d", 1.0).with_transition("fade", 1.0))
        .unwrap();
    assert_eq!(tl.length(), 6.5);

    tl.set_frames(vec![SpriteFrame::new("x", 2.0)]).unwrap();
    assert_eq!(tl.length(), 2.0);
    assert!(tl.set_frames(vec![SpriteFrame::new("x", -2.0)]).is_err());
    assert_eq!(tl.len(), 1);
}

#[test]
fn phase_splits_static_and_transition() {
    let tl = SpriteTimeline::new(frames_1_2_1(), false).unwrap();
    assert_eq!(
        tl.state_for_time(0.5).unwrap().phase(),
        TimelinePhase::Static {
            frame: 0,
            progress: 0.5
        }
    );
    assert!(matches!(
        tl.state_for_time(1.25).unwrap().phase(),
        TimelinePhase::Transitioning {
            name: "fade",
            from: 0,
            to: 1,
            ..
        }
    ));
}
