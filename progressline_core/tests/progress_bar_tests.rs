//! Driving full bars through their lifecycle with a manual clock

use progressline_core::error::ValidationError;
use progressline_core::widgets::{AdaptiveEta, Bar, Percentage};
use progressline_core::*;
use progressline_test_utils::{ManualClock, SharedBuffer};
use std::sync::Arc;

fn bar_with(
    builder: ProgressBarBuilder,
    clock: &Arc<ManualClock>,
    sink: &SharedBuffer,
) -> ProgressBar<SharedBuffer> {
    builder.clock(clock.clone()).build(sink.clone()).unwrap()
}

#[test]
fn test_default_bar_with_max() {
    let clock = Arc::new(ManualClock::new());
    let sink = SharedBuffer::new();
    let mut bar = bar_with(ProgressBarBuilder::new().max_value(100.0).width(40), &clock, &sink);

    bar.start().unwrap();
    assert_eq!(
        sink.last_frame().unwrap(),
        "  0% |                  | ETA:  --:--:--"
    );

    clock.advance(10.0);
    bar.update(25.0).unwrap();
    assert_eq!(
        sink.last_frame().unwrap(),
        " 25% |#####               | ETA: 0:00:30"
    );

    clock.advance(5.0);
    bar.finish().unwrap();
    assert_eq!(
        sink.last_frame().unwrap(),
        "100% |###################| Time: 0:00:15"
    );
    assert!(sink.contents().ends_with('\n'));
    assert_eq!(sink.frames().len(), 3);
}

#[test]
fn test_default_bar_without_max() {
    let clock = Arc::new(ManualClock::new());
    let sink = SharedBuffer::new();
    let mut bar = bar_with(ProgressBarBuilder::new(), &clock, &sink);

    bar.start().unwrap();
    assert_eq!(sink.last_frame().unwrap(), "| 0 Elapsed Time: 0:00:00");

    clock.advance(1.0);
    bar.update(5.0).unwrap();
    assert_eq!(sink.last_frame().unwrap(), "/ 5 Elapsed Time: 0:00:01");

    clock.advance(1.0);
    bar.update(9.0).unwrap();
    assert_eq!(sink.last_frame().unwrap(), "- 9 Elapsed Time: 0:00:02");

    bar.finish().unwrap();
    assert_eq!(sink.last_frame().unwrap(), "| 9 Elapsed Time: 0:00:02");
    assert_eq!(bar.state(), BarState::Finished);
}

#[test]
fn test_adaptive_eta_tracks_recent_rate() {
    let clock = Arc::new(ManualClock::new());
    let sink = SharedBuffer::new();
    let builder = ProgressBarBuilder::new()
        .max_value(100.0)
        .widget(AdaptiveEta::new().with_samples(2));
    let mut bar = bar_with(builder, &clock, &sink);

    bar.start().unwrap();
    clock.advance(100.0);
    bar.update(10.0).unwrap();
    assert_eq!(sink.last_frame().unwrap(), "ETA: 0:15:00");

    clock.advance(1.0);
    bar.update(20.0).unwrap();
    assert_eq!(sink.last_frame().unwrap(), "ETA: 0:00:09");
}

#[test]
fn test_widgets_shared_between_bars() {
    let widgets: Vec<Widget> = vec![
        Percentage::new().into(),
        AdaptiveEta::new().into(),
        Bar::new().into(),
    ];
    let clock = Arc::new(ManualClock::new());
    let first_sink = SharedBuffer::new();
    let second_sink = SharedBuffer::new();

    let builder = ProgressBarBuilder::new().max_value(10.0).width(30);
    let mut first = bar_with(builder.clone().widgets(widgets.clone()), &clock, &first_sink);
    let mut second = bar_with(builder.widgets(widgets), &clock, &second_sink);

    first.start().unwrap();
    second.start().unwrap();
    clock.advance(2.0);
    first.update(4.0).unwrap();

    assert_eq!(first.extra().samples("AdaptiveEta_sample_buffer").unwrap().len(), 2);
    assert_eq!(second.extra().samples("AdaptiveEta_sample_buffer").unwrap().len(), 1);
    assert_ne!(first_sink.last_frame(), second_sink.last_frame());
}

#[test]
fn test_range_errors() {
    let err = ProgressBarBuilder::new()
        .min_value(5.0)
        .max_value(1.0)
        .build(SharedBuffer::new())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::InvalidRange { .. })
    ));

    let sink = SharedBuffer::new();
    let mut bar = bar_with(
        ProgressBarBuilder::new().min_value(5.0).max_value(10.0),
        &Arc::new(ManualClock::new()),
        &sink,
    );
    assert!(bar.update(4.0).is_err());
    assert!(bar.update(11.0).is_err());
    assert_eq!(bar.state(), BarState::NotStarted);
    assert!(sink.contents().is_empty());
}

#[test]
fn test_snapshot_reflects_driver_state() {
    let clock = Arc::new(ManualClock::new());
    let mut bar = bar_with(
        ProgressBarBuilder::new().max_value(50.0),
        &clock,
        &SharedBuffer::new(),
    );

    bar.start().unwrap();
    clock.advance(90.0);
    bar.update(20.0).unwrap();

    let snapshot = bar.snapshot();
    assert_eq!(snapshot.state(), BarState::Running);
    assert_eq!(snapshot.previous_value, Some(0.0));
    assert_eq!(snapshot.percentage, Some(40.0));
    assert_eq!(snapshot.updates, 1);
    assert_eq!(snapshot.elapsed.minutes, 1);
    assert_eq!(snapshot.elapsed.seconds, 30);
}
