use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pistonite_cobalt as cobalt;

use cobalt::host::{Timeline, Timer};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn push(log: &Log, name: &'static str) -> cobalt::host::Callback {
    let log = Rc::clone(log);
    Box::new(move || {
        log.borrow_mut().push(name);
        Ok(())
    })
}

fn ms(x: u64) -> Duration {
    Duration::from_millis(x)
}

#[test]
fn test_order_by_due_then_schedule() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    timeline.schedule_after(ms(20), push(&log, "c"));
    timeline.schedule_after(ms(10), push(&log, "a"));
    timeline.schedule_after(ms(10), push(&log, "b"));
    timeline.schedule_after(ms(30), push(&log, "d"));
    assert_eq!(timeline.next_due(), Some(ms(10)));

    assert_eq!(timeline.advance(ms(20))?, 3);
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    assert_eq!(timeline.now(), ms(20));
    assert_eq!(timeline.pending(), 1);
    Ok(())
}

#[test]
fn test_callback_can_schedule() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    {
        let log = Rc::clone(&log);
        let inner = timeline.clone();
        timeline.schedule_after(
            ms(10),
            Box::new(move || {
                log.borrow_mut().push("outer");
                // relative to the due time of this callback
                inner.schedule_after(ms(5), push(&log, "inner"));
                Ok(())
            }),
        );
    }
    timeline.advance(ms(14))?;
    assert_eq!(*log.borrow(), vec!["outer"]);
    timeline.advance(ms(1))?;
    assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    Ok(())
}

#[test]
fn test_cannot_go_back() -> cobalt::Result<()> {
    let timeline = Timeline::new();
    timeline.advance(ms(100))?;
    let err = timeline.advance_to(ms(50)).unwrap_err();
    assert!(err.to_string().contains("cannot move the timeline back"), "{err}");
    assert_eq!(timeline.now(), ms(100));
    Ok(())
}

#[test]
fn test_error_stops_at_failed_callback() {
    let log = Log::default();
    let timeline = Timeline::new();
    timeline.schedule_after(ms(10), push(&log, "a"));
    timeline.schedule_after(ms(20), Box::new(|| cobalt::bail!("boom")));
    timeline.schedule_after(ms(30), push(&log, "c"));

    let err = timeline.advance(ms(100)).unwrap_err();
    assert_eq!(err.root_cause().to_string(), "boom");
    assert_eq!(timeline.now(), ms(20));
    assert_eq!(*log.borrow(), vec!["a"]);
    assert_eq!(timeline.pending(), 1);
}

#[test]
fn test_run_until_idle_limit() -> cobalt::Result<()> {
    fn forever(timeline: Timeline) -> cobalt::host::Callback {
        Box::new(move || {
            timeline.schedule_after(ms(1), forever(timeline.clone()));
            Ok(())
        })
    }
    let timeline = Timeline::new();
    timeline.schedule_after(ms(1), forever(timeline.clone()));
    let err = timeline.run_until_idle(5).unwrap_err();
    assert!(err.to_string().contains("still busy after running 5"), "{err}");
    assert_eq!(timeline.now(), ms(5));

    let idle = Timeline::new();
    assert_eq!(idle.run_until_idle(0)?, 0);
    Ok(())
}

#[test]
fn test_nested_advance_keeps_clock_forward() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    {
        let inner = timeline.clone();
        timeline.schedule_after(
            ms(50),
            Box::new(move || {
                inner.advance(ms(200))?;
                cobalt::Ok(())
            }),
        );
    }
    timeline.schedule_after(ms(80), push(&log, "a"));
    timeline.schedule_after(ms(300), push(&log, "b"));

    // the callback at 50ms runs the one at 80ms itself
    assert_eq!(timeline.advance_to(ms(100))?, 1);
    assert_eq!(timeline.now(), ms(250));
    assert_eq!(*log.borrow(), vec!["a"]);
    let err = timeline.advance_to(ms(100)).unwrap_err();
    assert!(err.to_string().contains("cannot move the timeline back"), "{err}");
    Ok(())
}

#[test]
fn test_run_until_idle_counts_same_due_callbacks() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    for name in ["a", "b", "c", "d", "e"] {
        timeline.schedule_after(ms(10), push(&log, name));
    }
    let err = timeline.run_until_idle(1).unwrap_err();
    assert!(err.to_string().contains("still busy after running 1"), "{err}");
    assert_eq!(*log.borrow(), vec!["a"]);
    assert_eq!(timeline.pending(), 4);

    assert_eq!(timeline.run_until_idle(4)?, 4);
    assert_eq!(*log.borrow(), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(timeline.now(), ms(10));
    Ok(())
}
