use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pistonite_cobalt as cobalt;

use cobalt::co::{self, Coroutine, Ownership, Resume, SelfHandle, SendSelf, Step};
use cobalt::host::{Timeline, Timer};

type Log = Rc<RefCell<Vec<String>>>;

/// A coroutine that records what it was resumed with, and ticks
/// on the timeline `ticks` times before completing
struct Ticker {
    log: Log,
    timeline: Timeline,
    ticks: usize,
    count: usize,
    this: Option<SelfHandle<()>>,
}

impl Coroutine for Ticker {
    type Input = ();

    fn resume(&mut self, resume: Resume<()>) -> cobalt::Result<Step> {
        self.log.borrow_mut().push(format!("{resume:?}"));
        match resume {
            Resume::Start => return Ok(Step::Yield),
            Resume::Handle(handle) => self.this = Some(handle),
            _ => {}
        }
        if self.count == self.ticks {
            return Ok(Step::Complete);
        }
        self.count += 1;
        if let Some(this) = &self.this {
            self.timeline
                .schedule_after(Duration::from_millis(10), Box::new(this.next_callback()));
        }
        Ok(Step::Yield)
    }
}

fn ticker(log: Log, timeline: Timeline, ticks: usize) -> impl Fn() -> Ticker + 'static {
    move || Ticker {
        log: Rc::clone(&log),
        timeline: timeline.clone(),
        ticks,
        count: 0,
        this: None,
    }
}

#[test]
fn test_handshake_order() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    let task = SendSelf::new(ticker(Rc::clone(&log), timeline.clone(), 2)).trigger()?;
    assert_eq!(*log.borrow(), vec!["Start", "Handle(Weak)"]);
    assert_eq!(task.ownership(), Ownership::Weak);
    assert!(!task.is_finished());

    timeline.run_until_idle(10)?;
    assert_eq!(*log.borrow(), vec!["Start", "Handle(Weak)", "Next", "Next"]);
    assert!(task.is_finished());
    Ok(())
}

#[test]
fn test_strong_handle_is_delivered() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    let task = SendSelf::new(ticker(Rc::clone(&log), timeline.clone(), 1))
        .strong()
        .trigger()?;
    assert_eq!(*log.borrow(), vec!["Start", "Handle(Strong)"]);
    assert_eq!(task.ownership(), Ownership::Strong);
    Ok(())
}

#[test]
fn test_weak_coroutine_is_dropped_with_task() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    let task = SendSelf::new(ticker(Rc::clone(&log), timeline.clone(), 5)).trigger()?;
    let handle = task.handle();
    assert!(handle.is_alive());
    drop(task);
    assert!(!handle.is_alive());

    // the pending callback still fires, but resumes nothing
    assert_eq!(timeline.run_until_idle(10)?, 1);
    assert_eq!(*log.borrow(), vec!["Start", "Handle(Weak)"]);
    Ok(())
}

#[test]
fn test_strong_coroutine_outlives_task() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    let task = SendSelf::new(ticker(Rc::clone(&log), timeline.clone(), 3))
        .strong()
        .trigger()?;
    let handle = task.handle();
    drop(task);
    assert!(handle.is_alive());

    assert_eq!(timeline.run_until_idle(10)?, 3);
    assert_eq!(
        *log.borrow(),
        vec!["Start", "Handle(Strong)", "Next", "Next", "Next"]
    );
    // completing releases the coroutine
    assert!(!handle.is_alive());
    Ok(())
}

#[test]
fn test_complete_during_handshake_is_error() {
    let calls = Rc::new(RefCell::new(0));
    let adapter = {
        let calls = Rc::clone(&calls);
        co::send_self(move || {
            let calls = Rc::clone(&calls);
            co::from_fn(move |_: Resume<()>| {
                *calls.borrow_mut() += 1;
                Ok(Step::Complete)
            })
        })
    };
    let err = adapter.trigger().unwrap_err();
    assert!(err.to_string().contains("completed during handshake"), "{err}");
    // the handle is never delivered
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_complete_after_handle_is_error() {
    let adapter = co::send_self(|| {
        co::from_fn(|resume: Resume<()>| match resume {
            Resume::Start => Ok(Step::Yield),
            _ => Ok(Step::Complete),
        })
    });
    let err = adapter.trigger().unwrap_err();
    assert!(
        err.to_string().contains("must suspend at least twice"),
        "{err}"
    );
}

#[test]
fn test_trigger_starts_new_instances() -> cobalt::Result<()> {
    let log = Log::default();
    let timeline = Timeline::new();
    let trigger = SendSelf::new(ticker(Rc::clone(&log), timeline.clone(), 1)).into_trigger();
    let first = trigger()?;
    let second = trigger()?;
    assert_ne!(first.id(), second.id());
    assert_eq!(timeline.pending(), 2);
    timeline.run_until_idle(10)?;
    assert!(first.is_finished());
    assert!(second.is_finished());
    Ok(())
}

#[test]
fn test_send_values() -> cobalt::Result<()> {
    let total = Rc::new(RefCell::new(0));
    let adapter = {
        let total = Rc::clone(&total);
        SendSelf::new(move || {
            let total = Rc::clone(&total);
            co::from_fn(move |resume: Resume<u32>| {
                if let Resume::Send(x) = resume {
                    *total.borrow_mut() += x;
                }
                Ok(Step::Yield)
            })
        })
    };
    let task = adapter.trigger()?;
    let callback = task.handle().send_callback();
    task.handle().send(5)?;
    callback(7)?;
    assert_eq!(*total.borrow(), 12);
    Ok(())
}

#[test]
fn test_error_finishes_coroutine() -> cobalt::Result<()> {
    let adapter = SendSelf::new(|| {
        co::from_fn(|resume: Resume<()>| match resume {
            Resume::Next => cobalt::bail!("host went away"),
            _ => Ok(Step::Yield),
        })
    });
    let task = adapter.trigger()?;
    let err = task.handle().next().unwrap_err();
    assert_eq!(err.to_string(), "host went away");
    assert!(task.is_finished());
    // a weak handle to a finished coroutine is a no-op
    task.handle().next()?;
    Ok(())
}

#[test]
fn test_strong_resume_after_finish_is_error() -> cobalt::Result<()> {
    let saved: Rc<RefCell<Option<SelfHandle<()>>>> = Default::default();
    let adapter = {
        let saved = Rc::clone(&saved);
        SendSelf::new(move || {
            let saved = Rc::clone(&saved);
            co::from_fn(move |resume: Resume<()>| match resume {
                Resume::Start => Ok(Step::Yield),
                Resume::Handle(h) => {
                    *saved.borrow_mut() = Some(h);
                    Ok(Step::Yield)
                }
                _ => Ok(Step::Complete),
            })
        })
        .strong()
    };
    let _task = adapter.trigger()?;
    let handle = saved.borrow_mut().take().expect("handle was not delivered");
    assert_eq!(handle.ownership(), Ownership::Strong);
    handle.next()?;
    let err = handle.next().unwrap_err();
    assert!(err.to_string().contains("after it has finished"), "{err}");
    Ok(())
}

#[test]
fn test_reentrant_resume_is_error() -> cobalt::Result<()> {
    let outcome: Rc<RefCell<Option<String>>> = Default::default();
    let adapter = {
        let outcome = Rc::clone(&outcome);
        SendSelf::new(move || {
            let outcome = Rc::clone(&outcome);
            let mut this = None;
            co::from_fn(move |resume: Resume<()>| {
                match resume {
                    Resume::Handle(h) => this = Some(h),
                    Resume::Next => {
                        if let Some(this) = &this {
                            let result = this.next();
                            *outcome.borrow_mut() = result.err().map(|e| e.to_string());
                        }
                    }
                    _ => {}
                }
                Ok(Step::Yield)
            })
        })
    };
    let task = adapter.trigger()?;
    task.handle().next()?;
    let message = outcome.borrow().clone().unwrap_or_default();
    assert!(message.contains("already running"), "{message}");
    Ok(())
}
