use std::rc::Rc;
use std::time::Duration;

use crate::Atomic;
use crate::co::{Coroutine, Ownership, Resume, SelfHandle, SendSelf, Step, Task};
use crate::host::{StatusSink, StatusTarget, Timer};
use crate::pre::*;
use crate::StatusConfig;

use super::TerminationFlag;

/// Lifecycle of a status loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Created, self handle not delivered yet
    Idle,
    /// Rendering frames
    Running,
    /// The flag was observed, the finalizer is running
    Finalizing,
    /// Done. Nothing is rendered or scheduled anymore
    Stopped,
}
impl From<u8> for Phase {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Finalizing,
            _ => Self::Stopped,
        }
    }
}
impl From<Phase> for u8 {
    fn from(value: Phase) -> Self {
        value as Self
    }
}

/// Start building a status loop that cycles through `frames`.
///
/// See [`StatusLoopBuilder`].
pub fn animate<S: Into<String>>(frames: impl IntoIterator<Item = S>) -> StatusLoopBuilder {
    StatusLoopBuilder {
        frames: frames.into_iter().map(Into::into).collect(),
        ..StatusLoopBuilder::from_config(&StatusConfig::default())
    }
}

/// Builder for an animated status loop.
///
/// The loop renders the next frame on the target every `period`, wrapping
/// around at the end, until its [`TerminationFlag`] is set:
/// - The first frame is rendered right away, when the loop is started.
/// - Each render schedules exactly one resumption, `period` later.
///   There is never more than one pending callback for a loop.
/// - The flag is checked every time the loop is resumed, before rendering.
///   When it's set, the loop runs the flag's finalizer (if any), and stops
///   without rendering or scheduling anything else.
#[derive(Debug, Clone)]
pub struct StatusLoopBuilder {
    frames: Vec<String>,
    period: Duration,
    target: StatusTarget,
    ownership: Ownership,
}

impl StatusLoopBuilder {
    /// Create a builder from config
    pub fn from_config(config: &StatusConfig) -> Self {
        Self {
            frames: config.frames.clone(),
            period: config.period(),
            target: StatusTarget::Global,
            ownership: config.ownership,
        }
    }

    /// Set how long each frame is displayed. Must be positive
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Set where the frames are rendered. Default is the global status area
    pub fn target(mut self, target: StatusTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the ownership of the loop's self handle. Default is weak.
    ///
    /// With weak ownership, the loop freezes (silently) once the returned
    /// [`StatusLoop`] is dropped. With strong ownership, the loop keeps
    /// running until the flag is set, whether or not the `StatusLoop` is kept.
    pub fn ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Shorthand for `.ownership(Ownership::Strong)`
    pub fn strong(self) -> Self {
        self.ownership(Ownership::Strong)
    }

    /// Start the loop, rendering the first frame right away.
    ///
    /// Fails if there are no frames or the period is zero, or if the
    /// first render fails.
    pub fn start(
        self,
        flag: &TerminationFlag,
        timer: Rc<dyn Timer>,
        sink: Rc<dyn StatusSink>,
    ) -> crate::Result<StatusLoop> {
        crate::ensure!(!self.frames.is_empty(), "status loop needs at least one frame")?;
        crate::ensure!(!self.period.is_zero(), "status loop period must be positive")?;

        let phase = Rc::new(Atomic::new_u8(Phase::Idle as u8));
        let target = self.target.clone();
        let adapter = {
            let flag = flag.clone();
            let phase = Rc::clone(&phase);
            let Self {
                frames,
                period,
                target,
                ownership,
            } = self;
            SendSelf::new(move || Animation {
                frames: frames.clone(),
                period,
                target: target.clone(),
                flag: flag.clone(),
                timer: Rc::clone(&timer),
                sink: Rc::clone(&sink),
                phase: Rc::clone(&phase),
                this: None,
                cursor: 0,
            })
            .ownership(ownership)
        };
        let task = crate::check!(adapter.trigger(), "failed to start status loop on {target}")?;
        if phase.get() == Phase::Stopped {
            // stopped during the handshake, let the coroutine complete now
            task.handle().next()?;
        }
        Ok(StatusLoop {
            task,
            flag: flag.clone(),
            phase,
            target,
        })
    }
}

/// A running status loop, returned by [`StatusLoopBuilder::start`].
///
/// With weak ownership (the default), this must be kept for the loop
/// to keep running.
pub struct StatusLoop {
    task: Task<()>,
    flag: TerminationFlag,
    phase: Rc<Atomic<u8, Phase>>,
    target: StatusTarget,
}

impl std::fmt::Debug for StatusLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusLoop")
            .field("id", &self.task.id())
            .field("target", &self.target)
            .field("phase", &self.phase())
            .field("ownership", &self.task.ownership())
            .finish()
    }
}

impl StatusLoop {
    /// Current phase of the loop
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// If the loop has stopped (the flag was observed and the finalizer ran,
    /// or rendering failed). Once stopped, the coroutine behind the loop
    /// has also finished, see [`task`](Self::task).
    pub fn is_stopped(&self) -> bool {
        self.phase() == Phase::Stopped
    }

    /// The coroutine running the loop
    pub fn task(&self) -> &Task<()> {
        &self.task
    }

    /// Where the loop renders
    pub fn target(&self) -> &StatusTarget {
        &self.target
    }

    /// The flag the loop was started with
    pub fn flag(&self) -> &TerminationFlag {
        &self.flag
    }

    /// Request the loop to stop. Same as setting the flag
    pub fn stop(&self) {
        self.flag.stop()
    }

    /// Request the loop to stop, and run `finalizer` after its last render.
    /// Same as [`TerminationFlag::stop_with`]
    pub fn stop_then(&self, finalizer: impl FnOnce() -> crate::Result<()> + 'static) {
        self.flag.stop_with(finalizer)
    }
}

/// The loop itself
struct Animation {
    frames: Vec<String>,
    period: Duration,
    target: StatusTarget,
    flag: TerminationFlag,
    timer: Rc<dyn Timer>,
    sink: Rc<dyn StatusSink>,
    phase: Rc<Atomic<u8, Phase>>,
    this: Option<SelfHandle<()>>,
    cursor: usize,
}

impl Coroutine for Animation {
    type Input = ();

    fn resume(&mut self, resume: Resume<()>) -> crate::Result<Step> {
        let handshake = match resume {
            Resume::Start => return Ok(Step::Yield),
            Resume::Handle(this) => {
                self.this = Some(this);
                self.phase.set(Phase::Running);
                true
            }
            Resume::Next | Resume::Send(()) => {
                if self.phase.get() == Phase::Stopped {
                    return Ok(Step::Complete);
                }
                false
            }
        };
        if self.flag.is_set() {
            self.finish()?;
            if handshake {
                // the adapter needs a second suspension; stay suspended
                // with nothing scheduled instead
                return Ok(Step::Yield);
            }
            return Ok(Step::Complete);
        }
        if let Err(e) = self.render_and_schedule() {
            self.this = None;
            self.phase.set(Phase::Stopped);
            return Err(e);
        }
        Ok(Step::Yield)
    }
}

impl Animation {
    fn render_and_schedule(&mut self) -> crate::Result<()> {
        let Some(this) = &self.this else {
            crate::bail!("status loop resumed before receiving its handle");
        };
        let frame = &self.frames[self.cursor];
        crate::check!(
            self.sink.render_status(&self.target, frame),
            "failed to render status frame {} on {}",
            self.cursor,
            self.target
        )?;
        self.cursor = (self.cursor + 1) % self.frames.len();
        self.timer
            .schedule_after(self.period, Box::new(this.next_callback()));
        Ok(())
    }

    fn finish(&mut self) -> crate::Result<()> {
        crate::debug!("status loop on {}: stopping", self.target);
        self.phase.set(Phase::Finalizing);
        // dropping our own handle breaks the cycle of a strong loop
        self.this = None;
        let result = match self.flag.take_finalizer() {
            Some(finalizer) => finalizer(),
            None => Ok(()),
        };
        self.phase.set(Phase::Stopped);
        crate::check!(result, "status loop finalizer failed on {}", self.target)
    }
}
