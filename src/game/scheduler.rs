//! Periodic tick sources
//!
//! A session owns at most one live [`TickHandle`]. Every schedule call carries
//! a generation number that is stamped on the [`TickEvent`]s it produces, so a
//! tick that was already in flight when its source got cancelled can be told
//! apart from a tick of the current source.

use log::trace;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// One firing of a tick source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub generation: u64,
}

/// A scheduled periodic tick source that can be stopped
pub trait TickHandle {
    /// Stop firing. Calling it more than once is harmless.
    fn cancel(&mut self);
}

/// Something that can install periodic tick sources
pub trait Scheduler {
    type Handle: TickHandle;

    /// Start firing `TickEvent { generation }` every `period`, first one after one period
    fn schedule(&mut self, period: Duration, generation: u64) -> Self::Handle;
}

/// Scheduler backed by a tokio interval task feeding a channel.
///
/// The channel holds a single event, so a tick is not produced until the
/// previous one has been taken by the event loop.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::Sender<TickEvent>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiving end the event loop reads ticks from
    pub fn channel() -> (Self, mpsc::Receiver<TickEvent>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TickTask;

    /// Must be called from within a tokio runtime
    fn schedule(&mut self, period: Duration, generation: u64) -> TickTask {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if tx.send(TickEvent { generation }).await.is_err() {
                    trace!("tick receiver dropped, stopping generation {}", generation);
                    break;
                }
            }
        });

        TickTask { task: Some(task) }
    }
}

/// Handle to a running interval task. Dropping it cancels the task.
#[derive(Debug)]
pub struct TickTask {
    task: Option<JoinHandle<()>>,
}

impl TickHandle for TickTask {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// What a [`ManualScheduler`] has been asked to do so far
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScheduleLog {
    /// `(period, generation)` of every schedule call, in order
    pub scheduled: Vec<(Duration, u64)>,
    /// Generations whose handle was cancelled, in order
    pub cancelled: Vec<u64>,
}

impl ScheduleLog {
    /// Generations scheduled and not cancelled yet
    pub fn active(&self) -> Vec<u64> {
        self.scheduled
            .iter()
            .map(|&(_, generation)| generation)
            .filter(|generation| !self.cancelled.contains(generation))
            .collect()
    }
}

/// Scheduler that never fires by itself; the driver delivers ticks.
///
/// Used for headless stepping and tests. It records every schedule and cancel
/// call in a shared [`ScheduleLog`].
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    log: Rc<RefCell<ScheduleLog>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> ScheduleLog {
        self.log.borrow().clone()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&mut self, period: Duration, generation: u64) -> ManualHandle {
        self.log.borrow_mut().scheduled.push((period, generation));
        ManualHandle {
            generation,
            cancelled: false,
            log: Rc::clone(&self.log),
        }
    }
}

#[derive(Debug)]
pub struct ManualHandle {
    generation: u64,
    cancelled: bool,
    log: Rc<RefCell<ScheduleLog>>,
}

impl TickHandle for ManualHandle {
    fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.log.borrow_mut().cancelled.push(self.generation);
        }
    }
}
