//! Fixed-interval job loop with cooperative shutdown.
//!
//! The scheduler holds a single periodic task. `run_until_interrupted` polls
//! once per tick: it first checks the shutdown channel, then runs the task if
//! it is due, then sleeps. The first run is due one interval after
//! registration; each later run is due one interval after the previous run
//! finished. A shutdown request is only observed at the top of the loop, so an
//! in-flight task always completes.
use std::num::NonZeroU32;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, info, warn};

use crate::clock::Clock;
use crate::config::ScheduleConfig;

/// Observable lifecycle of a `Scheduler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No task registered yet.
    Idle,
    /// A task is registered and waiting for its next due time.
    Scheduled,
    /// The loop exited after an interrupt, or after the shutdown channel lost
    /// all its senders so that no interrupt could arrive any more.
    Stopped,
}

#[derive(Debug, Clone, Copy)]
struct PeriodicJob {
    interval: TimeDelta,
    next_run: NaiveDateTime,
}

pub struct Scheduler<C> {
    clock: C,
    tick: Duration,
    job: Option<PeriodicJob>,
    state: SchedulerState,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C, tick: Duration) -> Self {
        Self {
            clock,
            tick,
            job: None,
            state: SchedulerState::Idle,
        }
    }

    /// Creates a scheduler with the configured interval already registered.
    pub fn from_config(clock: C, config: &ScheduleConfig) -> Self {
        let mut scheduler = Self::new(clock, config.tick);
        scheduler.every(config.interval_minutes);
        scheduler
    }

    /// Registers the periodic task, replacing any previous registration.
    pub fn every(&mut self, minutes: NonZeroU32) {
        let interval = TimeDelta::minutes(i64::from(minutes.get()));
        self.job = Some(PeriodicJob {
            interval,
            next_run: self.clock.now() + interval,
        });
        self.state = SchedulerState::Scheduled;
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.job.map(|job| job.next_run)
    }

    /// Runs `task` if it is due and reschedules it. Returns whether it ran.
    pub fn run_pending<F: FnMut()>(&mut self, task: &mut F) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        if self.clock.now() < job.next_run {
            return false;
        }

        debug!("Running job due at {}", job.next_run);
        task();
        job.next_run = self.clock.now() + job.interval;
        debug!("Next run at {}", job.next_run);
        true
    }

    /// Polls until a message arrives on `shutdown` or its senders are gone.
    pub fn run_until_interrupted<F: FnMut()>(&mut self, shutdown: &Receiver<()>, mut task: F) {
        loop {
            match shutdown.try_recv() {
                Ok(()) => {
                    info!("Scheduler stopped by user");
                    break;
                }
                Err(TryRecvError::Disconnected) => {
                    warn!("Shutdown channel closed, stopping scheduler");
                    break;
                }
                Err(TryRecvError::Empty) => {}
            }
            self.run_pending(&mut task);
            self.clock.sleep(self.tick);
        }
        self.state = SchedulerState::Stopped;
    }
}
