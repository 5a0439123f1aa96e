//! Coalesce-until-next-tick job slot.
//!
//! Input can arrive many times per frame. Work requested between two render
//! ticks collapses into one pending job; a newer request supersedes the older
//! one, and a cancel drops it outright.

use std::fmt::Debug;

use tracing::trace;

#[derive(Debug)]
pub struct FrameScheduler<J> {
    pending: Option<J>,
    superseded: u64,
}

impl<J> Default for FrameScheduler<J> {
    fn default() -> Self {
        Self {
            pending: None,
            superseded: 0,
        }
    }
}

impl<J: Debug> FrameScheduler<J> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `job` for the next tick, returning the job it superseded.
    pub fn request(&mut self, job: J) -> Option<J> {
        let previous = self.pending.replace(job);
        if let Some(prev) = &previous {
            self.superseded += 1;
            trace!(?prev, "Pending frame job superseded");
        }
        previous
    }

    /// Drop the pending job without running it.
    pub fn cancel(&mut self) -> Option<J> {
        let cancelled = self.pending.take();
        if let Some(job) = &cancelled {
            trace!(?job, "Pending frame job cancelled");
        }
        cancelled
    }

    /// Hand over the pending job at a render tick.
    pub fn take_due(&mut self) -> Option<J> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Requests absorbed by a later request since construction.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}
