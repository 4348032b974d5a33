// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Countdown latches.
//!
//! A latch is created with the number of completions it expects.  Each
//! piece of work holds a [`Countdown`] handle and reports through it
//! exactly once; the owner of the [`Latch`] blocks until every expected
//! report has come in.  Reports carry a value, so the work can hand its
//! results back through the same path that signals it is done.
//!
//! Two of these coordinate a render: one per frame, counted down by
//! each row band, and one per run, counted down by each frame.

use crossbeam::channel::{self, Receiver, Sender};
use failure::Error;

use crate::error::RenderError;

/// The waiting side of a countdown.
#[derive(Debug)]
pub struct Latch<T> {
    remaining: usize,
    receiver: Receiver<T>,
}

/// The reporting side of a countdown.  Clone one for every piece of work.
#[derive(Debug)]
pub struct Countdown<T> {
    sender: Sender<T>,
}

impl<T> Clone for Countdown<T> {
    fn clone(&self) -> Self {
        Countdown {
            sender: self.sender.clone(),
        }
    }
}

impl<T> Latch<T> {
    /// A latch expecting `count` reports, and the handle to report with.
    pub fn new(count: usize) -> (Latch<T>, Countdown<T>) {
        let (sender, receiver) = channel::unbounded();
        (
            Latch {
                remaining: count,
                receiver,
            },
            Countdown { sender },
        )
    }

    /// How many reports are still outstanding.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Block until every report is in, handing each to `on_report` as it
    /// arrives.  Stops at the first error `on_report` returns.
    ///
    /// If every [`Countdown`] handle is dropped before the count reaches
    /// zero the latch can never open, and this fails instead of hanging.
    pub fn wait_each<F>(mut self, mut on_report: F) -> Result<(), Error>
    where
        F: FnMut(T) -> Result<(), Error>,
    {
        while self.remaining > 0 {
            let report = self.receiver.recv().map_err(|_| RenderError::Abandoned {
                remaining: self.remaining,
            })?;
            self.remaining -= 1;
            on_report(report)?;
        }
        Ok(())
    }

    /// Block until every report is in, and return them in arrival order.
    pub fn wait(self) -> Result<Vec<T>, Error> {
        let mut reports = Vec::with_capacity(self.remaining);
        self.wait_each(|report| {
            reports.push(report);
            Ok(())
        })?;
        Ok(reports)
    }
}

impl<T> Countdown<T> {
    /// Report one completion.  If the latch has already been dropped
    /// nobody is listening, and the report is discarded.
    pub fn count_down(&self, report: T) {
        let _ = self.sender.send(report);
    }
}
