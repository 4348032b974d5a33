// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two-tier worker pool.
//!
//! Rendering an animation means rendering many frames, and rendering a
//! frame means computing many rows, and the cost of a row depends
//! heavily on how much of the set's boundary it crosses.  Rather than
//! giving each thread a fixed slice of the image, we keep two queues:
//!
//! - frame workers take whole frames off the frame queue, cut them into
//!   row bands, and wait for the bands to come back;
//! - compute workers take row bands, from whichever frames are in
//!   flight, off a single shared compute queue.
//!
//! The compute workers never idle while there is a band anywhere to be
//! computed, and having several frames in flight keeps the compute queue
//! from running dry while a frame is being assembled and written.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{self, Receiver, Sender};
use failure::Error;
use log::{debug, info, warn};

use crate::band::RowRangeUnit;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::frame::FrameUnit;
use crate::latch::{Countdown, Latch};
use crate::sequence::FrameParameters;
use crate::sink::FrameSink;

type FrameOutcome = Result<u32, Error>;

/// Owns a validated configuration and the full list of frame
/// parameters, and runs the worker pools that render them.
#[derive(Debug)]
pub struct Scheduler {
    config: RenderConfig,
    frames: Vec<FrameParameters>,
}

impl Scheduler {
    /// Validate `config` and plan out every frame of the zoom.
    pub fn new(config: RenderConfig) -> Result<Scheduler, Error> {
        config.validate()?;
        let mut frames = config.sequence()?.collect::<Result<Vec<_>, _>>()?;
        let frames = frames.split_off(config.start_frame as usize);
        Ok(Scheduler { config, frames })
    }

    /// The configuration being rendered.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The frames that will be rendered, in order.
    pub fn frames(&self) -> &[FrameParameters] {
        &self.frames
    }

    /// Render every frame into `sink`, returning how many were written.
    ///
    /// The first frame that fails stops the run: frames still waiting in
    /// the queue are dropped, the workers are joined, and that frame's
    /// error is returned.
    pub fn run<S>(&self, sink: &S) -> Result<usize, Error>
    where
        S: FrameSink + ?Sized,
    {
        let compute_workers = self.config.compute_worker_count();
        let frame_workers = self.config.frame_worker_count();
        let width = self.config.width();
        let height = self.config.height;
        let band_rows = self.config.band_rows;
        info!(
            "rendering {} frames of {}x{} on {} frame and {} compute workers",
            self.frames.len(),
            width,
            height,
            frame_workers,
            compute_workers
        );

        let (frame_queue, frame_jobs) = channel::bounded::<FrameUnit>(self.frames.len().max(1));
        let (compute_queue, compute_jobs) = channel::unbounded::<RowRangeUnit>();
        let (finished, reported) = Latch::<FrameOutcome>::new(self.frames.len());
        let aborted = AtomicBool::new(false);

        let result = crossbeam::scope(|spawner| {
            for _ in 0..compute_workers {
                let jobs = compute_jobs.clone();
                spawner.spawn(move |_| compute_worker(jobs));
            }
            for _ in 0..frame_workers {
                let jobs = frame_jobs.clone();
                let compute = compute_queue.clone();
                let reported = reported.clone();
                let aborted = &aborted;
                spawner.spawn(move |_| frame_worker(jobs, compute, sink, reported, aborted));
            }
            // From here on the workers hold the only handles, so the queues
            // close as soon as their producers are done.
            drop(compute_queue);
            drop(reported);

            for params in &self.frames {
                let unit = FrameUnit::new(*params, width, height, band_rows);
                if frame_queue.send(unit).is_err() {
                    break;
                }
            }
            drop(frame_queue);

            let mut written = 0;
            let outcome = finished.wait_each(|report| {
                let index = report?;
                debug!("frame {} finished", index);
                written += 1;
                Ok(())
            });
            if outcome.is_err() {
                warn!("aborting the run; queued frames will be skipped");
                aborted.store(true, Ordering::SeqCst);
            }
            outcome.map(|()| written)
        })
        .map_err(|_| RenderError::WorkerPanicked)?;

        let written = result?;
        info!("{} frames written", written);
        Ok(written)
    }
}

fn compute_worker(jobs: Receiver<RowRangeUnit>) {
    for job in jobs.iter() {
        job.run();
    }
}

fn frame_worker<S>(
    jobs: Receiver<FrameUnit>,
    compute: Sender<RowRangeUnit>,
    sink: &S,
    reported: Countdown<FrameOutcome>,
    aborted: &AtomicBool,
) where
    S: FrameSink + ?Sized,
{
    for job in jobs.iter() {
        if aborted.load(Ordering::SeqCst) {
            continue;
        }
        let index = job.params().index;
        let outcome = job.render(&compute, sink).map(|()| index);
        reported.count_down(outcome);
    }
}
