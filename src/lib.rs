#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot zoom renderer
//!
//! Renders an animation that dives into the Mandelbrot set: a sequence
//! of frames, each one looking at a slightly smaller window around a
//! target point, with an iteration budget that grows as the window
//! shrinks.  Each pixel is colored by how quickly its point escapes,
//! cycling through the hue wheel; points that never escape stay black.
//!
//! The expensive pixels are the ones near the boundary of the set, and
//! they are spread unevenly through every frame.  To keep every core
//! busy the work is split twice: frames are handed to frame workers,
//! which cut them into bands of rows, and the bands of every frame in
//! flight go onto one queue shared by all the compute workers.  A frame
//! is only written out once every one of its bands has come back.
//!
//! ```no_run
//! use mandelzoom::{PngSink, RenderConfig, Scheduler};
//!
//! # fn main() -> Result<(), failure::Error> {
//! let config = RenderConfig {
//!     total_frames: 10,
//!     ..RenderConfig::default()
//! };
//! let sink = PngSink::new(&config.output)?;
//! Scheduler::new(config)?.run(&sink)?;
//! # Ok(())
//! # }
//! ```

pub mod band;
pub mod color;
pub mod config;
pub mod error;
pub mod escape;
pub mod frame;
pub mod latch;
pub mod planes;
pub mod scheduler;
pub mod sequence;
pub mod sink;

pub use config::RenderConfig;
pub use error::RenderError;
pub use frame::RenderedFrame;
pub use planes::ViewBounds;
pub use scheduler::Scheduler;
pub use sequence::{FrameParameters, ZoomSequence};
pub use sink::{FrameSink, MemorySink, PngSink};
