// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The failures a render can run into.  None of them come from the
//! arithmetic, which cannot fail once the parameters are validated.

use failure::Fail;

/// Errors raised by the renderer itself.  Sink I/O errors are carried
/// as `failure::Error` with context attached, so they don't appear here.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The lengths of a view must be finite and strictly positive.
    #[fail(
        display = "view bounds must have positive, finite lengths (got {} by {})",
        real, imag
    )]
    InvalidBounds {
        /// Length along the real axis.
        real: f64,
        /// Length along the imaginary axis.
        imag: f64,
    },

    /// A configuration value is outside of its legal range.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// The output directory has to exist before we start rendering.
    #[fail(display = "output directory {} does not exist", _0)]
    MissingOutputDirectory(String),

    /// Every handle to a latch went away before it reached zero, which
    /// only happens when a worker died mid-job.
    #[fail(display = "{} completions never arrived", remaining)]
    Abandoned {
        /// How many completions were still outstanding.
        remaining: usize,
    },

    /// The bands that came back for a frame did not tile it.
    #[fail(
        display = "frame {} is not fully covered: expected row {}, found row {}",
        index, expected, found
    )]
    IncompleteFrame {
        /// The frame being assembled.
        index: u32,
        /// The row the next band should have started on.
        expected: u32,
        /// The row it actually started on.
        found: u32,
    },

    /// The compute queue was closed while a frame was still dispatching.
    #[fail(display = "the compute queue closed before frame {} was dispatched", _0)]
    ComputeQueueClosed(u32),

    /// A worker thread panicked.
    #[fail(display = "a worker thread panicked")]
    WorkerPanicked,
}
