// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row bands: the unit of work the compute workers share.
//!
//! A frame is cut into horizontal bands of consecutive rows.  The bands
//! of a frame never overlap, and each one owns the bytes of its rows
//! outright while it is being computed, so any number of them can run
//! at once without stepping on each other.  When a band is done its rows
//! go back to the frame through the frame's latch.

use std::ops::Range;
use std::sync::Arc;

use num::Complex;

use crate::color::{color_for, BACKGROUND};
use crate::escape::escape_time;
use crate::latch::Countdown;
use crate::planes::PlaneMapper;
use crate::sequence::FrameParameters;

/// Split `[0, height)` into consecutive ranges of `band_rows` rows.  The
/// last range takes whatever is left over.
pub fn row_bands(height: u32, band_rows: u32) -> Vec<Range<u32>> {
    assert!(band_rows > 0, "row bands must hold at least one row");
    (0..height)
        .step_by(band_rows as usize)
        .map(|start| start..height.min(start.saturating_add(band_rows)))
        .collect()
}

/// What every band of one frame reads from: the parameters, the plane
/// mapping, and the real-axis value of each column.
#[derive(Debug)]
pub struct FrameCanvas {
    /// The frame's parameters.
    pub params: FrameParameters,
    /// Pixel to complex mapping for the frame.
    pub plane: PlaneMapper,
    /// Real-axis value of every column, computed once for the frame.
    pub column_reals: Vec<f64>,
}

impl FrameCanvas {
    /// Build the canvas for a frame, including its column table.
    pub fn new(params: FrameParameters, plane: PlaneMapper) -> FrameCanvas {
        let column_reals = plane.column_reals();
        FrameCanvas {
            params,
            plane,
            column_reals,
        }
    }
}

/// A band whose rows have been computed.
#[derive(Debug)]
pub struct FinishedBand {
    /// The first row of the band.
    pub start_row: u32,
    /// RGBA bytes for the band's rows, top to bottom.
    pub pixels: Vec<u8>,
}

/// One band of rows from one frame, waiting for a compute worker.
pub struct RowRangeUnit {
    canvas: Arc<FrameCanvas>,
    rows: Range<u32>,
    pixels: Vec<u8>,
    done: Countdown<FinishedBand>,
}

impl RowRangeUnit {
    /// Allocate the band's rows, all set to the background color.
    pub fn new(
        canvas: Arc<FrameCanvas>,
        rows: Range<u32>,
        done: Countdown<FinishedBand>,
    ) -> RowRangeUnit {
        let len = (rows.end - rows.start) as usize * canvas.plane.stride();
        let pixels = BACKGROUND.iter().cloned().cycle().take(len).collect();
        RowRangeUnit {
            canvas,
            rows,
            pixels,
            done,
        }
    }

    /// The rows this unit covers.
    pub fn rows(&self) -> Range<u32> {
        self.rows.clone()
    }

    /// Compute every pixel in the band, then hand the rows back to the
    /// frame.
    pub fn run(self) {
        let RowRangeUnit {
            canvas,
            rows,
            mut pixels,
            done,
        } = self;
        let max_iterations = canvas.params.max_iterations;
        let stride = canvas.plane.stride();

        for (row, line) in rows.clone().zip(pixels.chunks_mut(stride)) {
            let imag = canvas.plane.row_imag(row);
            for (pixel, &real) in line.chunks_mut(4).zip(canvas.column_reals.iter()) {
                let result = escape_time(Complex::new(real, imag), max_iterations);
                if let Some(rgb) = color_for(result, max_iterations) {
                    pixel[..3].copy_from_slice(&rgb);
                }
            }
        }

        done.count_down(FinishedBand {
            start_row: rows.start,
            pixels,
        });
    }
}
