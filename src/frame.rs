// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One frame of the animation, from parameters to persisted image.
//!
//! A frame worker owns a [`FrameUnit`] for as long as it takes to render
//! it.  The frame cuts itself into row bands, pushes them onto the
//! shared compute queue, and then sits on its latch until every band
//! has come back.  Only then is the image assembled and handed to the
//! sink, so a sink never sees a partially computed frame.

use std::sync::Arc;

use crossbeam::channel::Sender;
use failure::Error;
use log::{debug, info};

use crate::band::{row_bands, FinishedBand, FrameCanvas, RowRangeUnit};
use crate::error::RenderError;
use crate::latch::Latch;
use crate::planes::PlaneMapper;
use crate::sequence::FrameParameters;
use crate::sink::FrameSink;

/// The finished image of a frame: RGBA bytes, row-major, with a stride
/// of `width * 4`.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    /// Position of the frame in the animation.
    pub index: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// The pixels.
    pub pixels: Vec<u8>,
}

impl RenderedFrame {
    /// The RGBA value of the pixel at `column`, `row`.
    pub fn pixel(&self, column: u32, row: u32) -> [u8; 4] {
        let offset = (row as usize * self.width as usize + column as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        rgba
    }
}

/// A frame waiting for a frame worker.
#[derive(Copy, Clone, Debug)]
pub struct FrameUnit {
    params: FrameParameters,
    width: u32,
    height: u32,
    band_rows: u32,
}

impl FrameUnit {
    /// A frame of `width` by `height` pixels, to be cut into bands of
    /// `band_rows` rows.
    pub fn new(params: FrameParameters, width: u32, height: u32, band_rows: u32) -> FrameUnit {
        FrameUnit {
            params,
            width,
            height,
            band_rows,
        }
    }

    /// The frame's parameters.
    pub fn params(&self) -> &FrameParameters {
        &self.params
    }

    /// Render the frame on the compute workers and hand the result to
    /// `sink`.  Blocks until every band is back.
    pub fn render<S>(self, compute: &Sender<RowRangeUnit>, sink: &S) -> Result<(), Error>
    where
        S: FrameSink + ?Sized,
    {
        let index = self.params.index;
        info!(
            "Running frame {} at max_iter {}",
            index, self.params.max_iterations
        );

        let plane = PlaneMapper::new(self.width, self.height, self.params.bounds)?;
        let canvas = Arc::new(FrameCanvas::new(self.params, plane));
        let bands = row_bands(self.height, self.band_rows);

        let (latch, countdown) = Latch::new(bands.len());
        for rows in bands {
            let unit = RowRangeUnit::new(canvas.clone(), rows, countdown.clone());
            compute
                .send(unit)
                .map_err(|_| RenderError::ComputeQueueClosed(index))?;
        }
        drop(countdown);

        let finished = latch.wait()?;
        let frame = self.assemble(finished)?;
        sink.persist(&frame)?;
        debug!("frame {} persisted", index);
        Ok(())
    }

    /// Stitch the returned bands into one image, checking that they tile
    /// the frame.
    fn assemble(&self, mut bands: Vec<FinishedBand>) -> Result<RenderedFrame, RenderError> {
        let stride = self.width as usize * 4;
        bands.sort_by_key(|band| band.start_row);

        let mut pixels = Vec::with_capacity(stride * self.height as usize);
        let mut next_row = 0;
        for band in bands {
            if band.start_row != next_row {
                return Err(self.incomplete(next_row, band.start_row));
            }
            next_row += (band.pixels.len() / stride) as u32;
            pixels.extend_from_slice(&band.pixels);
        }
        if next_row != self.height {
            return Err(self.incomplete(next_row, self.height));
        }

        Ok(RenderedFrame {
            index: self.params.index,
            width: self.width,
            height: self.height,
            pixels,
        })
    }

    fn incomplete(&self, expected: u32, found: u32) -> RenderError {
        RenderError::IncompleteFrame {
            index: self.params.index,
            expected,
            found,
        }
    }
}
