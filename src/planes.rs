// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the ViewBounds and PlaneMapper structs, which describe a
//! relationship between a rectangle on the integral plane with an
//! origin at 0,0, and a window onto the complex plane given by a
//! starting corner and the lengths of its two sides.
use num::Complex;

use crate::error::RenderError;

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub u32, pub u32);

/// Describes the column, row of a pixel in an integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub u32, pub u32);

/// A window onto the complex plane.  The real part of each value is the
/// x-component and the imaginary part the y-component; `start` is the
/// corner the pixel origin maps onto, and `length` holds the extent of
/// the window along each axis.  Both lengths are strictly positive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewBounds {
    start: Complex<f64>,
    length: Complex<f64>,
}

impl ViewBounds {
    /// Constructor.  Fails unless both lengths are finite and positive.
    pub fn new(start: Complex<f64>, length: Complex<f64>) -> Result<ViewBounds, RenderError> {
        let valid = |l: f64| l.is_finite() && l > 0.0;
        if !(valid(length.re) && valid(length.im)) || !(start.re.is_finite() && start.im.is_finite())
        {
            return Err(RenderError::InvalidBounds {
                real: length.re,
                imag: length.im,
            });
        }
        Ok(ViewBounds { start, length })
    }

    /// Build a window from two opposite corners.
    pub fn from_corners(start: Complex<f64>, end: Complex<f64>) -> Result<ViewBounds, RenderError> {
        ViewBounds::new(start, end - start)
    }

    /// The corner that pixel 0,0 maps onto.
    pub fn start(&self) -> Complex<f64> {
        self.start
    }

    /// The extent of the window along each axis.
    pub fn length(&self) -> Complex<f64> {
        self.length
    }

    /// The corner opposite to `start`.
    pub fn end(&self) -> Complex<f64> {
        self.start + self.length
    }

    /// Move both corners a proportion `speed` of the way toward `target`.
    /// With `speed` in (0, 1) the window shrinks geometrically around
    /// the target, which is what makes a sequence of these a zoom.
    pub fn zoom_toward(&self, target: Complex<f64>, speed: f64) -> Result<ViewBounds, RenderError> {
        let start = self.start;
        let end = self.end();
        ViewBounds::from_corners(
            start + (target - start) * speed,
            end + (target - end) * speed,
        )
    }
}

/// Ties an integral plane to a window on the complex plane, and maps
/// pixels from one to the other.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The size of the image, in pixels.
    pub integral_plane: IntegralPlane,
    /// The region of the complex plane the image covers.
    pub bounds: ViewBounds,
}

impl PlaneMapper {
    /// Constructor.  Both dimensions have to be nonzero.
    pub fn new(width: u32, height: u32, bounds: ViewBounds) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image of {}x{} pixels has no area",
                width, height
            )));
        }
        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            bounds,
        })
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.integral_plane.0
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.integral_plane.1
    }

    /// Number of bytes in one RGBA row.
    pub fn stride(&self) -> usize {
        self.width() as usize * 4
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Whether the integral plane has no area.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The real-axis value of a column.
    #[inline]
    pub fn column_real(&self, column: u32) -> f64 {
        f64::from(column) * self.bounds.length.re / f64::from(self.width()) + self.bounds.start.re
    }

    /// The imaginary-axis value of a row.
    #[inline]
    pub fn row_imag(&self, row: u32) -> f64 {
        f64::from(row) * self.bounds.length.im / f64::from(self.height()) + self.bounds.start.im
    }

    /// The real-axis value of every column, left to right.  Every row of
    /// a frame reads from the same table, so it is built once per frame.
    pub fn column_reals(&self) -> Vec<f64> {
        (0..self.width()).map(|column| self.column_real(column)).collect()
    }

    /// Given a pixel on the integral cartesian plane, the point on the
    /// complex plane it samples.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(self.column_real(pixel.0), self.row_imag(pixel.1))
    }

    /// Given a point on the complex plane, the pixel whose sample is
    /// closest to it, or `None` if the point is outside of the image.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let left = ((point.re - self.bounds.start.re) * f64::from(self.width())
            / self.bounds.length.re)
            .round();
        let top = ((point.im - self.bounds.start.im) * f64::from(self.height())
            / self.bounds.length.im)
            .round();
        if left < 0.0
            || left >= f64::from(self.width())
            || top < 0.0
            || top >= f64::from(self.height())
        {
            return None;
        }
        Some(Pixel(left as u32, top as u32))
    }
}
