// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render configuration.  The defaults describe a 1080p, 100 frame dive
//! toward a point on the real axis just off the period-2 bulb.

use std::path::PathBuf;

use num::Complex;

use crate::error::RenderError;
use crate::planes::ViewBounds;
use crate::sequence::ZoomSequence;

/// Every knob the renderer has.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Height of each frame in pixels.
    pub height: u32,
    /// Width over height.  The frame width is `height * aspect_ratio`,
    /// rounded.
    pub aspect_ratio: f64,
    /// The corner of the first frame's view that pixel 0,0 maps to.  The
    /// imaginary part has to be negative: the view is symmetric about the
    /// real axis, and its width follows from the aspect ratio.
    pub origin: Complex<f64>,
    /// Iteration budget of the first frame.
    pub max_iterations: u32,
    /// How many frames the zoom has.
    pub total_frames: u32,
    /// Frames before this one are skipped, though the zoom still moves
    /// through them.
    pub start_frame: u32,
    /// The point the view closes in on.
    pub target: Complex<f64>,
    /// Proportion of the remaining distance to the target covered each
    /// frame, in (0, 1).
    pub zoom_speed: f64,
    /// Added to the iteration budget every frame.
    pub iteration_step: f64,
    /// Rows per unit of compute work.
    pub band_rows: u32,
    /// Directory the frames are written to.
    pub output: PathBuf,
    /// Number of frame workers; defaults to half the cores, rounded up.
    pub frame_workers: Option<usize>,
    /// Number of compute workers; defaults to one per core.
    pub compute_workers: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            height: 1080,
            aspect_ratio: 16.0 / 9.0,
            origin: Complex::new(-2.5, -1.15),
            max_iterations: 100,
            total_frames: 100,
            start_frame: 0,
            target: Complex::new(-1.385_204_881_299_389_6, 0.012_622_046_088_551_223),
            zoom_speed: 0.2,
            iteration_step: 5.0,
            band_rows: 400,
            output: PathBuf::from("out"),
            frame_workers: None,
            compute_workers: None,
        }
    }
}

fn invalid(message: String) -> RenderError {
    RenderError::InvalidConfig(message)
}

impl RenderConfig {
    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        (f64::from(self.height) * self.aspect_ratio).round() as u32
    }

    /// The first frame's view: from `origin` up to the mirror image of its
    /// imaginary part, and as wide as the aspect ratio asks.
    pub fn initial_bounds(&self) -> Result<ViewBounds, RenderError> {
        let end_imag = self.origin.im.abs();
        let end_real = self.origin.re + self.aspect_ratio * end_imag * 2.0;
        ViewBounds::from_corners(self.origin, Complex::new(end_real, end_imag))
    }

    /// The parameters of every frame, including the skipped ones.
    pub fn sequence(&self) -> Result<ZoomSequence, RenderError> {
        Ok(ZoomSequence::new(
            self.initial_bounds()?,
            self.max_iterations,
            self.total_frames,
            self.target,
            self.zoom_speed,
            self.iteration_step,
        ))
    }

    /// How many frames will actually be rendered.
    pub fn rendered_frames(&self) -> u32 {
        self.total_frames.saturating_sub(self.start_frame)
    }

    /// Compute workers to run.
    pub fn compute_worker_count(&self) -> usize {
        self.compute_workers.unwrap_or_else(num_cpus::get)
    }

    /// Frame workers to run.
    pub fn frame_worker_count(&self) -> usize {
        self.frame_workers
            .unwrap_or_else(|| (num_cpus::get() + 1) / 2)
    }

    /// Check everything that would otherwise blow up halfway through a
    /// run.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.height == 0 {
            return Err(invalid("height must be at least one pixel".to_string()));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) || self.width() == 0 {
            return Err(invalid(format!(
                "aspect ratio {} leaves no width at height {}",
                self.aspect_ratio, self.height
            )));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max iterations must be at least one".to_string()));
        }
        if self.total_frames == 0 {
            return Err(invalid("there must be at least one frame".to_string()));
        }
        if self.start_frame >= self.total_frames {
            return Err(invalid(format!(
                "start frame {} is past the last frame {}",
                self.start_frame,
                self.total_frames - 1
            )));
        }
        if !(self.zoom_speed > 0.0 && self.zoom_speed < 1.0) {
            return Err(invalid(format!(
                "zoom speed {} is not between 0 and 1",
                self.zoom_speed
            )));
        }
        if !(self.iteration_step.is_finite() && self.iteration_step >= 0.0) {
            return Err(invalid(format!(
                "iteration step {} must not be negative",
                self.iteration_step
            )));
        }
        if !(self.target.re.is_finite() && self.target.im.is_finite()) {
            return Err(invalid(format!("zoom target {} is not finite", self.target)));
        }
        if self.band_rows == 0 {
            return Err(invalid("bands must hold at least one row".to_string()));
        }
        if self.frame_workers == Some(0) || self.compute_workers == Some(0) {
            return Err(invalid("worker counts must be at least one".to_string()));
        }
        self.initial_bounds()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        config.validate().unwrap();
        assert_eq!(config.width(), 1920);
        assert_eq!(config.rendered_frames(), 100);
    }

    #[test]
    fn default_view_is_symmetric_and_widescreen() {
        let bounds = RenderConfig::default().initial_bounds().unwrap();
        assert_eq!(bounds.start(), Complex::new(-2.5, -1.15));
        assert_eq!(bounds.end().im, 1.15);
        let ratio = bounds.length().re / bounds.length().im;
        assert!((ratio - 16.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn width_rounds() {
        let config = RenderConfig {
            height: 10,
            aspect_ratio: 1.26,
            ..RenderConfig::default()
        };
        assert_eq!(config.width(), 13);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = vec![
            RenderConfig {
                height: 0,
                ..RenderConfig::default()
            },
            RenderConfig {
                aspect_ratio: 0.0,
                ..RenderConfig::default()
            },
            RenderConfig {
                max_iterations: 0,
                ..RenderConfig::default()
            },
            RenderConfig {
                start_frame: 100,
                ..RenderConfig::default()
            },
            RenderConfig {
                zoom_speed: 1.0,
                ..RenderConfig::default()
            },
            RenderConfig {
                zoom_speed: 0.0,
                ..RenderConfig::default()
            },
            RenderConfig {
                iteration_step: -1.0,
                ..RenderConfig::default()
            },
            RenderConfig {
                band_rows: 0,
                ..RenderConfig::default()
            },
            RenderConfig {
                compute_workers: Some(0),
                ..RenderConfig::default()
            },
            RenderConfig {
                origin: Complex::new(-2.5, 1.15),
                ..RenderConfig::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} passed", config);
        }
    }

    #[test]
    fn skipped_frames_are_not_counted() {
        let config = RenderConfig {
            total_frames: 10,
            start_frame: 4,
            ..RenderConfig::default()
        };
        assert_eq!(config.rendered_frames(), 6);
        assert_eq!(config.sequence().unwrap().count(), 10);
    }

    #[test]
    fn worker_counts_default_to_the_cores() {
        let config = RenderConfig::default();
        let cores = num_cpus::get();
        assert_eq!(config.compute_worker_count(), cores);
        assert_eq!(config.frame_worker_count(), (cores + 1) / 2);
        let pinned = RenderConfig {
            frame_workers: Some(3),
            compute_workers: Some(5),
            ..config
        };
        assert_eq!(pinned.frame_worker_count(), 3);
        assert_eq!(pinned.compute_worker_count(), 5);
    }
}
