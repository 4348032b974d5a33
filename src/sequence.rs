// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame sequence generator.  An animation is a list of views, each
//! one a fixed proportion closer to the zoom target than the last, with
//! an iteration budget that grows as the view shrinks so that detail
//! keeps resolving near the boundary.

use num::Complex;

use crate::error::RenderError;
use crate::planes::ViewBounds;

/// Everything needed to render one frame.  Created once per frame by
/// [`ZoomSequence`] and never changed afterward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameParameters {
    /// Position of the frame in the animation, from zero.
    pub index: u32,
    /// The window onto the complex plane.
    pub bounds: ViewBounds,
    /// Iteration budget per point; always at least one.
    pub max_iterations: u32,
}

/// An iterator over the parameters of every frame in a zoom, in order.
///
/// The first frame is the starting view.  After each frame every corner
/// of the view moves `speed` of the remaining distance toward `target`,
/// and the budget grows by `step`.  The budget is kept as a float and
/// truncated when a frame is emitted, so fractional steps accumulate.
///
/// If a step collapses the view so that its corners meet, the next item
/// is an error and the iterator ends.
#[derive(Debug)]
pub struct ZoomSequence {
    next_index: u32,
    total: u32,
    bounds: ViewBounds,
    collapsed: Option<RenderError>,
    budget: f64,
    target: Complex<f64>,
    speed: f64,
    step: f64,
}

impl ZoomSequence {
    /// A sequence of `total` frames starting at `bounds` with
    /// `max_iterations`, zooming toward `target`.
    pub fn new(
        bounds: ViewBounds,
        max_iterations: u32,
        total: u32,
        target: Complex<f64>,
        speed: f64,
        step: f64,
    ) -> ZoomSequence {
        ZoomSequence {
            next_index: 0,
            total,
            bounds,
            collapsed: None,
            budget: f64::from(max_iterations),
            target,
            speed,
            step,
        }
    }
}

impl Iterator for ZoomSequence {
    type Item = Result<FrameParameters, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.total {
            return None;
        }
        if let Some(e) = self.collapsed.take() {
            self.next_index = self.total;
            return Some(Err(e));
        }
        let params = FrameParameters {
            index: self.next_index,
            bounds: self.bounds,
            max_iterations: self.budget as u32,
        };
        self.next_index += 1;
        self.budget += self.step;

        // Only report a collapsed view if somebody is going to render it.
        if self.next_index < self.total {
            match self.bounds.zoom_toward(self.target, self.speed) {
                Ok(next) => self.bounds = next,
                Err(e) => self.collapsed = Some(e),
            }
        }
        Some(Ok(params))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.collapsed.is_some() {
            1
        } else {
            (self.total - self.next_index) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ZoomSequence {}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_view() -> ViewBounds {
        ViewBounds::new(Complex::new(-1.0, 0.0), Complex::new(1.0, 1.0)).unwrap()
    }

    fn frames(sequence: ZoomSequence) -> Vec<FrameParameters> {
        sequence.collect::<Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn first_frame_is_the_starting_view() {
        let f = frames(ZoomSequence::new(unit_view(), 10, 3, Complex::new(0.0, 0.0), 0.5, 1.0));
        assert_eq!(f.len(), 3);
        assert_eq!(f[0].index, 0);
        assert_eq!(f[0].bounds, unit_view());
        assert_eq!(f[0].max_iterations, 10);
    }

    #[test]
    fn corners_halve_toward_the_target() {
        let f = frames(ZoomSequence::new(unit_view(), 10, 3, Complex::new(0.0, 0.0), 0.5, 1.0));
        assert_eq!(f[1].bounds.start(), Complex::new(-0.5, 0.0));
        assert_eq!(f[2].bounds.start(), Complex::new(-0.25, 0.0));
        assert_eq!(f[2].bounds.end(), Complex::new(0.0, 0.25));
    }

    #[test]
    fn indices_increase_and_budgets_never_shrink() {
        let f = frames(ZoomSequence::new(
            unit_view(),
            100,
            40,
            Complex::new(-0.7, 0.2),
            0.2,
            5.0,
        ));
        for pair in f.windows(2) {
            assert_eq!(pair[1].index, pair[0].index + 1);
            assert!(pair[1].max_iterations >= pair[0].max_iterations);
        }
        assert_eq!(f[39].max_iterations, 100 + 39 * 5);
    }

    #[test]
    fn fractional_steps_accumulate() {
        let f = frames(ZoomSequence::new(unit_view(), 10, 5, Complex::new(0.0, 0.0), 0.1, 0.5));
        let budgets: Vec<u32> = f.iter().map(|p| p.max_iterations).collect();
        assert_eq!(budgets, vec![10, 10, 11, 11, 12]);
    }

    #[test]
    fn sequence_is_deterministic() {
        let make = || ZoomSequence::new(unit_view(), 64, 25, Complex::new(-0.3, 0.4), 0.3, 2.0);
        assert_eq!(frames(make()), frames(make()));
    }

    #[test]
    fn reports_exact_size() {
        let mut s = ZoomSequence::new(unit_view(), 10, 4, Complex::new(0.0, 0.0), 0.5, 0.0);
        assert_eq!(s.size_hint(), (4, Some(4)));
        s.next();
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn collapsed_view_is_an_error() {
        // A speed of one lands both corners on the target after one step.
        let results: Vec<_> =
            ZoomSequence::new(unit_view(), 10, 3, Complex::new(0.0, 0.0), 1.0, 0.0).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn last_frame_never_zooms() {
        let results: Vec<_> =
            ZoomSequence::new(unit_view(), 10, 1, Complex::new(0.3, 0.3), 1.0, 0.0).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
    }
}
