// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! A point `c` is in the Mandelbrot set if iterating `z = z * z + c`,
//! starting from zero, never carries `z` outside of the circle of
//! radius 2.  We can only ever iterate a finite number of times, so a
//! point that survives `max_iterations` rounds is treated as inside.
//!
//! The result is the *remaining* budget at the moment of escape, not
//! the number of iterations spent.  Fast escapers score high, points
//! that linger near the boundary score low, and points that never
//! escape score exactly `max_iterations`.  The color mapper depends on
//! that orientation.

use num::Complex;

/// Iterate `c` for at most `max_iterations` rounds and return
/// `max_iterations - iterations_consumed` if it escaped, counting the
/// escaping iteration as consumed, or `max_iterations` if it never did.
///
/// Most of the work goes into points that are nowhere near escaping, so
/// before the exact `re² + im² >= 4` test we check the Manhattan norm: if
/// `|re| + |im| < 2` the point is certainly still inside the circle.  That
/// check only ever skips the exact test when the exact test would have
/// failed, so the result is the same as the plain loop.
#[inline]
pub fn escape_time(c: Complex<f64>, max_iterations: u32) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for iteration in 0..max_iterations {
        z = z * z + c;
        if z.re.abs() + z.im.abs() < 2.0 {
            continue;
        }
        if z.norm_sqr() >= 4.0 {
            return max_iterations - (iteration + 1);
        }
    }
    max_iterations
}

/// True if `result` says the point escaped within its budget.
#[inline]
pub fn escaped(result: u32, max_iterations: u32) -> bool {
    result < max_iterations
}
