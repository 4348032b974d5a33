// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps escape results onto a fully-saturated hue wheel.  The remaining
//! budget at escape picks a hue in `[0, 6)`, and the usual HSV to RGB
//! sector logic (with saturation and value pinned at 1) turns that into
//! a pixel, which gives the rainbow banding around the set.

/// The color every pixel starts out as: opaque black.  Points that never
/// escape are left this way.
pub const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Convert a hue proportion in `[0, 6)` to RGB.  Anything from 5 up,
/// including a value that rounded up to 6, lands in the last sector.
pub fn hue_to_rgb(hp: f64) -> [u8; 3] {
    let x = ((1.0 - ((hp % 2.0) - 1.0).abs()) * 255.0).round() as u8;
    match hp as u32 {
        0 => [255, x, 0],
        1 => [x, 255, 0],
        2 => [0, 255, x],
        3 => [0, x, 255],
        4 => [x, 0, 255],
        _ => [255, 0, x],
    }
}

/// The hue proportion for an escape result.
#[inline]
pub fn hue_proportion(result: u32, max_iterations: u32) -> f64 {
    (6.0 * f64::from(result)) / f64::from(max_iterations)
}

/// The color of a pixel whose point scored `result`, or `None` if the
/// point never escaped and the pixel should keep its background.
pub fn color_for(result: u32, max_iterations: u32) -> Option<[u8; 3]> {
    if result >= max_iterations {
        return None;
    }
    Some(hue_to_rgb(hue_proportion(result, max_iterations)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_boundaries_match_the_table() {
        assert_eq!(hue_to_rgb(0.0), [255, 0, 0]);
        assert_eq!(hue_to_rgb(1.0), [255, 255, 0]);
        assert_eq!(hue_to_rgb(2.0), [0, 255, 0]);
        assert_eq!(hue_to_rgb(3.0), [0, 255, 255]);
        assert_eq!(hue_to_rgb(4.0), [0, 0, 255]);
        assert_eq!(hue_to_rgb(5.0), [255, 0, 255]);
    }

    #[test]
    fn midpoints_are_half_intensity() {
        assert_eq!(hue_to_rgb(0.5), [255, 128, 0]);
        assert_eq!(hue_to_rgb(1.5), [128, 255, 0]);
        assert_eq!(hue_to_rgb(4.5), [128, 0, 255]);
    }

    #[test]
    fn sectors_meet_without_a_seam() {
        for boundary in 1..6 {
            let below = hue_to_rgb(f64::from(boundary) - 1e-9);
            let at = hue_to_rgb(f64::from(boundary));
            assert_eq!(below, at, "seam at hue {}", boundary);
        }
    }

    #[test]
    fn hue_just_under_six_falls_back_to_the_last_sector() {
        assert_eq!(hue_to_rgb(6.0 - 1e-12), [255, 0, 0]);
        assert_eq!(hue_to_rgb(6.0), [255, 0, 0]);
    }

    #[test]
    fn bounded_points_keep_the_background() {
        assert_eq!(color_for(50, 50), None);
        assert_eq!(color_for(0, 50), Some([255, 0, 0]));
    }

    #[test]
    fn fast_escapers_land_in_the_last_sector() {
        // 49 of 50 left over gives a hue of 5.88.
        assert_eq!(color_for(49, 50), Some([255, 0, 31]));
    }
}
