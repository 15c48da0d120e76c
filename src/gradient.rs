//! Procedural linear gradients.

use image::{Rgba, RgbaImage};

/// Axis along which a gradient runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    /// Color varies with x, left to right.
    Horizontal,
    /// Color varies with y, top to bottom.
    Vertical,
}

/// Generate a two-stop linear gradient with a constant alpha.
///
/// At coordinate `i` along the gradient axis of length `extent` each channel is
/// `trunc(start + (end - start) * i / extent)`, so the `end` color is approached
/// but never reached on the last row or column.
#[must_use]
pub fn linear_gradient(
    width: u32,
    height: u32,
    start: [u8; 3],
    end: [u8; 3],
    alpha: u8,
    direction: GradientDirection,
) -> RgbaImage {
    let extent = match direction {
        GradientDirection::Horizontal => width,
        GradientDirection::Vertical => height,
    };

    // One color per position along the axis.
    let ramp: Vec<Rgba<u8>> = (0..extent)
        .map(|i| {
            let pos = f64::from(i) / f64::from(extent);
            let mut px = Rgba([0, 0, 0, alpha]);
            for ch in 0..3 {
                let s = f64::from(start[ch]);
                let e = f64::from(end[ch]);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    px[ch] = (s + (e - s) * pos).trunc().clamp(0.0, 255.0) as u8;
                }
            }
            px
        })
        .collect();

    RgbaImage::from_fn(width, height, |x, y| match direction {
        GradientDirection::Horizontal => ramp[x as usize],
        GradientDirection::Vertical => ramp[y as usize],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_gradient_starts_at_start_color_and_is_constant_per_row() {
        let img = linear_gradient(
            4,
            10,
            [0, 102, 204],
            [102, 51, 153],
            100,
            GradientDirection::Vertical,
        );
        assert_eq!(img.dimensions(), (4, 10));
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 102, 204, 100]));
        for y in 0..10 {
            let first = *img.get_pixel(0, y);
            for x in 1..4 {
                assert_eq!(*img.get_pixel(x, y), first);
            }
        }
        // y = 5 of 10: halfway
        assert_eq!(*img.get_pixel(0, 5), Rgba([51, 76, 178, 100]));
    }

    #[test]
    fn horizontal_gradient_truncates_toward_zero() {
        let img = linear_gradient(
            3,
            2,
            [40, 0, 80],
            [0, 70, 150],
            50,
            GradientDirection::Horizontal,
        );
        assert_eq!(*img.get_pixel(0, 1), Rgba([40, 0, 80, 50]));
        // pos = 1/3: 40 - 13.33, 23.33, 80 + 23.33
        assert_eq!(*img.get_pixel(1, 0), Rgba([26, 23, 103, 50]));
        assert_eq!(*img.get_pixel(2, 0), Rgba([13, 46, 126, 50]));
    }

    #[test]
    fn empty_gradient_has_no_pixels() {
        let img = linear_gradient(0, 5, [1, 2, 3], [4, 5, 6], 7, GradientDirection::Horizontal);
        assert_eq!(img.dimensions(), (0, 5));
    }
}
