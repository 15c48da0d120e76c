//! Tone adjustments: luma extraction and contrast, color and brightness
//! enhancement.
//!
//! Every enhancement is a linear interpolation between a *degenerate* version
//! of the image and the image itself:
//! `out = degenerate + factor * (value - degenerate)`
//!
//! | Adjustment   | Degenerate image                      |
//! |--------------|---------------------------------------|
//! | contrast     | flat gray at the image's mean luma    |
//! | color        | the pixel's own luma (desaturated)    |
//! | brightness   | black                                 |
//!
//! A factor of `1.0` returns the input unchanged. Alpha is never touched.

use image::{GrayImage, Luma, Rgba, RgbaImage};

/// Fixed-point ITU-R 601-2 weights (0.299, 0.587, 0.114) scaled by 2^16.
const LUMA_R: u32 = 19_595;
const LUMA_G: u32 = 38_470;
const LUMA_B: u32 = 7_471;
const LUMA_ROUND: u32 = 0x8000;

/// Luma of a single RGBA pixel, alpha ignored.
#[must_use]
pub fn pixel_luma(px: &Rgba<u8>) -> u8 {
    let weighted = LUMA_R * u32::from(px[0])
        + LUMA_G * u32::from(px[1])
        + LUMA_B * u32::from(px[2])
        + LUMA_ROUND;
    #[allow(clippy::cast_possible_truncation)]
    {
        (weighted >> 16) as u8
    }
}

/// Convert an RGBA image to a single-channel luma image.
#[must_use]
pub fn luma(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([pixel_luma(image.get_pixel(x, y))])
    })
}

/// Mean value of a luma image, rounded half up. Empty images yield 0.
#[must_use]
pub fn mean_luma(gray: &GrayImage) -> u8 {
    let n = u64::from(gray.width()) * u64::from(gray.height());
    if n == 0 {
        return 0;
    }
    let sum: u64 = gray.pixels().map(|p| u64::from(p[0])).sum();
    #[allow(clippy::cast_possible_truncation)]
    {
        ((2 * sum + n) / (2 * n)) as u8
    }
}

/// Interpolate from `base` toward `value` by `factor`, clamped and truncated.
#[inline]
fn lerp_channel(base: f32, value: u8, factor: f32) -> u8 {
    let out = base + factor * (f32::from(value) - base);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        out.clamp(0.0, 255.0) as u8
    }
}

/// Adjust the contrast of a luma image around its mean.
#[must_use]
pub fn contrast_gray(gray: &GrayImage, factor: f32) -> GrayImage {
    let mean = f32::from(mean_luma(gray));
    let mut out = gray.clone();
    for px in out.pixels_mut() {
        px[0] = lerp_channel(mean, px[0], factor);
    }
    out
}

/// Adjust the contrast of an RGBA image around the mean luma of all its pixels.
///
/// Transparent pixels take part in the mean, matching how the luma of the
/// whole raster is measured.
#[must_use]
pub fn contrast(image: &RgbaImage, factor: f32) -> RgbaImage {
    let mean = f32::from(mean_luma(&luma(image)));
    map_color_channels(image, |_, v| lerp_channel(mean, v, factor))
}

/// Adjust color saturation; `0.0` yields a grayscale image.
#[must_use]
pub fn color(image: &RgbaImage, factor: f32) -> RgbaImage {
    map_color_channels(image, |px, v| {
        lerp_channel(f32::from(pixel_luma(px)), v, factor)
    })
}

/// Scale brightness toward black; `0.0` yields black with alpha kept.
#[must_use]
pub fn brightness(image: &RgbaImage, factor: f32) -> RgbaImage {
    map_color_channels(image, |_, v| lerp_channel(0.0, v, factor))
}

/// Push every value strictly above `cutoff` to full white.
#[must_use]
pub fn threshold_up(gray: &GrayImage, cutoff: u8) -> GrayImage {
    let mut out = gray.clone();
    for px in out.pixels_mut() {
        if px[0] > cutoff {
            px[0] = 255;
        }
    }
    out
}

/// Apply `f(original_pixel, channel_value)` to R, G and B; alpha is copied.
fn map_color_channels<F>(image: &RgbaImage, f: F) -> RgbaImage
where
    F: Fn(&Rgba<u8>, u8) -> u8,
{
    let mut out = image.clone();
    for (dst, src) in out.pixels_mut().zip(image.pixels()) {
        for ch in 0..3 {
            dst[ch] = f(src, src[ch]);
        }
    }
    out
}
