//! Layer compositing: Porter-Duff "over" and masked paste.
//!
//! Both operate on non-premultiplied RGBA. The two differ in how alpha is
//! treated:
//!
//! - [`alpha_composite`] is the proper "over" operator; the result's alpha is
//!   `sa + da * (1 - sa)`.
//! - [`paste_masked`] interpolates *all four* channels by the mask, so pasting
//!   a layer onto a transparent canvas through its own alpha squares that alpha.

use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::error::{ensure_same_size, Result};

/// Composite a single `src` pixel over a `dst` pixel.
#[must_use]
pub fn over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    // sa > 0 here, so out_a > 0.
    let out_a = sa + da * (1.0 - sa);

    let mut out = Rgba([0, 0, 0, 0]);
    for ch in 0..3 {
        let c = (f32::from(src[ch]) * sa + f32::from(dst[ch]) * da * (1.0 - sa)) / out_a;
        out[ch] = to_u8(c);
    }
    out[3] = to_u8(out_a * 255.0);
    out
}

/// Composite `src` over `dst`, returning a new image.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if the
/// images differ in size.
pub fn alpha_composite(dst: &RgbaImage, src: &RgbaImage) -> Result<RgbaImage> {
    ensure_same_size(dst.dimensions(), src.dimensions())?;

    let mut out = dst.clone();
    for (d, s) in out.pixels_mut().zip(src.pixels()) {
        *d = over(*d, *s);
    }
    Ok(out)
}

/// Paste `src` onto `dst` in place, weighting every channel by `mask`.
///
/// `out = (src * m + dst * (255 - m)) / 255`, rounded.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if
/// `src` or `mask` differ in size from `dst`.
pub fn paste_masked(dst: &mut RgbaImage, src: &RgbaImage, mask: &GrayImage) -> Result<()> {
    ensure_same_size(dst.dimensions(), src.dimensions())?;
    ensure_same_size(dst.dimensions(), mask.dimensions())?;

    for ((d, s), m) in dst.pixels_mut().zip(src.pixels()).zip(mask.pixels()) {
        let m = u32::from(m[0]);
        for ch in 0..4 {
            let v = (u32::from(s[ch]) * m + u32::from(d[ch]) * (255 - m) + 127) / 255;
            #[allow(clippy::cast_possible_truncation)]
            {
                d[ch] = v as u8;
            }
        }
    }
    Ok(())
}

/// Paste `layer` onto `dst` using the layer's own alpha as the mask.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if the
/// images differ in size.
pub fn paste_layer(dst: &mut RgbaImage, layer: &RgbaImage) -> Result<()> {
    paste_masked(dst, layer, &alpha_channel(layer))
}

/// Extract the alpha channel as a single-channel image.
#[must_use]
pub fn alpha_channel(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[3]])
    })
}

#[inline]
fn to_u8(v: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        v.round().clamp(0.0, 255.0) as u8
    }
}
