//! Separable Gaussian blur for RGBA and single-channel rasters.
//!
//! Each channel, alpha included, is blurred independently. Samples past the
//! border repeat the edge pixel, so flat images stay flat.

use image::{GrayImage, RgbaImage};

/// Build a normalized 1D Gaussian kernel.
///
/// The kernel spans `ceil(6 * sigma)` taps, forced odd so it has a center.
/// A non-positive `sigma` yields the identity kernel `[1.0]`.
#[must_use]
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let size = ((sigma * 6.0).ceil() as usize) | 1;
    let half = size / 2;

    #[allow(clippy::cast_precision_loss)]
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Blur an RGBA image with a Gaussian of standard deviation `radius`.
#[must_use]
pub fn gaussian_blur(image: &RgbaImage, radius: f32) -> RgbaImage {
    let mut out = image.clone();
    if radius > 0.0 {
        blur_interleaved(image.as_raw(), &mut out, image.width(), image.height(), 4, radius);
    }
    out
}

/// Blur a single-channel image with a Gaussian of standard deviation `radius`.
#[must_use]
pub fn gaussian_blur_gray(gray: &GrayImage, radius: f32) -> GrayImage {
    let mut out = gray.clone();
    if radius > 0.0 {
        blur_interleaved(gray.as_raw(), &mut out, gray.width(), gray.height(), 1, radius);
    }
    out
}

/// Two-pass convolution over interleaved 8-bit samples.
fn blur_interleaved(
    src: &[u8],
    dst: &mut [u8],
    width: u32,
    height: u32,
    channels: usize,
    sigma: f32,
) {
    let width = width as usize;
    let height = height as usize;
    if width == 0 || height == 0 {
        return;
    }

    let kernel = gaussian_kernel_1d(sigma);
    #[allow(clippy::cast_possible_wrap)]
    let half = (kernel.len() / 2) as isize;
    let stride = width * channels;

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    let clamp_index = |i: usize, k: usize, len: usize| -> usize {
        (i as isize + k as isize - half).clamp(0, len as isize - 1) as usize
    };

    // Horizontal pass
    let mut temp = vec![0.0_f32; src.len()];
    for y in 0..height {
        let row = y * stride;
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0_f32;
                for (k, &kv) in kernel.iter().enumerate() {
                    let sx = clamp_index(x, k, width);
                    sum += f32::from(src[row + sx * channels + c]) * kv;
                }
                temp[row + x * channels + c] = sum;
            }
        }
    }

    // Vertical pass
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0_f32;
                for (k, &kv) in kernel.iter().enumerate() {
                    let sy = clamp_index(y, k, height);
                    sum += temp[sy * stride + x * channels + c] * kv;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    dst[y * stride + x * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn kernel_is_odd_normalized_and_symmetric() {
        for sigma in [0.5_f32, 1.0, 2.0, 3.0] {
            let k = gaussian_kernel_1d(sigma);
            assert_eq!(k.len() % 2, 1, "sigma {sigma} gave even kernel");
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            for (a, b) in k.iter().zip(k.iter().rev()) {
                assert!((a - b).abs() < 1e-7);
            }
        }
        assert_eq!(gaussian_kernel_1d(1.0).len(), 7);
        assert_eq!(gaussian_kernel_1d(3.0).len(), 19);
    }

    #[test]
    fn kernel_for_zero_sigma_is_identity() {
        assert_eq!(gaussian_kernel_1d(0.0), vec![1.0]);
        assert_eq!(gaussian_kernel_1d(-2.0), vec![1.0]);
    }

    #[test]
    fn zero_radius_returns_copy() {
        let mut img = RgbaImage::new(5, 5);
        img.put_pixel(2, 2, Rgba([255, 10, 20, 255]));
        assert_eq!(gaussian_blur(&img, 0.0), img);
    }

    #[test]
    fn flat_image_stays_flat() {
        let img = RgbaImage::from_pixel(9, 6, Rgba([40, 90, 200, 100]));
        let out = gaussian_blur(&img, 2.0);
        assert_eq!(out.dimensions(), (9, 6));
        for px in out.pixels() {
            assert_eq!(*px, Rgba([40, 90, 200, 100]));
        }
    }

    #[test]
    fn single_dot_spreads_symmetrically() {
        let mut gray = GrayImage::new(11, 11);
        gray.put_pixel(5, 5, Luma([255]));
        let out = gaussian_blur_gray(&gray, 1.0);

        let center = out.get_pixel(5, 5)[0];
        assert!(center < 255);
        assert!(center > out.get_pixel(6, 5)[0]);
        assert_eq!(out.get_pixel(4, 5)[0], out.get_pixel(6, 5)[0]);
        assert_eq!(out.get_pixel(5, 4)[0], out.get_pixel(5, 6)[0]);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn blur_handles_images_smaller_than_kernel() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        let out = gaussian_blur(&img, 3.0);
        assert_eq!(out.dimensions(), (2, 1));
        assert!(out.get_pixel(1, 0)[3] > 0);
    }

    #[test]
    fn empty_image_is_a_no_op() {
        let img = RgbaImage::new(0, 0);
        assert_eq!(gaussian_blur(&img, 2.0).dimensions(), (0, 0));
    }
}
