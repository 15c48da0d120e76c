//! The three sketch effects.
//!
//! Each effect derives auxiliary layers from the source (a luma mask, a
//! synthetic gradient, a blurred glow) and merges them back with per-pixel
//! blends and compositing. All of them are deterministic: the same input
//! always yields byte-identical output.

use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use log::debug;

use crate::blur::{gaussian_blur, gaussian_blur_gray};
use crate::compositing::{alpha_composite, paste_layer};
use crate::enhance::{brightness, color, contrast, contrast_gray, luma, threshold_up};
use crate::error::Result;
use crate::gradient::{linear_gradient, GradientDirection};

/// Contrast boost applied to the luma mask before it drives opacity or blending.
const MASK_CONTRAST: f32 = 1.5;

/// Luma at or above which a pixel counts as paper rather than a sketch line.
const LINE_CUTOFF: u8 = 200;

/// Maximum opacity of tinted sketch lines.
const TINT_MAX_OPACITY: u8 = 180;
/// Tint for sketch lines.
const TINT_LINE: [u8; 3] = [50, 100, 200];
/// Tint for light areas.
const TINT_HIGHLIGHT: [u8; 3] = [150, 200, 255];
/// Opacity multiplier for light areas.
const TINT_HIGHLIGHT_OPACITY: f64 = 0.3;

const BLEND_START: [u8; 3] = [0, 102, 204];
const BLEND_END: [u8; 3] = [102, 51, 153];
const BLEND_GRADIENT_ALPHA: u8 = 100;
const BLEND_GLOW_RADIUS: f32 = 2.0;
const BLEND_GLOW_BRIGHTNESS: f32 = 1.2;

const BACKDROP_START: [u8; 3] = [40, 0, 80];
const BACKDROP_END: [u8; 3] = [0, 70, 150];
const BACKDROP_GRADIENT_ALPHA: u8 = 50;
const BACKDROP_GRADIENT_BLUR: f32 = 3.0;
const BACKDROP_CONTRAST: f32 = 1.2;
const BACKDROP_SATURATION: f32 = 0.8;
const BACKDROP_GLOW_RADIUS: f32 = 2.0;

/// Which effect to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    /// Recolor the sketch as translucent blue lines on a transparent canvas.
    Tint,
    /// Blend the sketch into a vertical blue-purple gradient, with a soft glow.
    #[default]
    Blend,
    /// Composite the sketch over a horizontal purple-blue backdrop, with a glow.
    Backdrop,
}

impl Effect {
    /// All effects, in CLI listing order.
    pub const ALL: [Effect; 3] = [Effect::Tint, Effect::Blend, Effect::Backdrop];

    /// Lowercase name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Effect::Tint => "tint",
            Effect::Blend => "blend",
            Effect::Backdrop => "backdrop",
        }
    }

    /// Suffix appended to the input stem when deriving an output file name.
    #[must_use]
    pub fn output_suffix(self) -> &'static str {
        match self {
            Effect::Tint => "transparent",
            Effect::Blend => "blended",
            Effect::Backdrop => "processed",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Effect::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown effect '{s}' (expected tint, blend or backdrop)"))
    }
}

/// Options for the tint effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct TintOptions {
    /// Composite the tinted layer over its own radius-1 blur.
    pub glow: bool,
}

/// Apply `effect` to `src`.
///
/// # Errors
///
/// Propagates compositing errors; these only occur if an intermediate layer
/// ends up with a different size than the source.
pub fn apply(effect: Effect, src: &RgbaImage, tint_opts: &TintOptions) -> Result<RgbaImage> {
    debug!("applying {effect} to {}x{} image", src.width(), src.height());
    match effect {
        Effect::Tint => tint(src, tint_opts),
        Effect::Blend => blend(src),
        Effect::Backdrop => backdrop(src),
    }
}

/// Turn a sketch into translucent blue linework.
///
/// Darker source pixels become more opaque (capped at 180). Lines
/// (contrast-boosted luma below 200) get a saturated blue; lighter areas get a
/// pale blue at 30% of their opacity. Fully transparent source pixels stay
/// `(0, 0, 0, 0)`.
///
/// # Errors
///
/// See [`apply`].
pub fn tint(src: &RgbaImage, opts: &TintOptions) -> Result<RgbaImage> {
    let gray = contrast_gray(&luma(src), MASK_CONTRAST);

    let mut tinted = RgbaImage::new(src.width(), src.height());
    for ((out, px), g) in tinted.pixels_mut().zip(src.pixels()).zip(gray.pixels()) {
        if px[3] == 0 {
            continue;
        }
        let g = g[0];
        let opacity = (255 - g).min(TINT_MAX_OPACITY);
        *out = if g < LINE_CUTOFF {
            with_alpha(TINT_LINE, opacity)
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let a = (f64::from(opacity) * TINT_HIGHLIGHT_OPACITY) as u8;
            with_alpha(TINT_HIGHLIGHT, a)
        };
    }

    if !opts.glow {
        return Ok(tinted);
    }
    debug!("tint: compositing over radius-1 glow");
    let glow = gaussian_blur(&tinted, 1.0);
    alpha_composite(&glow, &tinted)
}

/// Blend a sketch toward a vertical blue-to-purple gradient.
///
/// Light areas (by contrast-boosted, thresholded and softened luma) take the
/// gradient color; dark lines keep the source color. Source alpha is kept. The
/// blended layer is then pasted over a brightened, blurred copy of itself.
///
/// # Errors
///
/// See [`apply`].
pub fn blend(src: &RgbaImage) -> Result<RgbaImage> {
    let (width, height) = src.dimensions();
    let gradient = linear_gradient(
        width,
        height,
        BLEND_START,
        BLEND_END,
        BLEND_GRADIENT_ALPHA,
        GradientDirection::Vertical,
    );

    let mask = threshold_up(&contrast_gray(&luma(src), MASK_CONTRAST), LINE_CUTOFF);
    let mask = gaussian_blur_gray(&mask, 1.0);
    debug!("blend: mask and gradient ready");

    let mut blended = RgbaImage::new(width, height);
    for (((out, px), grad), m) in blended
        .pixels_mut()
        .zip(src.pixels())
        .zip(gradient.pixels())
        .zip(mask.pixels())
    {
        if px[3] == 0 {
            continue;
        }
        let f = f64::from(m[0]) / 255.0;
        for ch in 0..3 {
            let v = f64::from(px[ch]) * (1.0 - f) + f64::from(grad[ch]) * f;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                out[ch] = v.clamp(0.0, 255.0) as u8;
            }
        }
        out[3] = px[3];
    }

    let glow = brightness(
        &gaussian_blur(&blended, BLEND_GLOW_RADIUS),
        BLEND_GLOW_BRIGHTNESS,
    );
    debug!("blend: glow ready, pasting layers");

    let mut canvas = RgbaImage::new(width, height);
    paste_layer(&mut canvas, &glow)?;
    paste_layer(&mut canvas, &blended)?;
    Ok(canvas)
}

/// Place a toned-down sketch over a soft horizontal purple-to-blue backdrop.
///
/// The source gets a contrast boost and slight desaturation, is composited
/// over a blurred translucent gradient, and the result is composited over a
/// twice-blurred copy of itself. Transparent source pixels show the backdrop.
///
/// # Errors
///
/// See [`apply`].
pub fn backdrop(src: &RgbaImage) -> Result<RgbaImage> {
    let (width, height) = src.dimensions();
    let gradient = gaussian_blur(
        &linear_gradient(
            width,
            height,
            BACKDROP_START,
            BACKDROP_END,
            BACKDROP_GRADIENT_ALPHA,
            GradientDirection::Horizontal,
        ),
        BACKDROP_GRADIENT_BLUR,
    );

    let toned = color(&contrast(src, BACKDROP_CONTRAST), BACKDROP_SATURATION);
    let result = alpha_composite(&gradient, &toned)?;
    debug!("backdrop: sketch composited over gradient");

    let glow = gaussian_blur(
        &gaussian_blur(&result, BACKDROP_GLOW_RADIUS),
        BACKDROP_GLOW_RADIUS,
    );
    alpha_composite(&glow, &result)
}

fn with_alpha(rgb: [u8; 3], a: u8) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], a])
}
