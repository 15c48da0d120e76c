//! Tint, gradient-blend and glow effects for RGBA sketch images.
//!
//! Three fixed effects turn a pencil sketch (dark lines on light paper) into a
//! web-ready RGBA asset:
//!
//! - [`Effect::Tint`]: translucent blue linework on a transparent canvas, with
//!   opacity driven by darkness.
//! - [`Effect::Blend`]: paper areas blended into a vertical blue-to-purple
//!   gradient, pasted over a brightened glow.
//! - [`Effect::Backdrop`]: the sketch, slightly toned down, composited over a
//!   soft purple-to-blue backdrop and its own glow.
//!
//! Each is built from the primitives in [`enhance`], [`blur`], [`gradient`]
//! and [`compositing`], and is deterministic.
//!
//! # Quick Start
//!
//! ```no_run
//! use sketch_effects::{effects, Effect, TintOptions};
//!
//! let img = image::open("mia.png").unwrap().to_rgba8();
//! let out = effects::apply(Effect::Blend, &img, &TintOptions::default()).unwrap();
//! out.save("mia_blended.png").unwrap();
//! ```
//!
//! # Files
//!
//! ```no_run
//! use std::path::Path;
//! use sketch_effects::{default_output_path, process_file, Effect, ProcessOptions};
//!
//! let input = Path::new("mia.png");
//! let opts = ProcessOptions { effect: Effect::Tint, ..ProcessOptions::default() };
//! let result = process_file(input, &default_output_path(input, opts.effect), &opts);
//! assert!(result.success, "{}", result.message);
//! ```

#![deny(missing_docs)]

pub mod blur;
pub mod compositing;
pub mod effects;
pub mod enhance;
mod engine;
pub mod error;
pub mod gradient;

pub use effects::{Effect, TintOptions};
pub use engine::{
    default_output_path, ensure_parent_dir, is_supported_image, load_rgba, process_directory,
    process_file, save_image, ProcessOptions, ProcessResult,
};
pub use error::{Error, Result};
