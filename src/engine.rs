//! File-level processing: load, apply an effect, save.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use log::{debug, info, warn};

use crate::effects::{self, Effect, TintOptions};
use crate::error::{Error, Result};

/// Options controlling file processing.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Effect to apply.
    pub effect: Effect,
    /// Composite the tint effect over its own glow.
    pub tint_glow: bool,
    /// Enable verbose output.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl ProcessOptions {
    fn tint_options(&self) -> TintOptions {
        TintOptions {
            glow: self.tint_glow,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Path the output was (or would have been) written to.
    pub output: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, output: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            output: output.to_path_buf(),
            success: false,
            message,
        }
    }
}

/// Load any decodable image and convert it to RGBA.
///
/// # Errors
///
/// Returns [`Error::Image`] if the file cannot be opened or decoded.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

/// Process a single image file: load, apply the effect, save.
///
/// Returns a [`ProcessResult`] indicating success or failure; errors are
/// reported in the result rather than propagated.
#[must_use]
pub fn process_file(input: &Path, output: &Path, opts: &ProcessOptions) -> ProcessResult {
    let src = match load_rgba(input) {
        Ok(img) => img,
        Err(e) => {
            warn!("failed to load {}: {e}", input.display());
            return ProcessResult::failed(input, output, format!("Failed to load: {e}"));
        }
    };
    debug!(
        "loaded {} ({}x{})",
        input.display(),
        src.width(),
        src.height()
    );

    let rendered = match effects::apply(opts.effect, &src, &opts.tint_options()) {
        Ok(img) => img,
        Err(e) => {
            return ProcessResult::failed(input, output, format!("Effect failed: {e}"));
        }
    };

    if let Err(e) = ensure_parent_dir(output) {
        return ProcessResult::failed(
            input,
            output,
            format!("Failed to create output directory: {e}"),
        );
    }

    match save_image(&rendered, output) {
        Ok(()) => {
            info!("{} -> {} ({})", input.display(), output.display(), opts.effect);
            ProcessResult {
                path: input.to_path_buf(),
                output: output.to_path_buf(),
                success: true,
                message: format!("Applied {} effect", opts.effect),
            }
        }
        Err(e) => ProcessResult::failed(input, output, format!("Failed to save: {e}")),
    }
}

/// Process all supported images in a directory.
///
/// Each output is written to `output_dir` as `<stem>.png`. Inputs are claimed
/// in path order: an input whose output name is already taken by an earlier
/// one (`mia.bmp` and `mia.png`), or whose output would overwrite an input
/// file, is reported as failed and not processed. Uses parallel iteration
/// when the `cli` feature is enabled (via rayon).
#[must_use]
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    opts: &ProcessOptions,
) -> Vec<ProcessResult> {
    let mut inputs: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect(),
        Err(e) => {
            return vec![ProcessResult::failed(
                input_dir,
                output_dir,
                format!("Failed to read directory: {e}"),
            )];
        }
    };
    inputs.sort();

    if let Err(e) = std::fs::create_dir_all(output_dir).map_err(Error::from) {
        return vec![ProcessResult::failed(
            input_dir,
            output_dir,
            format!("Failed to create output directory: {e}"),
        )];
    }

    debug!(
        "{} image(s) found in {}",
        inputs.len(),
        input_dir.display()
    );

    let (jobs, mut rejected) = plan_outputs(inputs, input_dir, output_dir);

    let run = |(input, output): &(PathBuf, PathBuf)| process_file(input, output, opts);

    #[cfg(feature = "cli")]
    let mut results: Vec<ProcessResult> = {
        use rayon::prelude::*;
        jobs.par_iter().map(run).collect()
    };

    #[cfg(not(feature = "cli"))]
    let mut results: Vec<ProcessResult> = jobs.iter().map(run).collect();

    results.append(&mut rejected);
    results
}

/// Pair each input with its `<stem>.png` output in `output_dir`.
///
/// Returns the runnable `(input, output)` jobs and a failed result for every
/// input whose output collides with an earlier input's output or, when both
/// directories are the same, with an input file.
fn plan_outputs(
    inputs: Vec<PathBuf>,
    input_dir: &Path,
    output_dir: &Path,
) -> (Vec<(PathBuf, PathBuf)>, Vec<ProcessResult>) {
    let same_dir = match (input_dir.canonicalize(), output_dir.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input_dir == output_dir,
    };

    // Outputs that would land on one of the inputs themselves.
    let occupied: HashSet<PathBuf> = if same_dir {
        inputs
            .iter()
            .filter_map(|p| p.file_name())
            .map(|name| output_dir.join(name))
            .collect()
    } else {
        HashSet::new()
    };

    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut jobs = Vec::with_capacity(inputs.len());
    let mut rejected = Vec::new();

    for input in inputs {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let output = output_dir.join(format!("{stem}.png"));

        if occupied.contains(&output) {
            warn!("refusing to overwrite input {}", output.display());
            rejected.push(ProcessResult::failed(
                &input,
                &output,
                "Output would overwrite an input file".to_string(),
            ));
            continue;
        }

        if let Some(first) = claimed.get(&output) {
            warn!(
                "{} and {} both map to {}",
                first.display(),
                input.display(),
                output.display()
            );
            let message = format!(
                "Output {} already used by {}",
                output.display(),
                first.display()
            );
            rejected.push(ProcessResult::failed(&input, &output, message));
            continue;
        }

        claimed.insert(output.clone(), input.clone());
        jobs.push((input, output));
    }

    (jobs, rejected)
}

/// Create the parent directory of `output` if it does not exist yet.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be created.
pub fn ensure_parent_dir(output: &Path) -> Result<()> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "png" | "jpg" | "jpeg" | "webp" | "bmp" | "tif" | "tiff"
        ),
        None => false,
    }
}

/// Save an RGBA image, choosing the format from the file extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for unknown extensions and for formats
/// that cannot store an alpha channel (JPEG), or an encoding/I/O error.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp | ImageFormat::Tiff => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!(
                "{format:?} (output needs an alpha channel)"
            )));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path and effect.
///
/// Example: `"mia.jpg"` with [`Effect::Blend`] becomes `"mia_blended.png"`.
#[must_use]
pub fn default_output_path(input: &Path, effect: Effect) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_{}.png", effect.output_suffix()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn default_output_path_uses_effect_suffix_and_png() {
        let p = default_output_path(Path::new("/tmp/mia.png"), Effect::Tint);
        assert_eq!(p, PathBuf::from("/tmp/mia_transparent.png"));

        let p = default_output_path(Path::new("/tmp/mia.jpg"), Effect::Blend);
        assert_eq!(p, PathBuf::from("/tmp/mia_blended.png"));

        let p = default_output_path(Path::new("mia.webp"), Effect::Backdrop);
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "mia_processed.png"
        );
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
        assert!(is_supported_image(Path::new("photo.bmp")));
        assert!(is_supported_image(Path::new("scan.TIF")));
    }

    #[test]
    fn is_supported_image_rejects_unsupported_formats() {
        assert!(!is_supported_image(Path::new("photo.gif")));
        assert!(!is_supported_image(Path::new("photo.txt")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn save_image_rejects_jpeg_and_unknown_extensions() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        assert!(matches!(
            save_image(&img, Path::new("out.jpg")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            save_image(&img, Path::new("out.nope")),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn ensure_parent_dir_reports_io_error_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let err = ensure_parent_dir(&blocker.join("sub").join("out.png")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn ensure_parent_dir_accepts_bare_file_names() {
        assert!(ensure_parent_dir(Path::new("out.png")).is_ok());
    }

    #[test]
    fn plan_outputs_rejects_later_input_with_same_stem() {
        let out = Path::new("/tmp/out");
        let inputs = vec![
            PathBuf::from("/tmp/in/mia.bmp"),
            PathBuf::from("/tmp/in/mia.png"),
        ];
        let (jobs, rejected) = plan_outputs(inputs, Path::new("/tmp/in"), out);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].0, PathBuf::from("/tmp/in/mia.bmp"));
        assert_eq!(jobs[0].1, out.join("mia.png"));
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].path, PathBuf::from("/tmp/in/mia.png"));
        assert!(!rejected[0].success);
        assert!(rejected[0].message.contains("already used by"));
    }

    #[test]
    fn process_file_reports_missing_input() {
        let result = process_file(
            Path::new("/definitely/not/here.png"),
            Path::new("/tmp/never-written.png"),
            &ProcessOptions::default(),
        );
        assert!(!result.success);
        assert!(result.message.starts_with("Failed to load"));
    }
}
