//! Error types for the sketch-effects crate.

/// Errors that can occur while building or saving an effect.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two rasters that must share a size do not.
    #[error("dimension mismatch: expected {width}x{height}, got {actual_width}x{actual_height}")]
    DimensionMismatch {
        /// Width of the destination raster.
        width: u32,
        /// Height of the destination raster.
        height: u32,
        /// Width of the offending raster.
        actual_width: u32,
        /// Height of the offending raster.
        actual_height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output format cannot carry an alpha channel, or is unknown.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred while decoding or encoding an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::DimensionMismatch`] unless both sizes are equal.
pub(crate) fn ensure_same_size(expected: (u32, u32), actual: (u32, u32)) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            width: expected.0,
            height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("jpeg".to_string());
        assert!(unsupported.to_string().contains("jpeg"));

        let mismatch = Error::DimensionMismatch {
            width: 10,
            height: 20,
            actual_width: 30,
            actual_height: 40,
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("10x20"));
        assert!(msg.contains("30x40"));
    }

    #[test]
    fn ensure_same_size_accepts_equal_and_rejects_different() {
        assert!(ensure_same_size((4, 4), (4, 4)).is_ok());
        assert!(matches!(
            ensure_same_size((4, 4), (4, 5)),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
