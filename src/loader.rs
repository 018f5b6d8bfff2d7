use std::io::ErrorKind;
use std::path::Path;

use image::{DynamicImage, ImageError, ImageReader};

use crate::error::{FloorplanError, Result};

/// Extensions offered in the open dialog and accepted on drop.
pub static SUPPORTED_IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

fn has_extension(path: &Path, exts: &[&str]) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
        return false;
    };
    exts.iter().any(|known| ext.eq_ignore_ascii_case(known))
}

/// Returns `true` if the path has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    has_extension(path, SUPPORTED_IMAGE_EXTS)
}

/// Decode an image from disk, guessing the format from its contents.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let decode_failure = |source: ImageError| FloorplanError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    };

    let reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(FloorplanError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(decode_failure(ImageError::IoError(err))),
    };
    let reader = reader
        .with_guessed_format()
        .map_err(|err| decode_failure(ImageError::IoError(err)))?;
    reader.decode().map_err(decode_failure)
}

/// Downscale `img` so neither edge exceeds `max_edge`, for texture upload.
pub fn preview(img: &DynamicImage, max_edge: u32) -> DynamicImage {
    if img.width() > max_edge || img.height() > max_edge {
        img.thumbnail(max_edge, max_edge)
    } else {
        img.clone()
    }
}
