//! PNG mask writer.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::discovery::MASK_EXTENSION;
use crate::error::PageMaskError;

/// Encode `mask` as an 8-bit RGB PNG at `output_dir/<stem>.png`.
///
/// An existing file at that path is overwritten. Returns the written path.
pub fn save_mask(mask: &RgbImage, output_dir: &Path, stem: &str) -> Result<PathBuf, PageMaskError> {
    let path = output_dir.join(format!("{stem}{MASK_EXTENSION}"));
    mask.save_with_format(&path, ImageFormat::Png)
        .map_err(|source| PageMaskError::MaskWrite {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
