//! Batch summary and per-file outcome types.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Result of converting one annotation file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MaskOutcome {
    pub annotation_name: String,
    pub mask_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub text_lines: usize,
}

impl MaskOutcome {
    /// One-line status shown as each file completes.
    pub fn status_line(&self) -> String {
        format!("Processed {}", self.annotation_name)
    }
}

/// Summary printed after a successful batch.
///
/// `total_binary_masks` counts every entry in the output directory after the
/// run, so unrelated files already there are included. `masks_written` is
/// the number of masks this run actually produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub total_images: usize,
    pub total_page_xmls: usize,
    pub total_binary_masks: usize,
    pub masks_written: usize,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "All Binary Masks saved successfully")?;
        writeln!(f, "Total Images: {}", self.total_images)?;
        writeln!(f, "Total PageXmls: {}", self.total_page_xmls)?;
        writeln!(f, "Total Binary Masks: {}", self.total_binary_masks)
    }
}
