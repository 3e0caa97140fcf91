//! Input directory scanning and annotation/image pairing.
//!
//! The input directory is flat: PAGE XML files sit next to the page images
//! they describe, paired by filename stem (`page_001.xml` <-> `page_001.jpg`).
//! Only the top level is scanned.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::PageMaskError;

pub const IMAGE_EXTENSION: &str = ".jpg";
pub const ANNOTATION_EXTENSION: &str = ".xml";
pub const MASK_EXTENSION: &str = ".png";

/// Filenames found in the input directory, in directory-listing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Discovered {
    pub image_names: Vec<String>,
    pub annotation_names: Vec<String>,
}

/// One annotation file to convert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    /// Annotation filename, e.g. `page_001.xml`.
    pub annotation_name: String,
    /// Filename up to the first `.`, e.g. `page_001`.
    pub stem: String,
    /// Expected companion image filename, e.g. `page_001.jpg`.
    pub image_name: String,
    pub annotation_path: PathBuf,
    pub image_path: PathBuf,
}

impl WorkItem {
    /// Derive a work item from an annotation filename inside `input_dir`.
    pub fn derive(input_dir: &Path, annotation_name: &str) -> Self {
        let stem = file_stem_at_first_dot(annotation_name).to_string();
        let image_name = format!("{stem}{IMAGE_EXTENSION}");

        Self {
            annotation_name: annotation_name.to_string(),
            annotation_path: input_dir.join(annotation_name),
            image_path: input_dir.join(&image_name),
            image_name,
            stem,
        }
    }

    /// Filename of the mask this item produces.
    pub fn mask_name(&self) -> String {
        format!("{}{MASK_EXTENSION}", self.stem)
    }
}

/// Everything before the first `.` in `file_name`.
///
/// `a.b.xml` yields `a`, not `a.b`, so multi-dot names are truncated early.
pub fn file_stem_at_first_dot(file_name: &str) -> &str {
    file_name
        .split_once('.')
        .map_or(file_name, |(stem, _)| stem)
}

/// List the top level of `input_dir` and partition files by extension.
///
/// Extension matching is case-sensitive. Entries whose names are not valid
/// UTF-8 are skipped with a warning.
pub fn discover(input_dir: &Path) -> Result<Discovered, PageMaskError> {
    if !input_dir.is_dir() {
        return Err(PageMaskError::InputDirNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    let mut discovered = Discovered::default();

    for entry in WalkDir::new(input_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| PageMaskError::Filesystem {
            path: input_dir.to_path_buf(),
            source: source.into(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(
                path = %entry.path().display(),
                "skipping entry with non-UTF-8 filename"
            );
            continue;
        };

        if name.ends_with(IMAGE_EXTENSION) {
            discovered.image_names.push(name.to_string());
        }
        if name.ends_with(ANNOTATION_EXTENSION) {
            discovered.annotation_names.push(name.to_string());
        }
    }

    debug!(
        images = discovered.image_names.len(),
        annotations = discovered.annotation_names.len(),
        dir = %input_dir.display(),
        "scanned input directory"
    );

    Ok(discovered)
}

/// Build work items for every discovered annotation file.
///
/// Items keep discovery order. Missing companion images and stems shared by
/// several annotation files are logged; neither stops the batch, and for a
/// shared stem whichever task finishes last owns the mask.
pub fn plan_work_items(input_dir: &Path, discovered: &Discovered) -> Vec<WorkItem> {
    let items: Vec<WorkItem> = discovered
        .annotation_names
        .iter()
        .map(|name| WorkItem::derive(input_dir, name))
        .collect();

    let mut by_stem: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for item in &items {
        by_stem
            .entry(item.stem.as_str())
            .or_default()
            .push(item.annotation_name.as_str());

        if !discovered.image_names.contains(&item.image_name) {
            warn!(
                annotation = %item.annotation_name,
                image = %item.image_name,
                "no companion image found for annotation file"
            );
        }
    }

    for (stem, names) in by_stem.iter().filter(|(_, names)| names.len() > 1) {
        warn!(
            stem = %stem,
            files = ?names,
            "annotation files share a stem; their masks overwrite each other"
        );
    }

    items
}
