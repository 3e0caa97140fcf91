//! Batch conversion of a PAGE XML directory into PNG masks.
//!
//! Every annotation file is one independent task: read, rasterize, write.
//! Tasks run on a rayon pool and report back over a channel, so results are
//! drained in completion order.
//!
//! Failure policy is fail-fast: the first task error observed ends the wait
//! and is returned as-is. Tasks already queued or running are not cancelled;
//! they keep going in the background and may still write masks after the
//! error is reported. A panicking task is caught on its worker and reported
//! as an error like any other. The summary is only produced when every task
//! has reported success.

pub mod progress;
pub mod report;

pub use progress::ProgressReporter;
pub use report::{ConversionSummary, MaskOutcome};

use std::fs;
use std::any::Any;
use std::io::ErrorKind;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::discovery::{discover, plan_work_items, WorkItem};
use crate::error::PageMaskError;
use crate::pagexml::read_page_xml;
use crate::raster::rasterize;
use crate::writer::save_mask;

pub const DEFAULT_INPUT_DIR: &str = "Dataconverstion";
pub const DEFAULT_OUTPUT_DIR: &str = "ProcessedData";

/// Options for one batch run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Remove and recreate `output_dir` before any task starts.
    pub delete_previous: bool,
    /// Worker count; `None` lets rayon pick from available parallelism.
    pub jobs: Option<usize>,
    pub show_progress: bool,
}

impl ConvertOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            delete_previous: true,
            jobs: None,
            show_progress: false,
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR)
    }
}

/// Convert every annotation file in `options.input_dir`.
pub fn convert(options: &ConvertOptions) -> Result<ConversionSummary, PageMaskError> {
    let discovered = discover(&options.input_dir)?;
    prepare_output_dir(
        &options.output_dir,
        &options.input_dir,
        options.delete_previous,
    )?;

    let items = plan_work_items(&options.input_dir, &discovered);
    let total = items.len();
    info!(
        annotations = total,
        images = discovered.image_names.len(),
        "starting conversion"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.unwrap_or(0))
        .thread_name(|idx| format!("pagemask-worker-{idx}"))
        .panic_handler(|payload| {
            error!(message = %panic_message(payload.as_ref()), "worker panicked outside a task");
        })
        .build()?;
    debug!(workers = pool.current_num_threads(), "worker pool ready");

    let (sender, receiver) = mpsc::channel();
    for item in items {
        let sender = sender.clone();
        let output_dir = options.output_dir.clone();
        pool.spawn(move || {
            let result = catch_task_panic(&item.annotation_path, || {
                process_work_item(&item, &output_dir)
            });
            // The receiver is gone once the batch has failed.
            let _ = sender.send(result);
        });
    }
    drop(sender);

    let progress = ProgressReporter::new(total, options.show_progress);
    let mut masks_written = 0;
    for result in receiver {
        match result {
            Ok(outcome) => {
                progress.item_done(&outcome);
                masks_written += 1;
            }
            Err(err) => {
                progress.abandon();
                warn!("stopping batch after first failure; in-flight tasks are not cancelled");
                return Err(err);
            }
        }
    }

    if masks_written != total {
        progress.abandon();
        return Err(PageMaskError::IncompleteBatch {
            expected: total,
            received: masks_written,
        });
    }
    progress.finish();

    Ok(ConversionSummary {
        total_images: discovered.image_names.len(),
        total_page_xmls: discovered.annotation_names.len(),
        total_binary_masks: count_entries(&options.output_dir)?,
        masks_written,
    })
}

/// Read, rasterize and write one annotation file.
pub fn process_work_item(item: &WorkItem, output_dir: &Path) -> Result<MaskOutcome, PageMaskError> {
    let page = read_page_xml(&item.annotation_path)?;
    let mask = rasterize(
        page.metadata.image_width,
        page.metadata.image_height,
        &page.text_lines,
    )?;
    let mask_path = save_mask(&mask, output_dir, &item.stem)?;

    debug!(
        annotation = %item.annotation_name,
        mask = %mask_path.display(),
        lines = page.text_lines.len(),
        "mask written"
    );

    Ok(MaskOutcome {
        annotation_name: item.annotation_name.clone(),
        mask_path,
        width: mask.width(),
        height: mask.height(),
        text_lines: page.text_lines.len(),
    })
}

/// Run one task, turning a panic into [`PageMaskError::TaskPanicked`].
///
/// Without this a panicking task would drop its result sender silently and
/// then take the whole process down with it on the rayon worker.
fn catch_task_panic<F>(annotation: &Path, task: F) -> Result<MaskOutcome, PageMaskError>
where
    F: FnOnce() -> Result<MaskOutcome, PageMaskError>,
{
    panic::catch_unwind(AssertUnwindSafe(task)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!(annotation = %annotation.display(), %message, "conversion task panicked");
        Err(PageMaskError::TaskPanicked {
            annotation: annotation.to_path_buf(),
            message,
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Make sure `output_dir` exists, optionally emptying it first.
///
/// Deletion is refused when `output_dir` is, or contains, `input_dir`.
pub fn prepare_output_dir(
    output_dir: &Path,
    input_dir: &Path,
    delete_previous: bool,
) -> Result<(), PageMaskError> {
    if delete_previous {
        if contains_dir(output_dir, input_dir) {
            return Err(PageMaskError::UnsafeOutputDir {
                output: output_dir.to_path_buf(),
                input: input_dir.to_path_buf(),
            });
        }

        match fs::remove_dir_all(output_dir) {
            Ok(()) => info!(dir = %output_dir.display(), "removed previous output"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(PageMaskError::Filesystem {
                    path: output_dir.to_path_buf(),
                    source,
                })
            }
        }
    }

    fs::create_dir_all(output_dir).map_err(PageMaskError::filesystem(output_dir))
}

fn contains_dir(outer: &Path, inner: &Path) -> bool {
    match (fs::canonicalize(outer), fs::canonicalize(inner)) {
        (Ok(outer), Ok(inner)) => inner.starts_with(outer),
        _ => false,
    }
}

fn count_entries(dir: &Path) -> Result<usize, PageMaskError> {
    let mut count = 0;
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        entry.map_err(|err| PageMaskError::Filesystem {
            path: dir.to_path_buf(),
            source: err.into(),
        })?;
        count += 1;
    }
    Ok(count)
}
