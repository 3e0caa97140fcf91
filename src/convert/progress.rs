//! Progress display for a single batch.

use indicatif::{ProgressBar, ProgressStyle};

use super::report::MaskOutcome;

const DESCRIPTION: &str = "Processing PageXml Files";
const TEMPLATE: &str = "{msg}: {percent:>3}%|{wide_bar}| {pos}/{len} [{elapsed_precise}<{eta_precise}]";

/// Counts finished work items for one `convert` call.
///
/// Status lines go to stdout; the bar itself draws on stderr and hides
/// itself when stderr is not a terminal.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(total: usize, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(DESCRIPTION);
        Self { bar }
    }

    /// Record one completed item and print its status line.
    pub fn item_done(&self, outcome: &MaskOutcome) {
        self.bar.suspend(|| println!("{}", outcome.status_line()));
        self.bar.inc(1);
    }

    pub fn completed(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(self) {
        self.bar.finish();
    }

    /// Leave the bar where it stopped after a failed item.
    pub fn abandon(self) {
        self.bar.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn hidden_reporter_still_counts() {
        let reporter = ProgressReporter::new(2, false);
        let outcome = MaskOutcome {
            annotation_name: "a.xml".to_string(),
            mask_path: PathBuf::from("a.png"),
            width: 1,
            height: 1,
            text_lines: 0,
        };
        reporter.item_done(&outcome);
        reporter.item_done(&outcome);
        assert_eq!(reporter.completed(), 2);
        reporter.finish();
    }
}
