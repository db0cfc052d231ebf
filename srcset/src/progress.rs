//! Per-image progress lines and a progress bar on stderr.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use srcsetmaker::{ImageOutcome, RunObserver};

/// Prints `Processing: <name>` for each image above an indicatif bar.
///
/// The bar draws only when stderr is a terminal. Text lines are printed
/// through [`ProgressBar::suspend`] so they never tear the bar.
pub struct Progress {
    bar: ProgressBar,
    print_lines: bool,
}

impl Progress {
    pub fn new(print_lines: bool) -> Self {
        let bar = if print_lines {
            let bar = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            {
                bar.set_style(style.progress_chars("=>-"));
            }
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar, print_lines }
    }

    fn line(&self, text: String) {
        if self.print_lines {
            self.bar.suspend(|| println!("{text}"));
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RunObserver for Progress {
    fn on_found(&mut self, count: usize) {
        self.bar.set_length(count as u64);
        self.line(format!("Found {count} image file(s) to process."));
    }

    fn on_image(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.line(format!("Processing: {name}"));
    }

    fn on_outcome(&mut self, outcome: &ImageOutcome) {
        if !outcome.failed.is_empty() {
            let buckets: Vec<String> = outcome.failed.iter().map(|b| b.to_string()).collect();
            self.bar.suspend(|| {
                eprintln!(
                    "warning: {}: no output for {}",
                    outcome.source.display(),
                    buckets.join(", ")
                )
            });
        }
        self.bar.inc(1);
    }
}
