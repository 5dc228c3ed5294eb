//! Progress display for variant builds

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the variants of one run
///
/// The bar is cleared while the build tool runs so its output is not
/// interleaved with redraws. When stderr is not a terminal indicatif hides it.
pub struct BuildProgress {
    bar: ProgressBar,
}

impl BuildProgress {
    /// Create a new progress display with total variant count
    pub fn new(total_variants: usize) -> Self {
        let bar = ProgressBar::new(total_variants as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }

    /// Show which variant is being built
    pub fn start_variant(&self, makefile: &str, current: usize, total: usize) {
        self.bar
            .set_message(format!("({current}/{total}) make -f {makefile}"));
    }

    /// Run `f` with the bar cleared
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn finish_variant(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Abandon on interrupt
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
