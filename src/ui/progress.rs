use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::dispatch::DispatchObserver;
use crate::output;
use crate::translation::{BackendError, language_name};

const TEMPLATE: &str = "{spinner:.green} {prefix:<24} [{bar:40.green/dim}] {pos}/{len} {elapsed} {msg}";

/// One progress bar per target language, driven by dispatch events.
///
/// Hidden in quiet mode. Bars of finished languages stay on screen.
pub struct DispatchProgress {
    multi: MultiProgress,
    current: Option<ProgressBar>,
}

impl DispatchProgress {
    pub fn new() -> Self {
        let multi = if output::is_quiet() {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::stderr())
        };
        Self {
            multi,
            current: None,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
            .progress_chars("=> ")
    }
}

impl Default for DispatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchObserver for DispatchProgress {
    fn language_started(&mut self, language: &str, total: usize) {
        let bar = self.multi.add(ProgressBar::new(total as u64));
        bar.set_style(Self::style());
        bar.set_prefix(format!(
            "{} ({language})",
            language_name(language).unwrap_or(language)
        ));
        bar.enable_steady_tick(Duration::from_millis(80));
        self.current = Some(bar);
    }

    fn batch_translated(&mut self, _language: &str, count: usize) {
        if let Some(bar) = &self.current {
            bar.inc(count as u64);
        }
    }

    fn language_finished(&mut self, _language: &str) {
        if let Some(bar) = self.current.take() {
            bar.finish();
        }
    }

    fn language_failed(&mut self, _language: &str, error: &BackendError) {
        if let Some(bar) = self.current.take() {
            bar.abandon_with_message(format!("failed: {error}"));
        }
    }
}

impl Drop for DispatchProgress {
    fn drop(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.finish_and_clear();
        }
    }
}
