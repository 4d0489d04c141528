use std::cell::OnceCell;

use indicatif::{ProgressBar, ProgressStyle};
use kn_core::enums::ItemState;
use kn_core::report::{ItemReport, RunResult};
use kn_sync::ProgressObserver;

use crate::ui;

pub struct Progress {
    bar: Option<ProgressBar>,
}

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
}

fn bar_template() -> &'static str {
    match terminal_columns() {
        Some(cols) if cols >= 110 => "{bar:40.cyan/blue} {pos}/{len} {msg}",
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {percent}% {msg}",
    }
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    #[must_use]
    pub fn bar(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Drives a progress bar from orchestrator events.
///
/// The bar is created on `on_start`, once the item count is known.
#[derive(Default)]
pub struct ImportProgress {
    bar: OnceCell<Progress>,
}

impl ProgressObserver for ImportProgress {
    fn on_start(&self, total: usize) {
        let total = u64::try_from(total).unwrap_or(u64::MAX);
        let _ = self.bar.set(Progress::bar(total, "importing"));
    }

    fn on_item(&self, report: &ItemReport) {
        let Some(bar) = self.bar.get() else {
            return;
        };
        if report.state == ItemState::Failed {
            bar.set_message(&format!("failed: {}", report.title));
        } else {
            bar.set_message(&report.title);
        }
        bar.inc(1);
    }

    fn on_finish(&self, result: &RunResult) {
        let Some(bar) = self.bar.get() else {
            return;
        };
        if result.processed == 0 {
            bar.finish_clear();
        } else {
            bar.finish_ok(&format!(
                "{} imported, {} skipped, {} failed",
                result.imported,
                result.skipped,
                result.failed_count()
            ));
        }
    }
}
