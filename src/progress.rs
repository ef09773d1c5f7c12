//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for stage load operations
#[derive(Debug)]
pub struct ProgressReporter {
    table_pb: Option<ProgressBar>,
    show_progress: bool,
}

impl ProgressReporter {
    /// Create progress reporter for load operations
    pub fn new_for_load() -> Self {
        Self {
            table_pb: None,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            table_pb: None,
            show_progress: false,
        }
    }

    /// Begin a table load with a known row total
    pub fn start_table(&mut self, table: &str, total_rows: u64) {
        self.finish_table("");
        if self.show_progress {
            self.table_pb = Some(create_progress_bar(
                total_rows,
                &format!("Loading {}", table),
            ));
        }
    }

    /// Begin an indeterminate phase (id resolution, linking)
    pub fn start_phase(&mut self, message: &str) {
        self.finish_table("");
        if self.show_progress {
            self.table_pb = Some(create_spinner(message));
        }
    }

    /// Update processed row count for the current table
    pub fn update_rows(&mut self, processed: u64) {
        if let Some(pb) = &self.table_pb {
            pb.set_position(processed);
        }
    }

    /// Finish the current table or phase
    pub fn finish_table(&mut self, message: &str) {
        if let Some(pb) = self.table_pb.take() {
            if message.is_empty() {
                pb.finish_and_clear();
            } else {
                pb.finish_with_message(message.to_string());
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Ensure progress bars are cleaned up silently
        if let Some(pb) = self.table_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar with known total
fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} ({per_sec}) {msg}")
            .expect("Invalid progress template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
