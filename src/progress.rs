//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Phase spinners for a comparison run
#[derive(Debug)]
pub struct ProgressReporter {
    load_pb: Option<ProgressBar>,
    diff_pb: Option<ProgressBar>,
    show_progress: bool,
    start_time: std::time::Instant,
}

impl ProgressReporter {
    /// Reporter with visible spinners for interactive runs
    pub fn new() -> Self {
        Self {
            load_pb: Some(create_spinner("Loading datasets...")),
            diff_pb: None,
            show_progress: true,
            start_time: std::time::Instant::now(),
        }
    }

    /// Silent reporter for JSON and machine-readable output
    pub fn new_minimal() -> Self {
        Self {
            load_pb: None,
            diff_pb: None,
            show_progress: false,
            start_time: std::time::Instant::now(),
        }
    }

    /// Finish the load phase and start the comparison spinner
    pub fn finish_load(&mut self, message: &str) {
        if let Some(pb) = self.load_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        if self.show_progress {
            self.diff_pb = Some(create_spinner("Comparing datasets..."));
        }
    }

    /// Finish all remaining spinners
    pub fn finish(&mut self, message: &str) {
        if let Some(pb) = self.load_pb.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = self.diff_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    /// Seconds elapsed since the reporter was created
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
