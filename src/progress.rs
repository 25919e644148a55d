use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Bar for per-record classification work, one tick per stored blob
pub fn record_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} records")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

/// Spinner shown while a batch decrypt is in flight; record count in the
/// message, never record contents
pub fn decrypt_spinner(total_records: usize) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap());
    pb.set_message(format!("Decrypting {} records", total_records));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Finish either kind of bar with a done message
pub fn finish(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}
