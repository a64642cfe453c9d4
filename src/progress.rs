//! Progress reporting: a row-count spinner for loads whose total row count
//! is unknown up front (the input is single-pass, so it cannot be counted
//! without consuming it).

use indicatif::{ProgressBar, ProgressStyle};

pub fn make_row_progress(label: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos} rows  it/s: {per_sec}  elapsed: {elapsed_precise}",
    )
    .unwrap();
    pb.set_style(style);
    if let Some(msg) = label {
        pb.set_message(msg.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
