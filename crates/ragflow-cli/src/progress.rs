use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for an in-flight request
///
/// Hidden in JSON mode so machine output stays clean.
pub fn create_spinner(message: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a spinner with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a spinner with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}

/// Run `work` behind a spinner, finishing it according to the outcome
pub fn with_spinner<T, E>(
    message: &str,
    hidden: bool,
    done: &str,
    work: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let pb = create_spinner(message, hidden);
    let result = work();
    match &result {
        Ok(_) => finish_success(&pb, done),
        Err(_) => finish_error(&pb, message.trim_end_matches("...")),
    }
    result
}
