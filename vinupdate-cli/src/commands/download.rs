//! Download the latest update of one category with a progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use vinupdate::config::format_size;
use vinupdate::download::{CancelToken, DownloadState, ProgressCallback};
use vinupdate::query::SoftwareType;
use vinupdate::{UpdateCheck, UpdateSession};

use crate::error::CliError;
use crate::output::Output;

const BAR_TEMPLATE: &str =
    "{msg:>10.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const SPINNER_TEMPLATE: &str = "{spinner:.blue} {msg:>10.cyan.bold} {bytes} ({bytes_per_sec})";

/// Download the latest `software_type` update from a completed check into
/// the configured output file.
pub fn run(
    session: &UpdateSession,
    check: &UpdateCheck,
    software_type: &SoftwareType,
    cancel: &CancelToken,
    out: &dyn Output,
) -> Result<(), CliError> {
    let output_path = &session.config().output_path;
    let existing = DownloadState::prepare(output_path)?;

    out.newline();
    if existing.is_resume() {
        out.println(&format!(
            "Resuming {} download into {} ({} already on disk)",
            software_type,
            output_path.display(),
            format_size(existing.resume_offset)
        ));
    } else {
        out.println(&format!(
            "Downloading {} into {}",
            software_type,
            output_path.display()
        ));
    }

    let bar = new_bar(if existing.is_resume() {
        "resuming"
    } else {
        "downloading"
    });
    let callback = progress_callback(bar.clone());

    let result = session.download(check, software_type, Some(&callback), cancel);
    match result {
        Ok(state) => {
            bar.finish_with_message("done");
            if state.session_bytes == 0 {
                out.println(&format!(
                    "{} is already complete ({})",
                    output_path.display(),
                    format_size(state.bytes_on_disk())
                ));
            } else {
                out.println(&format!(
                    "Downloaded {} to {} ({} total)",
                    format_size(state.session_bytes),
                    output_path.display(),
                    format_size(state.bytes_on_disk())
                ));
            }
            Ok(())
        }
        Err(e) => {
            bar.abandon_with_message("failed");
            Err(e.into())
        }
    }
}

fn new_bar(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar
}

/// Feed `(session_bytes, expected)` into the bar, switching from spinner to
/// bar once the expected length is known.
fn progress_callback(bar: ProgressBar) -> ProgressCallback {
    Box::new(move |written, expected| {
        if let Some(expected) = expected {
            if bar.length() != Some(expected) {
                bar.set_length(expected);
                if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                    bar.set_style(style.progress_chars("█▓▒░  "));
                }
            }
        }
        bar.set_position(written);
    })
}
