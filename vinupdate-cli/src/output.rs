//! Output formatting for CLI commands.
//!
//! Commands write through the `Output` trait so rendering can be tested
//! without a terminal.

use console::style;
use vinupdate::config::format_optional_size;
use vinupdate::report::{ReportEntry, UpdateReport};

/// Line-oriented output sink.
pub trait Output {
    fn println(&self, line: &str);

    fn newline(&self) {
        self.println("");
    }

    fn header(&self, title: &str) {
        self.println(&style(title).bold().to_string());
    }

    fn indented(&self, line: &str) {
        self.println(&format!("  {}", line));
    }
}

/// Writes to stdout.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn println(&self, line: &str) {
        println!("{}", line);
    }
}

/// Print the update report.
pub fn print_report(out: &dyn Output, report: &UpdateReport) {
    out.header(&format!("Updates for {} ({})", report.vin, report.request_result));
    out.newline();

    if report.entries.is_empty() {
        out.println("The server returned no software entries.");
    }
    for entry in &report.entries {
        print_entry(out, entry);
    }

    if let Some(ref url) = report.installer_url {
        out.newline();
        out.println(&format!("Installer URL: {}", style(url).green()));
    }
}

fn print_entry(out: &dyn Output, entry: &ReportEntry) {
    out.println(&format!(
        "{} [{}]",
        style(entry.software_type.label()).bold(),
        entry.software_type.id()
    ));
    out.indented(&format!("Current version: {}", style(&entry.current_version).red()));

    let Some(ref version) = entry.new_version else {
        out.indented(&format!("No update available ({})", entry.request_result));
        return;
    };

    out.indented(&format!(
        "New version:     {} (Size: {})",
        style(version).cyan(),
        format_optional_size(entry.update_size)
    ));
    if let Some(ref url) = entry.update_url {
        out.indented(&format!("Update URL:      {}", style(url).green()));
    }
    if let Some(ref url) = entry.license_url {
        out.indented(&format!(
            "License URL:     {} (Size: {})",
            style(url).green(),
            format_optional_size(entry.license_size)
        ));
    }
}
