//! Summary lines printed after each command.
//!
//! Diagnostics go through `tracing` on stderr; this module only writes the
//! final outcome to stdout.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, InitSummary, SortSummary};
use crate::core::{PassReport, PruneSummary, ScanSummary, WatchSummary};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Sync(pass) => print_pass(pass, writer),
        CommandSummary::Watch(summary) => print_watch(summary, writer),
        CommandSummary::Sort(summary) => print_sort(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

fn success<W: Write>(writer: &mut W, message: String) {
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());
}

fn failure<W: Write>(writer: &mut W, message: String) {
    let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), message.red());
}

fn print_pass<W: Write>(pass: &PassReport, writer: &mut W) {
    print_scan(&pass.scan, writer);
    match &pass.prune {
        Some(Ok(summary)) => print_prune(summary, writer),
        Some(Err(e)) => {
            failure(writer, format!("Nothing pruned: {}", e));
        }
        None => {}
    }
}

fn print_scan<W: Write>(scan: &ScanSummary, writer: &mut W) {
    let mut message = format!(
        "Scanned {}, added {}, created {}",
        plural(scan.files_scanned, "source file", "source files"),
        plural(scan.keys_added, "key", "keys"),
        plural(scan.catalogs_created, "catalog", "catalogs"),
    );
    if scan.has_failures() {
        let mut problems = Vec::new();
        if scan.files_failed > 0 {
            problems.push(format!("{} unreadable", plural(scan.files_failed, "file", "files")));
        }
        if scan.paths_skipped > 0 {
            problems.push(format!(
                "{} inaccessible",
                plural(scan.paths_skipped, "path", "paths")
            ));
        }
        if scan.catalogs_failed > 0 {
            problems.push(format!(
                "{} not written",
                plural(scan.catalogs_failed, "catalog", "catalogs")
            ));
        }
        message.push_str(&format!(" ({})", problems.join(", ")));
        failure(writer, message);
    } else {
        success(writer, message);
    }

    if scan.catalogs_missing > 0 {
        let _ = writeln!(
            writer,
            "{} {} missing and skipped",
            "warning:".bold().yellow(),
            plural(scan.catalogs_missing, "catalog was", "catalogs were"),
        );
    }
}

fn print_prune<W: Write>(summary: &PruneSummary, writer: &mut W) {
    for catalog in &summary.catalogs {
        let keys: Vec<String> = catalog.removed.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            writer,
            "  {} {}/{}: {}",
            "-".red(),
            catalog.language,
            catalog.namespace,
            keys.join(", ")
        );
    }

    let message = format!(
        "Removed {} from {}",
        plural(summary.removed_count(), "unused key", "unused keys"),
        plural(summary.catalogs.len(), "catalog", "catalogs"),
    );
    if summary.failed > 0 {
        failure(
            writer,
            format!(
                "{}, {} failed",
                message,
                plural(summary.failed, "catalog", "catalogs")
            ),
        );
    } else {
        success(writer, message);
    }
}

fn print_watch<W: Write>(summary: &WatchSummary, writer: &mut W) {
    let mut message = format!(
        "Stopped watching after {}, added {}",
        plural(summary.events_handled, "change", "changes"),
        plural(summary.keys_added, "key", "keys"),
    );
    if summary.events_failed > 0 {
        message.push_str(&format!(
            " ({} could not be read)",
            plural(summary.events_failed, "file", "files")
        ));
    }
    success(writer, message);
}

fn print_sort<W: Write>(summary: &SortSummary, writer: &mut W) {
    let message = format!("Sorted {}", plural(summary.sorted, "catalog", "catalogs"));
    if summary.failed > 0 {
        failure(writer, format!("{}, {} failed", message, summary.failed));
    } else {
        success(writer, message);
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        success(writer, format!("Created {}", summary.path.display()));
    } else {
        failure(writer, format!("{} already exists", summary.path.display()));
    }
}
