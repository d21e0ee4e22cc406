//! Terminal rendering for plan and apply reports.

use owo_colors::OwoColorize;

use fqroute_core::{ApplyReport, render_batch};

/// Print pipeline diagnostics: conflicts, skipped and excluded groups,
/// rejected line count. Warn-level information, never fatal.
pub fn print_diagnostics(report: &ApplyReport) {
    for warning in &report.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
    for group in &report.skipped_groups {
        eprintln!(
            "{} group '{group}' produced no domains, skipped",
            "notice:".cyan()
        );
    }
    for finding in &report.excluded_groups {
        eprintln!("{} {finding}", "excluded:".red().bold());
    }
    if report.rejected_lines > 0 {
        eprintln!(
            "{} {} invalid line(s) skipped across all sources",
            "notice:".cyan(),
            report.rejected_lines
        );
    }
}

/// Print the planned batch without executing it.
pub fn print_plan(report: &ApplyReport) {
    print_diagnostics(report);

    if report.is_noop() {
        println!("{}", "Router already matches the declared groups.".green());
        return;
    }

    println!("Planned commands ({}):", report.commands.len());
    for command in render_batch(&report.commands) {
        println!("  {command}");
    }
}

/// Print the result of an executed batch.
pub fn print_applied(report: &ApplyReport, quiet: bool) {
    print_diagnostics(report);

    if report.is_noop() {
        if !quiet {
            println!("{}", "Router already matches the declared groups.".green());
        }
        return;
    }

    // Failed batches surface as errors, so every outcome here is ok.
    if !quiet {
        for command in render_batch(&report.commands) {
            println!("  {} {command}", "ok".green());
        }
    }
    println!(
        "{} {} command(s) applied",
        "done:".green().bold(),
        report.outcomes.len()
    );
}
