//! Terminal and JSON output
//!
//! Human output goes through a small set of semantic colors; machine
//! output is NDJSON, one event object per line. Color is applied only
//! when stdout is a terminal.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use is_terminal::IsTerminal;
use similar::{ChangeTag, TextDiff};

use crate::report::{ModuleOutcome, ModuleReport, RunReport};
use crate::sync::Mode;

pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

pub fn supports_color() -> bool {
    io::stdout().is_terminal()
}

/// Render a unified diff for one descriptor, header lines included.
pub fn render_unified_diff(path: &str, old: &str, new: &str, color: bool) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();

    out.push_str(&paint(&format!("--- a/{path}"), colors::INFO, color));
    out.push('\n');
    out.push_str(&paint(&format!("+++ b/{path}"), colors::INFO, color));
    out.push('\n');

    for change in diff.iter_all_changes() {
        let (sign, tint) = match change.tag() {
            ChangeTag::Delete => ("-", colors::ERROR),
            ChangeTag::Insert => ("+", colors::SUCCESS),
            ChangeTag::Equal => (" ", colors::DIM),
        };
        let value = change.value().trim_end_matches('\n');
        out.push_str(&paint(&format!("{sign} {value}"), tint, color));
        out.push('\n');
    }

    out
}

fn paint(s: &str, tint: Color, color: bool) -> String {
    if color {
        format!("{}", s.with(tint))
    } else {
        s.to_string()
    }
}

fn outcome_tint(outcome: ModuleOutcome) -> Color {
    match outcome {
        ModuleOutcome::Unchanged => colors::DIM,
        ModuleOutcome::WouldChange => colors::WARNING,
        ModuleOutcome::Changed => colors::SUCCESS,
        ModuleOutcome::Failed => colors::ERROR,
    }
}

/// One status line per module, plus detail for drifted or failed entries.
///
/// `verbose` includes unchanged modules; otherwise only entries that need
/// attention are listed.
pub fn render_report(
    out: &mut impl Write,
    report: &RunReport,
    mode: Mode,
    verbose: bool,
    color: bool,
) -> io::Result<()> {
    for entry in &report.entries {
        if entry.outcome == ModuleOutcome::Unchanged && !verbose {
            continue;
        }
        render_entry(out, entry, color)?;
    }
    render_summary(out, report, mode, color)
}

fn render_entry(out: &mut impl Write, entry: &ModuleReport, color: bool) -> io::Result<()> {
    let status = paint(entry.outcome.as_str(), outcome_tint(entry.outcome), color);
    writeln!(out, "{:<12} {}", status, entry.module)?;

    if let Some(error) = &entry.error {
        writeln!(out, "    {}", paint(error, colors::ERROR, color))?;
    }
    if let Some(plan) = &entry.plan {
        for file in plan.drifted_files() {
            for added in file.added() {
                writeln!(out, "    {} {} {added}", file.label, paint("+", colors::SUCCESS, color))?;
            }
            for removed in file.removed() {
                writeln!(out, "    {} {} {removed}", file.label, paint("-", colors::ERROR, color))?;
            }
        }
    }
    Ok(())
}

/// Full unified diffs for every drifted file in the run.
pub fn render_diffs(out: &mut impl Write, report: &RunReport, color: bool) -> io::Result<()> {
    for entry in &report.entries {
        let Some(plan) = &entry.plan else { continue };
        for file in plan.drifted_files() {
            let path = file.path.display().to_string();
            write!(
                out,
                "{}",
                render_unified_diff(&path, &file.current_text, &file.desired_text, color)
            )?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn render_summary(
    out: &mut impl Write,
    report: &RunReport,
    mode: Mode,
    color: bool,
) -> io::Result<()> {
    let unchanged = report.count(ModuleOutcome::Unchanged);
    let drifted = report.count(ModuleOutcome::WouldChange) + report.count(ModuleOutcome::Changed);
    let failed = report.count(ModuleOutcome::Failed);

    let verb = match mode {
        Mode::Check | Mode::DryRun => "out of sync",
        Mode::Apply => "updated",
    };
    let line = format!("{unchanged} in sync, {drifted} {verb}, {failed} failed");
    let tint = if failed > 0 {
        colors::ERROR
    } else if drifted > 0 && mode == Mode::Check {
        colors::WARNING
    } else {
        colors::SUCCESS
    };
    writeln!(out, "{}", paint(&line, tint, color))
}

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Emit the whole run as NDJSON: one `module` event per entry, then a
/// terminal `summary` event.
pub fn write_json_report(
    out: &mut impl Write,
    report: &RunReport,
    mode: Mode,
) -> io::Result<()> {
    for entry in &report.entries {
        let files: Vec<serde_json::Value> = entry
            .plan
            .iter()
            .flat_map(|plan| plan.drifted_files())
            .map(|file| {
                serde_json::json!({
                    "path": file.path.display().to_string(),
                    "label": file.label,
                    "added": file.added(),
                    "removed": file.removed(),
                    "extras": file.extras,
                })
            })
            .collect();

        let mut event = serde_json::json!({
            "event": "module",
            "module": entry.module,
            "outcome": entry.outcome.as_str(),
            "files": files,
        });
        if let Some(error) = &entry.error {
            event["error"] = serde_json::json!(error);
        }
        write_event(out, &event)?;
    }

    write_event(
        out,
        &serde_json::json!({
            "event": "summary",
            "unchanged": report.count(ModuleOutcome::Unchanged),
            "would_change": report.count(ModuleOutcome::WouldChange),
            "changed": report.count(ModuleOutcome::Changed),
            "failed": report.count(ModuleOutcome::Failed),
            "success": report.success(mode),
        }),
    )
}
