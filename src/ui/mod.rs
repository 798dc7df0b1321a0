use anyhow::Error;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::audit::classify;
use crate::core::{Report, Section, SectionBody};

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub stdin_is_tty: bool,
    pub stdout_is_tty: bool,
    pub stderr_is_tty: bool,
    pub max_table_rows: usize,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "Error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "Caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "Next:");
    let _ = writeln!(stderr, "  - re-run with `--verbose` for more detail");
    let _ = writeln!(
        stderr,
        "  - see `bkaudit --help` for available commands and options"
    );
}

pub fn print_report(report: &Report, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }

    let mut out = io::stdout().lock();
    let _ = writeln!(
        out,
        "Summary: audited={} covered={} not_covered={} errors={}",
        report.summary.resources_audited,
        report.summary.covered,
        report.summary.not_covered,
        report.summary.discovery_errors
    );
    if cfg.verbose {
        for note in &report.summary.notes {
            let _ = writeln!(out, "- {note}");
        }
    }

    for section in &report.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", section.title);
        print_section(&mut out, section, cfg);
    }
}

fn print_section(out: &mut dyn Write, section: &Section, cfg: &UiConfig) {
    match &section.body {
        SectionBody::Banner { text } => {
            let _ = writeln!(out, "{}", paint_alert(text, cfg.color));
        }
        SectionBody::Table { rows } => {
            print_section_table(out, &section.header, rows, cfg);
        }
    }
}

fn print_section_table(out: &mut dyn Write, header: &[String], rows: &[Vec<String>], cfg: &UiConfig) {
    let shown = rows.len().min(cfg.max_table_rows.max(1));

    let mut widths: Vec<usize> = header.iter().map(|h| display_width(h)).collect();
    for row in rows.iter().take(shown) {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(display_width(cell));
            }
        }
    }

    let head: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, h)| pad_end_display(h, widths[i]))
        .collect();
    let _ = writeln!(out, "{}", head.join("  "));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));

    for row in rows.iter().take(shown) {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_end_display(cell, widths.get(i).copied().unwrap_or(0)))
            .collect();
        let line = line.join("  ");
        // Row highlighting and banner collapse share one sentinel rule.
        if row.iter().any(|cell| classify::is_no_backup_label(cell)) {
            let _ = writeln!(out, "{}", paint_alert(&line, cfg.color));
        } else {
            let _ = writeln!(out, "{line}");
        }
    }

    if rows.len() > shown {
        let _ = writeln!(out, "... ({} more rows)", rows.len() - shown);
    }
}

fn paint_alert(s: &str, color: bool) -> String {
    if !color {
        return s.to_string();
    }
    format!("\x1b[31m{s}\x1b[0m")
}

fn pad_end_display(s: &str, width: usize) -> String {
    let w = display_width(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn display_width(s: &str) -> usize {
    s.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .fold(0usize, usize::saturating_add)
}
