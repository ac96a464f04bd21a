//! Shared output formatting for lint results.

use anyhow::Result;
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::path::Path;
use tfnames_core::{IssueDiagnostic, LintResult, Severity};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analyzed directory; issue ranges are relative to it.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => return print_pretty(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for issue in &result.issues {
        let severity_indicator = match issue.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!("{}", issue.format_with_severity(severity_indicator));
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, _) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{}{}\x1b[0m", summary_color, result.summary());
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for issue in &result.issues {
        println!("{issue}");
    }
}

fn print_pretty(result: &LintResult, root: &Path) -> Result<()> {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode());

    for issue in &result.issues {
        let path = root.join(&issue.range.file);
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Cannot read {} for snippet: {}", path.display(), e);
                println!("{}", issue.format());
                continue;
            }
        };

        let diagnostic = IssueDiagnostic::new(issue, source);
        let mut rendered = String::new();
        handler.render_report(&mut rendered, &diagnostic)?;
        println!("{rendered}");
    }

    print_summary(result);
    Ok(())
}
