//! Core types for declarations, issues and results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(format!(
                "unknown severity `{other}`. Valid values: error, warning, info"
            )),
        }
    }
}

/// A position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Pos {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset from the start of the file (0-indexed).
    pub byte: usize,
}

impl Pos {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize, byte: usize) -> Self {
        Self { line, column, byte }
    }
}

/// A half-open range of source text in one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// File path, as given to the module provider.
    pub file: PathBuf,
    /// Start position (inclusive).
    pub start: Pos,
    /// End position (exclusive).
    pub end: Pos,
}

impl SourceRange {
    /// Creates a new range.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, start: Pos, end: Pos) -> Self {
        Self {
            file: file.into(),
            start,
            end,
        }
    }

    /// Length of the range in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.byte.saturating_sub(self.start.byte)
    }

    /// Returns true if the range covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.display(),
            self.start.line,
            self.start.column
        )
    }
}

/// A `resource "<type>" "<name>"` block found in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDeclaration {
    /// First label, e.g. `aws_iam_role`.
    pub resource_type: String,
    /// Second label, e.g. `lambda_exec`.
    pub name: String,
    /// Definition range of the block header.
    pub range: SourceRange,
}

impl ResourceDeclaration {
    /// Creates a new declaration.
    #[must_use]
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        range: SourceRange,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            range,
        }
    }
}

/// A single diagnostic reported for one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule code (e.g., "TFN001").
    pub code: String,
    /// Rule name (e.g., "terraform_resource_name_contains_type").
    pub rule: String,
    /// Severity of this issue.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Where the issue was found.
    pub range: SourceRange,
    /// Link to the rule documentation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Issue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        range: SourceRange,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            message: message.into(),
            range,
            link: None,
        }
    }

    /// Attaches a documentation link. Empty links are ignored.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        let link = link.into();
        self.link = (!link.is_empty()).then_some(link);
        self
    }

    /// Formats the issue for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        self.format_with_severity(&self.severity.to_string())
    }

    /// Same layout as [`Issue::format`], with the severity label supplied by
    /// the caller (for example wrapped in terminal colours).
    #[must_use]
    pub fn format_with_severity(&self, severity: &str) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.code, self.rule, self.range);
        let _ = writeln!(output, "  {severity}: {}", self.message);
        if let Some(link) = &self.link {
            let _ = writeln!(output, "  = see: {link}");
        }
        output
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.range, self.severity, self.code, self.message
        )
    }
}

/// Rich rendering of an [`Issue`] against its source text.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
pub struct IssueDiagnostic {
    code: String,
    message: String,
    #[help]
    help: Option<String>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{rule}")]
    span: SourceSpan,
    rule: String,
}

impl IssueDiagnostic {
    /// Builds a diagnostic for `issue`, with `source` being the full text of its file.
    #[must_use]
    pub fn new(issue: &Issue, source: String) -> Self {
        Self {
            code: issue.code.clone(),
            message: issue.message.clone(),
            help: issue.link.as_ref().map(|l| format!("see {l}")),
            source_code: NamedSource::new(issue.range.file.display().to_string(), source),
            span: SourceSpan::from((issue.range.start.byte, issue.range.len())),
            rule: issue.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All issues found, in emission order.
    pub issues: Vec<Issue>,
    /// Number of modules checked.
    pub modules_checked: usize,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_issues_at(Severity::Error)
    }

    /// Checks if any issues meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_issues_at(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity >= severity)
    }

    /// Returns issues filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    /// Counts issues by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.issues.iter().filter(|i| i.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats the summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        let (errors, warnings, infos) = self.count_by_severity();
        format!(
            "Found {} error(s), {} warning(s), {} info(s) in {} module(s), {} file(s)",
            errors, warnings, infos, self.modules_checked, self.files_checked
        )
    }

    /// Adds issues and counters from another result.
    pub fn extend(&mut self, other: Self) {
        self.issues.extend(other.issues);
        self.modules_checked += other.modules_checked;
        self.files_checked += other.files_checked;
    }
}
