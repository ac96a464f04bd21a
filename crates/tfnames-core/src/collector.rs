//! In-memory issue sink.

use crate::allowance::check_allow_with_reason;
use crate::config::Config;
use crate::module::HclModule;
use crate::rule::{IssueSink, Rule, SinkError};
use crate::types::{Issue, LintResult, Severity, SourceRange};
use tracing::debug;

/// Collects emitted issues into a [`LintResult`].
///
/// Severity overrides from the configuration are applied here, and issues
/// covered by a `tfnames: allow(...)` comment in the module sources are
/// dropped.
pub struct Collector<'a> {
    config: &'a Config,
    sources: Option<&'a HclModule>,
    result: LintResult,
}

impl<'a> Collector<'a> {
    /// Creates a collector using `config` for severity overrides.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            sources: None,
            result: LintResult::new(),
        }
    }

    /// Enables suppression comments, looked up in `module`'s files.
    #[must_use]
    pub fn with_sources(mut self, module: &'a HclModule) -> Self {
        self.sources = Some(module);
        self
    }

    /// Returns the issues collected so far.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.result.issues
    }

    /// Consumes the collector, returning the result.
    #[must_use]
    pub fn into_result(self) -> LintResult {
        self.result
    }
}

impl IssueSink for Collector<'_> {
    fn emit(
        &mut self,
        rule: &dyn Rule,
        message: String,
        range: SourceRange,
    ) -> Result<(), SinkError> {
        let source = self.sources.and_then(|m| m.source(&range.file));
        if let Some(source) = source {
            let allow = check_allow_with_reason(source, range.start.line, rule.name());
            if allow.is_allowed() {
                if rule.requires_allow_reason() && allow.reason().is_none() {
                    self.result.issues.push(Issue::new(
                        rule.code(),
                        rule.name(),
                        Severity::Warning,
                        range,
                        format!(
                            "Allow directive for '{}' is missing required reason",
                            rule.name()
                        ),
                    ));
                } else {
                    debug!("Suppressed {} at {}", rule.name(), range);
                }
                return Ok(());
            }
        }

        let severity = self
            .config
            .rule_severity(rule.name())
            .unwrap_or_else(|| rule.severity());

        self.result.issues.push(
            Issue::new(rule.code(), rule.name(), severity, range, message).with_link(rule.link()),
        );
        Ok(())
    }
}
