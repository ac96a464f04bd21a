//! Rule trait and the provider/sink seams rules are evaluated through.

use crate::module::ProviderError;
use crate::types::{ResourceDeclaration, Severity, SourceRange};
use thiserror::Error;

/// Source of declarations for one module.
///
/// Implementations must return declarations in source order.
pub trait ModuleContent {
    /// Returns every `resource "<type>" "<name>"` block in the module.
    ///
    /// # Errors
    ///
    /// Returns an error if the module sources cannot be read or scanned.
    fn resource_declarations(&self) -> Result<Vec<ResourceDeclaration>, ProviderError>;
}

impl ModuleContent for Vec<ResourceDeclaration> {
    fn resource_declarations(&self) -> Result<Vec<ResourceDeclaration>, ProviderError> {
        Ok(self.clone())
    }
}

/// Destination for issues emitted by rules.
pub trait IssueSink {
    /// Reports one issue raised by `rule` at `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue cannot be delivered.
    fn emit(
        &mut self,
        rule: &dyn Rule,
        message: String,
        range: SourceRange,
    ) -> Result<(), SinkError>;
}

/// Failure to deliver an issue.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink refused the issue.
    #[error("issue rejected by sink: {0}")]
    Rejected(String),
}

/// Errors that abort a single rule invocation.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Declarations could not be retrieved.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// An issue could not be emitted.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A lint rule evaluated against one module.
///
/// Only [`name`](Rule::name), [`code`](Rule::code) and
/// [`check`](Rule::check) are required; the remaining descriptor methods
/// have defaults.
///
/// # Example
///
/// ```ignore
/// use tfnames_core::{CheckError, IssueSink, ModuleContent, Rule};
///
/// pub struct NoUppercaseNames;
///
/// impl Rule for NoUppercaseNames {
///     fn name(&self) -> &'static str { "no_uppercase_names" }
///     fn code(&self) -> &'static str { "TFN100" }
///
///     fn check(&self, content: &dyn ModuleContent, sink: &mut dyn IssueSink) -> Result<(), CheckError> {
///         for decl in content.resource_declarations()? {
///             if decl.name.chars().any(char::is_uppercase) {
///                 sink.emit(self, format!("'{}' has uppercase letters", decl.name), decl.range)?;
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the snake_case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "TFN001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Whether the rule runs when the configuration does not mention it.
    fn enabled(&self) -> bool {
        true
    }

    /// Returns the default severity for issues from this rule.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Returns the documentation link for this rule.
    fn link(&self) -> &'static str {
        ""
    }

    /// Whether suppression comments for this rule must carry a reason.
    fn requires_allow_reason(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Checks one module, emitting an issue per finding.
    ///
    /// # Errors
    ///
    /// Provider and sink errors are returned immediately; issues emitted
    /// before the failure stay emitted.
    fn check(
        &self,
        content: &dyn ModuleContent,
        sink: &mut dyn IssueSink,
    ) -> Result<(), CheckError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
