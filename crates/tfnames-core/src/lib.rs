//! # tfnames-core
//!
//! Core framework for linting Terraform resource declarations.
//!
//! This crate provides the foundational traits and types for building
//! naming rules. It includes:
//!
//! - [`Rule`] trait, with default descriptor methods
//! - [`ModuleContent`] and [`IssueSink`], the seams a rule reads from and reports to
//! - [`HclModule`], a provider that parses `.tf` sources for resource blocks
//! - [`Collector`], a sink that gathers [`Issue`]s into a [`LintResult`]
//! - [`Analyzer`] for running rules over every module below a directory
//!
//! ## Example
//!
//! ```ignore
//! use tfnames_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./infra")
//!     .config(Config::default())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for issue in &result.issues {
//!     println!("{issue}");
//! }
//! println!("{}", result.summary());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod collector;
mod config;
mod rule;
mod types;

/// Suppression comment parsing.
pub mod allowance;
/// Declaration provider for `.tf` sources.
pub mod module;

pub use allowance::AllowCheck;
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use collector::Collector;
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use module::{HclModule, ProviderError};
pub use rule::{CheckError, IssueSink, ModuleContent, Rule, RuleBox, SinkError};
pub use types::{
    Issue, IssueDiagnostic, LintResult, Pos, ResourceDeclaration, Severity, SourceRange,
};
