//! # tfnames-rules
//!
//! Built-in naming rules for Terraform resources.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | TFN001 | `terraform_resource_name_contains_type` | Forbids resource names that repeat words of the resource type |
//!
//! ## Usage
//!
//! ```ignore
//! use tfnames_core::{Analyzer, Config};
//! use tfnames_rules::RuleSet;
//!
//! let config = Config::default();
//! let ruleset = RuleSet::from_config(&config)?;
//!
//! let mut builder = Analyzer::builder().root("./infra").config(config);
//! for rule in ruleset.rules {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod matcher;
pub mod resource_name_contains_type;
pub mod tokenizer;

mod ruleset;

pub use matcher::{MatchPolicy, Matcher, TokenFilter};
pub use resource_name_contains_type::ResourceNameContainsType;
pub use ruleset::{all_rules, RuleSet, RULESET_NAME};
pub use tokenizer::{tokenize, TokenSequence};

/// Re-export core types for convenience.
pub use tfnames_core::{Issue, Rule, Severity};
