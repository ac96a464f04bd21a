//! The built-in rule set.

use crate::resource_name_contains_type::{self, ResourceNameContainsType};
use tfnames_core::{Config, ConfigError, RuleBox, RuleConfig};

/// Name the rule set is published under.
pub const RULESET_NAME: &str = "tfnames";

/// A named, versioned collection of rules.
pub struct RuleSet {
    /// Rule set name.
    pub name: &'static str,
    /// Rule set version.
    pub version: &'static str,
    /// Rules in evaluation order.
    pub rules: Vec<RuleBox>,
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl RuleSet {
    /// Every built-in rule with its default options.
    #[must_use]
    pub fn builtin() -> Self {
        Self::with_rules(all_rules())
    }

    /// Every built-in rule, configured from the `[rules.*]` tables of `config`.
    ///
    /// Rules disabled in `config` are still returned; the analyzer skips them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if a rule option is unusable.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let default = RuleConfig::default();
        let options = config
            .rules
            .get(resource_name_contains_type::NAME)
            .unwrap_or(&default);

        let rules: Vec<RuleBox> = vec![Box::new(ResourceNameContainsType::from_config(options)?)];
        Ok(Self::with_rules(rules))
    }

    fn with_rules(rules: Vec<RuleBox>) -> Self {
        Self {
            name: RULESET_NAME,
            version: env!("CARGO_PKG_VERSION"),
            rules,
        }
    }

    /// Names of the rules in this set.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Keeps only rules whose name or code is listed in `selected`.
    #[must_use]
    pub fn only<S: AsRef<str>>(mut self, selected: &[S]) -> Self {
        self.rules.retain(|rule| {
            selected
                .iter()
                .any(|s| s.as_ref() == rule.name() || s.as_ref() == rule.code())
        });
        self
    }
}

/// Returns all available rules with default options.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(ResourceNameContainsType::new())]
}
