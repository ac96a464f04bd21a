//! Rule to forbid resource names that repeat their resource type.
//!
//! # Rationale
//!
//! A resource address already carries its type: `aws_iam_role.lambda_role`
//! says "role" twice. Names should describe what the resource is *for*.
//!
//! # Configuration
//!
//! - `policy`: `"suffix"` (default) or `"substring"`
//! - `allowed_tokens`: type words never matched on their own under the
//!   substring policy (default: `aws`, `gcp`, `azurerm`)
//! - `min_token_length`: shortest type word matched on its own under the
//!   substring policy (default: 3)
//!
//! # Suppression
//!
//! - `# tfnames: allow(terraform_resource_name_contains_type) reason="..."`
//!   on or directly above the block header

use crate::matcher::{
    MatchPolicy, Matcher, TokenFilter, DEFAULT_ALLOWED_TOKENS, DEFAULT_MIN_TOKEN_LENGTH,
};
use tfnames_core::{
    CheckError, ConfigError, IssueSink, ModuleContent, ResourceDeclaration, Rule, RuleConfig,
};
use tracing::debug;

/// Rule code for `terraform_resource_name_contains_type`.
pub const CODE: &str = "TFN001";

/// Rule name for `terraform_resource_name_contains_type`.
pub const NAME: &str = "terraform_resource_name_contains_type";

/// Flags resources whose name repeats part of their type.
#[derive(Debug, Clone, Default)]
pub struct ResourceNameContainsType {
    matcher: Matcher,
}

impl ResourceNameContainsType {
    /// Creates a new rule with the suffix policy and default token filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the matching policy.
    #[must_use]
    pub fn policy(mut self, policy: MatchPolicy) -> Self {
        self.matcher = Matcher::new(policy, self.matcher.filter().clone());
        self
    }

    /// Sets the token filter used by the substring policy.
    #[must_use]
    pub fn filter(mut self, filter: TokenFilter) -> Self {
        self.matcher = Matcher::new(self.matcher.policy(), filter);
        self
    }

    /// Returns the matcher this rule evaluates with.
    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Builds the rule from its `[rules.terraform_resource_name_contains_type]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for an unknown policy or a
    /// negative minimum token length.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let invalid = |option: &str, message: String| ConfigError::InvalidOption {
            rule: NAME.to_string(),
            option: option.to_string(),
            message,
        };

        let policy = match config.get_str("policy") {
            Some(p) => p
                .parse::<MatchPolicy>()
                .map_err(|e| invalid("policy", e))?,
            None => MatchPolicy::default(),
        };

        let min_length = match config.get_int("min_token_length") {
            Some(n) => usize::try_from(n)
                .map_err(|_| invalid("min_token_length", format!("expected >= 0, got {n}")))?,
            None => DEFAULT_MIN_TOKEN_LENGTH,
        };

        let allowed = config.get_str_array("allowed_tokens").unwrap_or_else(|| {
            DEFAULT_ALLOWED_TOKENS
                .iter()
                .map(ToString::to_string)
                .collect()
        });

        Ok(Self::new()
            .policy(policy)
            .filter(TokenFilter::new(allowed, min_length)))
    }

    fn message(&self, decl: &ResourceDeclaration) -> String {
        match self.matcher.policy() {
            MatchPolicy::Suffix => format!(
                "Resource name '{}' should not have a shared suffix with the resource type '{}'.",
                decl.name, decl.resource_type
            ),
            MatchPolicy::Substring => format!(
                "Resource name '{}' contains parts of the resource type '{}'.",
                decl.name, decl.resource_type
            ),
        }
    }
}

impl Rule for ResourceNameContainsType {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids resource names that repeat words of the resource type"
    }

    fn check(
        &self,
        content: &dyn ModuleContent,
        sink: &mut dyn IssueSink,
    ) -> Result<(), CheckError> {
        for decl in content.resource_declarations()? {
            if !self.matcher.matches(&decl.resource_type, &decl.name) {
                continue;
            }

            debug!(
                "{}.{} matches under {} policy",
                decl.resource_type,
                decl.name,
                self.matcher.policy()
            );
            let message = self.message(&decl);
            sink.emit(self, message, decl.range)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfnames_core::{
        Collector, Config, HclModule, Issue, Pos, ProviderError, Severity, SinkError, SourceRange,
    };

    fn check_source(rule: &ResourceNameContainsType, source: &str) -> Vec<Issue> {
        let module = HclModule::from_sources([("resource.tf", source)]);
        let config = Config::default();
        let mut collector = Collector::new(&config).with_sources(&module);
        rule.check(&module, &mut collector).expect("check should succeed");
        collector.into_result().issues
    }

    fn check_code(source: &str) -> Vec<Issue> {
        check_source(&ResourceNameContainsType::new(), source)
    }

    #[test]
    fn test_detects_full_type_in_name() {
        let issues = check_code(
            r#"
resource "aws_iam_role" "user_iam_role" {
  name = "test"
}"#,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, CODE);
        assert_eq!(
            issues[0].message,
            "Resource name 'user_iam_role' should not have a shared suffix with the resource type 'aws_iam_role'."
        );
        assert_eq!(
            issues[0].range,
            SourceRange::new("resource.tf", Pos::new(2, 1, 1), Pos::new(2, 40, 40))
        );
    }

    #[test]
    fn test_detects_trailing_type_words() {
        for (ty, name) in [
            ("aws_iam_role", "user_role"),
            ("aws_s3_bucket", "my_bucket"),
            ("aws_lambda_function", "my_function"),
            ("aws_instance", "web_instance"),
            ("aws_iam_role", "user_IAM_ROLE"),
        ] {
            let issues = check_code(&format!("resource \"{ty}\" \"{name}\" {{}}\n"));
            assert_eq!(issues.len(), 1, "{ty}.{name} should be flagged");
            assert!(issues[0].message.contains(&format!("'{name}'")));
        }
    }

    #[test]
    fn test_allows_descriptive_names() {
        let issues = check_code(
            r#"
resource "aws_iam_role" "user_permissions" {
  name = "test"
}

resource "aws_s3_bucket" "data_storage" {
  bucket = "test"
}

resource "aws_lambda_function" "data_processor" {
  filename = "test.zip"
}

resource "aws_iam_role" "aws_user" {
  name = "test"
}

resource "aws_iam_role" "role_for_lambda" {
  name = "test"
}
"#,
        );
        assert!(issues.is_empty(), "unexpected issues: {issues:#?}");
    }

    #[test]
    fn test_multiple_resources_mixed() {
        let issues = check_code(
            r#"
resource "aws_iam_role" "user_permissions" {
  name = "test"
}

resource "aws_s3_bucket" "data_bucket" {
  bucket = "test"
}"#,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].range.start, Pos::new(6, 1, 65));
        assert_eq!(issues[0].range.end.column, 39);
    }

    #[test]
    fn test_substring_policy_flags_mid_name_words() {
        let rule = ResourceNameContainsType::new().policy(MatchPolicy::Substring);
        let issues = check_source(
            &rule,
            r#"
resource "aws_iam_role" "role_for_lambda" {}
resource "aws_iam_role" "aws_user" {}
"#,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "Resource name 'role_for_lambda' contains parts of the resource type 'aws_iam_role'."
        );
    }

    #[test]
    fn test_descriptor() {
        let rule = ResourceNameContainsType::new();
        assert_eq!(rule.name(), "terraform_resource_name_contains_type");
        assert!(rule.enabled());
        assert_eq!(rule.severity(), Severity::Error);
        assert_eq!(rule.link(), "");
    }

    #[test]
    fn test_from_config() {
        let config = Config::parse(
            r#"
[rules.terraform_resource_name_contains_type]
policy = "substring"
allowed_tokens = ["google"]
min_token_length = 4
"#,
        )
        .expect("config should parse");
        let rule = ResourceNameContainsType::from_config(&config.rules[NAME])
            .expect("options should be valid");
        assert_eq!(rule.matcher().policy(), MatchPolicy::Substring);
        assert_eq!(rule.matcher().filter().min_length(), 4);
        assert!(rule.matcher().filter().allowed().contains("google"));
        assert!(!rule.matcher().filter().allowed().contains("aws"));
    }

    #[test]
    fn test_from_config_rejects_bad_options() {
        let config = Config::parse(
            "[rules.terraform_resource_name_contains_type]\npolicy = \"fuzzy\"\n",
        )
        .expect("config should parse");
        let err = ResourceNameContainsType::from_config(&config.rules[NAME])
            .expect_err("policy should be rejected");
        assert!(err.to_string().contains("unknown policy `fuzzy`"));

        let config = Config::parse(
            "[rules.terraform_resource_name_contains_type]\nmin_token_length = -1\n",
        )
        .expect("config should parse");
        assert!(ResourceNameContainsType::from_config(&config.rules[NAME]).is_err());
    }

    #[test]
    fn test_no_declarations_is_success() {
        assert!(check_code("# nothing here\n").is_empty());
    }

    struct FailingProvider;

    impl ModuleContent for FailingProvider {
        fn resource_declarations(&self) -> Result<Vec<ResourceDeclaration>, ProviderError> {
            Err(ProviderError::Labels {
                file: "main.tf".into(),
                line: 1,
                found: 3,
            })
        }
    }

    #[test]
    fn test_provider_error_propagates() {
        let config = Config::default();
        let mut collector = Collector::new(&config);
        let err = ResourceNameContainsType::new()
            .check(&FailingProvider, &mut collector)
            .expect_err("should fail");
        assert!(matches!(err, CheckError::Provider(_)));
        assert!(collector.issues().is_empty());
    }

    /// Accepts `capacity` issues, then fails.
    struct BoundedSink {
        capacity: usize,
        messages: Vec<String>,
    }

    impl IssueSink for BoundedSink {
        fn emit(
            &mut self,
            _rule: &dyn Rule,
            message: String,
            _range: SourceRange,
        ) -> Result<(), SinkError> {
            if self.messages.len() == self.capacity {
                return Err(SinkError::Rejected("host went away".to_string()));
            }
            self.messages.push(message);
            Ok(())
        }
    }

    #[test]
    fn test_sink_error_aborts_remaining_declarations() {
        let module = HclModule::from_sources([(
            "main.tf",
            r#"
resource "aws_iam_role" "a_role" {}
resource "aws_iam_role" "b_role" {}
resource "aws_iam_role" "c_role" {}
"#,
        )]);
        let mut sink = BoundedSink {
            capacity: 1,
            messages: Vec::new(),
        };
        let err = ResourceNameContainsType::new()
            .check(&module, &mut sink)
            .expect_err("sink should fail");
        assert!(matches!(err, CheckError::Sink(_)));
        assert_eq!(sink.messages.len(), 1);
        assert!(sink.messages[0].contains("'a_role'"));
    }
}
