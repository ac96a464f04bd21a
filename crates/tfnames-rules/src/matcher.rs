//! Decides whether a resource name repeats part of its type.
//!
//! Two policies exist and exactly one is active per rule instance:
//!
//! - [`MatchPolicy::Suffix`] (default): the name must *end with* a trailing
//!   run of the type's words. `aws_iam_role` flags `user_role` and
//!   `user_iam_role`, but not `role_for_lambda`.
//! - [`MatchPolicy::Substring`]: the name must contain the whole type, or
//!   any sufficiently long type word that is not allow-listed, anywhere.
//!   `aws_iam_role` flags `role_for_lambda` too.

use crate::tokenizer::{tokenize, TokenSequence};
use std::collections::BTreeSet;

/// Tokens shorter than this are never matched on their own.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

/// Provider prefixes that may appear in names.
pub const DEFAULT_ALLOWED_TOKENS: &[&str] = &["aws", "gcp", "azurerm"];

/// Matching algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchPolicy {
    /// Name ends with a trailing run of type tokens.
    #[default]
    Suffix,
    /// Name contains the type, or a long non-allow-listed type token.
    Substring,
}

impl MatchPolicy {
    /// Configuration spelling of the policy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Suffix => "suffix",
            Self::Substring => "substring",
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suffix" => Ok(Self::Suffix),
            "substring" => Ok(Self::Substring),
            other => Err(format!(
                "unknown policy `{other}`. Valid values: suffix, substring"
            )),
        }
    }
}

/// Which individual type tokens the substring policy looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFilter {
    allowed: BTreeSet<String>,
    min_length: usize,
}

impl Default for TokenFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_TOKENS.iter().copied(), DEFAULT_MIN_TOKEN_LENGTH)
    }
}

impl TokenFilter {
    /// Creates a filter exempting `allowed` tokens and tokens shorter than `min_length`.
    #[must_use]
    pub fn new<I, S>(allowed: I, min_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            min_length,
        }
    }

    /// Returns the allow-listed tokens.
    #[must_use]
    pub fn allowed(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    /// Returns the minimum token length.
    #[must_use]
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Whether `token` is matched on its own.
    #[must_use]
    pub fn is_significant(&self, token: &str) -> bool {
        token.chars().count() >= self.min_length && !self.allowed.contains(token)
    }
}

/// Returns the longest trailing run of `type_tokens` that `name_tokens` ends with.
#[must_use]
pub fn shared_suffix<'t>(
    type_tokens: &'t TokenSequence,
    name_tokens: &TokenSequence,
) -> Option<&'t [String]> {
    let ty = type_tokens.tokens();
    let name = name_tokens.tokens();
    if ty.is_empty() || name.is_empty() {
        return None;
    }
    (0..ty.len())
        .map(|i| &ty[i..])
        .find(|suffix| name.ends_with(suffix))
}

/// Suffix-overlap policy.
#[must_use]
pub fn matches_suffix(type_tokens: &TokenSequence, name_tokens: &TokenSequence) -> bool {
    shared_suffix(type_tokens, name_tokens).is_some()
}

/// Substring-containment policy.
#[must_use]
pub fn matches_substring(resource_type: &str, name: &str, filter: &TokenFilter) -> bool {
    let type_tokens = tokenize(resource_type);
    if type_tokens.is_empty() || tokenize(name).is_empty() {
        return false;
    }

    let name = name.to_lowercase();
    name.contains(&resource_type.to_lowercase())
        || type_tokens
            .iter()
            .any(|t| filter.is_significant(t) && name.contains(t.as_str()))
}

/// A policy together with its token filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matcher {
    policy: MatchPolicy,
    filter: TokenFilter,
}

impl Matcher {
    /// Creates a matcher.
    #[must_use]
    pub fn new(policy: MatchPolicy, filter: TokenFilter) -> Self {
        Self { policy, filter }
    }

    /// Returns the active policy.
    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Returns the token filter.
    #[must_use]
    pub fn filter(&self) -> &TokenFilter {
        &self.filter
    }

    /// Whether `name` repeats part of `resource_type` under the active policy.
    #[must_use]
    pub fn matches(&self, resource_type: &str, name: &str) -> bool {
        match self.policy {
            MatchPolicy::Suffix => matches_suffix(&tokenize(resource_type), &tokenize(name)),
            MatchPolicy::Substring => matches_substring(resource_type, name, &self.filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix(ty: &str, name: &str) -> bool {
        Matcher::new(MatchPolicy::Suffix, TokenFilter::default()).matches(ty, name)
    }

    fn substring(ty: &str, name: &str) -> bool {
        Matcher::new(MatchPolicy::Substring, TokenFilter::default()).matches(ty, name)
    }

    #[test]
    fn suffix_flags_trailing_runs() {
        assert!(suffix("aws_iam_role", "user_role"));
        assert!(suffix("aws_iam_role", "user_iam_role"));
        assert!(suffix("aws_iam_role", "aws_iam_role"));
        assert!(suffix(
            "aws_iam_role_policy_attachment",
            "amazon_eks_cluster_policy_attachment"
        ));
    }

    #[test]
    fn suffix_ignores_non_trailing_overlap() {
        assert!(!suffix("aws_iam_role", "my_iam"));
        assert!(!suffix("aws_iam_role", "role_for_lambda"));
        assert!(!suffix(
            "aws_iam_role_policy_attachment",
            "amazon_eks_cluster_policy"
        ));
        assert!(!suffix("aws_s3_bucket", "logs_s3"));
        assert!(!suffix("aws_s3_bucket", "bucket_for_data"));
    }

    #[test]
    fn suffix_has_no_length_floor() {
        assert!(suffix("aws_s3", "logs_s3"));
    }

    #[test]
    fn shared_suffix_is_the_longest_run() {
        let ty = tokenize("aws_iam_role_policy_attachment");
        let name = tokenize("eks_role_policy_attachment");
        assert_eq!(
            shared_suffix(&ty, &name),
            Some(&["role".to_string(), "policy".to_string(), "attachment".to_string()][..])
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            suffix("aws_iam_role", "USER_ROLE"),
            suffix("aws_iam_role", "user_role")
        );
        assert!(suffix("AWS_IAM_ROLE", "user_IAM_ROLE"));
        assert!(substring("aws_iam_role", "RoleForLambda"));
    }

    #[test]
    fn empty_sequences_never_match() {
        assert!(!suffix("", ""));
        assert!(!suffix("aws_iam_role", ""));
        assert!(!suffix("", "role"));
        assert!(!substring("", "role"));
        assert!(!substring("aws_iam_role", "_"));
    }

    #[test]
    fn substring_flags_any_occurrence() {
        assert!(substring("aws_iam_role", "role_for_lambda"));
        assert!(substring("aws_s3_bucket", "my_bucket"));
        assert!(substring("aws_lambda_function", "my_function"));
        assert!(substring("aws_instance", "web_instance"));
        assert!(substring("aws_iam_role", "user_iam_role"));
    }

    #[test]
    fn substring_skips_short_and_provider_tokens() {
        assert!(!substring("aws_iam_role", "aws_user"));
        assert!(!substring("aws_s3_bucket", "logs_s3"));
        assert!(!substring("google_compute_instance", "gcp_vm"));
        assert!(!substring("azurerm_resource_group", "azurerm_main"));
        assert!(!substring("aws_iam_role", "user_permissions"));
        assert!(!substring("aws_s3_bucket", "data_storage"));
    }

    #[test]
    fn three_letter_tokens_are_significant() {
        assert!(substring("aws_ec2_host", "ec2_primary"));
    }

    #[test]
    fn substring_matches_whole_type_even_with_short_tokens() {
        assert!(substring("aws_s3", "logs_aws_s3"));
    }

    #[test]
    fn filter_is_configurable() {
        let filter = TokenFilter::new(["AWS", "role"], 2);
        assert!(filter.allowed().contains("aws"));
        assert!(!filter.is_significant("role"));
        assert!(filter.is_significant("s3"));

        let matcher = Matcher::new(MatchPolicy::Substring, filter);
        assert!(!matcher.matches("aws_iam_role", "role_for_lambda"));
        assert!(matcher.matches("aws_s3_bucket", "logs_s3"));
    }

    #[test]
    fn policy_round_trips_through_config_spelling() {
        for policy in [MatchPolicy::Suffix, MatchPolicy::Substring] {
            assert_eq!(policy.as_str().parse::<MatchPolicy>(), Ok(policy));
        }
        assert!("fuzzy".parse::<MatchPolicy>().is_err());
        assert_eq!(MatchPolicy::default(), MatchPolicy::Suffix);
    }
}
