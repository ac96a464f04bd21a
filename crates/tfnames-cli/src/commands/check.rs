//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;
use tfnames_core::{Analyzer, Config};
use tfnames_rules::resource_name_contains_type;
use tfnames_rules::{MatchPolicy, RuleSet};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Flags of the check command.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to run.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Policy override for the naming rule.
    pub policy: Option<MatchPolicy>,
}

/// Runs the check command.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<ExitCode> {
    let mut config = load_config(source)?;

    if let Some(policy) = options.policy {
        config
            .rules
            .entry(resource_name_contains_type::NAME.to_string())
            .or_default()
            .set_str("policy", policy.as_str());
    }

    let mut ruleset = RuleSet::from_config(&config).context("Invalid rule configuration")?;
    if let Some(filter) = &options.rules {
        let selected: Vec<&str> = filter.split(',').map(str::trim).collect();
        for name in &selected {
            if !ruleset
                .rules
                .iter()
                .any(|r| r.name() == *name || r.code() == *name)
            {
                tracing::warn!("Unknown rule: {}", name);
            }
        }
        ruleset = ruleset.only(&selected);
    }

    let fail_on = config.fail_on();
    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(options.exclude.iter().cloned());
    for rule in ruleset.rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rule(s)",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    if result.has_issues_at(fail_on) {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };

    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }

    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = tmp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        tmp
    }

    fn options(format: OutputFormat) -> CheckOptions {
        CheckOptions {
            format,
            ..CheckOptions::default()
        }
    }

    #[test]
    fn clean_tree_succeeds() {
        let tmp = tree(&[("main.tf", "resource \"aws_iam_role\" \"deploy\" {}\n")]);
        let code = run(tmp.path(), &options(OutputFormat::Compact), &ConfigSource::Default)
            .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn issue_fails_the_run() {
        let tmp = tree(&[("main.tf", "resource \"aws_iam_role\" \"deploy_role\" {}\n")]);
        let code = run(tmp.path(), &options(OutputFormat::Json), &ConfigSource::Default)
            .unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn policy_flag_overrides_config() {
        let tmp = tree(&[
            ("main.tf", "resource \"aws_iam_role\" \"role_for_ci\" {}\n"),
            (
                "tfnames.toml",
                "[rules.terraform_resource_name_contains_type]\npolicy = \"suffix\"\n",
            ),
        ]);
        let source = ConfigSource::Project(tmp.path().join("tfnames.toml"));

        let code = run(tmp.path(), &options(OutputFormat::Compact), &source).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let substring = CheckOptions {
            policy: Some(MatchPolicy::Substring),
            ..options(OutputFormat::Compact)
        };
        let code = run(tmp.path(), &substring, &source).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn warnings_pass_unless_fail_on_lowers_threshold() {
        let tmp = tree(&[
            ("main.tf", "resource \"aws_iam_role\" \"deploy_role\" {}\n"),
            (
                "tfnames.toml",
                "[rules.terraform_resource_name_contains_type]\nseverity = \"warning\"\n",
            ),
        ]);
        let source = ConfigSource::Project(tmp.path().join("tfnames.toml"));
        let code = run(tmp.path(), &options(OutputFormat::Text), &source).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        fs::write(
            tmp.path().join("tfnames.toml"),
            "fail_on = \"warning\"\n[rules.terraform_resource_name_contains_type]\nseverity = \"warning\"\n",
        )
        .unwrap();
        let code = run(tmp.path(), &options(OutputFormat::Text), &source).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let tmp = tree(&[]);
        let source = ConfigSource::Explicit(tmp.path().join("nope.toml"));
        let err = run(tmp.path(), &options(OutputFormat::Text), &source).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn malformed_block_is_an_error() {
        let tmp = tree(&[("main.tf", "resource \"aws_instance\" {}\n")]);
        let err = run(tmp.path(), &options(OutputFormat::Text), &ConfigSource::Default)
            .unwrap_err();
        assert!(err.to_string().contains("Analysis failed"));
    }
}
