//! Core analyzer for orchestrating lint execution over Terraform modules.

use crate::collector::Collector;
use crate::config::Config;
use crate::module::HclModule;
use crate::rule::{CheckError, Rule, RuleBox};
use crate::types::LintResult;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the directory tree.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A rule failed while checking a module.
    #[error("Rule {rule} failed on module {module}: {source}")]
    Check {
        /// Rule that failed.
        rule: String,
        /// Module directory, relative to the root.
        module: PathBuf,
        /// Underlying provider or sink error.
        source: CheckError,
    },
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or
    /// an exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = Vec::new();
        for pattern in self
            .exclude_patterns
            .iter()
            .chain(config.analyzer.exclude.iter())
        {
            exclude_patterns.push(glob::Pattern::new(pattern)?);
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            config,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<glob::Pattern>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes every module under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns the first discovery, read, provider or sink error; no
    /// partial result is returned.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let modules = self.discover_modules()?;
        info!("Found {} module(s) to analyze", modules.len());

        let mut result = LintResult::new();
        for (dir, files) in &modules {
            result.extend(self.analyze_module(dir, files)?);
        }

        info!(
            "Analysis complete: {} issue(s) in {} module(s)",
            result.issues.len(),
            result.modules_checked
        );

        Ok(result)
    }

    /// Runs every enabled rule over one module.
    fn analyze_module(&self, dir: &Path, files: &[PathBuf]) -> Result<LintResult, AnalyzerError> {
        debug!("Analyzing module: {}", dir.display());

        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            sources.push((self.relative(path), std::fs::read_to_string(path)?));
        }
        let module = HclModule::from_sources(sources);

        let mut collector = Collector::new(&self.config).with_sources(&module);
        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name(), rule.enabled()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            rule.check(&module, &mut collector)
                .map_err(|source| AnalyzerError::Check {
                    rule: rule.name().to_string(),
                    module: self.relative(dir),
                    source,
                })?;
        }

        let mut result = collector.into_result();
        result.modules_checked = 1;
        result.files_checked = files.len();
        Ok(result)
    }

    /// Discovers `.tf` files and groups them by directory, both sorted.
    /// `.tf.json` files are skipped.
    fn discover_modules(&self) -> Result<BTreeMap<PathBuf, Vec<PathBuf>>, AnalyzerError> {
        let mut walker = ignore::WalkBuilder::new(&self.root);
        walker
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut modules: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for entry in walker.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("tf") {
                if path.to_string_lossy().ends_with(".tf.json") {
                    debug!("Skipping {}: JSON syntax is not supported", path.display());
                }
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            let dir = path.parent().unwrap_or(&self.root).to_path_buf();
            modules.entry(dir).or_default().push(path.to_path_buf());
        }

        for files in modules.values_mut() {
            files.sort();
        }

        Ok(modules)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = self.relative(path);
        self.exclude_patterns
            .iter()
            .any(|p| p.matches_path(path) || p.matches_path(&relative))
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/examples/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/project")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/project/.terraform/modules/vpc/main.tf")));
        assert!(analyzer.should_exclude(Path::new("/project/vendor/main.tf")));
        assert!(!analyzer.should_exclude(Path::new("/project/main.tf")));
    }

    #[test]
    fn invalid_exclude_pattern_fails_build() {
        let result = Analyzer::builder().root("/project").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }
}
