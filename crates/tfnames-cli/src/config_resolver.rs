//! Configuration file resolution with global fallback.
//!
//! 1. `--config` flag (explicit path)
//! 2. `{path}/tfnames.toml` or `{path}/.tfnames.toml`
//! 3. `$TFNAMES_CONFIG_DIR/config.toml`, else `~/.tfnames/config.toml`
//! 4. No config found: defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the analyzed Terraform root.
    Project(PathBuf),
    /// Found in the user's global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config came from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["tfnames.toml", ".tfnames.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "TFNAMES_CONFIG_DIR";

/// Resolves the configuration file for a check of `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(project_dir, explicit, global_config_dir())
}

/// Resolution with the global directory passed in, so tests never touch the environment.
fn resolve_in(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|d| d.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// Returns the global config directory: `$TFNAMES_CONFIG_DIR`, else `~/.tfnames/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".tfnames"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        touch(project.path(), "tfnames.toml");

        let explicit = Path::new("/nonexistent/tfnames.toml");
        assert_eq!(
            resolve_in(project.path(), Some(explicit), None),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn project_names_in_priority_order() {
        let project = TempDir::new().unwrap();
        let dotted = touch(project.path(), ".tfnames.toml");
        assert_eq!(
            resolve_in(project.path(), None, None),
            ConfigSource::Project(dotted)
        );

        let plain = touch(project.path(), "tfnames.toml");
        assert_eq!(
            resolve_in(project.path(), None, None),
            ConfigSource::Project(plain)
        );
    }

    #[test]
    fn global_is_a_fallback_only() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        assert_eq!(
            resolve_in(project.path(), None, Some(global.path().to_path_buf())),
            ConfigSource::Default
        );

        let global_config = touch(global.path(), "config.toml");
        let source = resolve_in(project.path(), None, Some(global.path().to_path_buf()));
        assert!(source.is_global());
        assert_eq!(source.path(), Some(global_config.as_path()));

        touch(project.path(), "tfnames.toml");
        let source = resolve_in(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(source, ConfigSource::Project(_)));
    }

    #[test]
    fn default_has_no_path() {
        let project = TempDir::new().unwrap();
        let source = resolve_in(project.path(), None, None);
        assert_eq!(source, ConfigSource::Default);
        assert!(source.path().is_none());
        assert!(!source.is_global());
    }
}
