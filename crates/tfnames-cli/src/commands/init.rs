//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "tfnames.toml";

const DEFAULT_CONFIG: &str = r#"# tfnames configuration

# Lowest severity that makes `tfnames check` exit non-zero
# fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./infra"

# Glob patterns to exclude from analysis
exclude = [
    "**/.terraform/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.terraform_resource_name_contains_type]
enabled = true
# severity = "warning"  # Override default severity

# "suffix": flag names ending with words of the type (aws_iam_role.user_role)
# "substring": also flag the type's words anywhere (aws_iam_role.role_for_ci)
policy = "suffix"

# Substring policy only: type words never matched on their own
# allowed_tokens = ["aws", "gcp", "azurerm"]
# min_token_length = 3
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: tfnames check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
