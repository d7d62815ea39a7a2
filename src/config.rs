use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::TagPattern;
use crate::error::{ReleaseError, Result};

pub const TOKEN_VAR: &str = "GITLAB_ACCESS_TOKEN";
pub const PROJECT_VAR: &str = "GITLAB_PROJECT_ID";
pub const API_URL_VAR: &str = "GITLAB_API_URL";
pub const SOURCE_BRANCH_VAR: &str = "RELEASE_SOURCE_BRANCH";
pub const TARGET_BRANCH_VAR: &str = "RELEASE_TARGET_BRANCH";

const CONFIG_FILE_NAME: &str = "gitlab-release.toml";
const ENV_FILE_NAME: &str = ".env";

fn default_api_url() -> String {
    "https://gitlab.com/api/v4".to_string()
}

fn default_source_branch() -> String {
    "development".to_string()
}

fn default_target_branch() -> String {
    "main".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_title_prefix() -> String {
    "Main Release".to_string()
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_bootstrap_tag() -> Option<String> {
    Some("v0.0.0".to_string())
}

/// Returns the default emojis awarded after approval.
fn default_award_emojis() -> Vec<String> {
    vec!["no_mouth".to_string(), "thumbsup".to_string()]
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_max_polls() -> u32 {
    40
}

/// `[gitlab]` section of the TOML file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitLabSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Project id or `group/name` path
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitLabSection {
    fn default() -> Self {
        GitLabSection {
            api_url: default_api_url(),
            project: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[branches]` section: the fixed source/target pair of a release
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    #[serde(default = "default_source_branch")]
    pub source: String,

    #[serde(default = "default_target_branch")]
    pub target: String,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            source: default_source_branch(),
            target: default_target_branch(),
        }
    }
}

/// `[release]` section: naming and polling behaviour
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    /// Tag assumed when the repository has none; an empty string disables
    /// it and a missing tag becomes fatal
    #[serde(default = "default_bootstrap_tag")]
    pub bootstrap_tag: Option<String>,

    #[serde(default = "default_award_emojis")]
    pub award_emojis: Vec<String>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            title_prefix: default_title_prefix(),
            tag_pattern: default_tag_pattern(),
            bootstrap_tag: default_bootstrap_tag(),
            award_emojis: default_award_emojis(),
            poll_interval_secs: default_poll_interval_secs(),
            max_polls: default_max_polls(),
        }
    }
}

impl ReleaseConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn tag_pattern(&self) -> TagPattern {
        TagPattern::new(self.tag_pattern.clone())
    }
}

/// Contents of `gitlab-release.toml`; every key is optional.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub gitlab: GitLabSection,

    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub project: Option<String>,
    pub api_url: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub no_bootstrap: bool,
}

/// Fully resolved settings for one release run.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub project: String,
    pub api_url: String,
    pub timeout: Duration,
    pub branches: BranchesConfig,
    pub release: ReleaseConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("project", &self.project)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("branches", &self.branches)
            .field("release", &self.release)
            .finish()
    }
}

/// First non-blank value wins
fn pick(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

impl Config {
    /// Merge all sources: CLI overrides, then `env` (process environment
    /// backed by the env file), then the TOML file, then defaults.
    ///
    /// Fails with a configuration error when the token or project is
    /// missing, before anything touches the network.
    pub fn resolve<F>(overrides: &ConfigOverrides, file: FileConfig, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = pick([overrides.token.clone(), env(TOKEN_VAR)]).ok_or_else(|| {
            ReleaseError::config(format!(
                "missing access token: pass --token or set {}",
                TOKEN_VAR
            ))
        })?;

        let project = pick([
            overrides.project.clone(),
            env(PROJECT_VAR),
            file.gitlab.project.clone(),
        ])
        .ok_or_else(|| {
            ReleaseError::config(format!(
                "missing project: pass --project or set {}",
                PROJECT_VAR
            ))
        })?;

        let api_url = pick([
            overrides.api_url.clone(),
            env(API_URL_VAR),
            Some(file.gitlab.api_url.clone()),
        ])
        .unwrap_or_else(default_api_url);

        let branches = BranchesConfig {
            source: pick([
                overrides.source_branch.clone(),
                env(SOURCE_BRANCH_VAR),
                Some(file.branches.source.clone()),
            ])
            .unwrap_or_else(default_source_branch),
            target: pick([
                overrides.target_branch.clone(),
                env(TARGET_BRANCH_VAR),
                Some(file.branches.target.clone()),
            ])
            .unwrap_or_else(default_target_branch),
        };

        let mut release = file.release;
        release.bootstrap_tag = release
            .bootstrap_tag
            .filter(|tag| !tag.trim().is_empty() && !overrides.no_bootstrap);

        let config = Config {
            token,
            project,
            api_url,
            timeout: Duration::from_secs(file.gitlab.timeout_secs),
            branches,
            release,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.branches.source == self.branches.target {
            return Err(ReleaseError::config(format!(
                "source and target branch are both '{}'",
                self.branches.source
            )));
        }
        if self.release.max_polls == 0 {
            return Err(ReleaseError::config("release.max_polls must be at least 1"));
        }
        self.release.tag_pattern().validate()?;
        if let Some(bootstrap) = &self.release.bootstrap_tag {
            self.release.tag_pattern().parse(bootstrap).map_err(|e| {
                ReleaseError::config(format!("invalid bootstrap tag '{}': {}", bootstrap, e))
            })?;
        }
        Ok(())
    }
}

/// Parse the contents of an env file.
///
/// Syntax follows `dotenvy`: `#` comments (also after an unquoted value),
/// `export ` prefixes, single or double quotes and escapes inside double
/// quotes. A malformed line is a configuration error.
pub fn parse_env_file(content: &str) -> Result<HashMap<String, String>> {
    collect_env(dotenvy::from_read_iter(content.as_bytes()), "env file")
}

fn collect_env<R: io::Read>(
    vars: dotenvy::Iter<R>,
    source: &str,
) -> Result<HashMap<String, String>> {
    vars.map(|item| {
        item.map_err(|e| ReleaseError::config(format!("invalid {}: {}", source, e)))
    })
    .collect()
}

/// Loads the env file, if any.
///
/// An explicit path must exist; the default `.env` is optional.
pub fn load_env_file(path: Option<&Path>) -> Result<HashMap<String, String>> {
    let path = match path {
        Some(path) => path,
        None => {
            let default = Path::new(ENV_FILE_NAME);
            if !default.exists() {
                return Ok(HashMap::new());
            }
            default
        }
    };

    log::debug!("loading environment from {}", path.display());
    let vars = dotenvy::from_path_iter(path).map_err(|e| {
        ReleaseError::config(format!("cannot read env file {}: {}", path.display(), e))
    })?;
    collect_env(vars, &path.display().to_string())
}

/// Loads the TOML configuration file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitlab-release.toml` in current directory
/// 3. `gitlab-release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(FileConfig)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_file_config(config_path: Option<&Path>) -> Result<FileConfig> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                dirs::config_dir()
                    .map(|dir| dir.join(CONFIG_FILE_NAME))
                    .filter(|p| p.exists())
            }
        }
    };

    let Some(path) = path else {
        return Ok(FileConfig::default());
    };

    log::debug!("loading configuration from {}", path.display());
    let content = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content)
        .map_err(|e| ReleaseError::config(format!("invalid {}: {}", path.display(), e)))
}

/// Resolve the run configuration from every source.
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    let env_file = load_env_file(overrides.env_file.as_deref())?;
    let file = load_file_config(overrides.config_path.as_deref())?;

    Config::resolve(overrides, file, |key| {
        std::env::var(key)
            .ok()
            .or_else(|| env_file.get(key).cloned())
    })
}
