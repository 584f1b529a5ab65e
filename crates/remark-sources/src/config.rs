//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use remark_core::config::{MarkupConfig, ScoringConfig};

/// Settings for fetching remote exam reports.
///
/// Note: Custom Debug impl masks the cookie to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Value sent as the `Cookie` header; may contain `${VAR}` references.
    #[serde(default)]
    pub cookie: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Max documents loaded concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("cookie", &self.cookie.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("parallelism", &self.parallelism)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_parallelism() -> usize {
    4
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cookie: None,
            timeout_secs: default_timeout_secs(),
            parallelism: default_parallelism(),
        }
    }
}

/// Top-level remark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemarkConfig {
    /// Markup conventions of the exam report.
    #[serde(default)]
    pub markup: MarkupConfig,
    /// Scoring policy selection and weights.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Remote fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Directory for per-student tables.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RemarkConfig {
    fn default() -> Self {
        Self {
            markup: MarkupConfig::default(),
            scoring: ScoringConfig::default(),
            fetch: FetchConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `remark.toml` in the current directory
/// 2. `~/.config/remark/config.toml`
///
/// Environment variable override: `REMARK_COOKIE`.
pub fn load_config() -> Result<RemarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RemarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("remark.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RemarkConfig::default(),
    };

    if let Ok(cookie) = std::env::var("REMARK_COOKIE") {
        config.fetch.cookie = Some(cookie);
    }

    Ok(config)
}

/// Parse a TOML string into a config, resolving `${VAR}` in the cookie.
pub fn parse_config_str(content: &str) -> Result<RemarkConfig> {
    let mut config: RemarkConfig = toml::from_str(content)?;
    config.fetch.cookie = config
        .fetch
        .cookie
        .as_deref()
        .map(resolve_env_vars)
        .filter(|c| !c.is_empty());
    anyhow::ensure!(
        config.fetch.parallelism >= 1,
        "fetch.parallelism must be at least 1"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("remark"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use remark_core::config::PolicyKind;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_REMARK_TEST_VAR", "session=abc");
        assert_eq!(resolve_env_vars("${_REMARK_TEST_VAR}"), "session=abc");
        assert_eq!(
            resolve_env_vars("a=1; ${_REMARK_TEST_VAR}; b=2"),
            "a=1; session=abc; b=2"
        );
        std::env::remove_var("_REMARK_TEST_VAR");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        std::env::set_var("_REMARK_TEST_SELF_REF", "x${_REMARK_TEST_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_REMARK_TEST_SELF_REF};tail"),
            "x${_REMARK_TEST_SELF_REF};tail"
        );
        std::env::remove_var("_REMARK_TEST_SELF_REF");
    }

    #[test]
    fn self_referencing_cookie_loads() {
        std::env::set_var("_REMARK_TEST_SID", "sid=${_REMARK_TEST_SID}");
        let config = parse_config_str("[fetch]\ncookie = \"${_REMARK_TEST_SID}\"\n").unwrap();
        std::env::remove_var("_REMARK_TEST_SID");
        assert_eq!(
            config.fetch.cookie.as_deref(),
            Some("sid=${_REMARK_TEST_SID}")
        );
    }

    #[test]
    fn unterminated_reference_is_left_alone() {
        assert_eq!(resolve_env_vars("${NOPE"), "${NOPE");
    }

    #[test]
    fn default_config() {
        let config = RemarkConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.scoring.policy, PolicyKind::Penalty);
        assert_eq!(config.markup.region_label, "lrn-response-validate-wrapper");
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
output_dir = "marks"

[markup]
option_label = "mcq-choice"

[scoring]
policy = "all-or-nothing"

[fetch]
timeout_secs = 10
parallelism = 2
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("marks"));
        assert_eq!(config.markup.option_label, "mcq-choice");
        assert_eq!(config.markup.option_tag, "li");
        assert_eq!(config.scoring.policy, PolicyKind::AllOrNothing);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert!(config.fetch.cookie.is_none());
    }

    #[test]
    fn cookie_resolves_from_env() {
        std::env::set_var("_REMARK_TEST_COOKIE", "sid=42");
        let config = parse_config_str(
            r#"
[fetch]
cookie = "${_REMARK_TEST_COOKIE}"
"#,
        )
        .unwrap();
        std::env::remove_var("_REMARK_TEST_COOKIE");
        assert_eq!(config.fetch.cookie.as_deref(), Some("sid=42"));
    }

    #[test]
    fn unset_cookie_reference_becomes_none() {
        let config = parse_config_str(
            r#"
[fetch]
cookie = "${_REMARK_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();
        assert!(config.fetch.cookie.is_none());
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let err = parse_config_str("[fetch]\nparallelism = 0\n").unwrap_err();
        assert!(err.to_string().contains("parallelism"));
    }

    #[test]
    fn debug_masks_cookie() {
        let fetch = FetchConfig {
            cookie: Some("secret-session".into()),
            ..FetchConfig::default()
        };
        let shown = format!("{fetch:?}");
        assert!(!shown.contains("secret-session"));
        assert!(shown.contains("***"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/no/such/remark.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remark.toml");
        std::fs::write(&path, "[scoring]\nincorrect_penalty = 0.5\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.scoring.incorrect_penalty, 0.5);
    }
}
