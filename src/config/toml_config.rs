use crate::config::{Environment, DEFAULT_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SdkError};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Overrides the environment's base URL when set.
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub app_token: Option<String>,
    pub auth_token: Option<String>,
}

fn env_placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"))
}

/// Fails when `${VAR}` survived substitution because the variable was unset.
fn reject_unresolved(field: &str, value: &str) -> Result<()> {
    if let Some(placeholder) = env_placeholder().find(value) {
        return Err(SdkError::InvalidConfigValueError {
            field: field.to_string(),
            value: placeholder.as_str().to_string(),
            reason: "Environment variable is not set".to_string(),
        });
    }
    Ok(())
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| SdkError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable.
    /// Unset variables are left untouched.
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| {
                    tracing::warn!("Environment variable {} is not set", var_name);
                    caps[0].to_string()
                })
            })
            .into_owned()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.api.environment.base_url())
    }

    fn app_token(&self) -> Option<&str> {
        self.auth.app_token.as_deref()
    }

    fn auth_token(&self) -> Option<&str> {
        self.auth.auth_token.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        TomlConfig::timeout_seconds(self)
    }

    fn user_agent(&self) -> Option<&str> {
        self.api.user_agent.as_deref()
    }

    fn extra_headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        reject_unresolved("api.base_url", self.base_url())?;
        validate_url("api.base_url", self.base_url())?;
        validate_range("api.timeout_seconds", self.timeout_seconds(), 1, MAX_TIMEOUT_SECONDS)?;

        // Production calls need both credentials.
        if self.api.base_url.is_none() && self.api.environment == Environment::Production {
            validate_required_field("auth.app_token", &self.auth.app_token)?;
            validate_required_field("auth.auth_token", &self.auth.auth_token)?;
        }

        if let Some(token) = &self.auth.app_token {
            validate_non_empty_string("auth.app_token", token)?;
            reject_unresolved("auth.app_token", token)?;
        }
        if let Some(token) = &self.auth.auth_token {
            validate_non_empty_string("auth.auth_token", token)?;
            reject_unresolved("auth.auth_token", token)?;
        }
        if let Some(user_agent) = &self.api.user_agent {
            reject_unresolved("api.user_agent", user_agent)?;
        }
        for (name, value) in &self.headers {
            validate_non_empty_string("headers", name)?;
            reject_unresolved(&format!("headers.{}", name), value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[api]
environment = "production"
timeout_seconds = 10

[auth]
app_token = "app-123"
auth_token = "seller-456"

[headers]
X-Request-Source = "erp"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api.environment, Environment::Production);
        assert_eq!(config.base_url(), "https://api.extra.com.br/api/v1");
        assert_eq!(config.timeout_seconds(), 10);
        assert_eq!(config.app_token(), Some("app-123"));
        assert_eq!(config.auth_token(), Some("seller-456"));
        assert_eq!(config.extra_headers().get("X-Request-Source").unwrap(), "erp");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_sandbox_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.base_url(), Environment::Sandbox.base_url());
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.app_token(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SELLER_ITEMS_TEST_APP_TOKEN", "from-env");

        let toml_content = r#"
[auth]
app_token = "${SELLER_ITEMS_TEST_APP_TOKEN}"
auth_token = "${SELLER_ITEMS_TEST_UNSET_TOKEN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.app_token(), Some("from-env"));
        assert_eq!(config.auth_token(), Some("${SELLER_ITEMS_TEST_UNSET_TOKEN}"));

        std::env::remove_var("SELLER_ITEMS_TEST_APP_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[api]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[auth]
app_token = "  "
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_tokens() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
environment = "production"

[auth]
app_token = "app-123"
"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(SdkError::MissingConfigError { field }) if field == "auth.auth_token"
        ));
    }

    #[test]
    fn test_unset_env_placeholder_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
environment = "production"

[auth]
app_token = "app-123"
auth_token = "${SELLER_ITEMS_TEST_NEVER_SET_TOKEN}"
"#,
        )
        .unwrap();

        match config.validate() {
            Err(SdkError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "auth.auth_token");
                assert_eq!(value, "${SELLER_ITEMS_TEST_NEVER_SET_TOKEN}");
            }
            other => panic!("expected invalid value error, got {:?}", other),
        }

        let config = TomlConfig::from_toml_str(
            r#"
[headers]
x-tenant = "tenant-${SELLER_ITEMS_TEST_NEVER_SET_TENANT}"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(SdkError::InvalidConfigValueError { field, .. }) if field == "headers.x-tenant"
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[api\nbase_url = 1");
        assert!(matches!(result, Err(SdkError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[api]
base_url = "http://localhost:9000/api/v1"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), "http://localhost:9000/api/v1");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TomlConfig::from_file("/nonexistent/seller-items.toml");
        assert!(matches!(result, Err(SdkError::IoError(_))));
    }
}
