use std::env;
use std::path::Path;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::FileFormat;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub password: PasswordConfig,
    pub token: TokenConfig,
}

/// Argon2id work factor.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub max_password_bytes: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: argon2::Params::DEFAULT_M_COST,
            time_cost: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
            max_password_bytes: 4096,
        }
    }
}

/// Longest session lifetime accepted from configuration.
pub const MAX_SESSION_TTL_SECONDS: i64 = 366 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TokenConfig {
    pub session_ttl_seconds: i64,
    pub issuer: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: 3600,
            issuer: None,
        }
    }
}

impl TokenConfig {
    /// Configured session lifetime.
    ///
    /// # Errors
    /// * `Message` - Lifetime is not positive or exceeds `MAX_SESSION_TTL_SECONDS`
    pub fn session_ttl(&self) -> Result<Duration, ConfigError> {
        let seconds = self.session_ttl_seconds;
        if !(1..=MAX_SESSION_TTL_SECONDS).contains(&seconds) {
            return Err(ConfigError::Message(format!(
                "token.session_ttl_seconds must be between 1 and {}, got {}",
                MAX_SESSION_TTL_SECONDS, seconds
            )));
        }

        Duration::try_seconds(seconds).ok_or_else(|| {
            ConfigError::Message(format!("token.session_ttl_seconds out of range: {}", seconds))
        })
    }
}

impl Config {
    const ENV_PREFIX: &'static str = "SESSION_AUTH";

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SESSION_AUTH__TOKEN__ISSUER, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::layered(Path::new("config"), &run_mode, Self::environment())
    }

    /// Parse an inline TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = ConfigBuilder::builder()
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make later operations fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.session_ttl()?;
        Ok(())
    }

    fn environment() -> Environment {
        Environment::with_prefix(Self::ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    pub(crate) fn layered(
        config_dir: &Path,
        run_mode: &str,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let default_file = config_dir.join("default");
        let run_mode_file = config_dir.join(run_mode);

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(File::with_name(&run_mode_file.to_string_lossy()).required(false))
            .add_source(environment)
            .build()?;

        let config: Self = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.token.session_ttl_seconds, 3600);
        assert_eq!(config.token.issuer, None);
        assert_eq!(config.password.memory_cost_kib, 19 * 1024);
        assert_eq!(config.password.time_cost, 2);
        assert_eq!(config.password.parallelism, 1);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = Config::from_toml_str(
            r#"
            [token]
            issuer = "auth.example.com"

            [password]
            time_cost = 3
            "#,
        )
        .expect("Failed to parse config");

        assert_eq!(config.token.issuer.as_deref(), Some("auth.example.com"));
        assert_eq!(config.token.session_ttl_seconds, 3600);
        assert_eq!(config.password.time_cost, 3);
        assert_eq!(config.password.memory_cost_kib, 19 * 1024);
    }

    #[test]
    fn test_invalid_type_rejected() {
        let result = Config::from_toml_str("[token]\nsession_ttl_seconds = \"soon\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unusable_session_ttl_rejected() {
        for ttl in ["9223372036854775807", "-10", "0"] {
            let document = format!("[token]\nsession_ttl_seconds = {}\n", ttl);
            let error = Config::from_toml_str(&document).unwrap_err();
            assert!(
                error.to_string().contains("session_ttl_seconds"),
                "unexpected error for {ttl}: {error}"
            );
        }
    }

    #[test]
    fn test_session_ttl_bounds() {
        let mut token = TokenConfig::default();
        assert_eq!(token.session_ttl().unwrap(), Duration::hours(1));

        token.session_ttl_seconds = MAX_SESSION_TTL_SECONDS;
        assert!(token.session_ttl().is_ok());

        token.session_ttl_seconds = MAX_SESSION_TTL_SECONDS + 1;
        assert!(token.session_ttl().is_err());
    }

    fn scratch_dir() -> std::path::PathBuf {
        env::temp_dir().join(format!("session-auth-config-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_environment_overrides_run_mode_file() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("default.toml"),
            "[token]\nissuer = \"from-default\"\nsession_ttl_seconds = 900\n\n[password]\ntime_cost = 4\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("staging.toml"),
            "[token]\nissuer = \"from-staging\"\nsession_ttl_seconds = 1200\n",
        )
        .unwrap();

        let variables = config::Map::from([
            ("SESSION_AUTH__TOKEN__ISSUER".to_string(), "from-env".to_string()),
            ("UNRELATED__TOKEN__ISSUER".to_string(), "ignored".to_string()),
        ]);
        let environment = Config::environment().source(Some(variables));

        let result = Config::layered(&dir, "staging", environment);
        std::fs::remove_dir_all(&dir).unwrap();
        let config = result.expect("Failed to load layered config");

        assert_eq!(config.token.issuer.as_deref(), Some("from-env"));
        assert_eq!(config.token.session_ttl_seconds, 1200);
        assert_eq!(config.password.time_cost, 4);
        assert_eq!(config.password.parallelism, 1);
    }

    #[test]
    fn test_environment_ttl_is_validated() {
        let dir = scratch_dir();
        let variables = config::Map::from([(
            "SESSION_AUTH__TOKEN__SESSION_TTL_SECONDS".to_string(),
            "-10".to_string(),
        )]);

        let environment = Config::environment().source(Some(variables));

        let result = Config::layered(&dir, "production", environment);

        assert!(result.is_err());
    }
}
