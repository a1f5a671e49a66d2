use std::{env, fmt, str::FromStr};

use config::{Config, ConfigError, Environment, File};
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::Deserialize;
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl AppEnvironment {
    fn as_str(self) -> &'static str {
        match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        }
    }
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnvironment::Development),
            "production" | "prod" => Ok(AppEnvironment::Production),
            "testing" | "test" => Ok(AppEnvironment::Testing),
            other => Err(ConfigError::Message(format!("unknown APP_ENV: {other}"))),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "defaults::environment")]
    pub env: AppEnvironment,

    #[serde(default = "defaults::name")]
    pub name: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::workers")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "defaults::cors")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "defaults::jwt_expiration")]
    pub jwt_expiration_minutes: i64,

    #[serde(default = "defaults::admin_name")]
    pub admin_name: String,

    #[serde(default = "defaults::admin_email")]
    pub admin_email: String,

    #[serde(default)]
    pub admin_password: String,
}

mod defaults {
    pub fn environment() -> super::AppEnvironment {
        super::AppEnvironment::Development
    }
    pub fn name() -> String {
        "Tesseract-Talent-API".into()
    }
    pub fn port() -> u16 {
        8080
    }
    pub fn host() -> String {
        "127.0.0.1".into()
    }
    pub fn workers() -> usize {
        num_cpus::get()
    }
    pub fn cors() -> Vec<String> {
        vec!["*".into()]
    }
    pub fn jwt_expiration() -> i64 {
        60
    }
    pub fn admin_name() -> String {
        "Admin tesseract".into()
    }
    pub fn admin_email() -> String {
        "admin@tesseract.com".into()
    }
}

impl AppConfig {
    /// Layered load: `config/default` file, then `config/<env>` file, then
    /// `APP_`-prefixed environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let env_name: AppEnvironment = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".into())
            .parse()?;

        let layered = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{env_name}")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .ignore_empty(true),
            )
            .build()?;

        let mut config: AppConfig = layered.try_deserialize()?;
        config.env = env_name;

        // Secrets usually arrive as flat APP_* variables, which the layered
        // source does not map onto multi-word struct fields.
        if config.database_url.trim().is_empty() {
            config.database_url = require_env("APP_DATABASE_URL")?;
        }
        if config.jwt_secret.trim().is_empty() {
            config.jwt_secret = require_env("APP_JWT_SECRET")?;
        }
        if config.admin_password.trim().is_empty() {
            config.admin_password = require_env("APP_ADMIN_PASSWORD")?;
        }
        if let Some(email) = non_blank_env("APP_ADMIN_EMAIL") {
            config.admin_email = email;
        }
        if let Some(name) = non_blank_env("APP_ADMIN_NAME") {
            config.admin_name = name;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.database_url.trim().is_empty() {
            problems.push("database_url is required");
        }
        if self.jwt_secret.len() < 32 {
            problems.push("jwt_secret must be at least 32 characters");
        }
        if !self.admin_email.contains('@') {
            problems.push("admin_email is not an email address");
        }
        if self.admin_password.trim().is_empty() {
            problems.push("admin_password is required");
        }
        if self.is_production() && self.cors_origins().iter().any(|origin| origin == "*") {
            problems.push("wildcard CORS origin is not allowed in production");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(problems.join("; ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    /// Origins may be listed as separate entries or as one comma-separated
    /// string.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Message(format!("{key} must be set")))
}

fn non_blank_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        "[MISSING]"
    } else {
        "[REDACTED]"
    }
}

// Secret material never reaches the startup log.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &mask(&self.database_url))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &mask(&self.jwt_secret))
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("admin_name", &self.admin_name)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &mask(&self.admin_password))
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        // The plaintext copy of the secret is wiped once the keys exist.
        let secret = Zeroizing::new(config.jwt_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtKeys([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: defaults::name(),
            port: defaults::port(),
            host: defaults::host(),
            worker_count: 1,
            database_url: "postgres://localhost/tesseract".into(),
            cors_allowed_origins: defaults::cors(),
            jwt_secret: "a_secret_that_is_definitely_32_chars_long".into(),
            jwt_expiration_minutes: defaults::jwt_expiration(),
            admin_name: defaults::admin_name(),
            admin_email: defaults::admin_email(),
            admin_password: "admintesseract123".into(),
        }
    }

    #[test]
    fn environment_parsing_accepts_short_forms() {
        assert_eq!(
            "prod".parse::<AppEnvironment>().unwrap(),
            AppEnvironment::Production
        );
        assert_eq!(
            "Testing".parse::<AppEnvironment>().unwrap(),
            AppEnvironment::Testing
        );
        assert!("staging".parse::<AppEnvironment>().is_err());
    }

    #[test]
    fn cors_origins_split_comma_separated_entries() {
        let mut config = base_config();
        config.cors_allowed_origins = vec![
            "https://a.example, https://b.example".into(),
            "https://c.example".into(),
        ];

        assert_eq!(
            config.cors_origins(),
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    #[test]
    fn wildcard_cors_is_rejected_in_production() {
        let mut config = base_config();
        config.env = AppEnvironment::Production;

        assert!(config.validate().is_err());
    }

    #[test]
    fn short_jwt_secret_fails_validation() {
        let mut config = base_config();
        config.jwt_secret = "short".into();

        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", base_config());

        assert!(!rendered.contains("admintesseract123"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
