use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::AppError;
use crate::onboarding::OnboardingPolicy;

#[derive(Clone)]
pub struct Config {
    /// Base URL of the hosted backend, e.g. `https://<project>.supabase.co`.
    pub supabase_url: String,
    pub supabase_key: String,
    /// When set, records are read and written through Postgres directly.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub provider_timeout: Duration,
    pub policy: OnboardingPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::InternalServerError(format!("{} must be set", key)))
        };
        let flag = |key: &str, default: bool| match var(key) {
            None => Ok(default),
            Some(v) => parse_flag(&v).ok_or_else(|| {
                AppError::InternalServerError(format!("{} must be true or false", key))
            }),
        };

        let server_port = var("SERVER_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse()
            .map_err(|_| AppError::InternalServerError("SERVER_PORT must be a number".into()))?;
        let timeout_secs: u64 = var("PROVIDER_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| {
                AppError::InternalServerError("PROVIDER_TIMEOUT_SECS must be a number".into())
            })?;

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?,
            supabase_key: required("SUPABASE_KEY")?,
            database_url: var("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            server_port,
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            provider_timeout: Duration::from_secs(timeout_secs),
            policy: OnboardingPolicy {
                echo_password: flag("ECHO_PASSWORD", false)?,
                persist_password: flag("PERSIST_PASSWORD", true)?,
                store_username: flag("STORE_USERNAME", true)?,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("server_port", &self.server_port)
            .field("server_host", &self.server_host)
            .field("provider_timeout", &self.provider_timeout)
            .field("policy", &self.policy)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
