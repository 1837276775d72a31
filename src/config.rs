use std::{env, path::PathBuf, str::FromStr};

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub cors_allowed_origins: Vec<String>,
    pub log_dir: Option<PathBuf>,
    pub log_retention_days: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: "production".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            log_dir: None,
            log_retention_days: 14,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|value| parse_origins(&value))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_allowed_origins);

        Self {
            port: env_or("PORT", defaults.port),
            environment: env::var("NODE_ENV")
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.environment),
            cors_allowed_origins,
            log_dir: env::var_os("LOG_DIR").map(PathBuf::from),
            log_retention_days: env_or("LOG_RETENTION_DAYS", defaults.log_retention_days),
        }
    }

    /// A credentialed CORS policy can never match a wildcard origin.
    pub fn wildcard_origin_with_credentials(&self) -> bool {
        self.cors_allowed_origins.iter().any(|origin| origin == "*")
    }
}

pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    // Parse typed environment values with a fallback.
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
