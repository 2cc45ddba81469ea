use crate::app_config::{AppConfig, Environment, FallbackMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development config pointed at a local backend.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let non_zero = |var: &str, value: u64| -> Result<u64, ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            })
        } else {
            Ok(value)
        }
    };

    let env = parse_environment(&or_default("CARFEED_ENV", "development"))?;
    let log_level = or_default("CARFEED_LOG_LEVEL", env.default_log_level());

    let base_url = or_default("CARFEED_BASE_URL", "http://127.0.0.1:5000");
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "CARFEED_BASE_URL".to_string(),
            reason: format!("'{base_url}' is not an http(s) URL"),
        });
    }

    let session_cookie = lookup("CARFEED_SESSION_COOKIE")
        .ok()
        .filter(|c| !c.trim().is_empty());

    let poll_interval_secs = non_zero(
        "CARFEED_POLL_INTERVAL_SECS",
        parse_u64("CARFEED_POLL_INTERVAL_SECS", "30")?,
    )?;
    let request_timeout_secs = non_zero(
        "CARFEED_REQUEST_TIMEOUT_SECS",
        parse_u64("CARFEED_REQUEST_TIMEOUT_SECS", "15")?,
    )?;
    let user_agent = or_default("CARFEED_USER_AGENT", "carfeed/0.1 (live-feed)");
    let fallback = parse_fallback(&or_default("CARFEED_FALLBACK", "sample"))?;

    let catalog_path = lookup("CARFEED_CATALOG_PATH").ok().map(PathBuf::from);
    let theme_path = PathBuf::from(or_default("CARFEED_THEME_PATH", "./.carfeed/theme.json"));

    Ok(AppConfig {
        env,
        log_level,
        base_url,
        session_cookie,
        poll_interval_secs,
        request_timeout_secs,
        user_agent,
        fallback,
        catalog_path,
        theme_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CARFEED_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_fallback(s: &str) -> Result<FallbackMode, ConfigError> {
    match s {
        "sample" => Ok(FallbackMode::Sample),
        "none" => Ok(FallbackMode::Empty),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CARFEED_FALLBACK".to_string(),
            reason: format!("expected 'sample' or 'none', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
