use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does not load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let dataset_path = PathBuf::from(require("POSTLENS_DATASET_PATH")?);
    let palette_path = lookup("POSTLENS_PALETTE_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    let env = parse_environment(&or_default("POSTLENS_ENV", "development"))?;
    let log_level = or_default("POSTLENS_LOG_LEVEL", "info");

    let bind_addr = or_default("POSTLENS_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("POSTLENS_BIND_ADDR", e.to_string()))?;

    let rolling_period = or_default("POSTLENS_ROLLING_PERIOD", "7D").trim().to_string();
    if rolling_period.is_empty() {
        return Err(invalid(
            "POSTLENS_ROLLING_PERIOD",
            "must not be empty".to_string(),
        ));
    }

    let rank_limit = or_default("POSTLENS_RANK_LIMIT", "50")
        .parse::<usize>()
        .map_err(|e| invalid("POSTLENS_RANK_LIMIT", e.to_string()))?;

    Ok(AppConfig {
        env,
        log_level,
        bind_addr,
        dataset_path,
        palette_path,
        rolling_period,
        rank_limit,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "POSTLENS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
