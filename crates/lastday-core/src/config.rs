use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_TOUR_BASE_URL: &str =
    "http://api.visitkorea.or.kr/openapi/service/rest/KorService";
pub const DEFAULT_NAVER_TRANSIT_URL: &str = "https://m.map.naver.com/apis/rp/pubtrans/summary";
pub const DEFAULT_NAVER_WALK_URL: &str = "https://map.naver.com/v5/api/dir/findwalk";
pub const DEFAULT_KAKAO_BASE_URL: &str = "https://dapi.kakao.com";

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the real environment so tests can drive it with
/// a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let tour_api_key = require("TOUR_API_KEY")?;
    let kakao_api_key = lookup("KAKAO_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let env = parse_environment(&or_default("LASTDAY_ENV", "development"))?;
    let bind_addr = parse("LASTDAY_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("LASTDAY_LOG_LEVEL", "info");

    let tour_base_url = or_default("LASTDAY_TOUR_BASE_URL", DEFAULT_TOUR_BASE_URL);
    let naver_transit_url = or_default("LASTDAY_NAVER_TRANSIT_URL", DEFAULT_NAVER_TRANSIT_URL);
    let naver_walk_url = or_default("LASTDAY_NAVER_WALK_URL", DEFAULT_NAVER_WALK_URL);
    let kakao_base_url = or_default("LASTDAY_KAKAO_BASE_URL", DEFAULT_KAKAO_BASE_URL);

    let tour_page_size = parse_u32("LASTDAY_TOUR_PAGE_SIZE", "30")?;
    non_zero("LASTDAY_TOUR_PAGE_SIZE", u64::from(tour_page_size))?;
    let request_timeout_secs = parse_u64("LASTDAY_REQUEST_TIMEOUT_SECS", "10")?;
    non_zero("LASTDAY_REQUEST_TIMEOUT_SECS", request_timeout_secs)?;
    let lookup_timeout_secs = parse_u64("LASTDAY_LOOKUP_TIMEOUT_SECS", "15")?;
    non_zero("LASTDAY_LOOKUP_TIMEOUT_SECS", lookup_timeout_secs)?;
    let max_concurrent_lookups = parse_usize("LASTDAY_MAX_CONCURRENT_LOOKUPS", "16")?;
    let max_retries = parse_u32("LASTDAY_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("LASTDAY_RETRY_BACKOFF_BASE_MS", "250")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        tour_api_key,
        kakao_api_key,
        tour_base_url,
        naver_transit_url,
        naver_walk_url,
        kakao_base_url,
        tour_page_size,
        request_timeout_secs,
        lookup_timeout_secs,
        max_concurrent_lookups,
        max_retries,
        retry_backoff_base_ms,
    })
}

fn non_zero(var: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LASTDAY_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
