use anyhow::{Context, Result, anyhow};

use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database_url: String,
    pub(crate) database_max_connections: u32,
    pub(crate) jwt_secret: String,
    pub(crate) jwt_ttl_seconds: i64,
    pub(crate) http_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_request_timeout_secs: u64,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let database_max_connections = parse_u32_env("DATABASE_MAX_CONNECTIONS", 10)?;

        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        let jwt_ttl_seconds: i64 = std::env::var("JWT_TTL_SECONDS")
            .unwrap_or_else(|_| JwtService::DEFAULT_TTL_SECONDS.to_string())
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let cors_origins = parse_cors_origins(
            &std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_request_timeout_secs,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr + PartialEq + Default + ToString,
{
    let value = raw
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<T>()
        .map_err(|_| anyhow!("Failed to parse {key}, expecting positive integer"))?;

    if value == T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    parse_positive(key, std::env::var(key).ok(), default)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    parse_positive(key, std::env::var(key).ok(), default)
}

fn parse_u32_env(key: &str, default: u32) -> Result<u32> {
    parse_positive(key, std::env::var(key).ok(), default)
}

#[cfg(test)]
mod tests {
    use super::{parse_cors_origins, parse_positive};

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let origins = parse_cors_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn positive_values_fall_back_to_default() {
        assert_eq!(parse_positive::<u64>("X", None, 10).expect("default"), 10);
        assert_eq!(
            parse_positive::<u64>("X", Some(" 25 ".to_string()), 10).expect("explicit"),
            25
        );
    }

    #[test]
    fn zero_and_garbage_are_rejected() {
        assert!(parse_positive::<usize>("X", Some("0".to_string()), 1).is_err());
        assert!(parse_positive::<usize>("X", Some("lots".to_string()), 1).is_err());
        assert!(parse_positive::<usize>("X", Some("-4".to_string()), 1).is_err());
    }
}
