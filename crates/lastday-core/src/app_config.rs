use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide, read-only settings built once at startup.
///
/// Provider clients are constructed from this value and shared behind an
/// `Arc`; nothing here is mutated after [`crate::load_app_config`] returns.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub tour_api_key: String,
    pub kakao_api_key: Option<String>,
    pub tour_base_url: String,
    pub naver_transit_url: String,
    pub naver_walk_url: String,
    pub kakao_base_url: String,
    pub tour_page_size: u32,
    pub request_timeout_secs: u64,
    pub lookup_timeout_secs: u64,
    pub max_concurrent_lookups: usize,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("tour_api_key", &"[redacted]")
            .field(
                "kakao_api_key",
                &self.kakao_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("tour_base_url", &self.tour_base_url)
            .field("naver_transit_url", &self.naver_transit_url)
            .field("naver_walk_url", &self.naver_walk_url)
            .field("kakao_base_url", &self.kakao_base_url)
            .field("tour_page_size", &self.tour_page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("lookup_timeout_secs", &self.lookup_timeout_secs)
            .field("max_concurrent_lookups", &self.max_concurrent_lookups)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
