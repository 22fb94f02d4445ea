#[derive(Clone)]
pub struct AppConfig {
    pub redis_url: String,
    pub request_stream: String,
    pub request_group: String,
    pub response_stream: String,
    pub check_delayed_set: String,
    pub check_ready_stream: String,
    pub check_group: String,
    pub check_queue_name: String,
    pub dead_letter_stream: String,
    pub max_retries: u32,
    pub interval_ms: u64,
    pub gateway_base_url: String,
    pub gateway_api_key: String,
    pub gateway_timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string()),
            request_stream: std::env::var("REQUEST_STREAM")
                .unwrap_or_else(|_| "xpayment:requests:v1".to_string()),
            request_group: std::env::var("REQUEST_GROUP")
                .unwrap_or_else(|_| "xpayment-adapter-v1".to_string()),
            response_stream: std::env::var("RESPONSE_STREAM")
                .unwrap_or_else(|_| "xpayment:responses:v1".to_string()),
            check_delayed_set: std::env::var("CHECK_DELAYED_SET")
                .unwrap_or_else(|_| "xpayment:checks:delayed".to_string()),
            check_ready_stream: std::env::var("CHECK_READY_STREAM")
                .unwrap_or_else(|_| "xpayment:checks:ready".to_string()),
            check_group: std::env::var("CHECK_GROUP")
                .unwrap_or_else(|_| "xpayment-checks-v1".to_string()),
            check_queue_name: std::env::var("CHECK_QUEUE_NAME")
                .unwrap_or_else(|_| "xpayment.checks".to_string()),
            dead_letter_stream: std::env::var("DEAD_LETTER_STREAM")
                .unwrap_or_else(|_| "xpayment:checks:dead".to_string()),
            max_retries: std::env::var("CHECK_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(60),
            interval_ms: std::env::var("CHECK_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60_000),
            gateway_base_url: std::env::var("XPAYMENT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            gateway_api_key: std::env::var("XPAYMENT_API_KEY").unwrap_or_default(),
            gateway_timeout_ms: std::env::var("GATEWAY_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(2500),
        }
    }
}
