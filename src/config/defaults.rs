use super::*;

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://digital.iservices.rte-france.com".to_string(),
            timeout_seconds: 10,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 1000,
            multiplier: 1.5,
            max_interval_ms: 60_000,
            max_elapsed_ms: 60_000,
            retry_server_errors: false,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: None,
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            prices: PricesConfig::default(),
            timezone: "Europe/Paris".to_string(),
            upstream: UpstreamConfig::default(),
            web: WebConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
