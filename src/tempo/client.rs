use crate::config::Config;
use crate::error::{Result, TempoError};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::retry::{BackoffPolicy, CalendarErrorClassifier, retry};
use crate::tempo::types::{CalendarResponse, DayTypeRecord, Token};
use chrono::{DateTime, SecondsFormat, TimeZone};
use chrono_tz::Tz;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Token exchange path, relative to the API base URL
pub const TOKEN_PATH: &str = "/token/oauth/";

/// Tempo calendar path, relative to the API base URL
pub const CALENDAR_PATH: &str = "/open_api/tempo_like_supply_contract/v1/tempo_like_calendars";

const JSON_CONTENT: &str = "application/json";
const FORM_CONTENT: &str = "application/x-www-form-urlencoded";

/// Source of Tempo day assignments
#[async_trait::async_trait]
pub trait CalendarSource: Send + Sync {
    /// Exchange client credentials for a bearer token
    async fn token(&self) -> Result<Token>;

    /// Colour records between two local instants
    async fn calendar(
        &self,
        token: &Token,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Vec<DayTypeRecord>>;
}

/// RTE API client
///
/// Holds credentials and a connection pool only; tokens are never cached.
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    backoff: BackoffPolicy,
    classifier: CalendarErrorClassifier,
    logger: StructuredLogger,
}

impl UpstreamClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
        backoff: BackoffPolicy,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("tempo-rates/{}", env!("APP_VERSION")))
            .build()?;
        let logger = get_logger_with_context(
            LogContext::new("upstream").with_field("base_url", base_url.clone()),
        );
        Ok(Self {
            http,
            base_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            backoff,
            classifier: CalendarErrorClassifier::default(),
            logger,
        })
    }

    /// Replace the calendar error classification
    pub fn with_classifier(mut self, classifier: CalendarErrorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.upstream.base_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
            Duration::from_secs(config.upstream.timeout_seconds),
            BackoffPolicy::from(&config.upstream.retry),
        )
        .map(|client| {
            client.with_classifier(CalendarErrorClassifier {
                retry_server_errors: config.upstream.retry.retry_server_errors,
            })
        })
    }

    /// Client-credentials exchange; no retry since bad credentials do not heal
    async fn exchange_token(&self) -> Result<Token> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, TOKEN_PATH))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(CONTENT_TYPE, FORM_CONTENT)
            .header(ACCEPT, JSON_CONTENT)
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TempoError::status(status.as_u16(), snippet(&body)));
        }

        let token: Token = resp.json().await?;
        if token.access_token.trim().is_empty() {
            return Err(TempoError::auth("token response without access_token"));
        }
        Ok(token)
    }

    /// Single calendar request, without retries
    async fn fetch_calendar_once(
        &self,
        token: &Token,
        start: &str,
        end: &str,
    ) -> Result<Vec<DayTypeRecord>> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, CALENDAR_PATH))
            .query(&[
                ("start_date", start),
                ("end_date", end),
                ("fallback_status", "true"),
            ])
            .bearer_auth(&token.access_token)
            .header(ACCEPT, JSON_CONTENT)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(TempoError::status(
                status.as_u16(),
                format!("calendar request failed: {}", snippet(&body)),
            ));
        }

        parse_calendar(&body)
    }
}

#[async_trait::async_trait]
impl CalendarSource for UpstreamClient {
    async fn token(&self) -> Result<Token> {
        self.logger.debug("Retrieving token");
        let token = self.exchange_token().await.map_err(|e| match e {
            e @ TempoError::Auth { .. } => e,
            other => TempoError::auth(format!("token exchange failed: {}", other)),
        })?;
        self.logger.debug("Retrieved token");
        Ok(token)
    }

    async fn calendar(
        &self,
        token: &Token,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Vec<DayTypeRecord>> {
        let start = format_query_time(&start);
        let end = format_query_time(&end);
        self.logger
            .debug(&format!("Fetching calendar from {} to {}", start, end));

        let (start_ref, end_ref) = (start.as_str(), end.as_str());
        let classifier = self.classifier;
        let classify = move |e: &TempoError| classifier.classify(e);
        let records = retry(&self.backoff, classify, move || {
            self.fetch_calendar_once(token, start_ref, end_ref)
        })
        .await
        .map_err(|e| TempoError::fetch(format!("calendar fetch failed: {}", e)))?;

        self.logger
            .debug(&format!("Fetched {} calendar records", records.len()));
        Ok(records)
    }
}

/// RFC3339 timestamp as sent in calendar query parameters
pub fn format_query_time<Z: TimeZone>(t: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Decode a calendar body
///
/// A body that is not JSON, or whose records do not decode, is a serialization
/// error. Valid JSON lacking `tempo_like_calendars.values` is a query failure.
pub fn parse_calendar(body: &str) -> Result<Vec<DayTypeRecord>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.pointer("/tempo_like_calendars/values").is_none() {
        return Err(TempoError::query(format!(
            "no tempo_like_calendars.values in response: {}",
            snippet(body)
        )));
    }
    let parsed: CalendarResponse = serde_json::from_value(value)?;
    Ok(parsed.tempo_like_calendars.values)
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
