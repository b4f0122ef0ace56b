//! The Odds API REST client.
//!
//! Every call carries the API key as a query parameter, so URLs are
//! stripped from errors and only the endpoint path is logged.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::dto::{EventOddsResponse, SportResponse};
use super::settings::OddsApiConfig;
use crate::domain::Sport;
use crate::error::{FeedError, Result};
use crate::port::outbound::feed::{FeedEvent, OddsFeed};

/// Request quota as last reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaUsage {
    pub remaining: Option<u64>,
    pub used: Option<u64>,
    /// Cost of the most recent request.
    pub last: Option<u64>,
}

impl QuotaUsage {
    fn header(headers: &HeaderMap, name: &str) -> Option<u64> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }

    /// Merge quota headers into the current usage. Absent headers keep
    /// their previous value.
    fn update(&mut self, headers: &HeaderMap) {
        if let Some(remaining) = Self::header(headers, "x-requests-remaining") {
            self.remaining = Some(remaining);
        }
        if let Some(used) = Self::header(headers, "x-requests-used") {
            self.used = Some(used);
        }
        self.last = Self::header(headers, "x-requests-last");
    }
}

/// HTTP client for The Odds API.
pub struct OddsApiClient {
    http: HttpClient,
    api_url: String,
    api_key: Option<String>,
    regions: String,
    markets: String,
    odds_format: String,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
    quota: Mutex<QuotaUsage>,
}

impl OddsApiClient {
    #[must_use]
    pub fn from_config(config: &OddsApiConfig, api_key: Option<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            regions: config.regions.clone(),
            markets: config.markets.clone(),
            odds_format: config.odds_format.clone(),
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
            quota: Mutex::new(QuotaUsage::default()),
        }
    }

    /// Quota figures from the most recent response.
    #[must_use]
    pub fn quota(&self) -> QuotaUsage {
        *self.quota.lock()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| FeedError::MissingApiKey.into())
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut all = vec![("apiKey", self.api_key()?)];
        all.extend_from_slice(params);
        Ok(Url::parse_with_params(&format!("{}{path}", self.api_url), &all)?)
    }

    async fn get_with_retry<T>(&self, url: Url, path: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = match self.http.get(url.clone()).send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.without_url().into());
                    }
                    self.backoff(attempt, max_attempts, path, &err).await;
                    continue;
                }
            };

            self.record_quota(response.headers());
            let response = response
                .error_for_status()
                .map_err(reqwest::Error::without_url)?;

            match response.json::<T>().await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.without_url().into());
                    }
                    self.backoff(attempt, max_attempts, path, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, path: &str, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            endpoint = path,
            timeout = err.is_timeout(),
            connect = err.is_connect(),
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms * u64::from(attempt))).await;
        }
    }

    fn record_quota(&self, headers: &HeaderMap) {
        let mut quota = self.quota.lock();
        quota.update(headers);
        debug!(
            remaining = ?quota.remaining,
            used = ?quota.used,
            last_cost = ?quota.last,
            "Odds API quota"
        );
    }
}

#[async_trait]
impl OddsFeed for OddsApiClient {
    async fn sports(&self) -> Result<Vec<Sport>> {
        let path = "/sports";
        let url = self.endpoint(path, &[("all", "true")])?;

        let sports: Vec<SportResponse> = self.get_with_retry(url, path).await?;
        info!(count = sports.len(), "Fetched sports catalog");

        Ok(sports.into_iter().map(Sport::from).collect())
    }

    async fn odds(&self, sport_key: &str) -> Result<Vec<FeedEvent>> {
        let path = format!("/sports/{sport_key}/odds");
        let url = self.endpoint(
            &path,
            &[
                ("regions", self.regions.as_str()),
                ("markets", self.markets.as_str()),
                ("oddsFormat", self.odds_format.as_str()),
            ],
        )?;

        let events: Vec<EventOddsResponse> = self.get_with_retry(url, &path).await?;
        debug!(sport = sport_key, events = events.len(), "Fetched odds");

        Ok(events.into_iter().map(FeedEvent::from).collect())
    }

    fn feed_name(&self) -> &'static str {
        "The Odds API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use reqwest::header::HeaderValue;

    fn client(key: Option<&str>) -> OddsApiClient {
        OddsApiClient::from_config(&OddsApiConfig::default(), key.map(String::from))
    }

    #[test]
    fn endpoint_carries_key_and_params() {
        let url = client(Some("secret"))
            .endpoint("/sports/basketball_nba/odds", &[("regions", "us"), ("oddsFormat", "decimal")])
            .unwrap();

        assert_eq!(url.path(), "/v4/sports/basketball_nba/odds");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("apiKey".into(), "secret".into())));
        assert!(pairs.contains(&("oddsFormat".into(), "decimal".into())));
    }

    #[test]
    fn missing_key_is_a_feed_error() {
        for key in [None, Some("")] {
            let err = client(key).endpoint("/sports", &[]).unwrap_err();
            assert!(matches!(err, Error::Feed(FeedError::MissingApiKey)));
        }
    }

    #[tokio::test]
    async fn requests_without_key_fail_before_network() {
        let err = client(None).odds("basketball_nba").await.unwrap_err();
        assert!(matches!(err, Error::Feed(FeedError::MissingApiKey)));
    }

    #[test]
    fn quota_tracks_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-requests-remaining", HeaderValue::from_static("480"));
        headers.insert("x-requests-used", HeaderValue::from_static("20"));
        headers.insert("x-requests-last", HeaderValue::from_static("3"));

        let c = client(Some("k"));
        c.record_quota(&headers);
        assert_eq!(
            c.quota(),
            QuotaUsage {
                remaining: Some(480),
                used: Some(20),
                last: Some(3),
            }
        );

        // Absent counters keep their previous values.
        c.record_quota(&HeaderMap::new());
        assert_eq!(c.quota().remaining, Some(480));
        assert_eq!(c.quota().last, None);
    }

    #[test]
    fn feed_name_is_stable() {
        assert_eq!(client(None).feed_name(), "The Odds API");
    }
}
