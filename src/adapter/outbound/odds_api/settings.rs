//! Odds feed configuration, read from the `[feed]` table.

use serde::Deserialize;

/// Sports scraped when none are configured.
pub const DEFAULT_SPORTS: [&str; 4] = [
    "americanfootball_nfl",
    "basketball_nba",
    "baseball_mlb",
    "icehockey_nhl",
];

/// The only price format the engine accepts. Prices must reach ingestion
/// as decimal odds.
pub const DECIMAL_ODDS_FORMAT: &str = "decimal";

/// The Odds API settings.
///
/// The API key is not part of this section; it comes from `ODDS_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiConfig {
    /// Base URL including the API version.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Comma-separated bookmaker regions (`us`, `uk`, `eu`, `au`).
    #[serde(default = "default_regions")]
    pub regions: String,
    /// Comma-separated market keys.
    #[serde(default = "default_markets")]
    pub markets: String,
    /// Price format requested from the feed. Only `decimal` passes validation.
    #[serde(default = "default_odds_format")]
    pub odds_format: String,
    /// Sport keys scraped each cycle.
    #[serde(default = "default_sports")]
    pub sports: Vec<String>,
    #[serde(default)]
    pub http: OddsApiHttpConfig,
}

fn default_api_url() -> String {
    "https://api.the-odds-api.com/v4".into()
}

fn default_regions() -> String {
    "us".into()
}

fn default_markets() -> String {
    "h2h,spreads,totals".into()
}

fn default_odds_format() -> String {
    DECIMAL_ODDS_FORMAT.into()
}

fn default_sports() -> Vec<String> {
    DEFAULT_SPORTS.iter().map(|s| (*s).to_string()).collect()
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            regions: default_regions(),
            markets: default_markets(),
            odds_format: default_odds_format(),
            sports: default_sports(),
            http: OddsApiHttpConfig::default(),
        }
    }
}

/// HTTP client settings for the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum attempts for transient failures.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff step between retries in milliseconds. Grows linearly.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    30_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    5000
}

const fn default_http_retry_max_attempts() -> u32 {
    3
}

const fn default_http_retry_backoff_ms() -> u64 {
    500
}

impl Default for OddsApiHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_uses_defaults() {
        let config: OddsApiConfig = toml::from_str("").unwrap();
        assert_eq!(config.api_url, "https://api.the-odds-api.com/v4");
        assert_eq!(config.markets, "h2h,spreads,totals");
        assert_eq!(config.sports.len(), 4);
        assert_eq!(config.http.timeout_ms, 30_000);
    }

    #[test]
    fn partial_http_table_keeps_other_defaults() {
        let config: OddsApiConfig = toml::from_str(
            r#"
            regions = "uk,eu"
            sports = ["soccer_epl"]

            [http]
            retry_max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.regions, "uk,eu");
        assert_eq!(config.sports, vec!["soccer_epl"]);
        assert_eq!(config.http.retry_max_attempts, 5);
        assert_eq!(config.http.retry_backoff_ms, 500);
    }
}
