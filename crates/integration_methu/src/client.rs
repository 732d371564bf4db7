//! met.hu HTTP client
//!
//! Resolves settlements through the autocomplete endpoint and submits the
//! forecast form. Neither call retries; the polling layer owns retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use domain::{ForecastSnapshot, LocationRef};
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::aggregator::aggregate_daily;
use crate::config::{MetHuConfig, SITE_ROOT};
use crate::error::MetHuError;
use crate::models::parse_candidates;
use crate::parser::parse_forecast;

/// Source of met.hu forecasts
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Resolve a settlement name to its provider location
    ///
    /// Picks the candidate whose name matches exactly (case-sensitive),
    /// else the first candidate.
    async fn resolve(&self, name: &str) -> Result<LocationRef, MetHuError>;

    /// Fetch the raw forecast document for a location
    async fn fetch(&self, location: &LocationRef) -> Result<String, MetHuError>;

    /// Fetch, parse and aggregate the forecast for a location
    async fn get_forecast(&self, location: &LocationRef) -> Result<ForecastSnapshot, MetHuError>;
}

/// met.hu client implementation
#[derive(Debug)]
pub struct MetHuClient {
    client: Client,
    config: MetHuConfig,
    timezone: Tz,
}

impl MetHuClient {
    /// Create a new met.hu client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `MetHuError::ClientInit` if the time zone is unknown or the
    /// HTTP client cannot be initialized.
    pub fn new(config: MetHuConfig) -> Result<Self, MetHuError> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|e| MetHuError::ClientInit(format!("time zone '{}': {e}", config.timezone)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("hu-HU,hu;q=0.9,en;q=0.8"),
        );
        headers.insert(REFERER, HeaderValue::from_static(MetHuConfig::referer()));
        headers.insert(ORIGIN, HeaderValue::from_static(SITE_ROOT));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| MetHuError::ClientInit(e.to_string()))?;

        Ok(Self {
            client,
            config,
            timezone,
        })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, MetHuError> {
        Self::new(MetHuConfig::default())
    }

    /// Time zone the forecast table is interpreted in
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Fetch, parse and aggregate with an explicit fetch time
    ///
    /// # Errors
    ///
    /// Propagates fetch and parse errors; returns `MetHuError::EmptyForecast`
    /// when the table yields no periods.
    #[instrument(skip(self, location, fetched_at), fields(code = %location.code()))]
    pub async fn get_forecast_at(
        &self,
        location: &LocationRef,
        fetched_at: DateTime<Tz>,
    ) -> Result<ForecastSnapshot, MetHuError> {
        let html = self.fetch(location).await?;
        let hourly = parse_forecast(&html, fetched_at)?;
        if hourly.is_empty() {
            warn!(settlement = %location.name(), "Forecast table yielded no periods");
            return Err(MetHuError::EmptyForecast);
        }
        let daily = aggregate_daily(&hourly);
        debug!(hourly = hourly.len(), daily = daily.len(), "Forecast parsed");

        ForecastSnapshot::new(location.clone(), fetched_at.fixed_offset(), hourly, daily)
            .map_err(|e| MetHuError::ParseStructure(e.to_string()))
    }

    fn client_identifier<'a>(&'a self, location: &'a LocationRef) -> &'a str {
        self.config
            .client_identifier
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| location.name())
    }
}

#[async_trait]
impl ForecastSource for MetHuClient {
    #[instrument(skip(self))]
    async fn resolve(&self, name: &str) -> Result<LocationRef, MetHuError> {
        let response = self
            .client
            .get(&self.config.autocomplete_url)
            .query(&[("term", name)])
            .header("X-Requested-With", "XMLHttpRequest")
            .timeout(Duration::from_secs(self.config.lookup_timeout_secs))
            .send()
            .await
            .map_err(|e| MetHuError::Resolution(format!("autocomplete request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetHuError::Resolution(format!(
                "autocomplete returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MetHuError::Resolution(format!("autocomplete body unreadable: {e}")))?;

        let mut candidates = parse_candidates(&body)?;
        debug!(candidates = candidates.len(), "Autocomplete answered");

        let index = candidates
            .iter()
            .position(|entry| entry.name().as_deref() == Some(name))
            .unwrap_or(0);
        if index >= candidates.len() {
            return Err(MetHuError::Resolution(format!(
                "no settlement matches '{name}'"
            )));
        }

        let location = candidates.swap_remove(index).into_location()?;
        debug!(%location, "Settlement resolved");
        Ok(location)
    }

    #[instrument(skip(self, location), fields(code = %location.code()))]
    async fn fetch(&self, location: &LocationRef) -> Result<String, MetHuError> {
        let latitude = location.latitude().to_string();
        let longitude = location.longitude().to_string();
        let form = [
            ("srctext", ""),
            ("valtozatlan", "true"),
            ("kod", location.code()),
            ("lt", latitude.as_str()),
            ("n", longitude.as_str()),
            ("tel", self.client_identifier(location)),
            ("kepid", ""),
        ];

        let response = self
            .client
            .post(&self.config.forecast_url)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&form)
            .send()
            .await
            .map_err(|e| MetHuError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetHuError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MetHuError::Fetch(format!("failed to read body: {e}")))?;
        if body.trim().is_empty() {
            return Err(MetHuError::Fetch("empty response body".to_string()));
        }

        debug!(bytes = body.len(), "Forecast document received");
        Ok(body)
    }

    async fn get_forecast(&self, location: &LocationRef) -> Result<ForecastSnapshot, MetHuError> {
        let fetched_at = Utc::now().with_timezone(&self.timezone);
        self.get_forecast_at(location, fetched_at).await
    }
}
