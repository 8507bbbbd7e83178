// HTTP client for https://api.waktusolat.app

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::ApiError;
use crate::retry::RetryPolicy;
use crate::types::{PrayerMonth, Zone, ZoneInfo};

pub const DEFAULT_BASE_URL: &str = "https://api.waktusolat.app";

const TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Waktu Solat API.
///
/// Responses are cached per request path for the lifetime of the client, so
/// repeated identical calls within one process see one upstream fetch. There
/// is no eviction; clients are expected to be short-lived relative to the
/// upstream data window (prayer times change daily at most).
pub struct SolatClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    cache: Mutex<HashMap<String, serde_json::Value>>,
}

impl SolatClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different base URL (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!("waktusolat-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Prayer times for a zone. Year and month must be given together;
    /// omitting both returns the current month as published upstream.
    pub async fn get_prayer_times(
        &self,
        zone: &Zone,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<PrayerMonth, ApiError> {
        let path = match (year, month) {
            (Some(year), Some(month)) => {
                validate_year(year)?;
                validate_month(month)?;
                format!("/v2/solat/{}?year={}&month={}", zone, year, month)
            }
            (None, None) => format!("/v2/solat/{}", zone),
            _ => {
                return Err(ApiError::InvalidArgument(
                    "year and month must be provided together".to_string(),
                ))
            }
        };

        let value = self.fetch_json(&path).await?;
        let times: PrayerMonth =
            serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))?;
        if times.prayers.is_empty() {
            return Err(ApiError::Malformed(format!(
                "upstream returned no prayer data for zone {}",
                zone
            )));
        }
        Ok(times)
    }

    /// Zone listing, optionally filtered by state code (e.g. SGR, JHR).
    pub async fn get_zones(&self, state: Option<&str>) -> Result<Vec<ZoneInfo>, ApiError> {
        let path = match state {
            Some(state) => {
                let state = Zone::parse(state)?;
                format!("/zones/{}", state)
            }
            None => "/zones".to_string(),
        };

        let value = self.fetch_json(&path).await?;
        // Upstream serves either a bare array or an object wrapping "zones".
        let list = if value.is_array() {
            value
        } else if let Some(zones) = value.get("zones") {
            zones.clone()
        } else {
            return Err(ApiError::Malformed(
                "zone listing is neither an array nor a {zones: [...]} object".to_string(),
            ));
        };
        serde_json::from_value(list).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        if let Some(cached) = self.cache.lock().unwrap().get(path) {
            tracing::debug!("cache hit for {}", path);
            return Ok(cached.clone());
        }

        let url = format!("{}{}", self.base_url, path);
        let value = self
            .retry
            .execute(|| {
                let url = url.clone();
                let path = path.to_string();
                async move {
                    let response = self.http.get(&url).send().await?;
                    let status = response.status();
                    if !status.is_success() {
                        return Err(ApiError::UpstreamStatus { status, path });
                    }
                    response
                        .json::<serde_json::Value>()
                        .await
                        .map_err(|e| ApiError::Malformed(e.to_string()))
                }
            })
            .await?;

        self.cache
            .lock()
            .unwrap()
            .insert(path.to_string(), value.clone());
        Ok(value)
    }
}

fn validate_month(month: u32) -> Result<(), ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::InvalidArgument(format!(
            "month {} out of range 1-12",
            month
        )));
    }
    Ok(())
}

fn validate_year(year: i32) -> Result<(), ApiError> {
    if !(2000..=2100).contains(&year) {
        return Err(ApiError::InvalidArgument(format!(
            "year {} out of range 2000-2100",
            year
        )));
    }
    Ok(())
}
