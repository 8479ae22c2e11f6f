//! Client for the currencyapi.com `latest` endpoint.
//!
//! Only one rate is requested per run: the target currency quoted against
//! the provider's base (USD unless a base currency is configured).

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.currencyapi.com/v3";

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("API error: HTTP {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Currency {0} missing from rate response")]
    MissingCurrency(String),
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(f64),
}

/// Units of the target currency per unit of the source currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    pub fn new(value: f64) -> Result<Self, RateError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(RateError::InvalidRate(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    data: HashMap<String, CurrencyValue>,
}

#[derive(Debug, Deserialize)]
struct CurrencyValue {
    value: f64,
}

pub struct CurrencyApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl CurrencyApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    /// Fetch the latest rate for `target`, optionally against an explicit base.
    pub async fn latest(
        &self,
        target: &str,
        base: Option<&str>,
    ) -> Result<ExchangeRate, RateError> {
        let url = format!("{}/latest", self.base_url.trim_end_matches('/'));

        let mut query = vec![("currencies", target)];
        if let Some(base) = base {
            query.push(("base_currency", base));
        }

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %message, "Currency API request failed");
            return Err(RateError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let rate = parse_latest(&body, target)?;
        tracing::info!(currency = target, rate = rate.value(), "💰 Exchange rate fetched");

        Ok(rate)
    }
}

/// Pick the rate for `target` out of a `latest` response body.
pub fn parse_latest(body: &str, target: &str) -> Result<ExchangeRate, RateError> {
    let response: LatestResponse = serde_json::from_str(body)
        .map_err(|e| RateError::ParseError(format!("Failed to parse rate response: {}", e)))?;

    let value = response
        .data
        .get(target)
        .map(|currency| currency.value)
        .ok_or_else(|| RateError::MissingCurrency(target.to_string()))?;

    ExchangeRate::new(value)
}
