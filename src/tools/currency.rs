//! Currency conversion backed by ExchangeRate-API.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{ArgSpec, ArgType, Tool, ToolArgs};

const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Client for the ExchangeRate-API `latest` endpoint. One request returns
/// the full rate table for a base currency; conversion is a lookup and a
/// multiply on our side.
pub struct CurrencyService {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl CurrencyService {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    async fn rates(&self, from: &str) -> anyhow::Result<HashMap<String, f64>> {
        let url = format!("{}/{}/latest/{}", self.base_url, self.api_key, from);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("exchange rate lookup failed with status {}", status);
        }
        let payload: RateTable = response.json().await?;
        Ok(payload.conversion_rates)
    }
}

#[derive(Debug, Deserialize)]
struct RateTable {
    conversion_rates: HashMap<String, f64>,
}

fn lookup_rate(rates: &HashMap<String, f64>, to: &str) -> anyhow::Result<f64> {
    rates
        .get(to)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("{} not found in exchange rates", to))
}

/// `convert_currency`: turn an amount in one currency into another.
pub struct ConvertCurrency {
    service: Arc<CurrencyService>,
}

impl ConvertCurrency {
    pub fn new(service: Arc<CurrencyService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for ConvertCurrency {
    fn name(&self) -> &str {
        "convert_currency"
    }

    fn description(&self) -> &str {
        "Convert an amount from one currency to another using current exchange rates"
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::required("amount", ArgType::Float, "Amount of money to convert"),
            ArgSpec::required(
                "from_currency",
                ArgType::String,
                "ISO 4217 code of the source currency, e.g. USD",
            ),
            ArgSpec::required(
                "to_currency",
                ArgType::String,
                "ISO 4217 code of the target currency, e.g. INR",
            ),
        ]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let amount = args
            .float("amount")
            .ok_or_else(|| anyhow::anyhow!("missing 'amount' argument"))?;
        let from = args
            .str("from_currency")
            .ok_or_else(|| anyhow::anyhow!("missing 'from_currency' argument"))?
            .to_uppercase();
        let to = args
            .str("to_currency")
            .ok_or_else(|| anyhow::anyhow!("missing 'to_currency' argument"))?
            .to_uppercase();

        let rates = self.service.rates(&from).await?;
        let rate = lookup_rate(&rates, &to)?;
        Ok(format!(
            "{:.2} {} = {:.2} {}",
            amount,
            from,
            amount * rate,
            to
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> HashMap<String, f64> {
        HashMap::from([("INR".to_string(), 83.5), ("EUR".to_string(), 0.92)])
    }

    #[test]
    fn known_currency_resolves_to_its_rate() {
        let rate = lookup_rate(&rates(), "INR").expect("rate");
        assert!((rate - 83.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_currency_is_an_error_naming_the_code() {
        let err = lookup_rate(&rates(), "XYZ").unwrap_err();
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn rate_table_parses_from_provider_payload() {
        let payload: RateTable = serde_json::from_value(serde_json::json!({
            "result": "success",
            "base_code": "USD",
            "conversion_rates": { "INR": 83.5, "EUR": 0.92 }
        }))
        .expect("parse");
        assert_eq!(payload.conversion_rates.len(), 2);
    }
}
