//! OpenWeatherMap tools: current conditions and a short-range forecast.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{ArgSpec, ArgType, Tool, ToolArgs};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Number of 3-hour forecast slots requested per lookup.
const FORECAST_SLOTS: u32 = 10;

/// Thin client for the OpenWeatherMap REST API, shared by both weather tools.
pub struct WeatherService {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherService {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    async fn fetch_current(&self, city: &str) -> anyhow::Result<CurrentConditions> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("weather lookup for '{}' failed with status {}", city, status);
        }
        Ok(response.json().await?)
    }

    async fn fetch_forecast(&self, city: &str) -> anyhow::Result<ForecastPayload> {
        let url = format!("{}/forecast", self.base_url);
        let slots = FORECAST_SLOTS.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("cnt", slots.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!(
                "forecast lookup for '{}' failed with status {}",
                city,
                status
            );
        }
        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    main: MainMetrics,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    /// Timestamp in "YYYY-MM-DD HH:MM:SS" form.
    dt_txt: String,
    main: MainMetrics,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainMetrics {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

fn summarize_current(city: &str, conditions: &CurrentConditions) -> String {
    let desc = conditions
        .weather
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or("N/A");
    format!(
        "Current weather in {}: {:.1}°C, {}",
        city, conditions.main.temp, desc
    )
}

fn summarize_forecast(city: &str, forecast: &ForecastPayload) -> String {
    let mut lines = vec![format!("Weather forecast for {}:", city)];
    for entry in &forecast.list {
        let date = entry.dt_txt.split(' ').next().unwrap_or(&entry.dt_txt);
        let desc = entry
            .weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or("N/A");
        lines.push(format!("{}: {:.1}°C, {}", date, entry.main.temp, desc));
    }
    lines.join("\n")
}

/// `get_current_weather`: current conditions for a city.
pub struct CurrentWeather {
    service: Arc<WeatherService>,
}

impl CurrentWeather {
    pub fn new(service: Arc<WeatherService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for CurrentWeather {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a city"
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![ArgSpec::required(
            "city",
            ArgType::String,
            "Name of the city to look up",
        )]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let city = args
            .str("city")
            .ok_or_else(|| anyhow::anyhow!("missing 'city' argument"))?;
        let conditions = self.service.fetch_current(city).await?;
        Ok(summarize_current(city, &conditions))
    }
}

/// `get_weather_forecast`: upcoming conditions for a city, one line per
/// 3-hour slot.
pub struct WeatherForecast {
    service: Arc<WeatherService>,
}

impl WeatherForecast {
    pub fn new(service: Arc<WeatherService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for WeatherForecast {
    fn name(&self) -> &str {
        "get_weather_forecast"
    }

    fn description(&self) -> &str {
        "Get the short-range weather forecast for a city"
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![ArgSpec::required(
            "city",
            ArgType::String,
            "Name of the city to look up",
        )]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let city = args
            .str("city")
            .ok_or_else(|| anyhow::anyhow!("missing 'city' argument"))?;
        let forecast = self.service.fetch_forecast(city).await?;
        Ok(summarize_forecast(city, &forecast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_summary_reads_temp_and_description() {
        let conditions: CurrentConditions = serde_json::from_value(json!({
            "main": { "temp": 28.53 },
            "weather": [{ "description": "scattered clouds" }]
        }))
        .expect("parse");
        assert_eq!(
            summarize_current("Goa", &conditions),
            "Current weather in Goa: 28.5°C, scattered clouds"
        );
    }

    #[test]
    fn current_summary_tolerates_missing_conditions_array() {
        let conditions: CurrentConditions = serde_json::from_value(json!({
            "main": { "temp": 11.0 }
        }))
        .expect("parse");
        assert_eq!(
            summarize_current("Oslo", &conditions),
            "Current weather in Oslo: 11.0°C, N/A"
        );
    }

    #[test]
    fn forecast_summary_lists_one_line_per_slot() {
        let forecast: ForecastPayload = serde_json::from_value(json!({
            "list": [
                {
                    "dt_txt": "2026-08-27 12:00:00",
                    "main": { "temp": 27.1 },
                    "weather": [{ "description": "light rain" }]
                },
                {
                    "dt_txt": "2026-08-27 15:00:00",
                    "main": { "temp": 26.4 },
                    "weather": [{ "description": "overcast clouds" }]
                }
            ]
        }))
        .expect("parse");
        let summary = summarize_forecast("Goa", &forecast);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "Weather forecast for Goa:");
        assert_eq!(lines[1], "2026-08-27: 27.1°C, light rain");
        assert_eq!(lines[2], "2026-08-27: 26.4°C, overcast clouds");
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let result: Result<CurrentConditions, _> =
            serde_json::from_value(json!({ "weather": [] }));
        assert!(result.is_err());
    }
}
