//! Place discovery tools: attractions, restaurants, activities, and
//! transportation for a destination.
//!
//! Lookups go to Google Places first and fall back to Tavily web search when
//! the primary provider errors out. The fallback is invisible to the agent
//! loop; it only ever sees one tool result per call.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ArgSpec, ArgType, Tool, ToolArgs};

const GOOGLE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
const TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Result lines kept per lookup.
const MAX_RESULTS: usize = 10;

/// The four search categories exposed as separate tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceCategory {
    Attractions,
    Restaurants,
    Activities,
    Transportation,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 4] = [
        PlaceCategory::Attractions,
        PlaceCategory::Restaurants,
        PlaceCategory::Activities,
        PlaceCategory::Transportation,
    ];

    fn tool_name(&self) -> &'static str {
        match self {
            PlaceCategory::Attractions => "search_attractions",
            PlaceCategory::Restaurants => "search_restaurants",
            PlaceCategory::Activities => "search_activities",
            PlaceCategory::Transportation => "search_transportation",
        }
    }

    fn tool_description(&self) -> &'static str {
        match self {
            PlaceCategory::Attractions => "Search tourist attractions of a place",
            PlaceCategory::Restaurants => "Search restaurants and eateries of a place",
            PlaceCategory::Activities => "Search things to do in and around a place",
            PlaceCategory::Transportation => "Search available modes of transportation in a place",
        }
    }

    /// Noun used in the formatted payload.
    fn label(&self) -> &'static str {
        match self {
            PlaceCategory::Attractions => "attractions",
            PlaceCategory::Restaurants => "restaurants",
            PlaceCategory::Activities => "activities",
            PlaceCategory::Transportation => "modes of transportation",
        }
    }

    /// Search phrase sent to the data source.
    fn query(&self, place: &str) -> String {
        match self {
            PlaceCategory::Attractions => {
                format!("top attractive places in and around {}", place)
            }
            PlaceCategory::Restaurants => {
                format!("top 10 restaurants and eateries in and around {}", place)
            }
            PlaceCategory::Activities => format!("activities in and around {}", place),
            PlaceCategory::Transportation => {
                format!("modes of transportation available in {}", place)
            }
        }
    }
}

/// A backend able to answer a place query with human-readable text.
#[async_trait]
pub trait PlaceDataSource: Send + Sync {
    /// Short provider name used in payloads and logs.
    fn provider_name(&self) -> &str;

    async fn search(&self, category: PlaceCategory, place: &str) -> anyhow::Result<String>;
}

/// Google Places Text Search backend.
pub struct GooglePlaces {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GooglePlaces {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: GOOGLE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleSearchPayload {
    status: String,
    #[serde(default)]
    results: Vec<GooglePlace>,
}

#[derive(Debug, Deserialize)]
struct GooglePlace {
    name: String,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
}

fn format_google_results(payload: &GoogleSearchPayload) -> String {
    payload
        .results
        .iter()
        .take(MAX_RESULTS)
        .enumerate()
        .map(|(i, place)| {
            let mut line = format!("{}. {}", i + 1, place.name);
            if let Some(rating) = place.rating {
                line.push_str(&format!(" (rating {:.1})", rating));
            }
            if let Some(address) = &place.formatted_address {
                line.push_str(&format!(" - {}", address));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl PlaceDataSource for GooglePlaces {
    fn provider_name(&self) -> &str {
        "google places"
    }

    async fn search(&self, category: PlaceCategory, place: &str) -> anyhow::Result<String> {
        let url = format!("{}/textsearch/json", self.base_url);
        let query = category.query(place);
        let response = self
            .http
            .get(&url)
            .query(&[("query", query.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("google places request failed with status {}", status);
        }
        let payload: GoogleSearchPayload = response.json().await?;
        if payload.status != "OK" {
            anyhow::bail!("google places returned status {}", payload.status);
        }
        if payload.results.is_empty() {
            anyhow::bail!("google places returned no results for '{}'", place);
        }
        Ok(format_google_results(&payload))
    }
}

/// Tavily web search backend, used as the fallback provider.
pub struct TavilySearch {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilySearch {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key,
            base_url: TAVILY_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TavilyPayload {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    #[serde(default)]
    content: String,
}

fn format_tavily_results(payload: &TavilyPayload) -> String {
    payload
        .results
        .iter()
        .take(MAX_RESULTS)
        .map(|result| {
            if result.content.is_empty() {
                format!("- {}", result.title)
            } else {
                format!("- {}: {}", result.title, result.content)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl PlaceDataSource for TavilySearch {
    fn provider_name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, category: PlaceCategory, place: &str) -> anyhow::Result<String> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({
                "api_key": self.api_key,
                "query": category.query(place),
                "max_results": 5,
            }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("tavily request failed with status {}", status);
        }
        let payload: TavilyPayload = response.json().await?;
        if payload.results.is_empty() {
            anyhow::bail!("tavily returned no results for '{}'", place);
        }
        Ok(format_tavily_results(&payload))
    }
}

/// One category-specific search tool over a primary provider and an
/// optional fallback.
pub struct PlaceSearch {
    category: PlaceCategory,
    primary: Arc<dyn PlaceDataSource>,
    fallback: Option<Arc<dyn PlaceDataSource>>,
}

impl PlaceSearch {
    pub fn new(
        category: PlaceCategory,
        primary: Arc<dyn PlaceDataSource>,
        fallback: Option<Arc<dyn PlaceDataSource>>,
    ) -> Self {
        Self {
            category,
            primary,
            fallback,
        }
    }
}

#[async_trait]
impl Tool for PlaceSearch {
    fn name(&self) -> &str {
        self.category.tool_name()
    }

    fn description(&self) -> &str {
        self.category.tool_description()
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![ArgSpec::required(
            "place",
            ArgType::String,
            "Destination to search in",
        )]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let place = args
            .str("place")
            .ok_or_else(|| anyhow::anyhow!("missing 'place' argument"))?;

        let primary_err = match self.primary.search(self.category, place).await {
            Ok(body) => {
                return Ok(format!(
                    "Following are the {} of {} as suggested by {}:\n{}",
                    self.category.label(),
                    place,
                    self.primary.provider_name(),
                    body
                ));
            }
            Err(err) => err,
        };

        tracing::warn!(
            tool = self.category.tool_name(),
            provider = self.primary.provider_name(),
            error = %primary_err,
            "primary place provider failed"
        );

        let Some(fallback) = &self.fallback else {
            return Err(primary_err);
        };

        match fallback.search(self.category, place).await {
            Ok(body) => Ok(format!(
                "{} could not find the details ({}).\nFollowing are the {} of {} as suggested by {}:\n{}",
                self.primary.provider_name(),
                primary_err,
                self.category.label(),
                place,
                fallback.provider_name(),
                body
            )),
            Err(fallback_err) => anyhow::bail!(
                "all place providers failed: {}: {}; {}: {}",
                self.primary.provider_name(),
                primary_err,
                fallback.provider_name(),
                fallback_err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticSource {
        name: &'static str,
        response: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl PlaceDataSource for StaticSource {
        fn provider_name(&self) -> &str {
            self.name
        }

        async fn search(&self, _category: PlaceCategory, _place: &str) -> anyhow::Result<String> {
            match self.response {
                Ok(body) => Ok(body.to_string()),
                Err(message) => Err(anyhow::anyhow!(message)),
            }
        }
    }

    fn source(name: &'static str, response: Result<&'static str, &'static str>) -> Arc<dyn PlaceDataSource> {
        Arc::new(StaticSource { name, response })
    }

    fn args() -> ToolArgs {
        ToolArgs::from_value(json!({ "place": "Goa" }))
    }

    #[tokio::test]
    async fn primary_success_skips_the_fallback() {
        let tool = PlaceSearch::new(
            PlaceCategory::Attractions,
            source("google places", Ok("1. Baga Beach")),
            Some(source("tavily", Err("should not be called"))),
        );
        let out = tool.execute(&args()).await.expect("execute");
        assert!(out.starts_with("Following are the attractions of Goa as suggested by google places:"));
        assert!(out.contains("Baga Beach"));
    }

    #[tokio::test]
    async fn primary_failure_falls_back_and_names_both_providers() {
        let tool = PlaceSearch::new(
            PlaceCategory::Restaurants,
            source("google places", Err("quota exceeded")),
            Some(source("tavily", Ok("- Fisherman's Wharf"))),
        );
        let out = tool.execute(&args()).await.expect("execute");
        assert!(out.contains("google places could not find the details (quota exceeded)"));
        assert!(out.contains("restaurants of Goa as suggested by tavily"));
        assert!(out.contains("Fisherman's Wharf"));
    }

    #[tokio::test]
    async fn both_providers_failing_is_an_error() {
        let tool = PlaceSearch::new(
            PlaceCategory::Activities,
            source("google places", Err("quota exceeded")),
            Some(source("tavily", Err("timed out"))),
        );
        let err = tool.execute(&args()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("google places: quota exceeded"));
        assert!(message.contains("tavily: timed out"));
    }

    #[tokio::test]
    async fn missing_fallback_surfaces_the_primary_error() {
        let tool = PlaceSearch::new(
            PlaceCategory::Transportation,
            source("tavily", Err("timed out")),
            None,
        );
        let err = tool.execute(&args()).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn each_category_maps_to_a_distinct_tool_name() {
        let names: Vec<&str> = PlaceCategory::ALL.iter().map(|c| c.tool_name()).collect();
        assert_eq!(
            names,
            vec![
                "search_attractions",
                "search_restaurants",
                "search_activities",
                "search_transportation"
            ]
        );
    }

    #[test]
    fn google_results_format_as_a_numbered_list() {
        let payload: GoogleSearchPayload = serde_json::from_value(json!({
            "status": "OK",
            "results": [
                { "name": "Baga Beach", "formatted_address": "Baga, Goa", "rating": 4.5 },
                { "name": "Fort Aguada" }
            ]
        }))
        .expect("parse");
        let formatted = format_google_results(&payload);
        assert_eq!(
            formatted,
            "1. Baga Beach (rating 4.5) - Baga, Goa\n2. Fort Aguada"
        );
    }

    #[test]
    fn tavily_results_format_as_bullets() {
        let payload: TavilyPayload = serde_json::from_value(json!({
            "results": [
                { "title": "Top beaches", "content": "Baga and Calangute" },
                { "title": "Goa guide" }
            ]
        }))
        .expect("parse");
        let formatted = format_tavily_results(&payload);
        assert_eq!(
            formatted,
            "- Top beaches: Baga and Calangute\n- Goa guide"
        );
    }
}
