//! Tool registry - the catalog of deterministic actions the model may invoke.
//!
//! Every tool declares a name, a description, and a flat argument schema of
//! primitive types only; composite values never cross the reasoning/tool
//! boundary. The registry validates arguments before execution and converts
//! executable failures into ordinary [`ToolResult`] failures so a broken
//! tool can never take the agent loop down with it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::conversation::{ToolCall, ToolResult};

pub mod calculator;
pub mod currency;
pub mod places;
pub mod weather;

/// Primitive argument types allowed in a tool schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ArgType {
    /// JSON Schema type name advertised to the model.
    pub fn json_type(&self) -> &'static str {
        match self {
            ArgType::String => "string",
            ArgType::Integer => "integer",
            ArgType::Float => "number",
            ArgType::Boolean => "boolean",
        }
    }

    /// Whether a JSON value satisfies this type. Integers satisfy `Float`;
    /// nothing else coerces. `Integer` is bounded to the `i64` range that
    /// [`ToolArgs::int`] can extract, so an out-of-range number is named as
    /// a mismatch here instead of surfacing as a missing argument later.
    fn matches(&self, value: &Value) -> bool {
        match self {
            ArgType::String => value.is_string(),
            ArgType::Integer => value.as_i64().is_some(),
            ArgType::Float => value.as_f64().is_some(),
            ArgType::Boolean => value.is_boolean(),
        }
    }
}

/// One named argument in a tool schema.
#[derive(Debug, Clone, Serialize)]
pub struct ArgSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: ArgType,
    pub description: &'static str,
    pub required: bool,
}

impl ArgSpec {
    pub fn required(name: &'static str, ty: ArgType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            description,
            required: true,
        }
    }

    pub fn optional(name: &'static str, ty: ArgType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            description,
            required: false,
        }
    }
}

/// Advertised description of one registered tool. The descriptor set is
/// handed to the reasoning client once at startup and served on `/tools`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub args: Vec<ArgSpec>,
}

/// Validated argument bag handed to a tool executable.
///
/// The registry has already checked presence and types against the schema;
/// the accessors re-check on read so tool bodies stay honest about what they
/// consume.
#[derive(Debug, Clone)]
pub struct ToolArgs(serde_json::Map<String, Value>);

impl ToolArgs {
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    /// Integers are accepted where a float is declared.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    #[cfg(test)]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self(serde_json::Map::new()),
        }
    }
}

/// A deterministic action callable by the reasoning model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name within the registry.
    fn name(&self) -> &str;

    /// What the tool does, exposed to the model so it can decide when to
    /// invoke it.
    fn description(&self) -> &str;

    /// Flat, primitive-typed argument schema.
    fn args(&self) -> Vec<ArgSpec>;

    /// Execute with validated arguments. May perform network I/O; must not
    /// touch the conversation (the loop owns it).
    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String>;
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool already registered: {0}")]
    Duplicate(String),

    #[error("unknown tool: {0}")]
    Unknown(String),

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

/// Process-wide tool catalog. Built by a registration pass at startup, then
/// shared read-only across all request loops.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, rejecting duplicate names.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::Duplicate(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Descriptor for one tool.
    pub fn descriptor(&self, name: &str) -> Result<ToolDescriptor, ToolError> {
        self.get(name)
            .map(|tool| describe(tool.as_ref()))
            .ok_or_else(|| ToolError::Unknown(name.to_string()))
    }

    /// The full advertised descriptor set, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| describe(t.as_ref())).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate and execute one tool call.
    ///
    /// Unknown names and schema mismatches are returned as errors for the
    /// caller to absorb; failures raised by the executable itself come back
    /// as `Ok` with a failure payload, so downstream outages read as
    /// conversation data rather than crashes.
    pub async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| ToolError::Unknown(call.name.clone()))?;

        let args = validate_args(tool.name(), &tool.args(), &call.arguments)?;

        tracing::debug!(tool = %call.name, call_id = %call.id, "executing tool");
        match tool.execute(&args).await {
            Ok(payload) => Ok(ToolResult::success(call, payload)),
            Err(err) => {
                tracing::warn!(tool = %call.name, error = %err, "tool execution failed");
                Ok(ToolResult::failure(call, err.to_string()))
            }
        }
    }
}

fn describe(tool: &dyn Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        args: tool.args(),
    }
}

/// Check a raw argument value against a schema. Unrecognized keys are
/// ignored; missing or mistyped ones are named in the error so the model can
/// correct itself on the next cycle.
fn validate_args(tool: &str, specs: &[ArgSpec], raw: &Value) -> Result<ToolArgs, ToolError> {
    let invalid = |reason: String| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason,
    };

    let empty = serde_json::Map::new();
    let map = match raw {
        Value::Object(map) => map,
        // A bare null stands in for "no arguments" in some providers.
        Value::Null => &empty,
        other => {
            return Err(invalid(format!(
                "arguments must be a JSON object, got {}",
                json_kind(other)
            )))
        }
    };

    for spec in specs {
        match map.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(invalid(format!("missing required argument: {}", spec.name)));
                }
            }
            Some(value) => {
                if !spec.ty.matches(value) {
                    return Err(invalid(format!(
                        "argument '{}': expected {}, got {}",
                        spec.name,
                        spec.ty.json_type(),
                        json_kind(value)
                    )));
                }
            }
        }
    }

    Ok(ToolArgs(map.clone()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Startup registration pass: build every travel tool from the process
/// config and a shared HTTP client, then hand the registry out read-only.
///
/// Place search needs at least one search provider key; when neither is
/// configured those four tools are left unregistered rather than registered
/// broken.
pub fn register_default_tools(
    registry: &mut ToolRegistry,
    config: &Config,
    http: &reqwest::Client,
) -> Result<(), ToolError> {
    let weather = Arc::new(weather::WeatherService::new(
        http.clone(),
        config.weather_api_key.clone(),
    ));
    registry.register(Arc::new(weather::CurrentWeather::new(weather.clone())))?;
    registry.register(Arc::new(weather::WeatherForecast::new(weather)))?;

    match place_sources(config, http) {
        Some((primary, fallback)) => {
            for category in places::PlaceCategory::ALL {
                registry.register(Arc::new(places::PlaceSearch::new(
                    category,
                    primary.clone(),
                    fallback.clone(),
                )))?;
            }
        }
        None => {
            tracing::warn!(
                "no place search provider configured (GPLACES_API_KEY / TAVILY_API_KEY); \
                 place search tools disabled"
            );
        }
    }

    let currency = Arc::new(currency::CurrencyService::new(
        http.clone(),
        config.exchange_rate_api_key.clone(),
    ));
    registry.register(Arc::new(currency::ConvertCurrency::new(currency)))?;

    registry.register(Arc::new(calculator::EstimateHotelCost))?;
    registry.register(Arc::new(calculator::TotalExpense))?;
    registry.register(Arc::new(calculator::DailyBudget))?;
    registry.register(Arc::new(calculator::Add))?;
    registry.register(Arc::new(calculator::Multiply))?;

    tracing::info!(tools = registry.len(), "tool registry initialized");
    Ok(())
}

/// Pick the place search backends from whichever provider keys are
/// configured: Google Places primary with Tavily as fallback, either one
/// alone, or none at all.
fn place_sources(
    config: &Config,
    http: &reqwest::Client,
) -> Option<(
    Arc<dyn places::PlaceDataSource>,
    Option<Arc<dyn places::PlaceDataSource>>,
)> {
    let google = config.google_places_api_key.clone().map(|key| {
        Arc::new(places::GooglePlaces::new(http.clone(), key)) as Arc<dyn places::PlaceDataSource>
    });
    let tavily = config.tavily_api_key.clone().map(|key| {
        Arc::new(places::TavilySearch::new(http.clone(), key)) as Arc<dyn places::PlaceDataSource>
    });

    match (google, tavily) {
        (Some(primary), fallback) => Some((primary, fallback)),
        (None, Some(primary)) => Some((primary, None)),
        (None, None) => None,
    }
}
