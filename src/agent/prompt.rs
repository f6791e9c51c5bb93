//! System prompt for the travel agent.

use crate::tools::ToolRegistry;

/// Build the system prompt with the registered tool catalog.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .descriptors()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a helpful AI Travel Agent and Expense Planner.
You help users plan trips to any place worldwide with real-time data from the internet.

Provide a complete, comprehensive and detailed travel plan. Always try to provide two
plans, one for the generic tourist places, another for more off-beat locations situated
in and around the requested place.

Give full information immediately, including:
- Complete day-by-day itinerary
- Recommended hotels for boarding along with approx per-night cost
- Places of attraction around the place with details
- Recommended restaurants with prices around the place
- Activities around the place with details
- Modes of transportation available in the place with details
- Detailed cost breakdown
- Per-day expense budget approximately
- Weather details

You have access to the following tools:
{tool_descriptions}

Use the available tools to gather real-time information and make accurate cost breakdowns.
Provide everything in one comprehensive response formatted in clean Markdown."#,
        tool_descriptions = tool_descriptions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ArgSpec, ArgType, Tool, ToolArgs};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Probe;

    #[async_trait]
    impl Tool for Probe {
        fn name(&self) -> &str {
            "get_current_weather"
        }
        fn description(&self) -> &str {
            "Get the current weather for a city"
        }
        fn args(&self) -> Vec<ArgSpec> {
            vec![ArgSpec::required("city", ArgType::String, "City name")]
        }
        async fn execute(&self, _args: &ToolArgs) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn prompt_lists_registered_tools() {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(Probe)).expect("register");

        let prompt = build_system_prompt(&tools);
        assert!(prompt.contains("Travel Agent"));
        assert!(prompt.contains("**get_current_weather**"));
    }
}
