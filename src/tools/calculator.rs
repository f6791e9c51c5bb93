//! Deterministic arithmetic tools.
//!
//! The model is unreliable at exact arithmetic, so cost estimation is
//! delegated to these pure functions. None of them perform I/O.

use async_trait::async_trait;

use super::{ArgSpec, ArgType, Tool, ToolArgs};

/// `estimate_total_hotel_cost`: price per night times number of nights.
pub struct EstimateHotelCost;

#[async_trait]
impl Tool for EstimateHotelCost {
    fn name(&self) -> &str {
        "estimate_total_hotel_cost"
    }

    fn description(&self) -> &str {
        "Estimate the total hotel cost for a stay from the nightly price and the number of nights"
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::required(
                "price_per_night",
                ArgType::Float,
                "Cost of one night at the hotel",
            ),
            ArgSpec::required("total_days", ArgType::Float, "Number of nights of the stay"),
        ]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let price = args
            .float("price_per_night")
            .ok_or_else(|| anyhow::anyhow!("missing 'price_per_night' argument"))?;
        let days = args
            .float("total_days")
            .ok_or_else(|| anyhow::anyhow!("missing 'total_days' argument"))?;
        Ok(format_amount(price * days))
    }
}

/// `calculate_total_expense`: sum of a comma-separated list of costs.
///
/// The list arrives as a single string because tool arguments are limited to
/// flat primitive values.
pub struct TotalExpense;

#[async_trait]
impl Tool for TotalExpense {
    fn name(&self) -> &str {
        "calculate_total_expense"
    }

    fn description(&self) -> &str {
        "Sum a list of individual costs. Pass the costs as one comma-separated string, \
         for example \"1200, 350.50, 80\""
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![ArgSpec::required(
            "costs",
            ArgType::String,
            "Comma-separated list of numeric costs to add up",
        )]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let raw = args
            .str("costs")
            .ok_or_else(|| anyhow::anyhow!("missing 'costs' argument"))?;
        let total = parse_costs(raw)?.into_iter().sum();
        Ok(format_amount(total))
    }
}

/// `calculate_daily_expense_budget`: total cost divided over trip days.
pub struct DailyBudget;

#[async_trait]
impl Tool for DailyBudget {
    fn name(&self) -> &str {
        "calculate_daily_expense_budget"
    }

    fn description(&self) -> &str {
        "Calculate the daily budget by dividing the total trip cost by the number of days"
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::required("total_cost", ArgType::Float, "Total cost of the trip"),
            ArgSpec::required("days", ArgType::Integer, "Number of days of the trip"),
        ]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let total = args
            .float("total_cost")
            .ok_or_else(|| anyhow::anyhow!("missing 'total_cost' argument"))?;
        let days = args
            .int("days")
            .ok_or_else(|| anyhow::anyhow!("missing 'days' argument"))?;
        if days <= 0 {
            anyhow::bail!("days must be a positive number, got {}", days);
        }
        Ok(format_amount(total / days as f64))
    }
}

/// `add`: integer addition.
pub struct Add;

#[async_trait]
impl Tool for Add {
    fn name(&self) -> &str {
        "add"
    }

    fn description(&self) -> &str {
        "Add two integers"
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::required("a", ArgType::Integer, "The first integer"),
            ArgSpec::required("b", ArgType::Integer, "The second integer"),
        ]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let a = args
            .int("a")
            .ok_or_else(|| anyhow::anyhow!("missing 'a' argument"))?;
        let b = args
            .int("b")
            .ok_or_else(|| anyhow::anyhow!("missing 'b' argument"))?;
        let sum = a
            .checked_add(b)
            .ok_or_else(|| anyhow::anyhow!("integer overflow in {} + {}", a, b))?;
        Ok(sum.to_string())
    }
}

/// `multiply`: integer multiplication.
pub struct Multiply;

#[async_trait]
impl Tool for Multiply {
    fn name(&self) -> &str {
        "multiply"
    }

    fn description(&self) -> &str {
        "Multiply two integers"
    }

    fn args(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::required("a", ArgType::Integer, "The first integer"),
            ArgSpec::required("b", ArgType::Integer, "The second integer"),
        ]
    }

    async fn execute(&self, args: &ToolArgs) -> anyhow::Result<String> {
        let a = args
            .int("a")
            .ok_or_else(|| anyhow::anyhow!("missing 'a' argument"))?;
        let b = args
            .int("b")
            .ok_or_else(|| anyhow::anyhow!("missing 'b' argument"))?;
        let product = a
            .checked_mul(b)
            .ok_or_else(|| anyhow::anyhow!("integer overflow in {} * {}", a, b))?;
        Ok(product.to_string())
    }
}

fn parse_costs(raw: &str) -> anyhow::Result<Vec<f64>> {
    let mut costs = Vec::new();
    for piece in raw.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let value: f64 = piece
            .parse()
            .map_err(|_| anyhow::anyhow!("'{}' is not a number", piece))?;
        costs.push(value);
    }
    if costs.is_empty() {
        anyhow::bail!("no costs provided");
    }
    Ok(costs)
}

/// Render a monetary amount with two decimal places.
fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn hotel_cost_multiplies_price_by_nights() {
        let args = ToolArgs::from_value(json!({ "price_per_night": 120.5, "total_days": 4 }));
        let out = EstimateHotelCost.execute(&args).await.expect("execute");
        assert_eq!(out, "482.00");
    }

    #[tokio::test]
    async fn total_expense_sums_comma_separated_costs() {
        let args = ToolArgs::from_value(json!({ "costs": "1200, 350.5, 80" }));
        let out = TotalExpense.execute(&args).await.expect("execute");
        assert_eq!(out, "1630.50");
    }

    #[tokio::test]
    async fn total_expense_rejects_garbage_tokens() {
        let args = ToolArgs::from_value(json!({ "costs": "100, lots" }));
        let err = TotalExpense.execute(&args).await.unwrap_err();
        assert!(err.to_string().contains("'lots'"));
    }

    #[tokio::test]
    async fn total_expense_rejects_empty_list() {
        let args = ToolArgs::from_value(json!({ "costs": " , " }));
        let err = TotalExpense.execute(&args).await.unwrap_err();
        assert!(err.to_string().contains("no costs"));
    }

    #[tokio::test]
    async fn daily_budget_divides_over_days() {
        let args = ToolArgs::from_value(json!({ "total_cost": 900.0, "days": 3 }));
        let out = DailyBudget.execute(&args).await.expect("execute");
        assert_eq!(out, "300.00");
    }

    #[tokio::test]
    async fn daily_budget_rejects_zero_days() {
        let args = ToolArgs::from_value(json!({ "total_cost": 900.0, "days": 0 }));
        let err = DailyBudget.execute(&args).await.unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[tokio::test]
    async fn add_and_multiply_are_exact() {
        let args = ToolArgs::from_value(json!({ "a": 21, "b": 2 }));
        assert_eq!(Add.execute(&args).await.expect("add"), "23");
        assert_eq!(Multiply.execute(&args).await.expect("multiply"), "42");
    }

    #[tokio::test]
    async fn multiply_reports_overflow() {
        let args = ToolArgs::from_value(json!({ "a": i64::MAX, "b": 2 }));
        let err = Multiply.execute(&args).await.unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }
}
