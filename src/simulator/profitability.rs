use crate::analytics::round_to;
use crate::config::scenario_bounds::{DELIVERY_COST, DEMAND_MULTIPLIER, DISCOUNT_RATE};
use crate::error::{AppError, Result};
use crate::types::{Baseline, ScenarioInput, ScenarioResult};

/// Evaluate one profitability scenario against a baseline.
///
/// All inputs are range-checked before any arithmetic; the first out-of-range
/// field is reported. Money fields are rounded to cents and `profit` is taken
/// from the rounded figures, so `profit == revenue - total_costs` holds exactly
/// on the returned value.
pub fn simulate(input: &ScenarioInput, baseline: &Baseline) -> Result<ScenarioResult> {
    check_range("discount_rate", input.discount_rate, DISCOUNT_RATE)?;
    check_range("delivery_cost", input.delivery_cost, DELIVERY_COST)?;
    check_range("demand_multiplier", input.demand_multiplier, DEMAND_MULTIPLIER)?;

    let orders = (f64::from(baseline.baseline_orders) * input.demand_multiplier).round() as u64;
    let order_count = orders as f64;

    let gross_revenue = order_count * baseline.baseline_avg_order_value;
    let discount_costs = gross_revenue * (input.discount_rate / 100.0);
    let revenue = gross_revenue - discount_costs;

    let delivery_costs = order_count * input.delivery_cost;
    let cost_of_goods = gross_revenue * baseline.cost_of_goods_ratio;
    let total_costs = delivery_costs + baseline.fixed_operating_costs + cost_of_goods;

    let revenue = cents(revenue);
    let total_costs = cents(total_costs);
    let profit = revenue - total_costs;
    let margin_percent = if revenue > 0.0 {
        round_to(100.0 * profit / revenue, 1)
    } else {
        0.0
    };

    Ok(ScenarioResult {
        revenue,
        gross_revenue: cents(gross_revenue),
        total_costs,
        discount_costs: cents(discount_costs),
        delivery_costs: cents(delivery_costs),
        cost_of_goods: cents(cost_of_goods),
        profit,
        margin_percent,
        orders,
    })
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    // NaN fails `contains` and is rejected along with out-of-range values.
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AppError::InvalidInput { field, value, min, max })
    }
}

fn cents(value: f64) -> f64 {
    round_to(value, 2)
}
