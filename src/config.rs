use crate::error::{AppError, Result};
use crate::scorer::FeasibilityWeights;
use crate::types::Baseline;

/// Retention tier boundaries (retention_rate, percent).
/// Lower bounds are inclusive: exactly 75 is high, exactly 50 is medium.
pub mod retention_thresholds {
    pub const HIGH_MIN: f64 = 75.0;
    pub const MEDIUM_MIN: f64 = 50.0;
}

/// Accepted ranges for scenario parameters. Both ends inclusive.
/// Out-of-range values are rejected, never clamped.
pub mod scenario_bounds {
    pub const DISCOUNT_RATE: (f64, f64) = (0.0, 30.0);
    pub const DELIVERY_COST: (f64, f64) = (0.0, 100.0);
    pub const DEMAND_MULTIPLIER: (f64, f64) = (0.5, 2.0);
}

/// Default simulator baseline: ~1M monthly gross revenue over 10k orders.
pub const DEFAULT_BASELINE_ORDERS: u32 = 10_000;
pub const DEFAULT_BASELINE_AOV: f64 = 100.0;
pub const DEFAULT_FIXED_OPERATING_COSTS: f64 = 150_000.0;
/// Fraction of gross revenue spent on goods sold. Zero unless COST_OF_GOODS_RATIO opts in.
pub const DEFAULT_COST_OF_GOODS_RATIO: f64 = 0.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    /// Allowed CORS origins (CORS_ORIGINS, comma-separated). `*` allows any.
    pub cors_origins: Vec<String>,
    /// Baseline written to the record store by `initialize-data`
    /// (BASELINE_ORDERS, BASELINE_AVG_ORDER_VALUE, FIXED_OPERATING_COSTS, COST_OF_GOODS_RATIO)
    pub baseline: Baseline,
    /// Coefficients for deriving city scores from raw signals (FEASIBILITY_*)
    pub feasibility: FeasibilityWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Missing keys fall back to defaults;
    /// present but unparseable keys are an error.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = FeasibilityWeights::default();

        let baseline = Baseline {
            baseline_orders: parse_or(&var, "BASELINE_ORDERS", DEFAULT_BASELINE_ORDERS)?,
            baseline_avg_order_value: parse_or(&var, "BASELINE_AVG_ORDER_VALUE", DEFAULT_BASELINE_AOV)?,
            fixed_operating_costs: parse_or(&var, "FIXED_OPERATING_COSTS", DEFAULT_FIXED_OPERATING_COSTS)?,
            cost_of_goods_ratio: parse_or(&var, "COST_OF_GOODS_RATIO", DEFAULT_COST_OF_GOODS_RATIO)?,
        };
        baseline.validate()?;

        let feasibility = FeasibilityWeights {
            smartphone_penetration: parse_or(&var, "FEASIBILITY_PENETRATION_WEIGHT", defaults.smartphone_penetration)?,
            monthly_demand: parse_or(&var, "FEASIBILITY_DEMAND_WEIGHT", defaults.monthly_demand)?,
            delivery_cost: parse_or(&var, "FEASIBILITY_COST_WEIGHT", defaults.delivery_cost)?,
            demand_saturation: parse_or(&var, "FEASIBILITY_DEMAND_SATURATION", defaults.demand_saturation)?,
            delivery_cost_ceiling: parse_or(&var, "FEASIBILITY_COST_CEILING", defaults.delivery_cost_ceiling)?,
            margin_per_point: parse_or(&var, "FEASIBILITY_MARGIN_PER_POINT", defaults.margin_per_point)?,
        };
        feasibility.validate()?;

        Ok(Self {
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            db_path: var("DB_PATH").unwrap_or_else(|| "analytics.db".to_string()),
            api_port: var("API_PORT")
                .unwrap_or_else(|| "8001".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            cors_origins: var("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            baseline,
            feasibility,
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} could not be parsed: {raw:?}"))),
        None => Ok(default),
    }
}
