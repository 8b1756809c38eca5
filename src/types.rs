use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Premium,
    Regular,
    Budget,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Premium, Segment::Regular, Segment::Budget];
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Segment::Premium => "premium",
            Segment::Regular => "regular",
            Segment::Budget => "budget",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Segment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "premium" => Ok(Segment::Premium),
            "regular" => Ok(Segment::Regular),
            "budget" => Ok(Segment::Budget),
            other => Err(AppError::CorruptRecord(format!("unknown segment {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub segment: Segment,
    pub avg_order_value: f64,
    pub total_orders: u32,
    /// Percent, 0-100.
    pub retention_rate: f64,
    pub last_order_date: String,
    pub city: String,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Completed,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::CorruptRecord(format!("unknown order status {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub order_value: f64,
    pub delivery_time_minutes: u32,
    pub status: OrderStatus,
    pub order_date: String,
    pub items: Vec<String>,
    pub city: String,
}

// ---------------------------------------------------------------------------
// Competitor pricing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorQuote {
    pub competitor: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub id: String,
    pub product: String,
    pub category: String,
    pub our_price: f64,
    pub competitors: Vec<CompetitorQuote>,
}

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "tier-1")]
    Tier1,
    #[serde(rename = "tier-2")]
    Tier2,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Tier1 => write!(f, "tier-1"),
            Tier::Tier2 => write!(f, "tier-2"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tier-1" => Ok(Tier::Tier1),
            "tier-2" => Ok(Tier::Tier2),
            other => Err(AppError::CorruptRecord(format!("unknown city tier {other:?}"))),
        }
    }
}

/// Raw city record. Scores are optional: when absent they are derived from
/// the raw signals by the feasibility scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub city: String,
    pub tier: Tier,
    pub avg_delivery_cost: f64,
    pub monthly_demand: u32,
    /// Percent, 0-100.
    pub smartphone_penetration: f64,
    pub feasibility_score: Option<f64>,
    pub margin_potential: Option<f64>,
}

// ---------------------------------------------------------------------------
// Profitability scenario
// ---------------------------------------------------------------------------

/// Baseline constants the simulator scales. Owned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub baseline_orders: u32,
    pub baseline_avg_order_value: f64,
    pub fixed_operating_costs: f64,
    /// Fraction of gross revenue, 0-1. Zero disables the cost-of-goods term.
    pub cost_of_goods_ratio: f64,
}

impl Baseline {
    pub fn validate(&self) -> Result<()> {
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !non_negative(self.baseline_avg_order_value) {
            return Err(AppError::Config("baseline_avg_order_value must be >= 0".to_string()));
        }
        if !non_negative(self.fixed_operating_costs) {
            return Err(AppError::Config("fixed_operating_costs must be >= 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.cost_of_goods_ratio) {
            return Err(AppError::Config("cost_of_goods_ratio must be within [0, 1]".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Percent, 0-30.
    pub discount_rate: f64,
    /// Per order, 0-100.
    pub delivery_cost: f64,
    /// 0.5-2.0.
    pub demand_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Net of discounts.
    pub revenue: f64,
    pub gross_revenue: f64,
    pub total_costs: f64,
    pub discount_costs: f64,
    pub delivery_costs: f64,
    pub cost_of_goods: f64,
    pub profit: f64,
    pub margin_percent: f64,
    pub orders: u64,
}
