//! Database row types matching `migrations/`. Converted into domain types on load;
//! a row that does not convert is reported as `CorruptRecord`.

use crate::error::{AppError, Result};
use crate::types::{Baseline, City, Customer, Order};

#[derive(Debug, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub segment: String,
    pub avg_order_value: f64,
    pub total_orders: i64,
    pub retention_rate: f64,
    pub last_order_date: String,
    pub city: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct OrderRow {
    pub id: String,
    pub customer_id: String,
    pub order_value: f64,
    pub delivery_time_minutes: i64,
    pub status: String,
    pub order_date: String,
    pub items: String,
    pub city: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub product: String,
    pub category: String,
    pub our_price: f64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CompetitorPriceRow {
    pub product_id: String,
    pub competitor: String,
    pub price: f64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CityRow {
    pub id: String,
    pub city: String,
    pub tier: String,
    pub avg_delivery_cost: f64,
    pub monthly_demand: i64,
    pub smartphone_penetration: f64,
    pub feasibility_score: Option<f64>,
    pub margin_potential: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct BaselineRow {
    pub baseline_orders: i64,
    pub baseline_avg_order_value: f64,
    pub fixed_operating_costs: f64,
    pub cost_of_goods_ratio: f64,
    pub seeded_at: i64,
}

fn to_u32(field: &str, id: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::CorruptRecord(format!("{field} out of range for {id}: {value}")))
}

impl TryFrom<CustomerRow> for Customer {
    type Error = AppError;

    fn try_from(r: CustomerRow) -> Result<Self> {
        Ok(Customer {
            segment: r.segment.parse()?,
            total_orders: to_u32("total_orders", &r.id, r.total_orders)?,
            id: r.id,
            name: r.name,
            email: r.email,
            avg_order_value: r.avg_order_value,
            retention_rate: r.retention_rate,
            last_order_date: r.last_order_date,
            city: r.city,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(r: OrderRow) -> Result<Self> {
        Ok(Order {
            status: r.status.parse()?,
            delivery_time_minutes: to_u32("delivery_time_minutes", &r.id, r.delivery_time_minutes)?,
            items: serde_json::from_str(&r.items)?,
            id: r.id,
            customer_id: r.customer_id,
            order_value: r.order_value,
            order_date: r.order_date,
            city: r.city,
        })
    }
}

impl TryFrom<CityRow> for City {
    type Error = AppError;

    fn try_from(r: CityRow) -> Result<Self> {
        Ok(City {
            tier: r.tier.parse()?,
            monthly_demand: to_u32("monthly_demand", &r.id, r.monthly_demand)?,
            id: r.id,
            city: r.city,
            avg_delivery_cost: r.avg_delivery_cost,
            smartphone_penetration: r.smartphone_penetration,
            feasibility_score: r.feasibility_score,
            margin_potential: r.margin_potential,
        })
    }
}

impl BaselineRow {
    /// Split into the baseline and its seed timestamp (ns).
    pub fn into_parts(self) -> Result<(Baseline, u64)> {
        let baseline = Baseline {
            baseline_orders: to_u32("baseline_orders", "baseline", self.baseline_orders)?,
            baseline_avg_order_value: self.baseline_avg_order_value,
            fixed_operating_costs: self.fixed_operating_costs,
            cost_of_goods_ratio: self.cost_of_goods_ratio,
        };
        let seeded_at = u64::try_from(self.seeded_at).map_err(|_| {
            AppError::CorruptRecord(format!("seeded_at out of range for baseline: {}", self.seeded_at))
        })?;
        Ok((baseline, seeded_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline_row(seeded_at: i64) -> BaselineRow {
        BaselineRow {
            baseline_orders: 1000,
            baseline_avg_order_value: 500.0,
            fixed_operating_costs: 100_000.0,
            cost_of_goods_ratio: 0.0,
            seeded_at,
        }
    }

    #[test]
    fn baseline_row_splits_into_baseline_and_timestamp() {
        let (baseline, seeded_at) = baseline_row(1_700_000_000_000_000_000).into_parts().unwrap();
        assert_eq!(baseline.baseline_orders, 1000);
        assert_eq!(seeded_at, 1_700_000_000_000_000_000);
    }

    #[test]
    fn negative_seed_timestamp_is_corrupt() {
        let err = baseline_row(-1).into_parts().unwrap_err();
        assert!(matches!(err, AppError::CorruptRecord(ref msg) if msg.contains("seeded_at")), "got {err}");
    }

    #[test]
    fn negative_counts_are_corrupt() {
        assert!(matches!(to_u32("total_orders", "cust-001", -3), Err(AppError::CorruptRecord(_))));
        assert_eq!(to_u32("total_orders", "cust-001", 45).unwrap(), 45);
    }
}
