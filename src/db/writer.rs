use serde::Serialize;
use tracing::info;

use crate::db::seed::Dataset;
use crate::error::Result;
use crate::types::Baseline;

/// Outcome of one `initialize-data` run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeedOutcome {
    pub customers: usize,
    pub orders: usize,
    pub products: usize,
    pub cities: usize,
    /// True when the store already held a seed before this run.
    pub already_initialized: bool,
}

/// Replace every source collection with `data` in one transaction.
///
/// The store is cleared first and rows use fixed IDs, so running this any
/// number of times leaves the same rows as running it once. Readers on other
/// connections see either the old rows or the new ones, never a mix.
pub async fn seed(
    pool: &sqlx::SqlitePool,
    data: &Dataset,
    baseline: &Baseline,
    seeded_at_ns: u64,
) -> Result<SeedOutcome> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM baseline")
        .fetch_one(&mut *tx)
        .await?;

    for table in ["competitor_prices", "products", "orders", "customers", "cities", "baseline"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;
    }

    for (position, c) in data.customers.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, position, name, email, segment, avg_order_value,
                total_orders, retention_rate, last_order_date, city
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&c.id)
        .bind(position as i64)
        .bind(&c.name)
        .bind(&c.email)
        .bind(c.segment.to_string())
        .bind(c.avg_order_value)
        .bind(i64::from(c.total_orders))
        .bind(c.retention_rate)
        .bind(&c.last_order_date)
        .bind(&c.city)
        .execute(&mut *tx)
        .await?;
    }

    for (position, o) in data.orders.iter().enumerate() {
        let items = serde_json::to_string(&o.items)?;
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, position, customer_id, order_value, delivery_time_minutes,
                status, order_date, items, city
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&o.id)
        .bind(position as i64)
        .bind(&o.customer_id)
        .bind(o.order_value)
        .bind(i64::from(o.delivery_time_minutes))
        .bind(o.status.to_string())
        .bind(&o.order_date)
        .bind(items)
        .bind(&o.city)
        .execute(&mut *tx)
        .await?;
    }

    for (position, p) in data.prices.iter().enumerate() {
        sqlx::query("INSERT INTO products (id, position, product, category, our_price) VALUES (?, ?, ?, ?, ?)")
            .bind(&p.id)
            .bind(position as i64)
            .bind(&p.product)
            .bind(&p.category)
            .bind(p.our_price)
            .execute(&mut *tx)
            .await?;

        for (quote_position, q) in p.competitors.iter().enumerate() {
            sqlx::query(
                "INSERT INTO competitor_prices (product_id, competitor, position, price) VALUES (?, ?, ?, ?)",
            )
            .bind(&p.id)
            .bind(&q.competitor)
            .bind(quote_position as i64)
            .bind(q.price)
            .execute(&mut *tx)
            .await?;
        }
    }

    for (position, c) in data.cities.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO cities (
                id, position, city, tier, avg_delivery_cost, monthly_demand,
                smartphone_penetration, feasibility_score, margin_potential
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&c.id)
        .bind(position as i64)
        .bind(&c.city)
        .bind(c.tier.to_string())
        .bind(c.avg_delivery_cost)
        .bind(i64::from(c.monthly_demand))
        .bind(c.smartphone_penetration)
        .bind(c.feasibility_score)
        .bind(c.margin_potential)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO baseline (
            id, baseline_orders, baseline_avg_order_value,
            fixed_operating_costs, cost_of_goods_ratio, seeded_at
        ) VALUES (1, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(i64::from(baseline.baseline_orders))
    .bind(baseline.baseline_avg_order_value)
    .bind(baseline.fixed_operating_costs)
    .bind(baseline.cost_of_goods_ratio)
    .bind(seeded_at_ns as i64)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let outcome = SeedOutcome {
        customers: data.customers.len(),
        orders: data.orders.len(),
        products: data.prices.len(),
        cities: data.cities.len(),
        already_initialized: existing > 0,
    };
    info!(
        event = "SEED",
        customers = outcome.customers,
        orders = outcome.orders,
        products = outcome.products,
        cities = outcome.cities,
        already_initialized = outcome.already_initialized,
        "Record store seeded: {} customers, {} orders, {} products, {} cities",
        outcome.customers, outcome.orders, outcome.products, outcome.cities,
    );
    Ok(outcome)
}
