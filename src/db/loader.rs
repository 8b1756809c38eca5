use std::collections::HashMap;

use crate::db::models::{BaselineRow, CityRow, CompetitorPriceRow, CustomerRow, OrderRow, ProductRow};
use crate::error::Result;
use crate::state::Snapshot;
use crate::types::{Baseline, City, CompetitorQuote, Customer, Order, ProductPrice};

/// Read every source collection into a fresh snapshot.
///
/// All reads run inside one transaction so the snapshot reflects a single
/// committed seed. If the store was never seeded, `fallback` supplies the baseline.
pub async fn load_snapshot(pool: &sqlx::SqlitePool, fallback: Baseline) -> Result<Snapshot> {
    let mut tx = pool.begin().await?;

    let baseline_row: Option<BaselineRow> = sqlx::query_as(
        r#"
        SELECT baseline_orders, baseline_avg_order_value, fixed_operating_costs,
               cost_of_goods_ratio, seeded_at
        FROM baseline WHERE id = 1
        "#,
    )
    .fetch_optional(&mut *tx)
    .await?;

    let customer_rows: Vec<CustomerRow> = sqlx::query_as(
        r#"
        SELECT id, name, email, segment, avg_order_value, total_orders,
               retention_rate, last_order_date, city
        FROM customers ORDER BY position
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    let order_rows: Vec<OrderRow> = sqlx::query_as(
        r#"
        SELECT id, customer_id, order_value, delivery_time_minutes, status,
               order_date, items, city
        FROM orders ORDER BY position
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    let product_rows: Vec<ProductRow> =
        sqlx::query_as("SELECT id, product, category, our_price FROM products ORDER BY position")
            .fetch_all(&mut *tx)
            .await?;

    let quote_rows: Vec<CompetitorPriceRow> = sqlx::query_as(
        "SELECT product_id, competitor, price FROM competitor_prices ORDER BY product_id, position",
    )
    .fetch_all(&mut *tx)
    .await?;

    let city_rows: Vec<CityRow> = sqlx::query_as(
        r#"
        SELECT id, city, tier, avg_delivery_cost, monthly_demand,
               smartphone_penetration, feasibility_score, margin_potential
        FROM cities ORDER BY position
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let (baseline, seeded_at_ns) = match baseline_row {
        Some(row) => {
            let (baseline, seeded_at) = row.into_parts()?;
            (baseline, Some(seeded_at))
        }
        None => (fallback, None),
    };

    let customers = customer_rows
        .into_iter()
        .map(Customer::try_from)
        .collect::<Result<Vec<_>>>()?;
    let orders = order_rows
        .into_iter()
        .map(Order::try_from)
        .collect::<Result<Vec<_>>>()?;
    let cities = city_rows
        .into_iter()
        .map(City::try_from)
        .collect::<Result<Vec<_>>>()?;

    let mut quotes: HashMap<String, Vec<CompetitorQuote>> = HashMap::new();
    for q in quote_rows {
        quotes.entry(q.product_id).or_default().push(CompetitorQuote {
            competitor: q.competitor,
            price: q.price,
        });
    }
    let prices = product_rows
        .into_iter()
        .map(|p| ProductPrice {
            competitors: quotes.remove(&p.id).unwrap_or_default(),
            id: p.id,
            product: p.product,
            category: p.category,
            our_price: p.our_price,
        })
        .collect();

    Ok(Snapshot {
        customers,
        orders,
        prices,
        cities,
        baseline,
        seeded_at_ns,
    })
}
