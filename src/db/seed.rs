//! Canonical sample dataset written by `initialize-data`.
//! IDs are fixed so repeated seeding converges on the same rows.

use crate::types::{City, CompetitorQuote, Customer, Order, OrderStatus, ProductPrice, Segment, Tier};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub prices: Vec<ProductPrice>,
    pub cities: Vec<City>,
}

pub fn sample_dataset() -> Dataset {
    Dataset {
        customers: sample_customers(),
        orders: sample_orders(),
        prices: sample_prices(),
        cities: sample_cities(),
    }
}

#[allow(clippy::too_many_arguments)]
fn customer(
    id: &str,
    name: &str,
    email: &str,
    segment: Segment,
    avg_order_value: f64,
    total_orders: u32,
    retention_rate: f64,
    last_order_date: &str,
    city: &str,
) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        segment,
        avg_order_value,
        total_orders,
        retention_rate,
        last_order_date: last_order_date.to_string(),
        city: city.to_string(),
    }
}

fn sample_customers() -> Vec<Customer> {
    use Segment::*;
    vec![
        customer("cust-001", "Rajesh Kumar", "rajesh@example.com", Premium, 1850.0, 45, 85.0, "2025-01-15", "Mumbai"),
        customer("cust-002", "Priya Sharma", "priya@example.com", Regular, 680.0, 22, 62.0, "2025-01-10", "Delhi"),
        customer("cust-003", "Amit Patel", "amit@example.com", Premium, 2100.0, 38, 78.0, "2025-01-17", "Bangalore"),
        customer("cust-004", "Sneha Reddy", "sneha@example.com", Budget, 420.0, 15, 45.0, "2024-12-20", "Hyderabad"),
        customer("cust-005", "Vikram Singh", "vikram@example.com", Regular, 950.0, 30, 70.0, "2025-01-12", "Mumbai"),
        customer("cust-006", "Anjali Gupta", "anjali@example.com", Premium, 1920.0, 52, 88.0, "2025-01-16", "Delhi"),
        customer("cust-007", "Rohit Mehta", "rohit@example.com", Budget, 380.0, 12, 40.0, "2024-12-15", "Pune"),
        customer("cust-008", "Kavya Iyer", "kavya@example.com", Regular, 850.0, 28, 65.0, "2025-01-14", "Chennai"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn order(
    id: &str,
    customer_id: &str,
    order_value: f64,
    delivery_time_minutes: u32,
    status: OrderStatus,
    order_date: &str,
    items: &[&str],
    city: &str,
) -> Order {
    Order {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        order_value,
        delivery_time_minutes,
        status,
        order_date: order_date.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
        city: city.to_string(),
    }
}

fn sample_orders() -> Vec<Order> {
    use OrderStatus::*;
    vec![
        order("ord-001", "cust-001", 1850.0, 12, Completed, "2025-01-15", &["Milk", "Bread", "Eggs"], "Mumbai"),
        order("ord-002", "cust-002", 680.0, 35, Completed, "2025-01-10", &["Rice", "Dal"], "Delhi"),
        order("ord-003", "cust-003", 2100.0, 10, Completed, "2025-01-17", &["Fruits", "Vegetables", "Snacks"], "Bangalore"),
        order("ord-004", "cust-004", 420.0, 45, Cancelled, "2024-12-20", &["Chips"], "Hyderabad"),
        order("ord-005", "cust-005", 950.0, 18, Completed, "2025-01-12", &["Beverages", "Biscuits"], "Mumbai"),
    ]
}

fn product(id: &str, name: &str, category: &str, our_price: f64, blinkit: f64, zepto: f64, bigbasket: f64) -> ProductPrice {
    let quote = |competitor: &str, price: f64| CompetitorQuote {
        competitor: competitor.to_string(),
        price,
    };
    ProductPrice {
        id: id.to_string(),
        product: name.to_string(),
        category: category.to_string(),
        our_price,
        competitors: vec![quote("blinkit", blinkit), quote("zepto", zepto), quote("bigbasket", bigbasket)],
    }
}

fn sample_prices() -> Vec<ProductPrice> {
    vec![
        product("prod-001", "Milk (1L)", "Dairy", 62.0, 58.0, 59.0, 60.0),
        product("prod-002", "Bread (400g)", "Bakery", 42.0, 38.0, 39.0, 40.0),
        product("prod-003", "Rice (5kg)", "Staples", 385.0, 370.0, 375.0, 380.0),
        product("prod-004", "Eggs (12 pcs)", "Dairy", 95.0, 88.0, 90.0, 92.0),
        product("prod-005", "Chips (100g)", "Snacks", 25.0, 20.0, 22.0, 23.0),
        product("prod-006", "Soft Drink (2L)", "Beverages", 95.0, 85.0, 88.0, 90.0),
        product("prod-007", "Detergent (1kg)", "Household", 245.0, 235.0, 240.0, 242.0),
        product("prod-008", "Cooking Oil (1L)", "Staples", 185.0, 175.0, 178.0, 180.0),
    ]
}

#[allow(clippy::too_many_arguments)]
fn city(
    id: &str,
    name: &str,
    tier: Tier,
    avg_delivery_cost: f64,
    monthly_demand: u32,
    smartphone_penetration: f64,
    feasibility_score: Option<f64>,
    margin_potential: Option<f64>,
) -> City {
    City {
        id: id.to_string(),
        city: name.to_string(),
        tier,
        avg_delivery_cost,
        monthly_demand,
        smartphone_penetration,
        feasibility_score,
        margin_potential,
    }
}

fn sample_cities() -> Vec<City> {
    use Tier::*;
    vec![
        city("city-001", "Mumbai", Tier1, 45.0, 15_000, 92.0, Some(88.0), Some(12.5)),
        city("city-002", "Delhi", Tier1, 42.0, 14_500, 90.0, Some(86.0), Some(11.8)),
        city("city-003", "Bangalore", Tier1, 48.0, 13_800, 94.0, Some(90.0), Some(13.2)),
        city("city-004", "Indore", Tier2, 35.0, 4_200, 68.0, Some(72.0), Some(9.5)),
        city("city-005", "Bhopal", Tier2, 32.0, 3_800, 65.0, Some(68.0), Some(8.8)),
        city("city-006", "Coimbatore", Tier2, 38.0, 4_500, 71.0, Some(75.0), Some(10.2)),
        // Raw signals only; scores are derived on read.
        city("city-007", "Nagpur", Tier2, 34.0, 3_900, 66.0, None, None),
        city("city-008", "Lucknow", Tier2, 36.0, 5_100, 69.0, None, None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_per_collection() {
        let data = sample_dataset();
        let unique = |ids: Vec<&str>| ids.iter().collect::<HashSet<_>>().len() == ids.len();
        assert!(unique(data.customers.iter().map(|c| c.id.as_str()).collect()));
        assert!(unique(data.orders.iter().map(|o| o.id.as_str()).collect()));
        assert!(unique(data.prices.iter().map(|p| p.id.as_str()).collect()));
        assert!(unique(data.cities.iter().map(|c| c.id.as_str()).collect()));
    }

    #[test]
    fn orders_reference_seeded_customers() {
        let data = sample_dataset();
        let customer_ids: HashSet<&str> = data.customers.iter().map(|c| c.id.as_str()).collect();
        for order in &data.orders {
            assert!(customer_ids.contains(order.customer_id.as_str()), "{}", order.id);
        }
    }

    #[test]
    fn sample_is_deterministic() {
        assert_eq!(sample_dataset(), sample_dataset());
    }
}
