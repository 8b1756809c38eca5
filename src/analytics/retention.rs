use serde::Serialize;

use crate::analytics::round_to;
use crate::analytics::segmentation::order_independent_mean;
use crate::config::retention_thresholds::{HIGH_MIN, MEDIUM_MIN};
use crate::types::{Customer, Order, OrderStatus, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionTier {
    /// rate >= 75
    High,
    /// 50 <= rate < 75
    Medium,
    /// rate < 50
    Low,
}

impl RetentionTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= HIGH_MIN {
            RetentionTier::High
        } else if rate >= MEDIUM_MIN {
            RetentionTier::Medium
        } else {
            RetentionTier::Low
        }
    }
}

impl std::fmt::Display for RetentionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RetentionTier::High => "high",
            RetentionTier::Medium => "medium",
            RetentionTier::Low => "low",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SegmentRetention {
    pub premium: f64,
    pub regular: f64,
    pub budget: f64,
}

/// Response body for `GET /api/retention-analysis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetentionReport {
    /// Mean delivery minutes over completed orders, 2 decimals.
    pub avg_delivery_time: f64,
    pub high_retention_count: usize,
    pub medium_retention_count: usize,
    pub low_retention_count: usize,
    pub retention_by_segment: SegmentRetention,
}

impl RetentionReport {
    pub fn total_count(&self) -> usize {
        self.high_retention_count + self.medium_retention_count + self.low_retention_count
    }
}

pub fn classify(customers: &[Customer], orders: &[Order]) -> RetentionReport {
    let mut report = RetentionReport::default();

    for customer in customers {
        match RetentionTier::from_rate(customer.retention_rate) {
            RetentionTier::High => report.high_retention_count += 1,
            RetentionTier::Medium => report.medium_retention_count += 1,
            RetentionTier::Low => report.low_retention_count += 1,
        }
    }

    report.avg_delivery_time = round_to(average_delivery_time(orders), 2);

    let segment_mean = |segment: Segment| {
        let rates = customers
            .iter()
            .filter(|c| c.segment == segment)
            .map(|c| c.retention_rate);
        round_to(order_independent_mean(rates), 2)
    };
    report.retention_by_segment = SegmentRetention {
        premium: segment_mean(Segment::Premium),
        regular: segment_mean(Segment::Regular),
        budget: segment_mean(Segment::Budget),
    };

    report
}

/// Cancelled orders never reached the customer and are excluded.
pub fn average_delivery_time(orders: &[Order]) -> f64 {
    order_independent_mean(
        orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .map(|o| f64::from(o.delivery_time_minutes)),
    )
}
