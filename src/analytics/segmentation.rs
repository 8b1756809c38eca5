use serde::Serialize;

use crate::types::{Customer, Segment};

/// Summary statistics for one customer segment. An empty segment is all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SegmentStats {
    pub count: usize,
    pub avg_aov: f64,
    pub avg_retention: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub premium: SegmentStats,
    pub regular: SegmentStats,
    pub budget: SegmentStats,
}

impl SegmentSummary {
    pub fn get(&self, segment: Segment) -> &SegmentStats {
        match segment {
            Segment::Premium => &self.premium,
            Segment::Regular => &self.regular,
            Segment::Budget => &self.budget,
        }
    }

    pub fn total_count(&self) -> usize {
        self.premium.count + self.regular.count + self.budget.count
    }
}

/// Segment members in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentGroups {
    pub premium: Vec<Customer>,
    pub regular: Vec<Customer>,
    pub budget: Vec<Customer>,
}

impl SegmentGroups {
    pub fn members(&self, segment: Segment) -> &[Customer] {
        match segment {
            Segment::Premium => &self.premium,
            Segment::Regular => &self.regular,
            Segment::Budget => &self.budget,
        }
    }

    fn members_mut(&mut self, segment: Segment) -> &mut Vec<Customer> {
        match segment {
            Segment::Premium => &mut self.premium,
            Segment::Regular => &mut self.regular,
            Segment::Budget => &mut self.budget,
        }
    }
}

/// Response body for `GET /api/customer-segments`.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentReport {
    pub segments: SegmentGroups,
    pub summary: SegmentSummary,
}

pub fn group_by_segment(customers: &[Customer]) -> SegmentGroups {
    let mut groups = SegmentGroups::default();
    for customer in customers {
        groups.members_mut(customer.segment).push(customer.clone());
    }
    groups
}

pub fn summarize(customers: &[Customer]) -> SegmentSummary {
    let stats = |segment: Segment| {
        let members: Vec<&Customer> = customers.iter().filter(|c| c.segment == segment).collect();
        SegmentStats {
            count: members.len(),
            avg_aov: order_independent_mean(members.iter().map(|c| c.avg_order_value)),
            avg_retention: order_independent_mean(members.iter().map(|c| c.retention_rate)),
        }
    };

    SegmentSummary {
        premium: stats(Segment::Premium),
        regular: stats(Segment::Regular),
        budget: stats(Segment::Budget),
    }
}

pub fn segment_report(customers: &[Customer]) -> SegmentReport {
    SegmentReport {
        segments: group_by_segment(customers),
        summary: summarize(customers),
    }
}

/// Arithmetic mean, 0 for no values.
///
/// Values are sorted before summing so floating-point accumulation does not
/// depend on iteration order: any permutation of the input gives the same bits.
pub fn order_independent_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    values.iter().sum::<f64>() / values.len() as f64
}
