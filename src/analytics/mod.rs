//! Read-only aggregations over a record snapshot. None of these fail on empty
//! input; they return zero-valued views instead.

pub mod pricing;
pub mod retention;
pub mod segmentation;

pub use pricing::{compare_all, PriceComparison};
pub use retention::{classify, RetentionReport};
pub use segmentation::{segment_report, SegmentReport};

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to(67.777, 1), 67.8);
        assert_eq!(round_to(10.333_333, 2), 10.33);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }
}
