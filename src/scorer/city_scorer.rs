use serde::Serialize;

use crate::analytics::round_to;
use crate::error::{AppError, Result};
use crate::types::{City, Tier};

/// Coefficients for deriving city scores from raw signals.
///
/// The three signal weights are applied to 0-100 normalized signals, so with
/// weights summing to 1 the feasibility score stays within 0-100 before clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeasibilityWeights {
    pub smartphone_penetration: f64,
    pub monthly_demand: f64,
    pub delivery_cost: f64,
    /// Monthly demand at which the demand signal saturates at 100.
    pub demand_saturation: f64,
    /// Delivery cost at which the cost signal drops to 0.
    pub delivery_cost_ceiling: f64,
    /// Margin percent gained per feasibility point.
    pub margin_per_point: f64,
}

impl Default for FeasibilityWeights {
    fn default() -> Self {
        Self {
            smartphone_penetration: 0.5,
            monthly_demand: 0.3,
            delivery_cost: 0.2,
            demand_saturation: 15_000.0,
            delivery_cost_ceiling: 100.0,
            margin_per_point: 0.15,
        }
    }
}

impl FeasibilityWeights {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("smartphone_penetration", self.smartphone_penetration),
            ("monthly_demand", self.monthly_demand),
            ("delivery_cost", self.delivery_cost),
            ("margin_per_point", self.margin_per_point),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(AppError::Config(format!("feasibility weight {name} must be >= 0")));
            }
        }
        if !(self.demand_saturation > 0.0 && self.delivery_cost_ceiling > 0.0) {
            return Err(AppError::Config(
                "demand saturation and delivery cost ceiling must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Both scores came with the record.
    Supplied,
    /// At least one score was computed from raw signals.
    Derived,
}

/// City record with resolved scores. Response item for `GET /api/city-analysis`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityAssessment {
    pub id: String,
    pub city: String,
    pub tier: Tier,
    pub avg_delivery_cost: f64,
    pub monthly_demand: u32,
    pub smartphone_penetration: f64,
    pub feasibility_score: f64,
    pub margin_potential: f64,
    pub score_source: ScoreSource,
}

/// Feasibility (0-100) from raw signals. Rises with smartphone penetration and
/// demand, falls with delivery cost. One decimal.
pub fn derive_feasibility(
    smartphone_penetration: f64,
    monthly_demand: u32,
    delivery_cost: f64,
    w: &FeasibilityWeights,
) -> f64 {
    let penetration_signal = smartphone_penetration.clamp(0.0, 100.0);
    let demand_signal = (f64::from(monthly_demand) / w.demand_saturation).min(1.0) * 100.0;
    let cost_signal = (1.0 - (delivery_cost.max(0.0) / w.delivery_cost_ceiling).min(1.0)) * 100.0;

    let score = w.smartphone_penetration * penetration_signal
        + w.monthly_demand * demand_signal
        + w.delivery_cost * cost_signal;

    round_to(score.clamp(0.0, 100.0), 1)
}

pub fn derive_margin(feasibility_score: f64, w: &FeasibilityWeights) -> f64 {
    round_to(feasibility_score * w.margin_per_point, 1)
}

pub fn assess(city: &City, w: &FeasibilityWeights) -> CityAssessment {
    let feasibility_score = city.feasibility_score.unwrap_or_else(|| {
        derive_feasibility(
            city.smartphone_penetration,
            city.monthly_demand,
            city.avg_delivery_cost,
            w,
        )
    });
    let margin_potential = city
        .margin_potential
        .unwrap_or_else(|| derive_margin(feasibility_score, w));
    let score_source = if city.feasibility_score.is_some() && city.margin_potential.is_some() {
        ScoreSource::Supplied
    } else {
        ScoreSource::Derived
    };

    CityAssessment {
        id: city.id.clone(),
        city: city.city.clone(),
        tier: city.tier,
        avg_delivery_cost: city.avg_delivery_cost,
        monthly_demand: city.monthly_demand,
        smartphone_penetration: city.smartphone_penetration,
        feasibility_score,
        margin_potential,
        score_source,
    }
}

/// Assessments in input order, optionally restricted to one tier.
pub fn assess_all(cities: &[City], w: &FeasibilityWeights, tier: Option<Tier>) -> Vec<CityAssessment> {
    cities
        .iter()
        .filter(|c| tier.map_or(true, |t| c.tier == t))
        .map(|c| assess(c, w))
        .collect()
}

/// Tier-2 cities, most feasible first (name breaks ties).
pub fn expansion_candidates(cities: &[City], w: &FeasibilityWeights) -> Vec<CityAssessment> {
    let mut candidates = assess_all(cities, w, Some(Tier::Tier2));
    candidates.sort_by(|a, b| {
        b.feasibility_score
            .total_cmp(&a.feasibility_score)
            .then_with(|| a.city.cmp(&b.city))
    });
    candidates
}
