use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{CompetitorQuote, ProductPrice};

/// One product compared against its cheapest competitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComparison {
    pub id: String,
    pub product: String,
    pub category: String,
    pub our_price: f64,
    pub competitors: Vec<CompetitorQuote>,
    /// One flat `<competitor>_price` key per quote, e.g. `blinkit_price`.
    #[serde(flatten)]
    pub competitor_prices: BTreeMap<String, f64>,
    pub lowest_competitor: Option<String>,
    pub lowest_competitor_price: Option<f64>,
    /// `our_price - min(competitor prices)`; 0 when there are no quotes.
    pub difference: f64,
}

impl PriceComparison {
    pub fn is_overpriced(&self) -> bool {
        self.difference > 0.0
    }
}

/// Cheapest quote for a product. Ties resolve to the first listed quote;
/// only the price feeds `difference`, so the choice does not affect it.
pub fn lowest_quote(quotes: &[CompetitorQuote]) -> Option<&CompetitorQuote> {
    quotes
        .iter()
        .reduce(|best, q| if q.price < best.price { q } else { best })
}

/// Quotes keyed as `<competitor>_price`. A repeated competitor keeps its first quote.
pub fn flat_prices(quotes: &[CompetitorQuote]) -> BTreeMap<String, f64> {
    let mut prices = BTreeMap::new();
    for q in quotes {
        prices.entry(format!("{}_price", q.competitor)).or_insert(q.price);
    }
    prices
}

pub fn compare(price: &ProductPrice) -> PriceComparison {
    let lowest = lowest_quote(&price.competitors);
    let difference = lowest.map_or(0.0, |q| price.our_price - q.price);

    PriceComparison {
        id: price.id.clone(),
        product: price.product.clone(),
        category: price.category.clone(),
        our_price: price.our_price,
        competitors: price.competitors.clone(),
        competitor_prices: flat_prices(&price.competitors),
        lowest_competitor: lowest.map(|q| q.competitor.clone()),
        lowest_competitor_price: lowest.map(|q| q.price),
        difference,
    }
}

/// Comparisons in input product order.
pub fn compare_all(prices: &[ProductPrice]) -> Vec<PriceComparison> {
    prices.iter().map(compare).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(name: &str, price: f64) -> CompetitorQuote {
        CompetitorQuote { competitor: name.to_string(), price }
    }

    fn product(id: &str, ours: f64, quotes: Vec<CompetitorQuote>) -> ProductPrice {
        ProductPrice {
            id: id.to_string(),
            product: format!("Product {id}"),
            category: "Dairy".to_string(),
            our_price: ours,
            competitors: quotes,
        }
    }

    #[test]
    fn difference_uses_cheapest_competitor() {
        let milk = product(
            "milk",
            62.0,
            vec![quote("blinkit", 58.0), quote("zepto", 59.0), quote("bigbasket", 60.0)],
        );
        let cmp = compare(&milk);
        assert_eq!(cmp.difference, 62.0 - 58.0);
        assert_eq!(cmp.lowest_competitor.as_deref(), Some("blinkit"));
        assert!(cmp.is_overpriced());
    }

    #[test]
    fn difference_is_exact_for_fractional_prices() {
        let p = product("x", 10.3, vec![quote("a", 10.1), quote("b", 10.2)]);
        assert_eq!(compare(&p).difference.to_bits(), (10.3f64 - 10.1f64).to_bits());
    }

    #[test]
    fn cheaper_or_equal_products_are_not_overpriced() {
        let cheaper = compare(&product("a", 50.0, vec![quote("x", 55.0)]));
        assert_eq!(cheaper.difference, -5.0);
        assert!(!cheaper.is_overpriced());

        let matched = compare(&product("b", 55.0, vec![quote("x", 55.0), quote("y", 55.0)]));
        assert_eq!(matched.difference, 0.0);
        assert!(!matched.is_overpriced());
    }

    #[test]
    fn product_without_quotes_has_zero_difference() {
        let cmp = compare(&product("solo", 99.0, vec![]));
        assert_eq!(cmp.difference, 0.0);
        assert!(cmp.lowest_competitor.is_none());
        assert!(!cmp.is_overpriced());
    }

    #[test]
    fn quotes_are_exposed_as_flat_price_keys() {
        let milk = product(
            "milk",
            62.0,
            vec![quote("blinkit", 58.0), quote("zepto", 59.0), quote("blinkit", 10.0)],
        );
        let json = serde_json::to_value(compare(&milk)).unwrap();
        assert_eq!(json["blinkit_price"], 58.0);
        assert_eq!(json["zepto_price"], 59.0);
        assert_eq!(json["our_price"], 62.0);
        assert!(json["competitors"].is_array());
    }

    #[test]
    fn output_preserves_input_order() {
        let prices = vec![
            product("z", 1.0, vec![quote("a", 1.0)]),
            product("a", 2.0, vec![quote("a", 1.0)]),
            product("m", 3.0, vec![quote("a", 1.0)]),
        ];
        let ids: Vec<String> = compare_all(&prices).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }
}
