use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::prediction::{PricePrediction, PriceRange, SuggestedPriceTiers};
use crate::valuation::calculator::{round_half_up, whole_units};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBands {
    /// Lower edge of the range (default: 0.85)
    pub range_floor: Decimal,
    /// Upper edge of the range (default: 1.15)
    pub range_ceiling: Decimal,
    /// Budget tier (default: 0.9)
    pub budget: Decimal,
}

impl Default for PriceBands {
    fn default() -> Self {
        Self {
            range_floor: Decimal::new(85, 2),
            range_ceiling: Decimal::new(115, 2),
            budget: Decimal::new(9, 1),
        }
    }
}

pub fn price_range(predicted: i64, bands: &PriceBands) -> PriceRange {
    PriceRange {
        min: scaled(predicted, bands.range_floor),
        max: scaled(predicted, bands.range_ceiling),
    }
}

/// Tiers are read off a single prediction, nothing is recomputed.
pub fn suggest_tiers(prediction: &PricePrediction, bands: &PriceBands) -> SuggestedPriceTiers {
    SuggestedPriceTiers {
        recommended: prediction.predicted_price,
        competitive: prediction.price_range.min,
        premium: prediction.price_range.max,
        budget: scaled(prediction.predicted_price, bands.budget),
    }
}

fn scaled(price: i64, factor: Decimal) -> i64 {
    match Decimal::from(price).checked_mul(factor) {
        Some(value) => whole_units(round_half_up(value)),
        None if (price < 0) == factor.is_sign_negative() => i64::MAX,
        None => i64::MIN,
    }
}

#[cfg(test)]
mod tests {
    use super::{price_range, suggest_tiers, PriceBands};
    use crate::domain::prediction::{MarketComparison, PricePrediction, PriceRange};

    #[test]
    fn range_brackets_the_prediction() {
        let range = price_range(620, &PriceBands::default());
        assert_eq!(range, PriceRange { min: 527, max: 713 });
    }

    #[test]
    fn range_rounds_halves_up() {
        // 330 * 0.85 = 280.5, 330 * 1.15 = 379.5
        assert_eq!(price_range(330, &PriceBands::default()), PriceRange { min: 281, max: 380 });
    }

    #[test]
    fn tiers_are_ordered() {
        let bands = PriceBands::default();
        for predicted in (10..=3_000).step_by(10) {
            let prediction = PricePrediction {
                predicted_price: predicted,
                confidence: 60,
                price_range: price_range(predicted, &bands),
                market_comparison: MarketComparison::Fair,
                insights: Vec::new(),
                similar_listings: 0,
            };
            let tiers = suggest_tiers(&prediction, &bands);

            assert!(tiers.competitive < tiers.recommended, "{predicted}");
            assert!(tiers.recommended < tiers.premium, "{predicted}");
            assert!(tiers.budget <= tiers.recommended, "{predicted}");
        }
    }
}
