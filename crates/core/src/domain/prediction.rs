use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketComparison {
    Below,
    Fair,
    Above,
}

impl MarketComparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Below => "below",
            Self::Fair => "fair",
            Self::Above => "above",
        }
    }
}

impl fmt::Display for MarketComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    AboveMarket,
    BelowMarket,
    FairMarket,
    NearUniversity,
    FarFromUniversity,
    Spacious,
    Compact,
    FullyEquipped,
    LimitedAmenities,
    SharedRoom,
    Studio,
}

/// One short justification attached to a prediction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePrediction {
    /// Monthly price, always a multiple of 10.
    pub predicted_price: i64,
    /// Percentage in `60..=95`.
    pub confidence: u8,
    pub price_range: PriceRange,
    pub market_comparison: MarketComparison,
    pub insights: Vec<Insight>,
    pub similar_listings: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedPriceTiers {
    pub recommended: i64,
    pub competitive: i64,
    pub premium: i64,
    pub budget: i64,
}
