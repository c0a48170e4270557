//! Room valuation engine
//!
//! Turns a set of room features into a recommended monthly price, a range
//! around it, a market position, a confidence score, short insights and a
//! set of suggested price tiers. Every call is a pure function of the
//! features plus the immutable weights, policy and market data injected at
//! construction.

pub mod calculator;
pub mod insights;
pub mod market;
pub mod tiers;
pub mod weights;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::prediction::{PricePrediction, SuggestedPriceTiers};
use crate::domain::room::{RoomFeatures, RoomType};
use crate::errors::ValidationError;

use self::{
    calculator::{compute_base_price_with_trace, BaseEstimate},
    insights::generate_insights,
    market::{
        compare_to_market, confidence_for, count_similar, market_average, MarketDataSource,
        MarketPolicy, ReferenceDataset,
    },
    tiers::{price_range, suggest_tiers, PriceBands},
    weights::ValuationWeights,
};

pub trait ValuationRuntime: Send + Sync {
    fn predict_price(&self, features: &RoomFeatures) -> Result<PricePrediction, ValidationError>;

    fn suggested_price(
        &self,
        features: &RoomFeatures,
    ) -> Result<SuggestedPriceTiers, ValidationError>;
}

pub struct DeterministicValuationEngine<M = ReferenceDataset> {
    weights: ValuationWeights,
    policy: MarketPolicy,
    bands: PriceBands,
    market: M,
}

impl<M> DeterministicValuationEngine<M> {
    pub fn new(weights: ValuationWeights, policy: MarketPolicy, bands: PriceBands, market: M) -> Self {
        Self { weights, policy, bands, market }
    }

    pub fn weights(&self) -> &ValuationWeights {
        &self.weights
    }

    pub fn policy(&self) -> &MarketPolicy {
        &self.policy
    }

    pub fn market(&self) -> &M {
        &self.market
    }
}

impl<M: MarketDataSource> DeterministicValuationEngine<M> {
    pub fn with_market(market: M) -> Self {
        Self::new(ValuationWeights::default(), MarketPolicy::default(), PriceBands::default(), market)
    }

    /// Base price with the per-stage trace that produced it.
    pub fn base_estimate(&self, features: &RoomFeatures) -> Result<BaseEstimate, ValidationError> {
        features.validate()?;
        compute_base_price_with_trace(features, &self.weights)
    }

    pub fn count_similar(&self, features: &RoomFeatures) -> usize {
        let comparables = self.market.comparables(&features.location, features.room_type);
        count_similar(features, &comparables, &self.policy)
    }

    pub fn market_average(&self, location: &str, room_type: RoomType) -> Decimal {
        market_average(&self.market.comparables(location, room_type), &self.policy)
    }
}

impl Default for DeterministicValuationEngine<ReferenceDataset> {
    fn default() -> Self {
        Self::with_market(ReferenceDataset::builtin())
    }
}

impl<M: MarketDataSource> ValuationRuntime for DeterministicValuationEngine<M> {
    fn predict_price(&self, features: &RoomFeatures) -> Result<PricePrediction, ValidationError> {
        let estimate = self.base_estimate(features)?;
        let predicted_price = estimate.price;
        if predicted_price <= 0 {
            return Err(ValidationError::NonPositivePrice(predicted_price));
        }

        let comparables = self.market.comparables(&features.location, features.room_type);
        let similar_listings = count_similar(features, &comparables, &self.policy);
        if comparables.is_empty() {
            warn!(
                event_name = "valuation.market.default_average",
                location = %features.location,
                room_type = %features.room_type,
                default_average = %self.policy.default_average,
                "no comparables for bucket, using default market average"
            );
        }
        let average = market_average(&comparables, &self.policy);

        let prediction = PricePrediction {
            predicted_price,
            confidence: confidence_for(similar_listings, &self.policy),
            price_range: price_range(predicted_price, &self.bands),
            market_comparison: compare_to_market(
                Decimal::from(predicted_price),
                average,
                &self.policy,
            ),
            insights: generate_insights(features, predicted_price, average),
            similar_listings,
        };

        debug!(
            event_name = "valuation.predict.completed",
            location = %features.location,
            room_type = %features.room_type,
            predicted_price = prediction.predicted_price,
            market_average = %average,
            market_comparison = %prediction.market_comparison,
            confidence = prediction.confidence,
            similar_listings = prediction.similar_listings,
            "room valuation completed"
        );

        Ok(prediction)
    }

    fn suggested_price(
        &self,
        features: &RoomFeatures,
    ) -> Result<SuggestedPriceTiers, ValidationError> {
        let prediction = self.predict_price(features)?;
        Ok(suggest_tiers(&prediction, &self.bands))
    }
}
