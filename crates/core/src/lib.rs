pub mod config;
pub mod domain;
pub mod errors;
pub mod valuation;

pub use domain::listing::ReferenceListing;
pub use domain::prediction::{
    Insight, InsightKind, MarketComparison, PricePrediction, PriceRange, SuggestedPriceTiers,
};
pub use domain::room::{Area, RoomFeatures, RoomFeaturesInput, RoomType};
pub use errors::{ApplicationError, DatasetError, InterfaceError, ValidationError};
pub use valuation::{
    calculator::{compute_base_price, compute_base_price_with_trace, BaseEstimate, ValuationStep},
    market::{MarketDataSource, MarketPolicy, ReferenceDataset},
    tiers::PriceBands,
    weights::ValuationWeights,
    DeterministicValuationEngine, ValuationRuntime,
};
