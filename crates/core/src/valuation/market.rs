use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::listing::ReferenceListing;
use crate::domain::prediction::MarketComparison;
use crate::domain::room::{RoomFeatures, RoomType};
use crate::errors::DatasetError;

/// Source of comparable listings.
///
/// Implementations return every record in the `(location, room_type)` bucket:
/// location compared case-insensitively, room type exactly. Lookups are total,
/// an unknown bucket is simply empty.
pub trait MarketDataSource: Send + Sync {
    fn comparables(&self, location: &str, room_type: RoomType) -> Vec<ReferenceListing>;
}

impl<T: MarketDataSource + ?Sized> MarketDataSource for Arc<T> {
    fn comparables(&self, location: &str, room_type: RoomType) -> Vec<ReferenceListing> {
        (**self).comparables(location, room_type)
    }
}

impl<T: MarketDataSource + ?Sized> MarketDataSource for &T {
    fn comparables(&self, location: &str, room_type: RoomType) -> Vec<ReferenceListing> {
        (**self).comparables(location, room_type)
    }
}

/// In-memory catalogue of past listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceDataset {
    listings: Vec<ReferenceListing>,
}

impl ReferenceDataset {
    pub fn new(listings: Vec<ReferenceListing>) -> Result<Self, DatasetError> {
        for (index, listing) in listings.iter().enumerate() {
            if listing.size <= Decimal::ZERO {
                return Err(DatasetError::NonPositiveSize {
                    index,
                    location: listing.location.clone(),
                    size: listing.size,
                });
            }
            if listing.price <= Decimal::ZERO {
                return Err(DatasetError::NonPositivePrice {
                    index,
                    location: listing.location.clone(),
                    price: listing.price,
                });
            }
        }

        Ok(Self { listings })
    }

    /// The embedded catalogue shipped with the engine.
    pub fn builtin() -> Self {
        let listing = |location: &str, size: i64, room_type: RoomType, price: i64| {
            ReferenceListing::new(location, Decimal::from(size), room_type, Decimal::from(price))
        };

        Self {
            listings: vec![
                listing("downtown", 20, RoomType::Private, 650),
                listing("downtown", 15, RoomType::Shared, 400),
                listing("university", 18, RoomType::Private, 450),
                listing("university", 12, RoomType::Shared, 300),
                listing("suburb", 25, RoomType::Studio, 550),
                listing("uptown", 22, RoomType::Private, 600),
                listing("campus", 16, RoomType::Shared, 350),
                listing("campus", 30, RoomType::Studio, 700),
            ],
        }
    }

    pub fn listings(&self) -> &[ReferenceListing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl MarketDataSource for ReferenceDataset {
    fn comparables(&self, location: &str, room_type: RoomType) -> Vec<ReferenceListing> {
        self.listings.iter().filter(|listing| listing.is_in(location, room_type)).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPolicy {
    /// Used when no comparable exists (default: 400)
    pub default_average: Decimal,
    /// Comparables closer than this in square meters count as similar (default: 10)
    pub similar_size_tolerance: Decimal,
    /// Below `average * below_factor` is a bargain (default: 0.9)
    pub below_factor: Decimal,
    /// Above `average * above_factor` is expensive (default: 1.1)
    pub above_factor: Decimal,
    pub confidence_floor: u8,
    pub confidence_step: u8,
    pub confidence_cap: u8,
}

impl Default for MarketPolicy {
    fn default() -> Self {
        Self {
            default_average: Decimal::from(400),
            similar_size_tolerance: Decimal::TEN,
            below_factor: Decimal::new(9, 1),
            above_factor: Decimal::new(11, 1),
            confidence_floor: 60,
            confidence_step: 5,
            confidence_cap: 95,
        }
    }
}

/// Comparables in the same bucket whose size is within the tolerance.
pub fn count_similar(
    features: &RoomFeatures,
    comparables: &[ReferenceListing],
    policy: &MarketPolicy,
) -> usize {
    comparables
        .iter()
        .filter(|listing| listing.is_in(&features.location, features.room_type))
        .filter(|listing| (listing.size - features.size).abs() < policy.similar_size_tolerance)
        .count()
}

/// Mean price of the comparables, or `None` when there are none.
pub fn mean_price(comparables: &[ReferenceListing]) -> Option<Decimal> {
    if comparables.is_empty() {
        return None;
    }
    let count = Decimal::from(comparables.len());
    let sum = |mut prices: &mut dyn Iterator<Item = Option<Decimal>>| {
        <&mut dyn Iterator<Item = Option<Decimal>> as Iterator>::try_fold(&mut prices, Decimal::ZERO, |total, price| total.checked_add(price?))
    };
    // Very large prices overflow the total; averaging the shares stays in range.
    sum(&mut comparables.iter().map(|listing| Some(listing.price)))
        .and_then(|total| total.checked_div(count))
        .or_else(|| sum(&mut comparables.iter().map(|listing| listing.price.checked_div(count))))
}

pub fn market_average(comparables: &[ReferenceListing], policy: &MarketPolicy) -> Decimal {
    mean_price(comparables).unwrap_or(policy.default_average)
}

/// Both band edges are fair.
pub fn compare_to_market(
    predicted: Decimal,
    average: Decimal,
    policy: &MarketPolicy,
) -> MarketComparison {
    let beyond = |factor: Decimal| average.checked_mul(factor);
    if matches!(beyond(policy.below_factor), Some(edge) if predicted < edge) {
        MarketComparison::Below
    } else if matches!(beyond(policy.above_factor), Some(edge) if predicted > edge) {
        MarketComparison::Above
    } else {
        MarketComparison::Fair
    }
}

pub fn confidence_for(similar_listings: usize, policy: &MarketPolicy) -> u8 {
    let boost = u64::try_from(similar_listings)
        .unwrap_or(u64::MAX)
        .saturating_mul(u64::from(policy.confidence_step));
    let raw = u64::from(policy.confidence_floor).saturating_add(boost);
    let capped = raw.min(u64::from(policy.confidence_cap));
    u8::try_from(capped).unwrap_or(policy.confidence_cap)
}
