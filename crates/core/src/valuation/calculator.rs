use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::room::RoomFeatures;
use crate::errors::ValidationError;
use crate::valuation::weights::ValuationWeights;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationStep {
    pub stage: String,
    pub detail: String,
    /// Running value after this stage.
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEstimate {
    pub price: i64,
    pub steps: Vec<ValuationStep>,
}

pub fn compute_base_price(
    features: &RoomFeatures,
    weights: &ValuationWeights,
) -> Result<i64, ValidationError> {
    compute_base_price_with_trace(features, weights).map(|estimate| estimate.price)
}

/// Order matters: multipliers only scale the size-adjusted base, every later
/// stage is a flat adjustment. Fails instead of overflowing when a stage
/// leaves the `Decimal` range or the result does not fit an `i64`.
pub fn compute_base_price_with_trace(
    features: &RoomFeatures,
    weights: &ValuationWeights,
) -> Result<BaseEstimate, ValidationError> {
    let mut steps = Vec::with_capacity(8);
    let mut value = weights.base_price;
    steps.push(step("base", "fixed starting value".to_owned(), value));

    let size = features.size.checked_mul(weights.price_per_sqm);
    value = within_range("size", size.and_then(|size| value.checked_add(size)))?;
    steps.push(step("size", format!("+ {} sqm * {}", features.size, weights.price_per_sqm), value));

    let room_multiplier = weights.room_types.for_room_type(features.room_type);
    value = within_range("room_type", value.checked_mul(room_multiplier))?;
    steps.push(step("room_type", format!("* {room_multiplier} ({})", features.room_type), value));

    let location_multiplier = weights.locations.for_area(features.area());
    value = within_range("location", value.checked_mul(location_multiplier))?;
    steps.push(step(
        "location",
        format!("* {location_multiplier} ({})", features.location.trim().to_ascii_lowercase()),
        value,
    ));

    let amenities = within_range("amenities", amenity_adjustment(features, weights))?;
    value = within_range("amenities", value.checked_add(amenities))?;
    steps.push(step("amenities", format!("{amenities:+}"), value));

    let distance = features.distance_to_university.checked_mul(weights.distance_penalty_per_km);
    value = within_range("distance", distance.and_then(|distance| value.checked_sub(distance)))?;
    steps.push(step(
        "distance",
        format!("- {} km * {}", features.distance_to_university, weights.distance_penalty_per_km),
        value,
    ));

    if features.floor > weights.floor_bonus_threshold {
        let levels = features.floor - weights.floor_bonus_threshold;
        let bonus = Decimal::from(levels).checked_mul(weights.floor_bonus_per_level);
        value = within_range("floor", bonus.and_then(|bonus| value.checked_add(bonus)))?;
        steps.push(step(
            "floor",
            format!("+ {levels} levels * {}", weights.floor_bonus_per_level),
            value,
        ));
    }

    let rounded = within_range("rounding", round_to_ten(value))?;
    steps.push(step("rounding", "nearest multiple of 10".to_owned(), rounded));
    let price = within_range("rounding", rounded.to_i64())?;

    Ok(BaseEstimate { price, steps })
}

fn amenity_adjustment(features: &RoomFeatures, weights: &ValuationWeights) -> Option<Decimal> {
    let table = &weights.amenities;
    [
        (features.furnished, table.furnished),
        (features.has_wifi, table.wifi),
        (features.has_parking, table.parking),
        (features.has_kitchen, table.kitchen),
        (features.has_laundry, table.laundry),
        (features.has_balcony, table.balcony),
        (features.pets_allowed, table.pets_allowed),
    ]
    .into_iter()
    .filter(|(present, _)| *present)
    .try_fold(Decimal::ZERO, |total, (_, amount)| total.checked_add(amount))
}

fn within_range<T>(stage: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::ValueOutOfRange(stage))
}

fn step(stage: &str, detail: String, amount: Decimal) -> ValuationStep {
    ValuationStep { stage: stage.to_owned(), detail, amount }
}

/// Rounds to the nearest integer, halves going towards positive infinity.
pub(crate) fn round_half_up(value: Decimal) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(0, strategy)
}

pub(crate) fn round_to_ten(value: Decimal) -> Option<Decimal> {
    let ten = Decimal::TEN;
    round_half_up(value / ten).checked_mul(ten)
}

/// Saturates outside the `i64` range instead of failing.
pub(crate) fn whole_units(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or(if value.is_sign_negative() { i64::MIN } else { i64::MAX })
}
