//! Weight tables for the room valuation model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::room::{Area, RoomType};

/// Multipliers applied after the size-adjusted base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeMultipliers {
    /// Default: 1.2
    pub private: Decimal,
    /// Default: 0.7
    pub shared: Decimal,
    /// Default: 1.4
    pub studio: Decimal,
}

impl RoomTypeMultipliers {
    pub fn for_room_type(&self, room_type: RoomType) -> Decimal {
        match room_type {
            RoomType::Private => self.private,
            RoomType::Shared => self.shared,
            RoomType::Studio => self.studio,
        }
    }
}

impl Default for RoomTypeMultipliers {
    fn default() -> Self {
        Self { private: Decimal::new(12, 1), shared: Decimal::new(7, 1), studio: Decimal::new(14, 1) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMultipliers {
    pub downtown: Decimal,
    pub university: Decimal,
    pub suburb: Decimal,
    pub uptown: Decimal,
    pub campus: Decimal,
    /// Applied to any area outside the named set.
    pub fallback: Decimal,
}

impl LocationMultipliers {
    pub fn for_area(&self, area: Area) -> Decimal {
        match area {
            Area::Downtown => self.downtown,
            Area::University => self.university,
            Area::Suburb => self.suburb,
            Area::Uptown => self.uptown,
            Area::Campus => self.campus,
            Area::Other => self.fallback,
        }
    }
}

impl Default for LocationMultipliers {
    fn default() -> Self {
        Self {
            downtown: Decimal::new(13, 1),
            university: Decimal::new(11, 1),
            suburb: Decimal::new(9, 1),
            uptown: Decimal::new(12, 1),
            campus: Decimal::new(115, 2),
            fallback: Decimal::ONE,
        }
    }
}

/// Flat adjustments added per amenity. Pet allowance is a deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityAdjustments {
    pub furnished: Decimal,
    pub wifi: Decimal,
    pub parking: Decimal,
    pub kitchen: Decimal,
    pub laundry: Decimal,
    pub balcony: Decimal,
    pub pets_allowed: Decimal,
}

impl Default for AmenityAdjustments {
    fn default() -> Self {
        Self {
            furnished: Decimal::from(100),
            wifi: Decimal::from(30),
            parking: Decimal::from(50),
            kitchen: Decimal::from(40),
            laundry: Decimal::from(35),
            balcony: Decimal::from(45),
            pets_allowed: Decimal::from(-20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationWeights {
    /// Starting value before any feature is applied (default: 200)
    pub base_price: Decimal,
    /// Added per square meter (default: 8)
    pub price_per_sqm: Decimal,
    pub room_types: RoomTypeMultipliers,
    pub locations: LocationMultipliers,
    pub amenities: AmenityAdjustments,
    /// Subtracted per kilometer from the university (default: 15)
    pub distance_penalty_per_km: Decimal,
    /// Floors above this level earn the floor bonus (default: 3)
    pub floor_bonus_threshold: i32,
    /// Added per floor above the threshold (default: 10)
    pub floor_bonus_per_level: Decimal,
}

impl Default for ValuationWeights {
    fn default() -> Self {
        Self {
            base_price: Decimal::from(200),
            price_per_sqm: Decimal::from(8),
            room_types: RoomTypeMultipliers::default(),
            locations: LocationMultipliers::default(),
            amenities: AmenityAdjustments::default(),
            distance_penalty_per_km: Decimal::from(15),
            floor_bonus_threshold: 3,
            floor_bonus_per_level: Decimal::from(10),
        }
    }
}
