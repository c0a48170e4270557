use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Private,
    Shared,
    Studio,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Shared => "shared",
            Self::Studio => "studio",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "shared" => Ok(Self::Shared),
            "studio" => Ok(Self::Studio),
            _ => Err(ValidationError::UnknownRoomType(value.to_owned())),
        }
    }
}

/// Named areas with a known price multiplier. Every other label is `Other`
/// and prices at the neutral multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Downtown,
    University,
    Suburb,
    Uptown,
    Campus,
    Other,
}

impl Area {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "downtown" => Self::Downtown,
            "university" => Self::University,
            "suburb" => Self::Suburb,
            "uptown" => Self::Uptown,
            "campus" => Self::Campus,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFeatures {
    pub location: String,
    /// Square meters.
    pub size: Decimal,
    pub room_type: RoomType,
    pub furnished: bool,
    pub has_wifi: bool,
    pub has_parking: bool,
    pub has_kitchen: bool,
    pub has_laundry: bool,
    pub has_balcony: bool,
    pub pets_allowed: bool,
    /// Kilometers.
    pub distance_to_university: Decimal,
    pub floor: i32,
}

impl RoomFeatures {
    pub fn area(&self) -> Area {
        Area::from_label(&self.location)
    }

    /// Amenities that count towards the "equipped" insight. Pet allowance is
    /// a policy rather than an amenity and is left out.
    pub fn amenity_count(&self) -> usize {
        [
            self.furnished,
            self.has_wifi,
            self.has_parking,
            self.has_kitchen,
            self.has_laundry,
            self.has_balcony,
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.size <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveSize(self.size));
        }
        if self.distance_to_university < Decimal::ZERO {
            return Err(ValidationError::NegativeDistance(self.distance_to_university));
        }
        if self.floor < 0 {
            return Err(ValidationError::NegativeFloor(self.floor));
        }
        Ok(())
    }
}

/// Untyped shape of a room as it arrives from a listing form or a JSON file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFeaturesInput {
    pub location: String,
    pub size: Decimal,
    pub room_type: String,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub has_parking: bool,
    #[serde(default)]
    pub has_kitchen: bool,
    #[serde(default)]
    pub has_laundry: bool,
    #[serde(default)]
    pub has_balcony: bool,
    #[serde(default)]
    pub pets_allowed: bool,
    #[serde(default)]
    pub distance_to_university: Decimal,
    #[serde(default)]
    pub floor: i32,
}

impl TryFrom<RoomFeaturesInput> for RoomFeatures {
    type Error = ValidationError;

    fn try_from(input: RoomFeaturesInput) -> Result<Self, Self::Error> {
        let features = RoomFeatures {
            room_type: input.room_type.parse()?,
            location: input.location,
            size: input.size,
            furnished: input.furnished,
            has_wifi: input.has_wifi,
            has_parking: input.has_parking,
            has_kitchen: input.has_kitchen,
            has_laundry: input.has_laundry,
            has_balcony: input.has_balcony,
            pets_allowed: input.pets_allowed,
            distance_to_university: input.distance_to_university,
            floor: input.floor,
        };
        features.validate()?;
        Ok(features)
    }
}
