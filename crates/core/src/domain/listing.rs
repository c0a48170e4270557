use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::room::RoomType;

/// A past listing used as a market comparable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceListing {
    pub location: String,
    pub size: Decimal,
    pub room_type: RoomType,
    pub price: Decimal,
}

impl ReferenceListing {
    pub fn new(
        location: impl Into<String>,
        size: Decimal,
        room_type: RoomType,
        price: Decimal,
    ) -> Self {
        Self { location: location.into(), size, room_type, price }
    }

    pub fn is_in(&self, location: &str, room_type: RoomType) -> bool {
        self.room_type == room_type && self.location.trim().eq_ignore_ascii_case(location.trim())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::ReferenceListing;
    use crate::domain::room::RoomType;

    #[test]
    fn bucket_match_ignores_case_but_not_room_type() {
        let listing = ReferenceListing::new(
            "Downtown",
            Decimal::from(20),
            RoomType::Private,
            Decimal::from(650),
        );

        assert!(listing.is_in("downtown", RoomType::Private));
        assert!(listing.is_in("DOWNTOWN ", RoomType::Private));
        assert!(!listing.is_in("downtown", RoomType::Shared));
        assert!(!listing.is_in("down town", RoomType::Private));
    }
}
