use rust_decimal::Decimal;

use crate::domain::prediction::{Insight, InsightKind};
use crate::domain::room::{RoomFeatures, RoomType};
use crate::valuation::calculator::round_half_up;

const NEAR_UNIVERSITY_KM: i64 = 2;
const FAR_FROM_UNIVERSITY_KM: i64 = 5;
const SPACIOUS_SQM: i64 = 25;
const COMPACT_SQM: i64 = 15;
const FULLY_EQUIPPED_AMENITIES: usize = 5;
const LIMITED_AMENITIES: usize = 2;

/// Each check fires independently; output order is market, distance, size,
/// amenities, room type.
pub fn generate_insights(features: &RoomFeatures, predicted: i64, average: Decimal) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(5);

    insights.push(market_insight(Decimal::from(predicted), average));

    let distance = features.distance_to_university;
    if distance < Decimal::from(NEAR_UNIVERSITY_KM) {
        insights.push(Insight::new(
            InsightKind::NearUniversity,
            "Excellent location, walking distance to university",
        ));
    } else if distance > Decimal::from(FAR_FROM_UNIVERSITY_KM) {
        insights.push(Insight::new(
            InsightKind::FarFromUniversity,
            format!("Consider transportation cost, {}km from campus", distance.normalize()),
        ));
    }

    if features.size > Decimal::from(SPACIOUS_SQM) {
        insights.push(Insight::new(InsightKind::Spacious, "Spacious room, larger than average"));
    } else if features.size < Decimal::from(COMPACT_SQM) {
        insights.push(Insight::new(InsightKind::Compact, "Compact room, efficient use of space"));
    }

    let amenities = features.amenity_count();
    if amenities >= FULLY_EQUIPPED_AMENITIES {
        insights.push(Insight::new(
            InsightKind::FullyEquipped,
            format!("Fully equipped with {amenities} amenities"),
        ));
    } else if amenities <= LIMITED_AMENITIES {
        insights.push(Insight::new(
            InsightKind::LimitedAmenities,
            "Limited amenities, adding more could justify a higher price",
        ));
    }

    match features.room_type {
        RoomType::Shared => {
            insights.push(Insight::new(InsightKind::SharedRoom, "Budget-friendly shared option"))
        }
        RoomType::Studio => insights.push(Insight::new(
            InsightKind::Studio,
            "Private studio offering full independence",
        )),
        RoomType::Private => {}
    }

    insights
}

fn market_insight(predicted: Decimal, average: Decimal) -> Insight {
    let percent = (predicted - average)
        .checked_div(average)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| round_half_up(percent).normalize())
        .unwrap_or(Decimal::ZERO);

    if predicted > average {
        Insight::new(
            InsightKind::AboveMarket,
            format!("Priced ≈{percent}% above market average for similar rooms"),
        )
    } else if predicted < average {
        Insight::new(
            InsightKind::BelowMarket,
            format!("Great deal: ≈{}% below market average", percent.abs()),
        )
    } else {
        Insight::new(InsightKind::FairMarket, "Fair market price, in line with similar rooms")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::generate_insights;
    use crate::domain::prediction::InsightKind;
    use crate::domain::room::{RoomFeatures, RoomType};

    fn mid_band_room() -> RoomFeatures {
        RoomFeatures {
            location: "uptown".to_owned(),
            size: Decimal::from(20),
            room_type: RoomType::Private,
            furnished: true,
            has_wifi: true,
            has_parking: false,
            has_kitchen: true,
            has_laundry: false,
            has_balcony: false,
            pets_allowed: false,
            distance_to_university: Decimal::from(3),
            floor: 2,
        }
    }

    fn kinds(features: &RoomFeatures, predicted: i64, average: i64) -> Vec<InsightKind> {
        generate_insights(features, predicted, Decimal::from(average))
            .into_iter()
            .map(|insight| insight.kind)
            .collect()
    }

    #[test]
    fn only_market_insight_fires_inside_every_neutral_band() {
        assert_eq!(kinds(&mid_band_room(), 500, 500), [InsightKind::FairMarket]);
    }

    #[test]
    fn market_percentage_is_rounded() {
        let insights = generate_insights(&mid_band_room(), 620, Decimal::from(450));
        assert_eq!(insights[0].kind, InsightKind::AboveMarket);
        assert!(insights[0].message.contains("≈38% above market average"));
    }

    #[test]
    fn below_market_reports_absolute_percentage() {
        let insights = generate_insights(&mid_band_room(), 300, Decimal::from(400));
        assert_eq!(insights[0].kind, InsightKind::BelowMarket);
        assert_eq!(insights[0].message, "Great deal: ≈25% below market average");
    }

    #[test]
    fn all_five_insights_keep_fixed_order() {
        let features = RoomFeatures {
            size: Decimal::from(30),
            room_type: RoomType::Studio,
            has_parking: true,
            has_laundry: true,
            distance_to_university: Decimal::ONE,
            ..mid_band_room()
        };

        assert_eq!(
            kinds(&features, 900, 500),
            [
                InsightKind::AboveMarket,
                InsightKind::NearUniversity,
                InsightKind::Spacious,
                InsightKind::FullyEquipped,
                InsightKind::Studio,
            ]
        );
    }

    #[test]
    fn distant_compact_shared_room_with_few_amenities() {
        let features = RoomFeatures {
            size: Decimal::from(12),
            room_type: RoomType::Shared,
            furnished: false,
            has_kitchen: false,
            distance_to_university: Decimal::new(65, 1),
            ..mid_band_room()
        };
        let insights = generate_insights(&features, 300, Decimal::from(300));

        let kinds: Vec<InsightKind> = insights.iter().map(|insight| insight.kind).collect();
        assert_eq!(
            kinds,
            [
                InsightKind::FairMarket,
                InsightKind::FarFromUniversity,
                InsightKind::Compact,
                InsightKind::LimitedAmenities,
                InsightKind::SharedRoom,
            ]
        );
        assert_eq!(insights[1].message, "Consider transportation cost, 6.5km from campus");
    }

    #[test]
    fn band_edges_do_not_fire() {
        let features = RoomFeatures {
            size: Decimal::from(25),
            distance_to_university: Decimal::from(2),
            ..mid_band_room()
        };
        assert_eq!(kinds(&features, 500, 500), [InsightKind::FairMarket]);

        let features = RoomFeatures {
            size: Decimal::from(15),
            distance_to_university: Decimal::from(5),
            has_parking: true,
            ..mid_band_room()
        };
        assert_eq!(kinds(&features, 500, 500), [InsightKind::FairMarket]);
    }

    #[test]
    fn pet_allowance_does_not_count_as_an_amenity() {
        let features = RoomFeatures {
            has_kitchen: false,
            pets_allowed: true,
            ..mid_band_room()
        };
        assert!(kinds(&features, 500, 500).contains(&InsightKind::LimitedAmenities));
    }

    #[test]
    fn zero_average_does_not_panic() {
        let insights = generate_insights(&mid_band_room(), 500, Decimal::ZERO);
        assert_eq!(insights[0].kind, InsightKind::AboveMarket);
    }
}
