use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::HostelResponse;

// Search filters, applied as in-memory predicate composition over the fetched
// listing set. No pushdown, no pagination; an empty filter set returns the
// input unchanged in order.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct HostelFilters {
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<Decimal>,
}

pub fn apply_filters(hostels: Vec<HostelResponse>, filters: &HostelFilters) -> Vec<HostelResponse> {
    hostels
        .into_iter()
        .filter(|hostel| matches_filters(hostel, filters))
        .collect()
}

fn matches_filters(hostel: &HostelResponse, filters: &HostelFilters) -> bool {
    if let Some(location) = &filters.location {
        let needle = location.to_lowercase();
        let in_name = hostel.name.to_lowercase().contains(&needle);
        let in_location = hostel.location.to_lowercase().contains(&needle);
        if !in_name && !in_location {
            return false;
        }
    }

    if let Some(min_price) = filters.min_price {
        if hostel.price_per_night < min_price {
            return false;
        }
    }

    if let Some(max_price) = filters.max_price {
        if hostel.price_per_night > max_price {
            return false;
        }
    }

    if let Some(min_rating) = filters.min_rating {
        if hostel.rating < min_rating {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunkmate_common::{GenderPolicy, MealPolicy};
    use chrono::Utc;
    use uuid::Uuid;

    fn hostel(name: &str, location: &str, price: i64, rating: &str) -> HostelResponse {
        HostelResponse {
            hostel_id: Uuid::new_v4(),
            name: name.to_string(),
            location: location.to_string(),
            price_per_night: Decimal::from(price),
            rating: rating.parse().unwrap(),
            review_count: 10,
            capacity: 20,
            amenities: vec!["wifi".to_string()],
            images: vec![],
            owner_id: Uuid::new_v4(),
            owner_name: "Owner".to_string(),
            wifi_speed_mbps: Some(100),
            meal_policy: MealPolicy::NoMeals,
            gender_policy: GenderPolicy::Mixed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<HostelResponse> {
        vec![
            hostel("Brooklyn Bunks", "NY, Brooklyn", 45, "4.5"),
            hostel("Sunset Dorms", "NY, Queens", 15, "4.2"),
            hostel("Alpine Lodge", "Innsbruck", 80, "4.8"),
            hostel("NY Central Hostel", "Manhattan", 95, "3.9"),
            hostel("Harbor Bunk", "Lisbon", 25, "4.0"),
        ]
    }

    #[test]
    fn no_filters_returns_full_list_in_order() {
        let hostels = sample();
        let names: Vec<String> = hostels.iter().map(|h| h.name.clone()).collect();

        let result = apply_filters(hostels, &HostelFilters::default());
        let result_names: Vec<String> = result.iter().map(|h| h.name.clone()).collect();

        assert_eq!(result_names, names);
    }

    #[test]
    fn filters_compose_as_predicate_intersection() {
        let filters = HostelFilters {
            location: Some("NY".to_string()),
            min_price: Some(Decimal::from(20)),
            max_price: Some(Decimal::from(100)),
            min_rating: Some(Decimal::from(4)),
        };

        let result = apply_filters(sample(), &filters);
        let names: Vec<&str> = result.iter().map(|h| h.name.as_str()).collect();

        // "Sunset Dorms" fails min_price, "NY Central Hostel" fails min_rating,
        // "Alpine Lodge" and "Harbor Bunk" fail the location match.
        assert_eq!(names, vec!["Brooklyn Bunks"]);
    }

    #[test]
    fn location_matches_name_or_location_case_insensitively() {
        let filters = HostelFilters {
            location: Some("ny".to_string()),
            ..Default::default()
        };

        let result = apply_filters(sample(), &filters);
        let names: Vec<&str> = result.iter().map(|h| h.name.as_str()).collect();

        // Matches "NY, ..." locations and the "NY Central Hostel" name.
        assert_eq!(names, vec!["Brooklyn Bunks", "Sunset Dorms", "NY Central Hostel"]);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filters = HostelFilters {
            min_price: Some(Decimal::from(25)),
            max_price: Some(Decimal::from(80)),
            ..Default::default()
        };

        let result = apply_filters(sample(), &filters);
        let names: Vec<&str> = result.iter().map(|h| h.name.as_str()).collect();

        assert_eq!(names, vec!["Brooklyn Bunks", "Alpine Lodge", "Harbor Bunk"]);
    }
}
