//! Filtering and ordering of touristic place listings.

use escale_core::tourisme::LieuTouristique;
use serde::Deserialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaceSort {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Rating,
    Popularity,
}

/// Local refinements applied on top of what the upstream already filtered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceFilter {
    pub category: Option<String>,
    pub city: Option<String>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub amenity: Option<String>,
    #[serde(default)]
    pub free_only: bool,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: PlaceSort,
}

impl PlaceFilter {
    pub fn matches(&self, place: &LieuTouristique) -> bool {
        if let Some(category) = non_empty(&self.category) {
            if category != "all" && !place.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(city) = non_empty(&self.city) {
            if !place.city.eq_ignore_ascii_case(city) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if place.price > max {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if place.rating < min {
                return false;
            }
        }
        if self.free_only && place.price != 0.0 {
            return false;
        }
        if let Some(amenity) = non_empty(&self.amenity) {
            if !place.amenities.iter().any(|a| a.eq_ignore_ascii_case(amenity)) {
                return false;
            }
        }
        if let Some(term) = non_empty(&self.search) {
            let needle = term.to_lowercase();
            let hit = place.title.to_lowercase().contains(&needle)
                || place.description.to_lowercase().contains(&needle)
                || place.city.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }

    /// True when a criterion the upstream does not understand is set, so the upstream page
    /// totals no longer describe what is returned.
    pub fn narrows_locally(&self) -> bool {
        self.max_price.is_some()
            || self.min_rating.is_some()
            || self.free_only
            || non_empty(&self.amenity).is_some()
    }

    pub fn apply(&self, places: Vec<LieuTouristique>) -> Vec<LieuTouristique> {
        let mut kept: Vec<LieuTouristique> = places.into_iter().filter(|p| self.matches(p)).collect();
        sort_places(&mut kept, self.sort);
        kept
    }
}

pub fn sort_places(places: &mut [LieuTouristique], sort: PlaceSort) {
    let by_f64 = |a: f64, b: f64| a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    match sort {
        PlaceSort::Relevance => {}
        PlaceSort::PriceAsc => places.sort_by(|a, b| by_f64(a.price, b.price)),
        PlaceSort::PriceDesc => places.sort_by(|a, b| by_f64(b.price, a.price)),
        PlaceSort::Rating => places.sort_by(|a, b| {
            by_f64(b.rating, a.rating).then_with(|| b.review_count.cmp(&a.review_count))
        }),
        PlaceSort::Popularity => places.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: &str, city: &str, price: f64, rating: f64, reviews: u32, amenities: &[&str]) -> LieuTouristique {
        LieuTouristique {
            id: id.to_string(),
            title: format!("Lieu {}", id),
            description: String::new(),
            category: "musee".into(),
            city: city.to_string(),
            address: None,
            price,
            rating,
            review_count: reviews,
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            coordinates: None,
            opening_hours: None,
            images: vec![],
            capacity: None,
            provider_id: None,
        }
    }

    fn sample() -> Vec<LieuTouristique> {
        vec![
            place("a", "Lyon", 12.0, 4.5, 100, &["parking"]),
            place("b", "Paris", 0.0, 4.8, 50, &["wifi"]),
            place("c", "lyon", 25.0, 3.9, 300, &["parking", "wifi"]),
        ]
    }

    fn ids(places: &[LieuTouristique]) -> Vec<&str> {
        places.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_city_and_price_filters() {
        let filter = PlaceFilter { city: Some("Lyon".into()), max_price: Some(20.0), ..Default::default() };
        assert_eq!(ids(&filter.apply(sample())), vec!["a"]);
    }

    #[test]
    fn test_free_only_and_amenity() {
        let free = PlaceFilter { free_only: true, ..Default::default() };
        assert_eq!(ids(&free.apply(sample())), vec!["b"]);

        let wifi = PlaceFilter { amenity: Some("WIFI".into()), ..Default::default() };
        assert_eq!(ids(&wifi.apply(sample())), vec!["b", "c"]);
    }

    #[test]
    fn test_narrows_locally_only_for_gateway_criteria() {
        let upstream_only = PlaceFilter {
            city: Some("Lyon".into()),
            search: Some("musée".into()),
            sort: PlaceSort::PriceAsc,
            ..Default::default()
        };
        assert!(!upstream_only.narrows_locally());
        assert!(!PlaceFilter { amenity: Some("  ".into()), ..Default::default() }.narrows_locally());
        assert!(PlaceFilter { max_price: Some(25.0), ..Default::default() }.narrows_locally());
        assert!(PlaceFilter { free_only: true, ..Default::default() }.narrows_locally());
    }

    #[test]
    fn test_sorting() {
        let mut places = sample();
        sort_places(&mut places, PlaceSort::PriceAsc);
        assert_eq!(ids(&places), vec!["b", "a", "c"]);
        sort_places(&mut places, PlaceSort::Rating);
        assert_eq!(ids(&places), vec!["b", "a", "c"]);
        sort_places(&mut places, PlaceSort::Popularity);
        assert_eq!(ids(&places), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_search_matches_city() {
        let filter = PlaceFilter { search: Some("paris".into()), ..Default::default() };
        assert_eq!(ids(&filter.apply(sample())), vec!["b"]);
    }
}
