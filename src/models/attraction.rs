use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A point of interest returned by the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Always within `0.0..=5.0`.
    pub rating: f64,
    #[serde(default)]
    pub visit_duration: String,
    #[serde(default)]
    pub best_time: String,
    pub location: Coordinates,
    #[serde(default)]
    pub image: String,
}

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

pub fn clamp_rating(rating: f64) -> f64 {
    rating.clamp(MIN_RATING, MAX_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_round_trip_shape() {
        let attraction = Attraction {
            id: "sabarmati-ashram".to_string(),
            name: "Sabarmati Ashram".to_string(),
            description: "Gandhi's former residence.".to_string(),
            category: "Historical Site".to_string(),
            rating: 4.7,
            visit_duration: "1-2 hours".to_string(),
            best_time: "Morning".to_string(),
            location: Coordinates {
                latitude: 23.0607,
                longitude: 72.5806,
            },
            image: String::new(),
        };

        let value = serde_json::to_value(&attraction).unwrap();
        assert_eq!(value["visitDuration"], "1-2 hours");
        assert_eq!(value["bestTime"], "Morning");
        assert_eq!(value["location"]["latitude"], json!(23.0607));
    }

    #[test]
    fn test_clamp_rating() {
        assert_eq!(clamp_rating(7.0), 5.0);
        assert_eq!(clamp_rating(-1.0), 0.0);
        assert_eq!(clamp_rating(4.2), 4.2);
    }
}
