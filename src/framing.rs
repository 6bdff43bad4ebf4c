//! Camera framing hints for the globe renderer.

/// Lowest camera height used for framing (meters).
pub const MIN_FRAMING_HEIGHT: f64 = 100_000.0;

/// Highest camera height while following the impactor (meters).
pub const MAX_FOLLOW_HEIGHT: f64 = 800_000.0;

/// Camera height per kilometer of the largest damage ring (meters).
pub const OVERVIEW_HEIGHT_PER_KM: f64 = 1500.0;

/// Camera height while tracking the impactor along its path.
///
/// A third of the path length, kept between 100 km and 800 km.
pub fn follow_height(total_distance: f64) -> f64 {
    if total_distance.is_nan() {
        return MIN_FRAMING_HEIGHT;
    }
    (total_distance / 3.0).clamp(MIN_FRAMING_HEIGHT, MAX_FOLLOW_HEIGHT)
}

/// Camera height that fits every damage ring after impact.
pub fn overview_height(max_radius_km: f64) -> f64 {
    if max_radius_km.is_nan() {
        return MIN_FRAMING_HEIGHT;
    }
    (max_radius_km * OVERVIEW_HEIGHT_PER_KM).max(MIN_FRAMING_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_height_clamped() {
        assert_eq!(follow_height(0.0), MIN_FRAMING_HEIGHT);
        assert_eq!(follow_height(600_000.0), 200_000.0);
        assert_eq!(follow_height(9_000_000.0), MAX_FOLLOW_HEIGHT);
        assert_eq!(follow_height(f64::NAN), MIN_FRAMING_HEIGHT);
    }

    #[test]
    fn test_overview_height() {
        assert_eq!(overview_height(10.0), MIN_FRAMING_HEIGHT);
        assert_eq!(overview_height(200.0), 300_000.0);
        assert_eq!(overview_height(-1.0), MIN_FRAMING_HEIGHT);
    }
}
