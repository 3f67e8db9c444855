use geo::{HaversineDistance, Point};
use crate::models::{BoundingBox, LatLng};

/// Meters per degree of latitude (roughly constant)
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Great-circle distance between two coordinates in meters
#[inline]
pub fn haversine_distance(from: LatLng, to: LatLng) -> f64 {
    let a = Point::new(from.lng, from.lat);
    let b = Point::new(to.lng, to.lat);
    a.haversine_distance(&b)
}

/// Calculate a bounding box around a center point
///
/// This is much faster than Haversine for pre-filtering.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
///
/// # Arguments
/// * `center` - Center coordinate in degrees
/// * `radius_meters` - Radius in meters
pub fn calculate_bounding_box(center: LatLng, radius_meters: f64) -> BoundingBox {
    let lat_delta = radius_meters / METERS_PER_DEGREE;

    // Near the poles cos(lat) tends to 0, so the box spans every longitude
    let cos_lat = center.lat.to_radians().cos().abs();
    let lng_delta = if cos_lat < 1e-9 {
        180.0
    } else {
        radius_meters / (METERS_PER_DEGREE * cos_lat)
    };

    BoundingBox {
        min_lat: center.lat - lat_delta,
        max_lat: center.lat + lat_delta,
        min_lng: center.lng - lng_delta,
        max_lng: center.lng + lng_delta,
    }
}

/// Check if a point is within a bounding box
///
/// Longitudes are compared as offsets from the box center, so a box that
/// crosses the antimeridian still contains points on the other side.
#[inline]
pub fn is_within_bounding_box(point: LatLng, bbox: &BoundingBox) -> bool {
    if point.lat < bbox.min_lat || point.lat > bbox.max_lat {
        return false;
    }

    let half_width = (bbox.max_lng - bbox.min_lng) / 2.0;
    if half_width >= 180.0 {
        return true;
    }

    let center_lng = (bbox.min_lng + bbox.max_lng) / 2.0;
    let offset = (point.lng - center_lng + 180.0).rem_euclid(360.0) - 180.0;
    offset.abs() <= half_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Stockholm central station to Gamla stan, roughly 900 m
        let central = LatLng::new(59.3303, 18.0586);
        let gamla_stan = LatLng::new(59.3251, 18.0711);

        let distance = haversine_distance(central, gamla_stan);
        assert!((distance - 900.0).abs() < 150.0, "Distance should be ~900m, got {}", distance);
    }

    #[test]
    fn test_bounding_box() {
        let center = LatLng::new(59.3325, 18.0649);
        let bbox = calculate_bounding_box(center, 10_000.0);

        assert!(bbox.min_lat < center.lat);
        assert!(bbox.max_lat > center.lat);
        assert!(bbox.min_lng < center.lng);
        assert!(bbox.max_lng > center.lng);

        // 20km / 111km per degree = ~0.18 degrees
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = calculate_bounding_box(LatLng::new(59.3325, 18.0649), 1_000.0);

        assert!(is_within_bounding_box(LatLng::new(59.3325, 18.0649), &bbox));
        assert!(is_within_bounding_box(LatLng::new(59.335, 18.07), &bbox));
        assert!(!is_within_bounding_box(LatLng::new(57.7, 11.97), &bbox));
    }

    #[test]
    fn test_bbox_across_antimeridian() {
        let bbox = calculate_bounding_box(LatLng::new(10.0, 179.999), 1_000.0);

        assert!(bbox.max_lng > 180.0);
        assert!(is_within_bounding_box(LatLng::new(10.0, -179.999), &bbox));
        assert!(is_within_bounding_box(LatLng::new(10.0, 179.995), &bbox));
        assert!(!is_within_bounding_box(LatLng::new(10.0, -179.9), &bbox));
        assert!(!is_within_bounding_box(LatLng::new(10.0, 0.0), &bbox));
    }

    #[test]
    fn test_bbox_near_pole_spans_all_longitudes() {
        let bbox = calculate_bounding_box(LatLng::new(90.0, 0.0), 1_000.0);

        assert!(is_within_bounding_box(LatLng::new(89.995, 180.0), &bbox));
        assert!(is_within_bounding_box(LatLng::new(89.995, -90.0), &bbox));
    }
}
