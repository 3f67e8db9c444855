use crate::core::distance::{haversine_distance, is_within_bounding_box};
use crate::models::{CatalogEntry, CatalogQuery, BoundingBox};

/// Split comma-delimited free text into trimmed, non-empty tags
///
/// Order and duplicates are preserved. An empty input yields no tags.
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Check if an entry carries every requested tag (case-insensitive)
#[inline]
pub fn matches_tags(entry: &CatalogEntry, tags: &[String]) -> bool {
    tags.iter().all(|wanted| {
        entry
            .tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(wanted))
    })
}

/// Check if an entry lies inside the search circle
///
/// Stage 1 is the cheap bounding box test, stage 2 the exact haversine distance.
/// Returns the distance in meters on a hit.
#[inline]
pub fn within_radius(
    entry: &CatalogEntry,
    query: &CatalogQuery,
    bbox: &BoundingBox,
) -> Option<f64> {
    if !is_within_bounding_box(entry.shop, bbox) {
        return None;
    }

    let distance = haversine_distance(query.origin, entry.shop);
    (distance <= query.radius_meters).then_some(distance)
}
