// Unit tests for Product Map

use product_map::core::{
    catalog::Catalog,
    color::{color_for, hue_for},
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box},
    filters::split_tags,
};
use product_map::models::{CatalogQuery, LatLng};

fn scores() -> impl Iterator<Item = f64> {
    (0..=100).map(|i| i as f64 / 100.0)
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

#[test]
fn test_color_format_for_all_scores() {
    for score in scores() {
        let color = color_for(score);
        assert!(is_hex_color(&color), "{} gave malformed color {}", score, color);
    }
}

#[test]
fn test_color_is_deterministic() {
    for score in scores() {
        assert_eq!(color_for(score), color_for(score));
    }
}

#[test]
fn test_color_extremes_differ() {
    assert_ne!(color_for(0.0), color_for(1.0));
}

#[test]
fn test_hue_strictly_decreasing() {
    let hues: Vec<f64> = scores().map(hue_for).collect();

    for pair in hues.windows(2) {
        assert!(pair[0] > pair[1], "hue must decrease: {} then {}", pair[0], pair[1]);
    }
}

#[test]
fn test_popular_products_are_red() {
    let color = color_for(1.0);
    let red = u8::from_str_radix(&color[1..3], 16).unwrap();
    let green = u8::from_str_radix(&color[3..5], 16).unwrap();

    assert!(red > green);
}

#[test]
fn test_split_tags_examples() {
    assert_eq!(split_tags("a, b,,c"), vec!["a", "b", "c"]);
    assert!(split_tags("").is_empty());
    assert_eq!(split_tags("  coffee  "), vec!["coffee"]);
}

#[test]
fn test_haversine_distance_zero() {
    let point = LatLng::new(59.3325, 18.0649);
    assert!(haversine_distance(point, point) < 0.01);
}

#[test]
fn test_haversine_distance_stockholm_to_uppsala() {
    // roughly 64 km
    let stockholm = LatLng::new(59.3293, 18.0686);
    let uppsala = LatLng::new(59.8586, 17.6389);

    let distance = haversine_distance(stockholm, uppsala);
    assert!(distance > 60_000.0 && distance < 70_000.0, "got {}", distance);
}

#[test]
fn test_point_just_outside_bbox() {
    let bbox = calculate_bounding_box(LatLng::new(59.3325, 18.0649), 500.0);

    assert!(!is_within_bounding_box(LatLng::new(bbox.max_lat + 0.001, 18.0649), &bbox));
}

#[test]
fn test_bundled_catalog_search() {
    let catalog = Catalog::load("data").unwrap();
    assert!(!catalog.is_empty());

    let result = catalog.search(&CatalogQuery {
        origin: LatLng::new(59.33258, 18.0649),
        radius_meters: 500.0,
        tags: vec!["bakery".to_string()],
        limit: 10,
    });

    assert!(!result.products.is_empty());
    for pair in result.products.windows(2) {
        assert!(pair[0].popularity_score >= pair[1].popularity_score);
    }
    for product in &result.products {
        let distance = haversine_distance(LatLng::new(59.33258, 18.0649), product.shop_coordinate);
        assert!(distance <= 500.0);
    }
}
