use crate::analysis::{AnalysisMode, HeatmapConfig};
use crate::category::CategorySchema;
use crate::error::HeatmapError;
use crate::markers::Marker;
use crate::raster::generate;
use crate::test_harness::TestMap;

fn markers() -> Vec<Marker> {
    vec![
        Marker::new(43.4516, -80.4925)
            .with_entry("Health", "Clinic", 3.0, true)
            .with_entry("Food", "Grocery", 1.0, true),
        Marker::new(43.4643, -80.5204).with_entry("Health", "Clinic", 5.0, true),
        Marker::new(43.4723, -80.5449).with_entry("Food", "Grocery", 2.0, true),
        Marker::new(43.4390, -80.4870).with_entry("Food", "Pantry", 4.0, false),
    ]
}

fn schema() -> CategorySchema {
    CategorySchema::new(["Health", "Food"])
}

fn map() -> TestMap {
    TestMap::new().with_schema(schema()).with_markers(markers())
}

#[test]
fn test_fresh_map_shows_nothing() {
    let mut map = TestMap::new();
    map.update();
    assert!(map.grid().is_none());
    assert!(!map.is_busy());
}

#[test]
fn test_generate_installs_overlay_matching_direct_call() {
    let mut map = map();
    let cfg = HeatmapConfig::new(AnalysisMode::Distribution)
        .with_buffer_radius(3000.0)
        .with_resolution(12);
    let expected = generate(&markers(), &cfg, &schema()).expect("generate");

    let grid = map.generate(cfg).expect("overlay installed").clone();
    assert_eq!(grid, expected);
    assert_eq!(map.overlay().revision, 1);
    assert!(map.overlay().last_error.is_none());
}

#[test]
fn test_every_mode_installs_through_plugin() {
    let mut map = map();
    for mode in AnalysisMode::ALL {
        let grid = map
            .generate(HeatmapConfig::new(mode).with_resolution(6))
            .expect("overlay installed");
        assert_eq!(grid.mode, mode);
        assert_eq!(grid.pixels.len(), 36);
    }
    assert_eq!(map.overlay().revision, 3);
}

#[test]
fn test_clear_removes_overlay() {
    let mut map = map();
    map.generate(HeatmapConfig::new(AnalysisMode::Proximity).with_resolution(8));
    assert!(map.overlay().is_visible());

    map.clear();
    map.update();
    assert!(map.grid().is_none());
    assert_eq!(map.overlay().revision, 2);
}

#[test]
fn test_failed_request_keeps_previous_overlay() {
    let mut map = map();
    let before = map
        .generate(HeatmapConfig::new(AnalysisMode::Cumulative).with_resolution(8))
        .cloned()
        .expect("overlay installed");

    map.generate(
        HeatmapConfig::new(AnalysisMode::Cumulative)
            .with_resolution(8)
            .with_category_selector("Transit"),
    );
    assert_eq!(map.grid(), Some(&before));
    assert_eq!(
        map.overlay().last_error,
        Some(HeatmapError::UnknownCategory("Transit".into()))
    );
    assert_eq!(map.overlay().revision, 1);
}

#[test]
fn test_empty_catalogue_reports_no_markers() {
    let mut map = TestMap::new().with_schema(schema());
    let grid = map.generate(HeatmapConfig::default());
    assert!(grid.is_none());
    assert_eq!(map.overlay().last_error, Some(HeatmapError::NoMarkers));
}

#[test]
fn test_later_request_wins() {
    let mut map = map();
    map.request(HeatmapConfig::new(AnalysisMode::Proximity).with_resolution(40));
    map.update();
    map.request(HeatmapConfig::new(AnalysisMode::Distribution).with_resolution(5));
    map.run_until_idle();

    let grid = map.grid().expect("overlay installed");
    assert_eq!(grid.mode, AnalysisMode::Distribution);
    assert_eq!(grid.resolution, 5);
}

#[test]
fn test_requests_in_one_frame_collapse_to_the_last() {
    let mut map = map();
    map.request(HeatmapConfig::new(AnalysisMode::Proximity).with_resolution(4));
    map.request(HeatmapConfig::new(AnalysisMode::Cumulative).with_resolution(4));
    map.run_until_idle();

    assert_eq!(map.grid().map(|g| g.mode), Some(AnalysisMode::Cumulative));
    assert_eq!(map.overlay().revision, 1);
}

#[test]
fn test_clear_abandons_in_flight_generation() {
    let mut map = map();
    map.request(HeatmapConfig::new(AnalysisMode::Proximity).with_resolution(60));
    map.update();
    map.clear();
    map.run_until_idle();
    for _ in 0..10 {
        map.update();
    }
    assert!(map.grid().is_none());
    assert!(!map.is_busy());
}

#[test]
fn test_new_catalogue_is_used_by_next_request() {
    let mut map = map();
    let first = map
        .generate(HeatmapConfig::new(AnalysisMode::Proximity).with_resolution(6))
        .cloned()
        .expect("overlay installed");

    map.load_markers(vec![Marker::new(-33.87, 151.21), Marker::new(-33.89, 151.27)]);
    let second = map
        .generate(HeatmapConfig::new(AnalysisMode::Proximity).with_resolution(6))
        .cloned()
        .expect("overlay installed");

    assert_ne!(first.bounds, second.bounds);
    assert!(second.bounds.north_east.lat < 0.0);
}
