//! The layout doubles as the render manifest; services ship it as JSON.

#![cfg(feature = "serde")]

use zencombine::*;

#[test]
fn layout_serializes_with_stable_field_names() {
    let layout = compute_layout(
        &[Size::new(200, 100), Size::new(100, 100)],
        &LayoutOptions::new().spacing(4),
    )
    .unwrap();
    let json = serde_json::to_value(&layout).unwrap();

    assert_eq!(json["frame"]["width"], 404);
    assert_eq!(json["frame"]["height"], 100);
    let placements = json["placements"].as_array().unwrap();
    assert_eq!(placements.len(), 2);
    assert_eq!(placements[1]["image_index"], 1);
    assert_eq!(placements[1]["x"], 254);
    assert_eq!(placements[1]["y"], 0);
    assert_eq!(placements[1]["width"], 100);

    let back: LayoutResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, layout);
}

#[test]
fn partial_options_fill_in_defaults() {
    let options: LayoutOptions =
        serde_json::from_str(r#"{ "alignment": "masonry-columns", "cell_spacing": 4 }"#).unwrap();
    assert_eq!(options.alignment, Alignment::MasonryColumns);
    assert_eq!(options.cell_spacing, 4);
    assert_eq!(options.max_frame_width, 0);
    assert_eq!(options.background_color, CanvasColor::white());
    assert_eq!(options.limits, Limits::none());
}

#[test]
fn alignment_names_match_display() {
    for alignment in Alignment::ALL {
        let json = serde_json::to_string(&alignment).unwrap();
        assert_eq!(json, format!("\"{alignment}\""));
    }
}
