use serde_json::json;
use tpc_lib::figma::FigmaNodeData;
use tpc_lib::{
    compare, design_style_from_node, extract_design_style, live_style_from_computed,
    CanonicalStyle, CompareOptions, FigmaAuth, FigmaClient, MismatchKind, RawComputedStyle,
    StyleProperty, StyleValue,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn heading_node() -> serde_json::Value {
    json!({
        "id": "1:2",
        "name": "Heading",
        "type": "TEXT",
        "characters": "Welcome",
        "style": {
            "fontFamily": "Inter",
            "fontSize": 32,
            "fontWeight": 700,
            "italic": false,
            "letterSpacing": 0,
            "textAlignHorizontal": "CENTER",
            "textCase": "UPPER"
        },
        "fills": [{"type": "SOLID", "color": {"r": 0.2, "g": 0.4, "b": 0.6, "a": 1}}]
    })
}

fn heading_computed(font_size: &str) -> RawComputedStyle {
    serde_json::from_value(json!({
        "fontFamily": "\"Inter\", system-ui, sans-serif",
        "fontSize": font_size,
        "fontWeight": "bold",
        "fontStyle": "normal",
        "letterSpacing": "normal",
        "textAlign": "center",
        "textDecorationLine": "none",
        "textTransform": "uppercase",
        "color": "rgb(51, 102, 153)",
        "opacity": "1",
        "backgroundColor": "rgba(0, 0, 0, 0)",
        "borderTopStyle": "none",
        "borderRightStyle": "none",
        "borderBottomStyle": "none",
        "borderLeftStyle": "none",
        "paddingTop": "0px",
        "paddingRight": "0px",
        "paddingBottom": "0px",
        "paddingLeft": "0px",
        "textShadow": "none"
    }))
    .expect("computed style")
}

fn design_from_json(node: serde_json::Value) -> CanonicalStyle {
    let node: FigmaNodeData = serde_json::from_value(node).expect("node");
    design_style_from_node(&node)
}

#[test]
fn matching_heading_has_no_discrepancies() {
    let design = design_from_json(heading_node());
    let live = live_style_from_computed(&heading_computed("32px"));

    let result = compare(&design, &live, &CompareOptions::default());

    assert!(result.matches, "unexpected: {:?}", result.discrepancies);
    assert!(result.discrepancies.is_empty());
    assert_eq!(design.color, Some(StyleValue::from("#336699")));
    assert_eq!(live.color, Some(StyleValue::from("#336699")));
    assert!(live.background_color.is_none());
    assert!(live.padding.is_none());
}

#[test]
fn font_size_outside_tolerance_is_the_only_discrepancy() {
    let design = CanonicalStyle::default().with(StyleProperty::FontSize, 16.0);
    let live = CanonicalStyle::default().with(StyleProperty::FontSize, "18px");

    let result = compare(&design, &live, &CompareOptions::with_tolerance(1.0));

    assert!(!result.matches);
    assert_eq!(result.discrepancies.len(), 1);
    let d = &result.discrepancies[0];
    assert_eq!(d.property, StyleProperty::FontSize);
    assert_eq!(d.kind, MismatchKind::ToleranceExceeded);
    assert_eq!(d.reason, "Difference exceeds tolerance: 2px");
    assert_eq!(d.design_value, StyleValue::Number(16.0));
    assert_eq!(d.live_value, Some(StyleValue::from("18px")));
}

#[test]
fn sub_pixel_rendering_differences_are_tolerated() {
    let design = design_from_json(heading_node());
    let live = live_style_from_computed(&heading_computed("31.6px"));

    assert!(compare(&design, &live, &CompareOptions::default()).matches);
    assert!(!compare(&design, &live, &CompareOptions::with_tolerance(0.25)).matches);
}

#[test]
fn live_only_properties_never_count_as_discrepancies() {
    let design = CanonicalStyle::default().with(StyleProperty::FontSize, 16.0);
    let live = CanonicalStyle::default()
        .with(StyleProperty::FontSize, "16px")
        .with(StyleProperty::Opacity, "1")
        .with(StyleProperty::Margin, "0px 0px 24px");

    assert!(compare(&design, &live, &CompareOptions::default()).matches);
}

#[test]
fn design_properties_missing_on_live_are_reported() {
    let mut node = heading_node();
    node["strokes"] = json!([{"type": "SOLID", "color": {"r": 0, "g": 0, "b": 0}}]);
    node["strokeWeight"] = json!(2);
    let design = design_from_json(node);
    let live = live_style_from_computed(&heading_computed("32px"));

    let result = compare(&design, &live, &CompareOptions::default());

    let missing: Vec<StyleProperty> = result
        .discrepancies
        .iter()
        .filter(|d| d.kind == MismatchKind::MissingOnLive)
        .map(|d| d.property)
        .collect();
    assert_eq!(
        missing,
        vec![
            StyleProperty::BorderStyle,
            StyleProperty::BorderWidth,
            StyleProperty::BorderColor
        ]
    );
}

#[test]
fn line_height_ratio_is_compared_numerically_against_live_value() {
    let design = CanonicalStyle::default().with(StyleProperty::LineHeight, 1.5);

    let ratio = CanonicalStyle::default().with(StyleProperty::LineHeight, "1.5");
    assert!(compare(&design, &ratio, &CompareOptions::default()).matches);

    let px = CanonicalStyle::default().with(StyleProperty::LineHeight, "24px");
    let result = compare(&design, &px, &CompareOptions::default());
    assert_eq!(
        result.discrepancy(StyleProperty::LineHeight).map(|d| d.kind),
        Some(MismatchKind::ToleranceExceeded)
    );
}

#[tokio::test]
async fn fetched_design_node_compares_against_computed_style() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/files/FILE/nodes"))
        .and(query_param("ids", "1:2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Marketing site",
            "nodes": {"1:2": {"document": heading_node()}}
        })))
        .mount(&server)
        .await;

    let client = FigmaClient::with_base_url(
        FigmaAuth::PersonalAccessToken("token".into()),
        server.uri(),
    )
    .expect("client");

    let design = extract_design_style(&client, "FILE", "1-2")
        .await
        .expect("design style");
    let live = live_style_from_computed(&heading_computed("30px"));
    let result = compare(&design, &live, &CompareOptions::with_tolerance(1.0));

    assert!(!result.matches);
    assert_eq!(result.discrepancies.len(), 1);
    assert_eq!(result.discrepancies[0].property, StyleProperty::FontSize);
    assert_eq!(
        result.discrepancies[0].reason,
        "Difference exceeds tolerance: 2px"
    );
}
