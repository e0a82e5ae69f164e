use camino::Utf8PathBuf;
use pidviz::index::DescriptorIndex;
use pidviz::model::{BlockCollection, ElementPositions, LineSegment, Position};
use pidviz::parser::parse_config_text;
use pidviz::svg::{DiagramComposer, RenderConfig};

fn positions(entries: &[(&str, f64, f64)]) -> ElementPositions {
    let mut map = ElementPositions::new();
    for (name, x, y) in entries {
        map.entry(name.to_string()).or_default().push(Position {
            page: 1,
            x: *x,
            y: *y,
        });
    }
    map
}

fn composer_with_assets(assets_dir: &std::path::Path) -> DiagramComposer {
    let config = RenderConfig {
        assets_dir: Utf8PathBuf::from_path_buf(assets_dir.to_path_buf()).unwrap(),
        ..RenderConfig::default()
    };
    DiagramComposer::new(config)
}

#[test]
fn icon_is_inlined_with_tooltip_at_offset_position() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("valve.svg"),
        "<svg xmlns=\"http://www.w3.org/2000/svg\">\n<path d=\"M0 0\" id=\"valve-icon\"/>\n</svg>",
    )
    .unwrap();

    let composer = composer_with_assets(tmp.path());
    let index = DescriptorIndex::build(&BlockCollection::new());
    let svg = composer.compose(&index, &positions(&[("BR1-V2", 10.0, 20.0)]), &[]);

    // Offsets default to 200/200; the icon envelope is stripped.
    assert!(svg.contains(r#"translate(210,220) scale(0.5)"#));
    assert!(svg.contains(r#"<path d="M0 0" id="valve-icon"/>"#));
    assert!(!svg.contains("valve-icon\"/>\n</svg>\n<svg"));
    assert!(svg.contains("<title>Type: valve</title>"));
    assert!(svg.contains(r#"<text x="235" y="215" font-size="14">BR1-V2</text>"#));
}

#[test]
fn missing_icon_degrades_to_placeholder_circle() {
    let tmp = tempfile::tempdir().unwrap();
    let composer = composer_with_assets(tmp.path());
    let index = DescriptorIndex::build(&BlockCollection::new());
    let svg = composer.compose(&index, &positions(&[("ABC9", 0.0, 0.0)]), &[]);

    assert!(svg.contains(r#"<circle cx="200" cy="200" r="10" fill="gray" stroke="black">"#));
    assert!(svg.contains("<title>Type: generic</title>"));
}

#[test]
fn tooltip_reflects_descriptor_matches() {
    let tmp = tempfile::tempdir().unwrap();
    let blocks = parse_config_text(
        r#"
        tag_a = { descr = "BR1-V2", type = "valve", port = "A1" }
        tag_b = { descr = "br1-v2", type = "pump", port = "A2" }
        "#,
    );
    let index = DescriptorIndex::build(&blocks);
    let composer = composer_with_assets(tmp.path());
    let svg = composer.compose(&index, &positions(&[("BR1-V2", 0.0, 0.0)]), &[]);

    // Later-declared record wins the type; both ports are listed.
    assert!(svg.contains("<title>Type: pump • port: A1 | A2 • matches: 2</title>"));
}

#[test]
fn excluded_elements_are_not_rendered() {
    let tmp = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        assets_dir: Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap(),
        exclude: ["BR1-V2".to_string()].into_iter().collect(),
        ..RenderConfig::default()
    };
    let composer = DiagramComposer::new(config);
    let index = DescriptorIndex::build(&BlockCollection::new());
    let svg = composer.compose(
        &index,
        &positions(&[("BR1-V2", 0.0, 0.0), ("M12", 5.0, 5.0)]),
        &[],
    );

    assert!(!svg.contains("BR1-V2"));
    assert!(svg.contains("M12"));
}

#[test]
fn line_segments_are_drawn_with_offsets() {
    let tmp = tempfile::tempdir().unwrap();
    let composer = composer_with_assets(tmp.path());
    let index = DescriptorIndex::build(&BlockCollection::new());
    let lines = vec![LineSegment {
        page: 1,
        x1: 1.0,
        y1: 2.0,
        x2: 3.0,
        y2: 4.0,
    }];
    let svg = composer.compose(&index, &ElementPositions::new(), &lines);

    assert!(svg.contains(
        r##"<line x1="201" y1="202" x2="203" y2="204" stroke="#888" stroke-width="1"/>"##
    ));
}

#[test]
fn element_names_and_tooltips_are_escaped() {
    let tmp = tempfile::tempdir().unwrap();
    let composer = composer_with_assets(tmp.path());
    let index = DescriptorIndex::build(&BlockCollection::new());
    let svg = composer.compose(&index, &positions(&[("A<B_IN", 0.0, 0.0)]), &[]);

    assert!(svg.contains("A&lt;B_IN"));
    assert!(!svg.contains("<B_IN"));
}

#[test]
fn document_envelope_uses_configured_canvas() {
    let tmp = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        width: 800,
        height: 600,
        assets_dir: Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap(),
        ..RenderConfig::default()
    };
    let composer = DiagramComposer::new(config);
    let index = DescriptorIndex::build(&BlockCollection::new());
    let svg = composer.compose(&index, &ElementPositions::new(), &[]);

    assert!(svg.starts_with("<?xml version=\"1.0\""));
    assert!(svg.contains(r#"<svg width="800" height="600""#));
    assert!(svg.trim_end().ends_with("</svg>"));
}
