//! End-to-end run over on-disk fixtures: configuration sources → merged
//! collection → descriptor index → classification → SVG.

use camino::Utf8PathBuf;
use pidviz::classify::{ElementClassifier, ElementType};
use pidviz::index::DescriptorIndex;
use pidviz::model::{ElementPositions, Position};
use pidviz::parser::{ConfigParser, FsSource};
use pidviz::svg::{DiagramComposer, RenderConfig};

#[test]
fn full_pipeline_over_config_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg_dir = tmp.path().join("input");
    std::fs::create_dir_all(&cfg_dir).unwrap();
    std::fs::write(
        cfg_dir.join("plant_a.lua"),
        r#"
        pump_station = {
            descr = "BR1-M3",
            type = "pump",
            port = "A1",
            id = 3,
        }
        valve_bank = { descr = "BR1-V2", port = "B1" }
        "#,
    )
    .unwrap();
    std::fs::write(
        cfg_dir.join("plant_b.lua"),
        r#"
        valve_bank = { descr = "BR1-V2", port = "B2", unit = "CIP" }
        "#,
    )
    .unwrap();
    // Non-config files in the directory are ignored.
    std::fs::write(cfg_dir.join("notes.txt"), "pump_station = { x = 1 }").unwrap();

    let cfg_dir = Utf8PathBuf::from_path_buf(cfg_dir).unwrap();
    let mut parser = ConfigParser::new(FsSource);
    let blocks = parser.parse_dir(&cfg_dir).expect("parse config dir");

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks.get("valve_bank").unwrap().len(), 2);

    let index = DescriptorIndex::build(&blocks);
    let classifier = ElementClassifier::new(&index);

    let pump = classifier.classify_name("BR1-M3");
    assert_eq!(pump.element_type, ElementType::Pump);
    assert_eq!(pump.tooltip(), "Type: pump • port: A1 • id: 3");

    // No configured type on the valve: the name heuristic decides, and both
    // source files contribute tooltip evidence.
    let valve = classifier.classify_name("br1-v2");
    assert_eq!(valve.element_type, ElementType::Valve);
    assert_eq!(
        valve.tooltip(),
        "Type: valve • port: B1 | B2 • unit: CIP • matches: 2"
    );

    let mut positions = ElementPositions::new();
    positions.insert(
        "BR1-M3".to_string(),
        vec![Position {
            page: 1,
            x: 100.0,
            y: 50.0,
        }],
    );
    let render_config = RenderConfig {
        assets_dir: Utf8PathBuf::from_path_buf(tmp.path().join("assets")).unwrap(),
        ..RenderConfig::default()
    };
    let svg = DiagramComposer::new(render_config).compose(&index, &positions, &[]);
    assert!(svg.contains("<title>Type: pump • port: A1 • id: 3</title>"));
    assert!(svg.contains("BR1-M3"));
}
