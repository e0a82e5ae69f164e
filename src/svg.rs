//! SVG diagram composition.
//!
//! Consumes classified elements, their detected positions, and the extracted
//! line segments, and emits a single annotated SVG document: one icon (or a
//! gray placeholder) with a `<title>` tooltip per detected position, a text
//! label per element, a legend, and the raw line geometry.

use std::collections::{BTreeSet, HashMap};

use camino::Utf8PathBuf;
use rayon::prelude::*;

use crate::classify::{Classification, ElementClassifier, ElementType};
use crate::index::DescriptorIndex;
use crate::model::{ElementPositions, LineSegment};

/// Rendering parameters. Passed in explicitly; the composer holds no
/// process-wide state.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Offset added to every document-space coordinate.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Scale applied to icon groups.
    pub icon_scale: f64,
    /// Directory containing one `<type-tag>.svg` icon per element type.
    pub assets_dir: Utf8PathBuf,
    /// Element names excluded from rendering.
    pub exclude: BTreeSet<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1600,
            offset_x: 200.0,
            offset_y: 200.0,
            icon_scale: 0.5,
            assets_dir: Utf8PathBuf::from("assets"),
            exclude: BTreeSet::new(),
        }
    }
}

/// Legend entries: built-in type tag plus display label.
const LEGEND_ITEMS: [(ElementType, &str); 8] = [
    (ElementType::Input, "Вход (Input)"),
    (ElementType::Output, "Выход (Output)"),
    (ElementType::Pump, "Насос (Pump)"),
    (ElementType::Valve, "Клапан (Valve)"),
    (ElementType::Sensor, "Датчик (Sensor)"),
    (ElementType::LineId, "Линия/номер (Line ID)"),
    (ElementType::Wash, "Мойка/Очистка (Wash)"),
    (ElementType::Generic, "Общее / Неопределено (Generic)"),
];

/// Composes the final SVG from classification results and geometry.
pub struct DiagramComposer {
    config: RenderConfig,
}

impl DiagramComposer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Load an icon's inner markup (the content of its outer `<svg>`
    /// element). Returns `None`, with a warning, when the asset is missing
    /// or not well-formed; callers degrade to a placeholder marker.
    fn load_icon(&self, type_tag: &str) -> Option<String> {
        let path = self.config.assets_dir.join(format!("{}.svg", type_tag));
        let content = match std::fs::read_to_string(path.as_std_path()) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("[pidviz] Warning: no icon for type '{}' ({}): {}", type_tag, path, e);
                return None;
            }
        };
        strip_svg_envelope(&content).or_else(|| {
            eprintln!("[pidviz] Warning: malformed icon {}", path);
            None
        })
    }

    fn legend(&self, icons: &HashMap<String, Option<String>>) -> String {
        let mut lines = vec![
            r#"<g transform="translate(20, 20)">"#.to_string(),
            r#"<text x="0" y="0" font-size="16" font-weight="bold">Обозначения:</text>"#.to_string(),
        ];
        let mut y_offset = 25;
        for (element_type, label) in &LEGEND_ITEMS {
            let Some(Some(icon)) = icons.get(element_type.as_tag()) else {
                continue;
            };
            lines.push(format!(r#"<g transform="translate(0, {})">"#, y_offset));
            lines.push(format!(r#"<g transform="scale(0.5)">{}</g>"#, icon));
            lines.push(format!(
                r#"<text x="60" y="25" font-size="12">{}</text>"#,
                html_escape::encode_text(label)
            ));
            lines.push("</g>".to_string());
            y_offset += 55;
        }
        lines.push("</g>".to_string());
        lines.join("\n")
    }

    /// Emit the complete SVG document.
    ///
    /// Elements are classified in parallel (the descriptor index is
    /// immutable at this point); emission order follows the deterministic
    /// input order of `positions`.
    pub fn compose(
        &self,
        index: &DescriptorIndex,
        positions: &ElementPositions,
        lines: &[LineSegment],
    ) -> String {
        let classifier = ElementClassifier::new(index);
        let elements: Vec<(&String, &Vec<crate::model::Position>)> = positions
            .iter()
            .filter(|(name, _)| !self.config.exclude.contains(name.as_str()))
            .collect();
        let classified: Vec<(&String, &Vec<crate::model::Position>, Classification)> = elements
            .par_iter()
            .map(|(name, coords)| (*name, *coords, classifier.classify_name(name.as_str())))
            .collect();

        // Icon contents cached per type tag; each tag is read at most once.
        let mut icons: HashMap<String, Option<String>> = HashMap::new();
        for (element_type, _) in &LEGEND_ITEMS {
            icons.insert(element_type.as_tag().to_string(), self.load_icon(element_type.as_tag()));
        }
        for (_, _, classification) in &classified {
            let tag = classification.element_type.as_tag();
            if !icons.contains_key(tag) {
                icons.insert(tag.to_string(), self.load_icon(tag));
            }
        }

        let mut parts = vec![self.header()];
        parts.push(self.legend(&icons));

        let mut unclassified: Vec<&str> = Vec::new();
        for (name, coords, classification) in &classified {
            if coords.is_empty() {
                eprintln!("[pidviz] Warning: no coordinates for element {}", name);
                continue;
            }
            if classification.element_type == ElementType::Generic {
                unclassified.push(name.as_str());
            }
            let tooltip = html_escape::encode_text(&classification.tooltip()).into_owned();
            let label = html_escape::encode_text(name.as_str()).into_owned();
            let icon = icons
                .get(classification.element_type.as_tag())
                .and_then(|i| i.as_deref());

            for coord in *coords {
                let x = coord.x + self.config.offset_x;
                let y = coord.y + self.config.offset_y;
                match icon {
                    Some(icon) => {
                        parts.push(format!(
                            r#"<g transform="translate({},{}) scale({})">"#,
                            x, y, self.config.icon_scale
                        ));
                        parts.push(format!("<title>{}</title>", tooltip));
                        parts.push(icon.to_string());
                        parts.push("</g>".to_string());
                    }
                    None => {
                        parts.push(format!(
                            r#"<circle cx="{}" cy="{}" r="10" fill="gray" stroke="black">"#,
                            x, y
                        ));
                        parts.push(format!("<title>{}</title>", tooltip));
                        parts.push("</circle>".to_string());
                    }
                }
                parts.push(format!(
                    r#"<text x="{}" y="{}" font-size="14">{}</text>"#,
                    x + 25.0,
                    y - 5.0,
                    label
                ));
            }
        }

        if !unclassified.is_empty() {
            eprintln!(
                "[pidviz] Warning: {} unclassified (generic) elements: {}",
                unclassified.len(),
                unclassified.join(", ")
            );
        }

        for line in lines {
            parts.push(format!(
                r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#888" stroke-width="1"/>"##,
                line.x1 + self.config.offset_x,
                line.y1 + self.config.offset_y,
                line.x2 + self.config.offset_x,
                line.y2 + self.config.offset_y,
            ));
        }

        parts.push("</svg>".to_string());
        parts.join("\n")
    }

    fn header(&self) -> String {
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
                "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n",
                "  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>"
            ),
            self.config.width, self.config.height
        )
    }
}

/// Strip the outer `<svg …>` element of an icon file, returning the inner
/// markup with newlines removed.
fn strip_svg_envelope(content: &str) -> Option<String> {
    let flat = content.replace('\n', "");
    let (_, after_open) = flat.split_once('>')?;
    let (inner, _) = after_open.rsplit_once("</svg>")?;
    Some(inner.to_string())
}
