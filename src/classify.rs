//! Semantic classification of diagram elements.
//!
//! An element's type is resolved from configuration evidence when its name
//! matches a descriptor, otherwise from an ordered table of name heuristics.
//! The classifier also assembles the tooltip fragments shown in the rendered
//! diagram.

use std::fmt;

use crate::index::DescriptorIndex;
use crate::model::PropertySet;

/// Semantic category of a diagram element.
///
/// The heuristic rules only ever produce the built-in variants; `Custom`
/// carries a configuration-supplied `type` string outside that set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    Input,
    Output,
    Pump,
    Valve,
    Sensor,
    LineId,
    Wash,
    Generic,
    Custom(String),
}

impl ElementType {
    /// Stable tag used for icon asset names and tooltip text.
    pub fn as_tag(&self) -> &str {
        match self {
            ElementType::Input => "input",
            ElementType::Output => "output",
            ElementType::Pump => "pump",
            ElementType::Valve => "valve",
            ElementType::Sensor => "sensor",
            ElementType::LineId => "line_id",
            ElementType::Wash => "wash",
            ElementType::Generic => "generic",
            ElementType::Custom(s) => s,
        }
    }

    /// Inverse of [`as_tag`](Self::as_tag); unknown tags become `Custom`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "input" => ElementType::Input,
            "output" => ElementType::Output,
            "pump" => ElementType::Pump,
            "valve" => ElementType::Valve,
            "sensor" => ElementType::Sensor,
            "line_id" => ElementType::LineId,
            "wash" => ElementType::Wash,
            "generic" => ElementType::Generic,
            other => ElementType::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Ordered name-heuristic rules, evaluated on the upper-cased name.
/// First match wins; later rules never fire once an earlier one matched.
const HEURISTIC_RULES: &[(fn(&str) -> bool, ElementType)] = &[
    (|n| n.contains("_IN"), ElementType::Input),
    (|n| n.contains("_OUT"), ElementType::Output),
    (|n| n.starts_with('M') || n.contains("-M"), ElementType::Pump),
    (|n| n.starts_with('V') || n.contains("-V"), ElementType::Valve),
    (
        |n| n.contains("LS") || n.contains("PS") || n.contains("TS") || n.contains("-LS"),
        ElementType::Sensor,
    ),
    (
        |n| {
            n.strip_prefix('-')
                .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        },
        ElementType::LineId,
    ),
    (
        |n| ["WASH", "МОЙКА", "FLUSH", "CLEAN"].iter().any(|w| n.contains(w)),
        ElementType::Wash,
    ),
];

/// Classify an element name by heuristics alone (no configuration evidence).
pub fn detect_type(name: &str) -> ElementType {
    let upper = name.to_uppercase();
    for (predicate, element_type) in HEURISTIC_RULES {
        if predicate(&upper) {
            return element_type.clone();
        }
    }
    ElementType::Generic
}

/// Classification result for one element: resolved type plus the ordered,
/// non-empty tooltip fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub element_type: ElementType,
    pub fragments: Vec<String>,
}

impl Classification {
    /// Fragments joined with the display separator.
    pub fn tooltip(&self) -> String {
        self.fragments.join(" • ")
    }
}

/// Attribute keys summarized in tooltips, in their fixed display order.
const TOOLTIP_KEYS: [&str; 4] = ["port", "tag", "unit", "id"];

/// Distinct string values of `key` across `matches`, insertion-order
/// deduplicated and joined with `" | "`. Empty string when no set has the
/// attribute.
fn collect_values(matches: &[PropertySet], key: &str) -> String {
    let mut values: Vec<String> = Vec::new();
    for props in matches {
        if let Some(v) = props.get(key) {
            let s = v.to_string();
            if !values.contains(&s) {
                values.push(s);
            }
        }
    }
    values.join(" | ")
}

/// Classify one element given its descriptor matches.
///
/// Type precedence: the *last* matched property-set with a non-empty `type`
/// attribute wins (later-declared records override earlier ones); with no
/// configuration type the name heuristic decides. Missing data degrades to
/// `generic` with no extra fragments, never an error.
pub fn classify(name: &str, matches: &[PropertySet]) -> Classification {
    let element_type = matches
        .iter()
        .rev()
        .find_map(|props| {
            props
                .get("type")
                .map(|v| v.to_string())
                .filter(|s| !s.is_empty())
        })
        .map(|tag| ElementType::from_tag(&tag))
        .unwrap_or_else(|| detect_type(name));

    let mut fragments = vec![format!("Type: {}", element_type)];
    if !matches.is_empty() {
        for key in TOOLTIP_KEYS {
            let joined = collect_values(matches, key);
            if !joined.is_empty() {
                fragments.push(format!("{}: {}", key, joined));
            }
        }
        if matches.len() > 1 {
            fragments.push(format!("matches: {}", matches.len()));
        }
    }

    Classification {
        element_type,
        fragments,
    }
}

/// Convenience wrapper binding the classifier to a built [`DescriptorIndex`].
///
/// The index is immutable after construction, so one classifier can be
/// shared freely across threads for batch classification.
pub struct ElementClassifier<'a> {
    index: &'a DescriptorIndex,
}

impl<'a> ElementClassifier<'a> {
    pub fn new(index: &'a DescriptorIndex) -> Self {
        Self { index }
    }

    /// Look up the element's descriptor matches and classify it.
    pub fn classify_name(&self, name: &str) -> Classification {
        classify(name, self.index.lookup(name))
    }
}
