use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ────────────────────────────────────────────────────────────────────────────
// Scalar – opportunistically typed property value
// ────────────────────────────────────────────────────────────────────────────

/// A single configuration value, converted from its source token.
///
/// Tokens consisting only of decimal digits become [`Scalar::Int`]; anything
/// else that parses as a floating-point number becomes [`Scalar::Float`]; all
/// remaining tokens stay strings. Note that a signed token like `"-5"` fails
/// the digits-only check and therefore converts to `Float(-5.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Convert a raw source token per the digits → int, parseable → float,
    /// otherwise string rule.
    pub fn from_token(token: &str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = token.parse::<i64>() {
                return Scalar::Int(i);
            }
        }
        if let Ok(f) = token.parse::<f64>() {
            return Scalar::Float(f);
        }
        Scalar::Str(token.to_string())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PropertySet / BlockEntry / BlockCollection
// ────────────────────────────────────────────────────────────────────────────

/// Ordered map of attribute name to value for one block occurrence.
/// Attribute names are unique; a repeated name within one body overwrites.
pub type PropertySet = IndexMap<String, Scalar>;

/// All property-sets associated with one block name, in encounter order.
///
/// Internally this is always a list, even for a single occurrence. The JSON
/// artifact format distinguishes a lone occurrence (bare object) from
/// multiple occurrences (array of objects); that duality lives only at the
/// serde boundary via `BlockEntryRepr`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "BlockEntryRepr", into = "BlockEntryRepr")]
pub struct BlockEntry {
    sets: Vec<PropertySet>,
}

impl BlockEntry {
    pub fn new() -> Self {
        Self { sets: Vec::new() }
    }

    pub fn push(&mut self, props: PropertySet) {
        self.sets.push(props);
    }

    /// Append all property-sets of `other`, preserving both orders
    /// (existing first, incoming after).
    pub fn extend_from(&mut self, other: BlockEntry) {
        self.sets.extend(other.sets);
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertySet> {
        self.sets.iter()
    }

    pub fn as_slice(&self) -> &[PropertySet] {
        &self.sets
    }
}

impl From<Vec<PropertySet>> for BlockEntry {
    fn from(sets: Vec<PropertySet>) -> Self {
        Self { sets }
    }
}

impl<'a> IntoIterator for &'a BlockEntry {
    type Item = &'a PropertySet;
    type IntoIter = std::slice::Iter<'a, PropertySet>;
    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}

/// Serde-boundary representation: one occurrence serializes as a bare
/// object, two or more as an array. Both forms deserialize.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BlockEntryRepr {
    One(PropertySet),
    Many(Vec<PropertySet>),
}

impl From<BlockEntryRepr> for BlockEntry {
    fn from(repr: BlockEntryRepr) -> Self {
        match repr {
            BlockEntryRepr::One(props) => Self { sets: vec![props] },
            BlockEntryRepr::Many(sets) => Self { sets },
        }
    }
}

impl From<BlockEntry> for BlockEntryRepr {
    fn from(mut entry: BlockEntry) -> Self {
        if entry.sets.len() == 1 {
            BlockEntryRepr::One(entry.sets.remove(0))
        } else {
            BlockEntryRepr::Many(entry.sets)
        }
    }
}

/// All blocks from all parsed configuration sources, keyed by block name.
/// Insertion order is the cross-source encounter order and is semantically
/// significant for descriptor-index ordering.
pub type BlockCollection = IndexMap<String, BlockEntry>;

// ────────────────────────────────────────────────────────────────────────────
// Geometry records (produced by the external PDF scan step)
// ────────────────────────────────────────────────────────────────────────────

/// Center position of one detected text label, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub page: u32,
    pub x: f64,
    pub y: f64,
}

/// One straight line segment extracted from the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub page: u32,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Element display name → all positions where its label was detected.
pub type ElementPositions = IndexMap<String, Vec<Position>>;
