//! Descriptor lookup index over a merged block collection.

use indexmap::IndexMap;

use crate::model::{BlockCollection, PropertySet};

/// Case-normalized lookup from a `descr` attribute value to every
/// property-set declaring it.
///
/// Built once from a fully merged [`BlockCollection`] and immutable
/// afterwards; a single descriptor may map to several property-sets
/// (multiple instrumentation tags referring to the same physical point).
/// Property-sets without a usable `descr` are not indexed and stay reachable
/// only through the raw collection.
#[derive(Debug, Clone, Default)]
pub struct DescriptorIndex {
    entries: IndexMap<String, Vec<PropertySet>>,
}

impl DescriptorIndex {
    /// Build the index, visiting blocks in insertion order and each block's
    /// property-sets in accumulation order, so that shared descriptors keep
    /// a stable first-encountered ordering.
    pub fn build(blocks: &BlockCollection) -> Self {
        let mut entries: IndexMap<String, Vec<PropertySet>> = IndexMap::new();
        for entry in blocks.values() {
            for props in entry {
                let Some(descr) = props.get("descr") else {
                    continue;
                };
                let key = descr.to_string().to_uppercase();
                if key.is_empty() {
                    continue;
                }
                entries.entry(key).or_default().push(props.clone());
            }
        }
        Self { entries }
    }

    /// All property-sets whose `descr` matches `name` case-insensitively,
    /// in first-encountered order. Empty slice when nothing matches.
    pub fn lookup(&self, name: &str) -> &[PropertySet] {
        self.entries
            .get(&name.to_uppercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct normalized descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
