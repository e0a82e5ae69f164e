//! Merging of per-source block collections into one unified mapping.
//!
//! Block entries are uniformly ordered lists of property-sets, so merging is
//! plain extension: existing sets keep their positions, incoming sets are
//! appended. At the JSON artifact boundary (where a one-element entry is a
//! bare object and a longer entry is an array) this reproduces the exact
//! accumulation behavior of the legacy format, including its asymmetry:
//!
//! - scalar + scalar → `[existing, incoming]`
//! - scalar + list   → `[existing, incoming…]`
//! - list + scalar   → `[existing…, incoming]`
//! - list + list     → `[existing…, incoming…]`

use crate::model::BlockCollection;

/// Merge `incoming` into `acc`, block by block, preserving encounter order.
pub fn merge_into(acc: &mut BlockCollection, incoming: BlockCollection) {
    for (name, entry) in incoming {
        match acc.entry(name) {
            indexmap::map::Entry::Occupied(mut existing) => {
                existing.get_mut().extend_from(entry);
            }
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }
}

/// Merge an ordered sequence of per-source collections into one.
///
/// The caller supplies the ordering (lexical source paths in the standard
/// pipeline); re-runs over the same sequence produce identical output.
pub fn merge_collections<I>(sources: I) -> BlockCollection
where
    I: IntoIterator<Item = BlockCollection>,
{
    let mut acc = BlockCollection::new();
    for collection in sources {
        merge_into(&mut acc, collection);
    }
    acc
}
