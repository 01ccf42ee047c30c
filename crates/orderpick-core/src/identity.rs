//! Line-item identity resolution
//!
//! A selected line item is held either as a bare copy of the order line
//! item or as a linked record pointing at one. Both resolve to the id of
//! the order line item they denote, which is the key the selection set
//! de-duplicates on.

use crate::model::{LineItem, LineItemId, SelectionEntry};

/// Resolve an entry to the order line item it denotes.
///
/// A linked record's nested reference wins over its own id. Blank ids
/// resolve to `None`; such entries are never inserted.
pub fn resolve(entry: &SelectionEntry) -> Option<&LineItemId> {
    let id = match entry {
        SelectionEntry::Bare(item) => &item.id,
        SelectionEntry::Linked(link) => link
            .order_line_item
            .as_ref()
            .map(|r| &r.id)
            .filter(|id| !id.is_empty())
            .unwrap_or(&link.id),
    };
    (!id.is_empty()).then_some(id)
}

/// Resolve a fetched line item to its identity
pub fn resolve_line_item(item: &LineItem) -> Option<&LineItemId> {
    (!item.id.is_empty()).then_some(&item.id)
}
