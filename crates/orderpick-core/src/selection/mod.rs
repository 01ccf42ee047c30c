//! The selection set
//!
//! `SelectionState` holds the de-duplicated line items picked during one
//! session together with the orders backing them ("known orders").
//! Every mutation goes through `add_line_items`, `remove_line_items` or
//! `toggle`; callers never edit the vectors directly.
//!
//! Invariants kept by the operations:
//! - no two selected entries share a resolved identity
//! - every entry added here has its owning order in `known_orders`
//! - display sequences increase monotonically and are never reused


use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::resolve_line_item;
use crate::model::{LineItem, LineItemId, Order, OrderId, SelectedLineItem, SelectionEntry};

/// Summary of what a single mutation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    /// Identities that entered the selection
    pub added: Vec<LineItemId>,
    /// Identities that left the selection
    pub removed: Vec<LineItemId>,
    /// Items ignored: already present, absent, unresolvable or orphaned
    pub skipped: usize,
    /// Items kept because the edit guard protects them
    pub protected: usize,
}

impl SelectionChange {
    /// True when the selected set did not change
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Selected entries plus the orders that back them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    selected: Vec<SelectionEntry>,
    known_orders: Vec<Order>,
    next_sequence: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the entries already attached to the entity being edited.
    ///
    /// Unresolvable entries are dropped and duplicate identities collapse
    /// to the first occurrence. New items are numbered after the seed.
    pub fn seeded(entries: Vec<SelectionEntry>, orders: Vec<Order>) -> Self {
        let mut seen = HashSet::new();
        let selected: Vec<SelectionEntry> = entries
            .into_iter()
            .filter(|entry| entry.identity().is_some_and(|id| seen.insert(id.clone())))
            .collect();

        // handed-back selections can carry sequences above their length
        let highest = selected.iter().filter_map(SelectionEntry::sequence).max().unwrap_or(0);
        let mut state = SelectionState {
            next_sequence: highest.max(selected.len() as u64),
            selected,
            known_orders: Vec::new(),
        };
        state.merge_known_orders(&orders);
        state
    }

    pub fn selected(&self) -> &[SelectionEntry] {
        &self.selected
    }

    pub fn known_orders(&self) -> &[Order] {
        &self.known_orders
    }

    pub fn known_order(&self, id: &OrderId) -> Option<&Order> {
        self.known_orders.iter().find(|o| &o.id == id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, identity: &LineItemId) -> bool {
        self.selected
            .iter()
            .any(|entry| entry.identity() == Some(identity))
    }

    /// Identities of every selected entry
    pub fn identities(&self) -> HashSet<&LineItemId> {
        self.selected.iter().filter_map(SelectionEntry::identity).collect()
    }

    /// Selection intent for a batch: select when any item is missing
    pub fn is_any_absent(&self, items: &[LineItem]) -> bool {
        items
            .iter()
            .filter_map(resolve_line_item)
            .any(|id| !self.contains(id))
    }

    /// Number of the order's line items that are currently selected
    pub fn selected_count_for(&self, order: &Order) -> usize {
        let identities = self.identities();
        order
            .line_items
            .iter()
            .filter(|li| identities.contains(&li.id))
            .count()
    }

    /// Entries attributed to the given order
    pub fn selected_for_order<'a>(
        &'a self,
        order: &'a Order,
    ) -> impl Iterator<Item = &'a SelectionEntry> + 'a {
        self.selected.iter().filter(move |entry| entry.belongs_to(order))
    }

    /// Append items that are not yet selected.
    ///
    /// Each new entry takes the next display sequence. `owning_orders` are
    /// merged into the known orders; records already known are kept as-is.
    pub fn add_line_items(&mut self, items: &[LineItem], owning_orders: &[Order]) -> SelectionChange {
        let mut change = SelectionChange::default();

        for item in items {
            let Some(identity) = resolve_line_item(item) else {
                change.skipped += 1;
                continue;
            };
            if self.contains(identity) {
                change.skipped += 1;
                continue;
            }
            let Some(order) = find_owner(item, owning_orders, &self.known_orders) else {
                tracing::debug!(line_item = %identity, "no owning order supplied, skipping");
                change.skipped += 1;
                continue;
            };

            self.next_sequence += 1;
            let entry = SelectedLineItem::from_line_item(item, order, self.next_sequence);
            self.selected.push(SelectionEntry::Bare(entry));
            change.added.push(identity.clone());
        }

        self.merge_known_orders(owning_orders);

        tracing::debug!(
            added = change.added.len(),
            skipped = change.skipped,
            selected = self.selected.len(),
            known_orders = self.known_orders.len(),
            "add_line_items"
        );
        change
    }

    /// Drop items from the selection and re-derive the known orders.
    ///
    /// An order stays known while it owns a remaining entry or when it is
    /// passed again in `owning_orders`, which pins it.
    pub fn remove_line_items(&mut self, items: &[LineItem], owning_orders: &[Order]) -> SelectionChange {
        let targets: HashSet<&LineItemId> = items.iter().filter_map(resolve_line_item).collect();
        let unresolved = items.len() - items.iter().filter_map(resolve_line_item).count();

        let mut removed = Vec::new();
        self.selected.retain(|entry| match entry.identity() {
            Some(id) if targets.contains(id) => {
                removed.push(id.clone());
                false
            }
            _ => true,
        });

        self.recompute_known_orders(owning_orders);

        let change = SelectionChange {
            skipped: unresolved + (targets.len() - removed.len()),
            removed,
            ..Default::default()
        };
        tracing::debug!(
            removed = change.removed.len(),
            skipped = change.skipped,
            selected = self.selected.len(),
            known_orders = self.known_orders.len(),
            "remove_line_items"
        );
        change
    }

    /// Move the whole batch to the selected state, or out of it
    pub fn toggle(
        &mut self,
        items: &[LineItem],
        owning_orders: &[Order],
        make_selected: bool,
    ) -> SelectionChange {
        if make_selected {
            self.add_line_items(items, owning_orders)
        } else {
            self.remove_line_items(items, owning_orders)
        }
    }

    fn merge_known_orders(&mut self, orders: &[Order]) {
        for order in orders {
            if self.known_order(&order.id).is_none() {
                self.known_orders.push(order.clone());
            }
        }
    }

    fn recompute_known_orders(&mut self, pinned: &[Order]) {
        let mut candidates: Vec<Order> = Vec::new();
        for order in std::mem::take(&mut self.known_orders)
            .into_iter()
            .chain(pinned.iter().cloned())
        {
            if !candidates.iter().any(|o| o.id == order.id) {
                candidates.push(order);
            }
        }

        let selected = &self.selected;
        candidates.retain(|order| {
            pinned.iter().any(|p| p.id == order.id)
                || selected.iter().any(|entry| entry.belongs_to(order))
        });
        self.known_orders = candidates;
    }
}

/// Find the order a fetched line item belongs to.
///
/// Supplied orders win over known ones; membership by line item wins over
/// the item's own order reference.
fn find_owner<'a>(item: &LineItem, supplied: &'a [Order], known: &'a [Order]) -> Option<&'a Order> {
    let mut orders = supplied.iter().chain(known.iter());
    orders.clone().find(|o| o.owns(&item.id)).or_else(|| {
        item.order_id
            .as_ref()
            .and_then(|oid| orders.find(|o| &o.id == oid))
    })
}
