//! Edit-mode removal guard
//!
//! When a session edits an existing entity, the line items that were
//! already attached to it must not be detached by a toggle. The guard
//! filters them out of every removal batch before the selection set sees
//! it. In create mode nothing is filtered.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OrderpickError, Result};
use crate::identity::resolve_line_item;
use crate::model::{LineItem, LineItemId, Order, SelectionEntry};
use crate::selection::{SelectionChange, SelectionState};

/// Whether the session creates a new entity or edits an existing one.
/// Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    #[default]
    Create,
    Edit,
}

impl FromStr for ActionMode {
    type Err = OrderpickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(ActionMode::Create),
            "edit" => Ok(ActionMode::Edit),
            other => Err(OrderpickError::invalid_value("action mode", other)),
        }
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionMode::Create => write!(f, "create"),
            ActionMode::Edit => write!(f, "edit"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditGuard {
    mode: ActionMode,
    pre_existing: HashSet<LineItemId>,
}

impl EditGuard {
    pub fn new(mode: ActionMode, pre_existing: impl IntoIterator<Item = LineItemId>) -> Self {
        EditGuard {
            mode,
            pre_existing: pre_existing.into_iter().filter(|id| !id.is_empty()).collect(),
        }
    }

    /// Guard for a create session; protects nothing
    pub fn create() -> Self {
        Self::default()
    }

    /// Protect whatever the existing entries resolve to
    pub fn from_entries(mode: ActionMode, entries: &[SelectionEntry]) -> Self {
        Self::new(
            mode,
            entries.iter().filter_map(SelectionEntry::identity).cloned(),
        )
    }

    pub fn mode(&self) -> ActionMode {
        self.mode
    }

    pub fn is_protected(&self, identity: &LineItemId) -> bool {
        self.mode == ActionMode::Edit && self.pre_existing.contains(identity)
    }

    /// The removal batch with protected items taken out
    pub fn filter_removals<'a>(&self, items: &'a [LineItem]) -> Cow<'a, [LineItem]> {
        if self.mode == ActionMode::Create || self.pre_existing.is_empty() {
            return Cow::Borrowed(items);
        }
        Cow::Owned(
            items
                .iter()
                .filter(|item| !resolve_line_item(item).is_some_and(|id| self.is_protected(id)))
                .cloned()
                .collect(),
        )
    }

    /// Remove through the guard
    pub fn remove_line_items(
        &self,
        state: &mut SelectionState,
        items: &[LineItem],
        owning_orders: &[Order],
    ) -> SelectionChange {
        let allowed = self.filter_removals(items);
        let protected = items.len() - allowed.len();
        if protected > 0 {
            tracing::debug!(protected, mode = %self.mode, "kept pre-existing line items");
        }

        let mut change = state.remove_line_items(&allowed, owning_orders);
        change.protected = protected;
        change
    }

    /// Toggle through the guard; only the removal path is filtered
    pub fn toggle(
        &self,
        state: &mut SelectionState,
        items: &[LineItem],
        owning_orders: &[Order],
        make_selected: bool,
    ) -> SelectionChange {
        if make_selected {
            state.add_line_items(items, owning_orders)
        } else {
            self.remove_line_items(state, items, owning_orders)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkedLineItem;

    fn setup() -> (Order, SelectionState) {
        let order = Order::new("O1", vec![LineItem::new("L1", "1"), LineItem::new("L2", "2")]);
        let mut state = SelectionState::new();
        state.add_line_items(&order.line_items, &[order.clone()]);
        (order, state)
    }

    fn selected_ids(state: &SelectionState) -> Vec<String> {
        state
            .selected()
            .iter()
            .filter_map(SelectionEntry::identity)
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn test_edit_mode_protects_pre_existing() {
        let (order, mut state) = setup();
        let guard = EditGuard::new(ActionMode::Edit, [LineItemId::from("L1")]);

        let change = guard.remove_line_items(&mut state, &order.line_items, &[]);

        assert_eq!(selected_ids(&state), vec!["L1"]);
        assert_eq!(change.removed, vec![LineItemId::from("L2")]);
        assert_eq!(change.protected, 1);
    }

    #[test]
    fn test_create_mode_filters_nothing() {
        let (order, mut state) = setup();
        let guard = EditGuard::new(ActionMode::Create, [LineItemId::from("L1")]);

        let change = guard.remove_line_items(&mut state, &order.line_items, &[]);

        assert!(state.is_empty());
        assert_eq!(change.protected, 0);
        assert!(matches!(guard.filter_removals(&order.line_items), Cow::Borrowed(_)));
    }

    #[test]
    fn test_guard_from_wrapped_entries() {
        let entries = vec![SelectionEntry::Linked(LinkedLineItem::new("F1", "L2"))];
        let guard = EditGuard::from_entries(ActionMode::Edit, &entries);

        assert!(guard.is_protected(&LineItemId::from("L2")));
        assert!(!guard.is_protected(&LineItemId::from("F1")));
    }

    #[test]
    fn test_toggle_add_is_unfiltered() {
        let order = Order::new("O1", vec![LineItem::new("L1", "1")]);
        let mut state = SelectionState::new();
        let guard = EditGuard::new(ActionMode::Edit, [LineItemId::from("L1")]);

        guard.toggle(&mut state, &order.line_items, &[order.clone()], true);
        assert_eq!(selected_ids(&state), vec!["L1"]);

        guard.toggle(&mut state, &order.line_items, &[], false);
        assert_eq!(selected_ids(&state), vec!["L1"]);
    }

    #[test]
    fn test_action_mode_parse() {
        assert_eq!("EDIT".parse::<ActionMode>().unwrap(), ActionMode::Edit);
        assert_eq!("create".parse::<ActionMode>().unwrap(), ActionMode::Create);
        assert!("update".parse::<ActionMode>().is_err());
    }
}
