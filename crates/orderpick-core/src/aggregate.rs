//! Per-order selection coverage
//!
//! Coverage is derived from the live selection on every call. Pagination
//! can hand back a different line-item list for the same order id, so the
//! totals are never cached.

use std::fmt;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::guard::EditGuard;
use crate::model::Order;
use crate::selection::{SelectionChange, SelectionState};

/// How much of an order is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Coverage {
    None,
    Partial,
    All,
}

impl Coverage {
    /// Checkbox state for rendering the order row
    pub fn icon_hint(self) -> &'static str {
        match self {
            Coverage::None => "unchecked",
            Coverage::Partial => "indeterminate",
            Coverage::All => "checked",
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::None => write!(f, "NONE"),
            Coverage::Partial => write!(f, "PARTIAL"),
            Coverage::All => write!(f, "ALL"),
        }
    }
}

/// Classify an order against the current selection.
///
/// An order without line items has nothing to select and reads as `None`.
pub fn classify(order: &Order, state: &SelectionState) -> Coverage {
    let total = order.line_items.len();
    let selected = state.selected_count_for(order);

    if selected == 0 {
        Coverage::None
    } else if selected >= total {
        Coverage::All
    } else {
        Coverage::Partial
    }
}

/// Toggle every line item of an order.
///
/// Anything short of `All` moves to `All`; `All` moves to `None`, except
/// for items the guard protects.
pub fn toggle_order(order: &Order, state: &mut SelectionState, guard: &EditGuard) -> SelectionChange {
    let make_selected = classify(order, state) != Coverage::All;
    tracing::debug!(order = %order.id, make_selected, "toggle_order");
    guard.toggle(state, &order.line_items, slice::from_ref(order), make_selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::ActionMode;
    use crate::model::{LineItem, LineItemId};

    fn three_line_order() -> Order {
        Order::new(
            "O",
            vec![
                LineItem::new("L1", "1"),
                LineItem::new("L2", "2"),
                LineItem::new("L3", "3"),
            ],
        )
    }

    #[test]
    fn test_classification_by_count() {
        let order = three_line_order();
        let mut state = SelectionState::new();
        assert_eq!(classify(&order, &state), Coverage::None);

        state.add_line_items(&order.line_items[0..1], &[order.clone()]);
        assert_eq!(classify(&order, &state), Coverage::Partial);

        state.add_line_items(&order.line_items[1..2], &[order.clone()]);
        assert_eq!(classify(&order, &state), Coverage::Partial);

        state.add_line_items(&order.line_items[2..3], &[order.clone()]);
        assert_eq!(classify(&order, &state), Coverage::All);
    }

    #[test]
    fn test_toggle_from_partial_selects_all() {
        let order = three_line_order();
        let mut state = SelectionState::new();
        let guard = EditGuard::create();
        state.add_line_items(&order.line_items[0..1], &[order.clone()]);

        toggle_order(&order, &mut state, &guard);
        assert_eq!(classify(&order, &state), Coverage::All);
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_toggle_from_all_returns_to_none() {
        let order = three_line_order();
        let mut state = SelectionState::new();
        let guard = EditGuard::create();

        toggle_order(&order, &mut state, &guard);
        assert_eq!(classify(&order, &state), Coverage::All);

        toggle_order(&order, &mut state, &guard);
        assert_eq!(classify(&order, &state), Coverage::None);
        assert!(state.is_empty());
        // the toggled order is pinned by the removal call
        assert_eq!(state.known_orders().len(), 1);
    }

    #[test]
    fn test_toggle_all_in_edit_mode_keeps_protected_items() {
        let order = three_line_order();
        let mut state = SelectionState::new();
        let guard = EditGuard::new(ActionMode::Edit, [LineItemId::from("L2")]);

        toggle_order(&order, &mut state, &guard);
        toggle_order(&order, &mut state, &guard);

        assert_eq!(classify(&order, &state), Coverage::Partial);
        assert!(state.contains(&LineItemId::from("L2")));
    }

    #[test]
    fn test_classification_follows_refetched_totals() {
        let order = three_line_order();
        let mut state = SelectionState::new();
        state.add_line_items(&order.line_items, &[order.clone()]);

        let mut refetched = order.clone();
        refetched.line_items.push(LineItem::new("L4", "4"));
        assert_eq!(classify(&refetched, &state), Coverage::Partial);
    }

    #[test]
    fn test_empty_order_is_none() {
        let order = Order::new("E", vec![]);
        assert_eq!(classify(&order, &SelectionState::new()), Coverage::None);
        assert_eq!(Coverage::None.icon_hint(), "unchecked");
    }
}
