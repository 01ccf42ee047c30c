//! Interactive selection session
//!
//! A `SelectionSession` is the single owner of one dialog's selection
//! state. It combines the selection set, the edit guard and the catalog of
//! every order fetched so far, and reports the selection to an optional
//! consumer after each mutation.

use std::slice;

use serde::Serialize;

use crate::aggregate::{self, Coverage};
use crate::fetch::OrderPage;
use crate::guard::{ActionMode, EditGuard};
use crate::model::{LineItem, Order, OrderId, SelectionEntry};
use crate::selection::{SelectionChange, SelectionState};

/// Receives the full selection after every mutation
pub trait SelectionConsumer {
    fn selection_changed(&mut self, selected: &[SelectionEntry], known_orders: &[Order]);
}

impl<F> SelectionConsumer for F
where
    F: FnMut(&[SelectionEntry], &[Order]),
{
    fn selection_changed(&mut self, selected: &[SelectionEntry], known_orders: &[Order]) {
        self(selected, known_orders)
    }
}

/// What the session hands back when the dialog closes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub selected: Vec<SelectionEntry>,
    pub orders: Vec<Order>,
    pub all_orders: Vec<Order>,
}

pub struct SelectionSession {
    state: SelectionState,
    guard: EditGuard,
    catalog: Vec<Order>,
    consumer: Option<Box<dyn SelectionConsumer>>,
}

impl SelectionSession {
    /// Session for a new entity: empty selection, nothing protected
    pub fn create() -> Self {
        SelectionSession {
            state: SelectionState::new(),
            guard: EditGuard::create(),
            catalog: Vec::new(),
            consumer: None,
        }
    }

    /// Session seeded with the line items already on the entity.
    ///
    /// In edit mode those items are protected from removal.
    pub fn with_existing(mode: ActionMode, existing: Vec<SelectionEntry>, orders: Vec<Order>) -> Self {
        let guard = EditGuard::from_entries(mode, &existing);
        SelectionSession {
            state: SelectionState::seeded(existing, orders),
            guard,
            catalog: Vec::new(),
            consumer: None,
        }
    }

    pub fn with_consumer(mut self, consumer: impl SelectionConsumer + 'static) -> Self {
        self.consumer = Some(Box::new(consumer));
        self
    }

    pub fn selection(&self) -> &SelectionState {
        &self.state
    }

    pub fn guard(&self) -> &EditGuard {
        &self.guard
    }

    /// Every order fetched during the session, latest record per id
    pub fn catalog(&self) -> &[Order] {
        &self.catalog
    }

    pub fn catalog_order(&self, id: &OrderId) -> Option<&Order> {
        self.catalog.iter().find(|o| &o.id == id)
    }

    /// Merge a fetched page into the catalog.
    ///
    /// A re-fetched order replaces its cached record so coverage is
    /// computed against the current line-item list.
    pub fn ingest_page(&mut self, page: OrderPage) {
        let fetched = page.orders.len();
        for order in page.orders {
            match self.catalog.iter_mut().find(|o| o.id == order.id) {
                Some(existing) => *existing = order,
                None => self.catalog.push(order),
            }
        }
        tracing::debug!(fetched, catalog = self.catalog.len(), "ingest_page");
    }

    /// Toggle one line item of `order`
    pub fn toggle_line_item(&mut self, item: &LineItem, order: &Order) -> SelectionChange {
        let items = slice::from_ref(item);
        let make_selected = self.state.is_any_absent(items);
        let change = self
            .guard
            .toggle(&mut self.state, items, slice::from_ref(order), make_selected);
        self.notify();
        change
    }

    /// Toggle every line item of `order`
    pub fn toggle_order(&mut self, order: &Order) -> SelectionChange {
        let change = aggregate::toggle_order(order, &mut self.state, &self.guard);
        self.notify();
        change
    }

    pub fn classify_order(&self, order: &Order) -> Coverage {
        aggregate::classify(order, &self.state)
    }

    /// Close the session and hand the selection back
    pub fn finish(self) -> SessionOutcome {
        tracing::debug!(
            selected = self.state.len(),
            orders = self.state.known_orders().len(),
            "finish_session"
        );
        SessionOutcome {
            selected: self.state.selected().to_vec(),
            orders: self.state.known_orders().to_vec(),
            all_orders: self.catalog,
        }
    }

    fn notify(&mut self) {
        if let Some(consumer) = self.consumer.as_mut() {
            consumer.selection_changed(self.state.selected(), self.state.known_orders());
        }
    }
}
