//! Order fetching
//!
//! The engine never talks to a backend itself; it consumes pages through
//! [`OrderFetcher`]. [`StaticOrderSource`] serves pages from an order list
//! loaded into memory.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OrderpickError, Result};
use crate::model::Order;

/// Status filter applied when only bookable orders are listed
pub const READY_FOR_BOOKING: &str = "READY_FOR_BOOKING";

/// Sort key for order pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderByKey {
    #[default]
    CreatedDate,
    PurchaseOrderNumber,
    Id,
}

impl FromStr for OrderByKey {
    type Err = OrderpickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "CREATED_DATE" => Ok(OrderByKey::CreatedDate),
            "PURCHASE_ORDER_NUMBER" => Ok(OrderByKey::PurchaseOrderNumber),
            "ID" => Ok(OrderByKey::Id),
            other => Err(OrderpickError::invalid_value("order by key", other)),
        }
    }
}

/// Sort direction for order pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = OrderpickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(OrderpickError::invalid_value("sort direction", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// Paging, search, and filter parameters for one fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub first: usize,
    pub after: usize,
    pub order_by_key: OrderByKey,
    pub order_by_value: SortDirection,
    pub search: Option<String>,
    pub filters: Vec<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams::page(0, 10)
    }
}

impl PageParams {
    /// Parameters for the zero-based page `index` of `size` orders
    pub fn page(index: usize, size: usize) -> Self {
        PageParams {
            first: size,
            after: index * size,
            order_by_key: OrderByKey::default(),
            order_by_value: SortDirection::default(),
            search: None,
            filters: Vec::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    pub fn with_order(mut self, key: OrderByKey, direction: SortDirection) -> Self {
        self.order_by_key = key;
        self.order_by_value = direction;
        self
    }

    /// Restrict to orders that are ready for booking
    pub fn bookable_only(mut self) -> Self {
        if !self.filters.iter().any(|f| f == READY_FOR_BOOKING) {
            self.filters.push(READY_FOR_BOOKING.to_string());
        }
        self
    }
}

/// One fetched page of orders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total_count: usize,
}

/// Source of paginated orders with their line items
pub trait OrderFetcher {
    fn fetch_orders(&self, params: &PageParams) -> Result<OrderPage>;
}

/// Orders held in memory, served page by page
#[derive(Debug, Clone, Default)]
pub struct StaticOrderSource {
    orders: Vec<Order>,
}

impl StaticOrderSource {
    pub fn new(mut orders: Vec<Order>) -> Self {
        for order in &mut orders {
            order.adopt_line_items();
        }
        StaticOrderSource { orders }
    }

    /// Load a JSON array of orders
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let orders: Vec<Order> = serde_json::from_str(&content)
            .map_err(|e| OrderpickError::invalid_input(path.display(), e))?;
        Ok(Self::new(orders))
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    fn matches(order: &Order, params: &PageParams) -> bool {
        let status_ok = params.filters.is_empty()
            || order
                .status
                .as_ref()
                .is_some_and(|s| params.filters.iter().any(|f| f == s));

        let search_ok = match &params.search {
            None => true,
            Some(search) => {
                let needle = search.to_lowercase();
                order.id.as_str().to_lowercase().contains(&needle)
                    || order
                        .purchase_order_number
                        .as_ref()
                        .is_some_and(|po| po.to_lowercase().contains(&needle))
            }
        };

        status_ok && search_ok
    }
}

fn compare(a: &Order, b: &Order, key: OrderByKey) -> Ordering {
    match key {
        OrderByKey::CreatedDate => a.created_date.cmp(&b.created_date),
        OrderByKey::PurchaseOrderNumber => a.purchase_order_number.cmp(&b.purchase_order_number),
        OrderByKey::Id => a.id.cmp(&b.id),
    }
}

impl OrderFetcher for StaticOrderSource {
    fn fetch_orders(&self, params: &PageParams) -> Result<OrderPage> {
        if params.first == 0 {
            crate::bail_invalid!("page size", 0);
        }

        let mut matching: Vec<&Order> = self
            .orders
            .iter()
            .filter(|order| Self::matches(order, params))
            .collect();

        matching.sort_by(|a, b| {
            let ord = compare(a, b, params.order_by_key);
            match params.order_by_value {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total_count = matching.len();
        let orders = matching
            .into_iter()
            .skip(params.after)
            .take(params.first)
            .cloned()
            .collect();

        tracing::debug!(
            first = params.first,
            after = params.after,
            total_count,
            "fetch_orders"
        );
        Ok(OrderPage {
            orders,
            total_count,
        })
    }
}
