//! Order, line item and selection entry types
//!
//! Field names follow the upstream camelCase payloads so fetched orders and
//! pre-existing selections can be loaded straight from JSON.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an id from any string-like value
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Get the id string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the upstream record carried no usable id
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }
    };
}

string_id!(
    /// Identifier of an order line item
    LineItemId
);
string_id!(
    /// Identifier of a purchase order
    OrderId
);
string_id!(
    /// Identifier of the organization that owns new locations
    OrgId
);

/// Line numbers arrive as either JSON strings or numbers
fn deserialize_line_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

/// A single line of an order, as produced by the order fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,

    #[serde(default, deserialize_with = "deserialize_line_number")]
    pub line_number: String,

    /// Display fields the engine never looks at
    #[serde(default, flatten)]
    pub fields: Map<String, Value>,
}

impl LineItem {
    pub fn new(id: impl Into<LineItemId>, line_number: impl Into<String>) -> Self {
        LineItem {
            id: id.into(),
            order_id: None,
            line_number: line_number.into(),
            fields: Map::new(),
        }
    }

    /// Numeric line number, if the upstream text parses as one
    pub fn line_number_value(&self) -> Option<f64> {
        self.line_number.trim().parse::<f64>().ok()
    }
}

/// A purchase order with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_order_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Order {
    pub fn new(id: impl Into<OrderId>, line_items: Vec<LineItem>) -> Self {
        let mut order = Order {
            id: id.into(),
            purchase_order_number: None,
            status: None,
            created_date: None,
            line_items,
        };
        order.adopt_line_items();
        order
    }

    /// Stamp this order's id onto line items that arrived without one
    pub fn adopt_line_items(&mut self) {
        for item in &mut self.line_items {
            if item.order_id.is_none() {
                item.order_id = Some(self.id.clone());
            }
        }
    }

    /// Whether a line item with this id belongs to the order
    pub fn owns(&self, line_item: &LineItemId) -> bool {
        self.line_items.iter().any(|li| &li.id == line_item)
    }

    pub fn line_item(&self, line_item: &LineItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|li| &li.id == line_item)
    }

    /// Line items in ascending line-number order; unparsable numbers last
    pub fn sorted_line_items(&self) -> Vec<&LineItem> {
        let mut items: Vec<&LineItem> = self.line_items.iter().collect();
        items.sort_by(|a, b| match (a.line_number_value(), b.line_number_value()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        items
    }
}

/// Reference to an order line item nested inside another record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRef {
    pub id: LineItemId,
}

/// An order line item copied into the selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedLineItem {
    /// The order line item's own id
    pub id: LineItemId,
    pub order_line_item_id: LineItemId,
    /// Line number of the item within its order
    #[serde(deserialize_with = "deserialize_line_number")]
    pub order_line_number: String,
    /// Display sequence within the selection
    #[serde(deserialize_with = "deserialize_line_number")]
    pub line_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_order_number: Option<String>,
    pub order_id: OrderId,
    #[serde(default, flatten)]
    pub fields: Map<String, Value>,
}

impl SelectedLineItem {
    pub fn from_line_item(item: &LineItem, order: &Order, sequence: u64) -> Self {
        SelectedLineItem {
            id: item.id.clone(),
            order_line_item_id: item.id.clone(),
            order_line_number: item.line_number.clone(),
            line_number: sequence.to_string(),
            purchase_order_number: order.purchase_order_number.clone(),
            order_id: order.id.clone(),
            fields: item.fields.clone(),
        }
    }
}

/// A record that already links to an order line item, such as a
/// fulfillment line on the entity being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedLineItem {
    pub id: LineItemId,
    #[serde(default, alias = "lineItem", skip_serializing_if = "Option::is_none")]
    pub order_line_item: Option<LineItemRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, flatten)]
    pub fields: Map<String, Value>,
}

impl LinkedLineItem {
    pub fn new(id: impl Into<LineItemId>, order_line_item: impl Into<LineItemId>) -> Self {
        LinkedLineItem {
            id: id.into(),
            order_line_item: Some(LineItemRef {
                id: order_line_item.into(),
            }),
            order_id: None,
            fields: Map::new(),
        }
    }
}

/// An entry of the selection set, in one of its two shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SelectionEntry {
    Bare(SelectedLineItem),
    Linked(LinkedLineItem),
}

impl SelectionEntry {
    /// Canonical line-item identity, see [`crate::identity::resolve`]
    pub fn identity(&self) -> Option<&LineItemId> {
        crate::identity::resolve(self)
    }

    /// Owning order, when the entry records one
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            SelectionEntry::Bare(item) => Some(&item.order_id),
            SelectionEntry::Linked(link) => link.order_id.as_ref(),
        }
    }

    /// Display sequence assigned at insertion; linked entries have none
    pub fn sequence(&self) -> Option<u64> {
        match self {
            SelectionEntry::Bare(item) => item.line_number.parse().ok(),
            SelectionEntry::Linked(_) => None,
        }
    }

    /// Whether this entry counts toward the given order
    pub fn belongs_to(&self, order: &Order) -> bool {
        self.order_id() == Some(&order.id) || self.identity().is_some_and(|id| order.owns(id))
    }
}
