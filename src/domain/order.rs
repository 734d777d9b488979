use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lines_total, CartItem};

/// Order progress. Variants are declared in lifecycle order.
///
/// Snapshots written by the first version of the app stored French labels;
/// they are still accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(alias = "En attente")]
    Pending,
    #[serde(alias = "Acceptée")]
    Accepted,
    #[serde(alias = "Prête")]
    Ready,
    #[serde(alias = "Terminée")]
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];

    /// Next state reachable through the timed simulation. `Ready` and `Completed`
    /// only move on through an explicit admin update.
    pub fn next_simulated(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Accepted),
            OrderStatus::Accepted => Some(OrderStatus::Ready),
            OrderStatus::Ready | OrderStatus::Completed => None,
        }
    }

    pub fn is_in_progress(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Accepted)
    }

    pub fn is_processed(self) -> bool {
        matches!(self, OrderStatus::Ready | OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

/// Represents a placed customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<DateTime<Utc>>,
}

impl Order {
    /// Snapshots cart lines into a new pending order.
    pub fn place(
        id: impl Into<String>,
        items: Vec<CartItem>,
        city: Option<String>,
        slot: Option<DateTime<Utc>>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            total: lines_total(&items),
            items,
            date,
            status: OrderStatus::Pending,
            city,
            slot,
        }
    }

    /// "Burger x2, Soda x1"
    pub fn summary(&self) -> String {
        self.items
            .iter()
            .map(|i| format!("{} x{}", i.product.title, i.qty))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Admin listing: newest first, optionally restricted to one status.
pub fn orders_by_status(orders: &[Order], status: Option<OrderStatus>) -> Vec<&Order> {
    let mut list: Vec<&Order> = orders
        .iter()
        .filter(|o| status.map_or(true, |s| o.status == s))
        .collect();
    list.sort_by(|a, b| b.date.cmp(&a.date));
    list
}
