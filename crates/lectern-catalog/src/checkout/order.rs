//! Order types.

use crate::catalog::BookSummary;
use crate::ids::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status.
///
/// Older backends only report the first three; the delivery statuses come
/// from the later revision. Transitions happen server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Accepted by an administrator.
    Approved,
    /// Declined by an administrator.
    Rejected,
    InProcessing,
    InDelivery,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Approved,
        OrderStatus::Rejected,
        OrderStatus::InProcessing,
        OrderStatus::InDelivery,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    /// Lowercase name, as accepted by the `state` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
            OrderStatus::InProcessing => "in_processing",
            OrderStatus::InDelivery => "in_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::InProcessing => "In processing",
            OrderStatus::InDelivery => "In delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Canceled => "Canceled",
        }
    }

    /// Whether an administrator can still approve or reject the order.
    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected | OrderStatus::Delivered | OrderStatus::Canceled
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("unknown order status '{}'", s.trim()))
    }
}

/// An order as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub requested_books: Vec<BookSummary>,
    /// Requester name, present in the administrator listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Order {
    /// Requester display name, if the listing carried one.
    pub fn requester(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }

    /// Titles of the requested books, comma separated.
    pub fn titles(&self) -> String {
        self.requested_books
            .iter()
            .map(|b| b.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Status subset used to filter order listings.
///
/// An empty filter lists every status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFilter {
    statuses: Vec<OrderStatus>,
}

impl StatusFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, status: OrderStatus) -> Self {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self
    }

    pub fn is_all(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn statuses(&self) -> &[OrderStatus] {
        &self.statuses
    }

    /// Value of the `state` query parameter, `None` when unfiltered.
    pub fn to_param(&self) -> Option<String> {
        if self.statuses.is_empty() {
            return None;
        }
        Some(
            self.statuses
                .iter()
                .map(OrderStatus::as_str)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

impl FromIterator<OrderStatus> for StatusFilter {
    fn from_iter<I: IntoIterator<Item = OrderStatus>>(iter: I) -> Self {
        iter.into_iter().fold(Self::all(), StatusFilter::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        let status: OrderStatus = serde_json::from_str("\"IN_DELIVERY\"").unwrap();
        assert_eq!(status, OrderStatus::InDelivery);
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"PENDING\"");
    }

    #[test]
    fn test_status_predicates() {
        assert!(OrderStatus::Pending.is_pending());
        assert!(!OrderStatus::Approved.is_pending());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(!OrderStatus::InDelivery.is_terminal());
        assert_eq!(OrderStatus::InProcessing.label(), "In processing");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Approved".parse::<OrderStatus>().unwrap(), OrderStatus::Approved);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_filter_param() {
        assert_eq!(StatusFilter::all().to_param(), None);
        let filter: StatusFilter = [OrderStatus::Pending, OrderStatus::Approved, OrderStatus::Pending]
            .into_iter()
            .collect();
        assert_eq!(filter.to_param().as_deref(), Some("pending,approved"));
    }

    #[test]
    fn test_order_payload() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 3,
                "status": "PENDING",
                "created_at": "2024-03-01T10:00:00Z",
                "first_name": "Ann",
                "last_name": "Lee",
                "requested_books": [{"id": 1, "title": "Programming Rust", "isbn": "1", "num_pages": 550}]
            }"#,
        )
        .unwrap();
        assert_eq!(order.id, OrderId::new(3));
        assert_eq!(order.requester().as_deref(), Some("Ann Lee"));
        assert_eq!(order.titles(), "Programming Rust");
    }
}
