//! Presentation records derived from orders: status badge, step tracker,
//! role-dependent counterpart and the order list filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::order::{Order, OrderLine, OrderStatus};
use super::role::Role;
use super::{Amount, Id};

/// Icon name and French label shown for a status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusDisplay {
    pub icon: String,
    pub label: String,
}

/// Icon used when the status is not one we know.
pub const FALLBACK_STATUS_ICON: &str = "Clock";

fn status_entry(status: OrderStatus) -> (&'static str, &'static str) {
    match status {
        OrderStatus::Placed => ("Clock", "Commandé"),
        OrderStatus::Accepted => ("CheckCircle", "Accepté"),
        OrderStatus::InTransit => ("Truck", "En livraison"),
        OrderStatus::Delivered => ("Package", "Livré"),
        OrderStatus::Cancelled => ("X", "Annulé"),
    }
}

pub fn status_display(status: OrderStatus) -> StatusDisplay {
    let (icon, label) = status_entry(status);
    StatusDisplay {
        icon: icon.into(),
        label: label.into(),
    }
}

/// Maps a raw status string. Unknown values keep their text as the label
/// and get the fallback icon.
pub fn status_display_raw(raw: &str) -> StatusDisplay {
    match OrderStatus::from_str(raw) {
        Ok(status) => status_display(status),
        Err(_) => StatusDisplay {
            icon: FALLBACK_STATUS_ICON.into(),
            label: raw.into(),
        },
    }
}

/// Name of the other party in the order from the viewer's point of view.
pub fn counterpart_name(order: &Order, role: Role) -> &str {
    match role {
        Role::Customer => &order.merchant_name,
        Role::Driver | Role::Merchant => &order.customer_name,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerStep {
    pub status: OrderStatus,
    pub icon: String,
    pub label: String,
    pub completed: bool,
    pub current: bool,
}

/// The placed → accepted → in-transit → delivered timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusTracker {
    pub steps: Vec<TrackerStep>,
    pub cancelled: bool,
}

impl StatusTracker {
    pub fn new(status: OrderStatus) -> Self {
        let current = status.step_index();
        let steps = OrderStatus::PROGRESSION
            .iter()
            .enumerate()
            .map(|(index, step)| {
                // the first step reads "ordered" with a bag, not the badge clock
                let icon = match step {
                    OrderStatus::Placed => "ShoppingBag",
                    other => status_entry(*other).0,
                };
                TrackerStep {
                    status: *step,
                    icon: icon.into(),
                    label: status_entry(*step).1.into(),
                    completed: current.is_some_and(|c| index <= c),
                    current: current == Some(index),
                }
            })
            .collect();
        Self {
            steps,
            cancelled: status == OrderStatus::Cancelled,
        }
    }

    pub fn current_step(&self) -> Option<&TrackerStep> {
        self.steps.iter().find(|s| s.current)
    }
}

/// Number of lines shown on an order card before "+N autres articles".
pub const PREVIEW_LINES: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderView {
    pub id: Id,
    pub number: String,
    pub status: OrderStatus,
    pub status_display: StatusDisplay,
    pub counterpart: String,
    pub total_amount: Amount,
    pub item_count: usize,
    pub preview: Vec<OrderLine>,
    pub more_items: usize,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
    pub tracker: StatusTracker,
    pub can_accept: bool,
}

impl OrderView {
    pub fn new(order: &Order, role: Role) -> Self {
        let item_count = order.lines.len();
        Self {
            id: order.id,
            number: order.display_number(),
            status: order.status,
            status_display: status_display(order.status),
            counterpart: counterpart_name(order, role).to_string(),
            total_amount: order.total_amount,
            item_count,
            preview: order.lines.iter().take(PREVIEW_LINES).cloned().collect(),
            more_items: item_count.saturating_sub(PREVIEW_LINES),
            delivery_address: order.delivery_address.clone(),
            created_at: order.created_at,
            tracker: StatusTracker::new(order.status),
            can_accept: role == Role::Driver && order.status == OrderStatus::Placed,
        }
    }
}

/// Status selector on the orders screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => order.status == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = super::errors::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

pub fn filter_orders(orders: &[Order], filter: StatusFilter) -> Vec<Order> {
    orders.iter().filter(|o| filter.matches(o)).cloned().collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub by_status: BTreeMap<OrderStatus, usize>,
}

impl StatusCounts {
    pub fn get(&self, status: OrderStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Per-status counters for the filter chips; every status is present.
pub fn status_counts(orders: &[Order]) -> StatusCounts {
    let mut by_status: BTreeMap<OrderStatus, usize> =
        OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for order in orders {
        *by_status.entry(order.status).or_default() += 1;
    }
    StatusCounts {
        total: orders.len(),
        by_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::tests::order_with_status;

    #[test]
    fn fixed_status_table() {
        let in_transit = status_display(OrderStatus::InTransit);
        assert_eq!(in_transit.icon, "Truck");
        assert_eq!(in_transit.label, "En livraison");

        assert_eq!(status_display_raw("placed").label, "Commandé");
        assert_eq!(status_display_raw("delivered").icon, "Package");
        assert_eq!(status_display_raw("cancelled").icon, "X");
        assert_eq!(status_display_raw("in-transit").icon, "Truck");
    }

    #[test]
    fn unknown_status_falls_back_without_panicking() {
        let shown = status_display_raw("lost-at-sea");
        assert_eq!(shown.icon, FALLBACK_STATUS_ICON);
        assert_eq!(shown.label, "lost-at-sea");
    }

    #[test]
    fn counterpart_depends_on_role() {
        let mut order = order_with_status(1, OrderStatus::Placed);
        order.customer_name = "Awa".into();
        order.merchant_name = "Boutique Locale".into();
        assert_eq!(counterpart_name(&order, Role::Customer), "Boutique Locale");
        assert_eq!(counterpart_name(&order, Role::Driver), "Awa");
        assert_eq!(counterpart_name(&order, Role::Merchant), "Awa");
    }

    #[test]
    fn tracker_completes_steps_up_to_current() {
        let tracker = StatusTracker::new(OrderStatus::InTransit);
        let completed: Vec<bool> = tracker.steps.iter().map(|s| s.completed).collect();
        assert_eq!(completed, vec![true, true, true, false]);
        assert_eq!(
            tracker.current_step().map(|s| s.status),
            Some(OrderStatus::InTransit)
        );
        assert_eq!(tracker.steps[0].icon, "ShoppingBag");
        assert!(!tracker.cancelled);
    }

    #[test]
    fn cancelled_order_sits_outside_the_tracker() {
        let tracker = StatusTracker::new(OrderStatus::Cancelled);
        assert!(tracker.cancelled);
        assert!(tracker.current_step().is_none());
        assert!(tracker.steps.iter().all(|s| !s.completed));
    }

    #[test]
    fn view_previews_two_lines_and_flags_driver_accept() {
        let mut order = order_with_status(12, OrderStatus::Placed);
        order.lines = (1..=4)
            .map(|i| OrderLine {
                name: format!("Article {i}"),
                price: 100,
                quantity: 1,
            })
            .collect();

        let driver_view = OrderView::new(&order, Role::Driver);
        assert_eq!(driver_view.number, "#0012");
        assert_eq!(driver_view.preview.len(), 2);
        assert_eq!(driver_view.more_items, 2);
        assert!(driver_view.can_accept);

        let customer_view = OrderView::new(&order, Role::Customer);
        assert!(!customer_view.can_accept);
        assert_eq!(customer_view.counterpart, order.merchant_name);
    }

    #[test]
    fn status_filter_and_counts() {
        let orders = vec![
            order_with_status(1, OrderStatus::Placed),
            order_with_status(2, OrderStatus::Delivered),
            order_with_status(3, OrderStatus::Placed),
        ];
        let placed = filter_orders(&orders, "placed".parse().unwrap());
        assert_eq!(placed.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(filter_orders(&orders, StatusFilter::All).len(), 3);
        assert!("bogus".parse::<StatusFilter>().is_err());

        let counts = status_counts(&orders);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.get(OrderStatus::Placed), 2);
        assert_eq!(counts.get(OrderStatus::InTransit), 0);

        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["by_status"]["placed"], 2);
        assert_eq!(json["by_status"]["in-transit"], 0);
        let back: StatusCounts = serde_json::from_value(json).unwrap();
        assert_eq!(back, counts);
    }
}
