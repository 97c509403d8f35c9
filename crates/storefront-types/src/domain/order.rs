use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::cart::Cart;
use super::errors::{CartError, DomainError};
use super::role::Role;
use super::{Amount, Id};
use crate::ports::repository::Record;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderStatus {
    #[serde(rename = "placed")]
    Placed,
    #[serde(rename = "accepted")]
    Accepted,
    #[serde(rename = "in-transit")]
    InTransit,
    #[serde(rename = "delivered")]
    Delivered,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Accepted,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The linear delivery sequence; `Cancelled` sits outside it.
    pub const PROGRESSION: [OrderStatus; 4] = [
        OrderStatus::Placed,
        OrderStatus::Accepted,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InTransit => "in-transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Position in the delivery sequence, `None` for `Cancelled`.
    pub fn step_index(&self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|s| s == self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `role` may move an order from `self` to `next`.
    ///
    /// Drivers push the order forward one step at a time. Customers may
    /// cancel until a driver accepts; merchants may cancel any open order.
    pub fn allows(&self, next: OrderStatus, role: Role) -> bool {
        use OrderStatus::*;
        match (self, next, role) {
            (Placed, Accepted, Role::Driver)
            | (Accepted, InTransit, Role::Driver)
            | (InTransit, Delivered, Role::Driver) => true,
            (Placed, Cancelled, Role::Customer) => true,
            (from, Cancelled, Role::Merchant) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown order status {s}")))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    MobileMoney,
    Card,
    Cash,
}

impl PaymentMethod {
    /// Cash is settled at the door; the other methods need a phone number.
    pub fn requires_phone(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

/// Identity of a participant (customer, merchant, driver) as stored on orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Party {
    pub id: String,
    pub name: String,
}

impl Party {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLine {
    pub name: String,
    pub price: Amount,
    pub quantity: u32,
}

impl OrderLine {
    pub fn subtotal(&self) -> Result<Amount, CartError> {
        self.price
            .checked_mul(Amount::from(self.quantity))
            .ok_or(CartError::AmountOverflow)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Id,
    pub customer_id: String,
    pub customer_name: String,
    pub merchant_id: String,
    pub merchant_name: String,
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    pub lines: Vec<OrderLine>,
    pub total_amount: Amount,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Delivery and payment details collected on the checkout form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub delivery_address: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrder {
    pub customer: Party,
    pub merchant: Party,
    #[serde(default)]
    pub driver: Option<Party>,
    pub lines: Vec<OrderLine>,
    pub total_amount: Amount,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: OrderStatus,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewOrder {
    /// Builds the order placed at checkout: lines snapshot the cart, the
    /// delivery fee is added once and the order starts out `placed`. The
    /// merchant is the one selling the first cart line.
    pub fn from_cart(
        cart: &Cart,
        details: CheckoutDetails,
        customer: Party,
    ) -> Result<Self, DomainError> {
        let first = cart
            .lines()
            .first()
            .ok_or_else(|| DomainError::Validation("cart is empty".into()))?;
        let delivery_address = details.delivery_address.trim().to_string();
        if delivery_address.is_empty() {
            return Err(DomainError::Validation("delivery address empty".into()));
        }
        let phone_number = non_blank(details.phone_number);
        if details.payment_method.requires_phone() && phone_number.is_none() {
            return Err(DomainError::Validation(
                "phone number required for this payment method".into(),
            ));
        }

        let total_amount = cart.total_with_delivery()?;

        let merchant = Party::new(
            first.product.merchant_id.clone(),
            first.product.merchant_name.clone(),
        );
        let lines = cart
            .lines()
            .iter()
            .map(|l| OrderLine {
                name: l.product.name.clone(),
                price: l.product.price,
                quantity: l.quantity,
            })
            .collect();

        Ok(Self {
            customer,
            merchant,
            driver: None,
            lines,
            total_amount,
            delivery_address,
            payment_method: details.payment_method,
            phone_number,
            notes: non_blank(details.notes),
            status: OrderStatus::Placed,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderPatch {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub driver: Option<Party>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Order {
    /// Order number as shown to users, e.g. `#0007`.
    pub fn display_number(&self) -> String {
        format_order_number(self.id)
    }

    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Checks a status change requested by `actor` acting as `role` and
    /// returns the patch that applies it. Accepting assigns the driver.
    pub fn transition(
        &self,
        to: OrderStatus,
        role: Role,
        actor: &Party,
    ) -> Result<OrderPatch, DomainError> {
        if !self.status.allows(to, role) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to,
                role,
            });
        }
        let driver = (to == OrderStatus::Accepted).then(|| actor.clone());
        Ok(OrderPatch {
            status: Some(to),
            driver,
            ..Default::default()
        })
    }
}

pub fn format_order_number(id: Id) -> String {
    format!("#{id:04}")
}

impl Record for Order {
    type Draft = NewOrder;
    type Patch = OrderPatch;

    const KIND: &'static str = "order";

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: NewOrder, now: DateTime<Utc>) -> Self {
        let (driver_id, driver_name) = match draft.driver {
            Some(d) => (Some(d.id), Some(d.name)),
            None => (None, None),
        };
        Self {
            id,
            customer_id: draft.customer.id,
            customer_name: draft.customer.name,
            merchant_id: draft.merchant.id,
            merchant_name: draft.merchant.name,
            driver_id,
            driver_name,
            lines: draft.lines,
            total_amount: draft.total_amount,
            delivery_address: draft.delivery_address,
            payment_method: draft.payment_method,
            phone_number: draft.phone_number,
            notes: draft.notes,
            status: draft.status,
            created_at: now,
            updated_at: None,
        }
    }

    fn apply_patch(&mut self, patch: OrderPatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(driver) = patch.driver {
            self.driver_id = Some(driver.id);
            self.driver_name = Some(driver.name);
        }
        if let Some(address) = patch.delivery_address {
            self.delivery_address = address;
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
        self.updated_at = Some(now);
    }
}
