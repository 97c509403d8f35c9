use thiserror::Error;

use super::order::OrderStatus;
use super::role::Role;
use super::Id;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{role} may not move an order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
        role: Role,
    },

    #[error(transparent)]
    Cart(#[from] CartError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("product {0} appears more than once in the cart")]
    DuplicateLine(Id),

    #[error("amount overflow")]
    AmountOverflow,
}
