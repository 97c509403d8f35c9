pub mod cart;
pub mod catalog;
pub mod chat;
pub mod errors;
pub mod order;
pub mod order_view;
pub mod product;
pub mod role;

/// Identifier shared by every stored record.
pub type Id = u64;

/// Amount in the smallest unit of the storefront currency (FCFA has no subunit).
pub type Amount = i64;
