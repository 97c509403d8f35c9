use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::CartError;
use super::product::Product;
use super::{Amount, Id};

/// Flat fee added once to every order.
pub const DELIVERY_FEE: Amount = 1000;

/// Product fields copied into the cart when it is added. Later edits to the
/// catalog do not reach lines already in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: Id,
    pub name: String,
    pub price: Amount,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub merchant_id: String,
    pub merchant_name: String,
}

impl From<&Product> for ProductSnapshot {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            category: p.category.clone(),
            image_url: p.image_url.clone(),
            merchant_id: p.merchant_id.clone(),
            merchant_name: p.merchant_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> Result<Amount, CartError> {
        self.product
            .price
            .checked_mul(Amount::from(self.quantity))
            .ok_or(CartError::AmountOverflow)
    }
}

fn sum_lines(lines: &[CartLine]) -> Result<Amount, CartError> {
    lines.iter().try_fold(0, |acc: Amount, line| {
        acc.checked_add(line.subtotal()?)
            .ok_or(CartError::AmountOverflow)
    })
}

/// Session cart. Holds at most one line per product id, every line has a
/// positive quantity and the total fits in an `Amount`. Carts arriving as
/// JSON are checked against the same rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "CartWire")]
pub struct Cart {
    lines: Vec<CartLine>,
}

#[derive(Deserialize)]
struct CartWire {
    #[serde(default)]
    lines: Vec<CartLine>,
}

impl TryFrom<CartWire> for Cart {
    type Error = CartError;

    fn try_from(wire: CartWire) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for line in &wire.lines {
            if line.quantity == 0 {
                return Err(CartError::InvalidQuantity(0));
            }
            if !seen.insert(line.product.id) {
                return Err(CartError::DuplicateLine(line.product.id));
            }
        }
        sum_lines(&wire.lines)?;
        Ok(Self { lines: wire.lines })
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product`, merging into an existing line.
    /// The cart is left untouched when the result would overflow.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::InvalidQuantity(quantity))?;
            }
            None => lines.push(CartLine {
                product: ProductSnapshot::from(product),
                quantity,
            }),
        }
        sum_lines(&lines)?;
        self.lines = lines;
        Ok(())
    }

    /// Replaces the quantity of a line. Zero removes it; an unknown id is a no-op.
    pub fn set_quantity(&mut self, product_id: Id, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: Id) {
        self.lines.retain(|l| l.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: Id) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    /// Number of distinct lines, as shown on the cart badge.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn total(&self) -> Result<Amount, CartError> {
        sum_lines(&self.lines)
    }

    /// Total the customer pays at checkout. An empty cart owes nothing.
    pub fn total_with_delivery(&self) -> Result<Amount, CartError> {
        if self.is_empty() {
            return Ok(0);
        }
        self.total()?
            .checked_add(DELIVERY_FEE)
            .ok_or(CartError::AmountOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::tests::product;

    #[test]
    fn adding_same_product_twice_merges_quantities() {
        let mut cart = Cart::new();
        let p = product(1, "Riz", "Alimentation", 500);
        cart.add_item(&p, 2).unwrap();
        cart.add_item(&p, 3).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(1).unwrap().quantity, 5);
    }

    #[test]
    fn adding_distinct_products_appends_in_order() {
        let mut cart = Cart::new();
        cart.add_item(&product(2, "Huile", "Alimentation", 1200), 1)
            .unwrap();
        cart.add_item(&product(1, "Riz", "Alimentation", 500), 1)
            .unwrap();
        let ids: Vec<_> = cart.lines().iter().map(|l| l.product.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn zero_quantity_add_is_rejected() {
        let mut cart = Cart::new();
        let err = cart
            .add_item(&product(1, "Riz", "Alimentation", 500), 0)
            .unwrap_err();
        assert_eq!(err, CartError::InvalidQuantity(0));
        assert!(cart.is_empty());
    }

    #[test]
    fn overflowing_quantity_is_rejected() {
        let mut cart = Cart::new();
        let p = product(1, "Riz", "Alimentation", 1);
        cart.add_item(&p, u32::MAX).unwrap();
        assert!(cart.add_item(&p, 1).is_err());
        assert_eq!(cart.line(1).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn lines_snapshot_the_product() {
        let mut cart = Cart::new();
        let mut p = product(1, "Riz", "Alimentation", 500);
        cart.add_item(&p, 1).unwrap();
        p.price = 900;
        p.name = "Riz parfumé".into();
        let line = cart.line(1).unwrap();
        assert_eq!(line.product.price, 500);
        assert_eq!(line.product.name, "Riz");
    }

    #[test]
    fn set_quantity_zero_removes_and_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "Riz", "Alimentation", 500), 2)
            .unwrap();
        cart.add_item(&product(2, "Sel", "Alimentation", 100), 1)
            .unwrap();
        cart.set_quantity(1, 0);
        assert!(cart.line(1).is_none());
        let after_first = cart.clone();
        cart.set_quantity(1, 0);
        assert_eq!(cart, after_first);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn set_quantity_replaces_and_ignores_unknown_ids() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "Riz", "Alimentation", 500), 2)
            .unwrap();
        cart.set_quantity(1, 7);
        cart.set_quantity(99, 3);
        assert_eq!(cart.line(1).unwrap().quantity, 7);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn totals_sum_price_times_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "Riz", "Alimentation", 500), 3)
            .unwrap();
        cart.add_item(&product(2, "Huile", "Alimentation", 1250), 2)
            .unwrap();
        assert_eq!(cart.total(), Ok(4000));
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total_with_delivery(), Ok(4000 + DELIVERY_FEE));

        cart.clear();
        assert_eq!(cart.total(), Ok(0));
        assert_eq!(cart.total_with_delivery(), Ok(0));
    }

    #[test]
    fn overflowing_amount_is_rejected_and_cart_kept() {
        let mut cart = Cart::new();
        let pricey = product(1, "Lingot", "Luxe", i64::MAX - 10);
        cart.add_item(&pricey, 1).unwrap();
        assert_eq!(
            cart.add_item(&pricey, 1),
            Err(CartError::AmountOverflow)
        );
        assert_eq!(
            cart.add_item(&product(2, "Sel", "Alimentation", 100), 1),
            Err(CartError::AmountOverflow)
        );
        assert_eq!(cart.line(1).unwrap().quantity, 1);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_with_delivery(), Err(CartError::AmountOverflow));
    }

    fn line_json(id: Id, price: Amount, quantity: u32) -> serde_json::Value {
        serde_json::json!({
            "product": {
                "id": id,
                "name": "Riz",
                "price": price,
                "category": "Alimentation",
                "merchant_id": "merchant-001",
                "merchant_name": "Boutique Locale"
            },
            "quantity": quantity
        })
    }

    #[test]
    fn json_cart_keeps_the_line_rules() {
        let ok: Cart = serde_json::from_value(serde_json::json!({
            "lines": [line_json(1, 500, 2), line_json(2, 300, 1)]
        }))
        .unwrap();
        assert_eq!(ok.total(), Ok(1300));
        let back: Cart = serde_json::from_str(&serde_json::to_string(&ok).unwrap()).unwrap();
        assert_eq!(back, ok);

        let zero = serde_json::from_value::<Cart>(serde_json::json!({
            "lines": [line_json(1, 500, 0)]
        }));
        assert!(zero.unwrap_err().to_string().contains("invalid quantity"));

        let dup = serde_json::from_value::<Cart>(serde_json::json!({
            "lines": [line_json(1, 500, 2), line_json(1, 500, 3)]
        }));
        assert!(dup.unwrap_err().to_string().contains("more than once"));

        let huge = serde_json::from_value::<Cart>(serde_json::json!({
            "lines": [line_json(1, i64::MAX, 2)]
        }));
        assert!(huge.unwrap_err().to_string().contains("overflow"));

        let empty: Cart = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
