use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::{Amount, Id};
use crate::ports::repository::Record;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub price: Amount,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub merchant_id: String,
    pub merchant_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Product as entered on the merchant form, before it has an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Amount,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,
    pub merchant_id: String,
    pub merchant_name: String,
}

fn in_stock_default() -> bool {
    true
}

/// Highest unit price the catalog accepts. Any `u32` quantity of a product at
/// this price still fits in an `Amount`.
pub const MAX_PRICE: Amount = 1_000_000_000;

fn check_price(price: Amount) -> Result<(), DomainError> {
    if !(0..=MAX_PRICE).contains(&price) {
        return Err(DomainError::Validation(format!(
            "product price must be between 0 and {MAX_PRICE}"
        )));
    }
    Ok(())
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("product name empty".into()));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::Validation("product category empty".into()));
        }
        check_price(self.price)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Amount>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err(DomainError::Validation("product name empty".into()));
        }
        if matches!(&self.category, Some(c) if c.trim().is_empty()) {
            return Err(DomainError::Validation("product category empty".into()));
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        Ok(())
    }
}

impl Record for Product {
    type Draft = NewProduct;
    type Patch = ProductPatch;

    const KIND: &'static str = "product";

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            image_url: draft.image_url,
            in_stock: draft.in_stock,
            merchant_id: draft.merchant_id,
            merchant_name: draft.merchant_name,
            created_at: now,
            updated_at: None,
        }
    }

    fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
        self.updated_at = Some(now);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: Id, name: &str, category: &str, price: Amount) -> Product {
        Product::from_draft(
            id,
            NewProduct {
                name: name.into(),
                description: format!("{name} de qualité"),
                price,
                category: category.into(),
                image_url: None,
                in_stock: true,
                merchant_id: "merchant-001".into(),
                merchant_name: "Boutique Locale".into(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn validation_rejects_blank_fields_and_out_of_range_price() {
        let mut draft = NewProduct {
            name: "Riz".into(),
            description: String::new(),
            price: 500,
            category: "Alimentation".into(),
            image_url: None,
            in_stock: true,
            merchant_id: "m".into(),
            merchant_name: "M".into(),
        };
        assert!(draft.validate().is_ok());

        draft.price = -1;
        assert!(draft.validate().is_err());

        draft.price = MAX_PRICE;
        assert!(draft.validate().is_ok());
        draft.price = i64::MAX;
        assert!(draft.validate().is_err());
        let patch = ProductPatch {
            price: Some(MAX_PRICE + 1),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        draft.price = 0;
        draft.name = "  ".into();
        assert!(draft.validate().is_err());

        draft.name = "Riz".into();
        draft.category = String::new();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn patch_overwrites_present_fields_only() {
        let mut p = product(1, "Savon", "Hygiène", 250);
        let now = Utc::now();
        p.apply_patch(
            ProductPatch {
                price: Some(300),
                in_stock: Some(false),
                ..Default::default()
            },
            now,
        );
        assert_eq!(p.price, 300);
        assert!(!p.in_stock);
        assert_eq!(p.name, "Savon");
        assert_eq!(p.updated_at, Some(now));
    }

    #[test]
    fn new_product_defaults_to_in_stock() {
        let draft: NewProduct = serde_json::from_str(
            r#"{"name":"Pain","price":150,"category":"Boulangerie","merchant_id":"m","merchant_name":"M"}"#,
        )
        .unwrap();
        assert!(draft.in_stock);
        assert!(draft.description.is_empty());
    }
}
