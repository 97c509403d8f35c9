use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use storefront_types::domain::chat::{Conversation, Message};
use storefront_types::domain::order::Order;
use storefront_types::domain::product::Product;
use storefront_types::domain::Id;
use storefront_types::ports::repository::Record;

pub const PRODUCTS_FILE: &str = "products.json";
pub const ORDERS_FILE: &str = "orders.json";
pub const CONVERSATIONS_FILE: &str = "conversations.json";
pub const MESSAGES_FILE: &str = "messages.json";

#[derive(thiserror::Error, Debug)]
pub enum SeedError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing {file}: {source}")]
    Parse {
        file: String,
        source: serde_json::Error,
    },

    #[error("duplicate {kind} id {id} in seed data")]
    DuplicateId { kind: &'static str, id: Id },
}

/// Initial contents of the four collections, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub conversations: Vec<Conversation>,
    pub messages: Vec<Message>,
}

fn parse<T: DeserializeOwned + Record>(file: &str, raw: &str) -> Result<Vec<T>, SeedError> {
    let records: Vec<T> = serde_json::from_str(raw).map_err(|source| SeedError::Parse {
        file: file.to_string(),
        source,
    })?;
    let mut seen = HashSet::new();
    for r in &records {
        if !seen.insert(r.id()) {
            return Err(SeedError::DuplicateId {
                kind: T::KIND,
                id: r.id(),
            });
        }
    }
    Ok(records)
}

async fn read(dir: &Path, file: &str) -> Result<String, SeedError> {
    let path = dir.join(file);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| SeedError::Io { path, source })
}

impl SeedData {
    /// The fixtures compiled into the crate.
    pub fn bundled() -> Result<Self, SeedError> {
        Ok(Self {
            products: parse(PRODUCTS_FILE, include_str!("../fixtures/products.json"))?,
            orders: parse(ORDERS_FILE, include_str!("../fixtures/orders.json"))?,
            conversations: parse(
                CONVERSATIONS_FILE,
                include_str!("../fixtures/conversations.json"),
            )?,
            messages: parse(MESSAGES_FILE, include_str!("../fixtures/messages.json"))?,
        })
    }

    /// Loads the four fixture files from `dir`.
    pub async fn from_dir(dir: &Path) -> Result<Self, SeedError> {
        Ok(Self {
            products: parse(PRODUCTS_FILE, &read(dir, PRODUCTS_FILE).await?)?,
            orders: parse(ORDERS_FILE, &read(dir, ORDERS_FILE).await?)?,
            conversations: parse(CONVERSATIONS_FILE, &read(dir, CONVERSATIONS_FILE).await?)?,
            messages: parse(MESSAGES_FILE, &read(dir, MESSAGES_FILE).await?)?,
        })
    }
}
