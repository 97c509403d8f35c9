pub mod catalog_service;
pub mod chat_service;
pub mod order_service;

use storefront_types::domain::chat::{Conversation, Message};
use storefront_types::domain::order::Order;
use storefront_types::domain::product::Product;
use storefront_types::ports::repository::Repository;

use catalog_service::CatalogService;
use chat_service::ChatService;
use order_service::OrderService;

/// A store serving every collection the storefront needs.
pub trait StorefrontRepository:
    Repository<Product> + Repository<Order> + Repository<Conversation> + Repository<Message> + Clone
{
}

impl<T> StorefrontRepository for T where
    T: Repository<Product>
        + Repository<Order>
        + Repository<Conversation>
        + Repository<Message>
        + Clone
{
}

/// The three services sharing one store handle.
pub struct Storefront<R: StorefrontRepository> {
    pub catalog: CatalogService<R>,
    pub orders: OrderService<R>,
    pub chat: ChatService<R>,
}

impl<R: StorefrontRepository> Storefront<R> {
    pub fn new(repo: R) -> Self {
        Self {
            catalog: CatalogService::new(repo.clone()),
            orders: OrderService::new(repo.clone()),
            chat: ChatService::new(repo),
        }
    }
}
