use async_trait::async_trait;
use std::path::PathBuf;
use storefront_types::domain::chat::{Conversation, Message};
use storefront_types::domain::order::Order;
use storefront_types::domain::product::Product;
use storefront_types::domain::Id;
use storefront_types::ports::repository::{Record, RepoError, Repository};

pub mod latency;
pub mod memory;
pub mod seed;

pub use latency::{Latency, LatencyProfile};
pub use memory::InMemoryRepo;
pub use seed::{SeedData, SeedError};

/// The storefront store: one in-memory collection per record kind.
/// Built once per process (or per test) and shared by cloning the handle.
#[derive(Clone)]
pub struct Repo {
    products: InMemoryRepo<Product>,
    orders: InMemoryRepo<Order>,
    conversations: InMemoryRepo<Conversation>,
    messages: InMemoryRepo<Message>,
}

#[derive(Debug, Clone)]
pub struct RepoOptions {
    pub latency: LatencyProfile,
    /// Directory holding the four fixture files; bundled fixtures otherwise.
    pub fixtures_dir: Option<PathBuf>,
    /// Start with empty collections when false.
    pub seed: bool,
}

impl Default for RepoOptions {
    fn default() -> Self {
        Self {
            latency: LatencyProfile::default(),
            fixtures_dir: None,
            seed: true,
        }
    }
}

pub async fn build_repo(options: &RepoOptions) -> anyhow::Result<Repo> {
    Repo::build_repo(options).await
}

impl Repo {
    pub fn new(seed: SeedData, latency: LatencyProfile) -> Self {
        Self {
            products: InMemoryRepo::seeded(seed.products, latency.products),
            orders: InMemoryRepo::seeded(seed.orders, latency.orders),
            conversations: InMemoryRepo::seeded(seed.conversations, latency.conversations),
            messages: InMemoryRepo::seeded(seed.messages, latency.messages),
        }
    }

    /// Empty store without artificial latency.
    pub fn empty() -> Self {
        Self::new(SeedData::default(), LatencyProfile::none())
    }

    pub async fn build_repo(options: &RepoOptions) -> anyhow::Result<Self> {
        let seed = match (&options.fixtures_dir, options.seed) {
            (_, false) => SeedData::default(),
            (Some(dir), true) => SeedData::from_dir(dir).await?,
            (None, true) => SeedData::bundled()?,
        };
        Ok(Self::new(seed, options.latency))
    }

    pub fn products(&self) -> &InMemoryRepo<Product> {
        &self.products
    }

    pub fn orders(&self) -> &InMemoryRepo<Order> {
        &self.orders
    }

    pub fn conversations(&self) -> &InMemoryRepo<Conversation> {
        &self.conversations
    }

    pub fn messages(&self) -> &InMemoryRepo<Message> {
        &self.messages
    }
}

macro_rules! delegate_repository {
    ($record:ty, $field:ident) => {
        #[async_trait]
        impl Repository<$record> for Repo {
            async fn get_all(&self) -> Result<Vec<$record>, RepoError> {
                self.$field.get_all().await
            }

            async fn get_by_id(&self, id: Id) -> Result<$record, RepoError> {
                self.$field.get_by_id(id).await
            }

            async fn create(
                &self,
                draft: <$record as Record>::Draft,
            ) -> Result<$record, RepoError> {
                self.$field.create(draft).await
            }

            async fn update(
                &self,
                id: Id,
                patch: <$record as Record>::Patch,
            ) -> Result<$record, RepoError> {
                self.$field.update(id, patch).await
            }

            async fn delete(&self, id: Id) -> Result<$record, RepoError> {
                self.$field.delete(id).await
            }
        }
    };
}

delegate_repository!(Product, products);
delegate_repository!(Order, orders);
delegate_repository!(Conversation, conversations);
delegate_repository!(Message, messages);
