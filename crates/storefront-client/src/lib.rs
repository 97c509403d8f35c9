use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storefront_types::domain::cart::Cart;
use storefront_types::domain::chat::{Conversation, Message};
use storefront_types::domain::order::{CheckoutDetails, Order, OrderStatus, Party};
use storefront_types::domain::order_view::{OrderView, StatusCounts};
use storefront_types::domain::product::{NewProduct, Product, ProductPatch};
use storefront_types::domain::role::Role;
use storefront_types::domain::Id;

#[derive(Clone)]
pub struct StorefrontClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

/// Typed client for the storefront HTTP API.
#[derive(Clone)]
pub struct StorefrontClient {
    base: Url,
    client: reqwest::Client,
}

impl StorefrontClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<StorefrontClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(StorefrontClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let mut req = self.client.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        let res = req.send().await?.error_for_status()?;
        Ok(res.json().await?)
    }

    /// Catalog listing; an empty `search` or a `"all"` category filters nothing.
    pub async fn list_products(&self, search: &str, category: &str) -> anyhow::Result<Vec<Product>> {
        self.get_json("products", &[("search", search), ("category", category)])
            .await
    }

    pub async fn categories(&self) -> anyhow::Result<Vec<String>> {
        self.get_json("products/categories", &[]).await
    }

    pub async fn get_product(&self, id: Id) -> anyhow::Result<Product> {
        self.get_json(&format!("products/{id}"), &[]).await
    }

    pub async fn create_product(&self, draft: &NewProduct) -> anyhow::Result<Product> {
        let res = self
            .client
            .post(self.url("products")?)
            .json(draft)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn update_product(&self, id: Id, patch: &ProductPatch) -> anyhow::Result<Product> {
        let res = self
            .client
            .patch(self.url(&format!("products/{id}"))?)
            .json(patch)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn delete_product(&self, id: Id) -> anyhow::Result<()> {
        self.client
            .delete(self.url(&format!("products/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Returns `cart` with `quantity` more of the product; stock is checked
    /// server-side.
    pub async fn add_to_cart(
        &self,
        cart: &Cart,
        product_id: Id,
        quantity: u32,
    ) -> anyhow::Result<Cart> {
        let res = self
            .client
            .post(self.url("cart/items")?)
            .json(&AddToCartRequest {
                cart: cart.clone(),
                product_id,
                quantity,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_orders(&self, status: Option<OrderStatus>) -> anyhow::Result<Vec<Order>> {
        match status {
            Some(s) => self.get_json("orders", &[("status", s.as_str())]).await,
            None => self.get_json("orders", &[]).await,
        }
    }

    pub async fn status_counts(&self) -> anyhow::Result<StatusCounts> {
        self.get_json("orders/counts", &[]).await
    }

    pub async fn checkout(&self, req: &CheckoutRequest) -> anyhow::Result<CheckoutResponse> {
        let res = self
            .client
            .post(self.url("orders/checkout")?)
            .json(req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_order(&self, id: Id) -> anyhow::Result<Order> {
        self.get_json(&format!("orders/{id}"), &[]).await
    }

    pub async fn view_order(&self, id: Id, role: Role) -> anyhow::Result<OrderView> {
        self.get_json(&format!("orders/{id}/view"), &[("role", role.as_str())])
            .await
    }

    pub async fn transition(
        &self,
        id: Id,
        status: OrderStatus,
        role: Role,
        actor: &Party,
    ) -> anyhow::Result<Order> {
        let res = self
            .client
            .patch(self.url(&format!("orders/{id}/status"))?)
            .json(&TransitionRequest {
                status,
                role,
                actor: actor.clone(),
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn delete_order(&self, id: Id) -> anyhow::Result<()> {
        self.client
            .delete(self.url(&format!("orders/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn conversations(&self, role: Role) -> anyhow::Result<Vec<ConversationSummary>> {
        self.get_json("conversations", &[("role", role.as_str())])
            .await
    }

    pub async fn open_conversation(&self, order_id: Id) -> anyhow::Result<Conversation> {
        let res = self
            .client
            .post(self.url("conversations")?)
            .json(&OpenConversationRequest { order_id })
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn messages(&self, conversation_id: Id) -> anyhow::Result<Vec<Message>> {
        self.get_json(&format!("conversations/{conversation_id}/messages"), &[])
            .await
    }

    pub async fn send_message(
        &self,
        conversation_id: Id,
        sender: &Party,
        content: &str,
    ) -> anyhow::Result<Message> {
        let res = self
            .client
            .post(self.url(&format!("conversations/{conversation_id}/messages"))?)
            .json(&SendMessageRequest {
                sender: sender.clone(),
                content: content.to_string(),
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

impl StorefrontClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<StorefrontClient> {
        if let Some(client) = self.client {
            return Ok(StorefrontClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(StorefrontClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub cart: Cart,
    pub details: CheckoutDetails,
    pub customer: Party,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckoutResponse {
    pub order: Order,
    /// The cart after checkout, empty on success.
    pub cart: Cart,
}

/// A conversation with the header shown for the requested role.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct AddToCartRequest {
    cart: Cart,
    product_id: Id,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct TransitionRequest {
    status: OrderStatus,
    role: Role,
    actor: Party,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct OpenConversationRequest {
    order_id: Id,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct SendMessageRequest {
    sender: Party,
    content: String,
}
