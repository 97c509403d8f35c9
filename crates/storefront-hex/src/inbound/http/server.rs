use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    serve, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::{Storefront, StorefrontRepository};
use crate::errors::AppError;
use storefront_types::domain::cart::Cart;
use storefront_types::domain::catalog::CategoryFilter;
use storefront_types::domain::chat::{conversation_title, Conversation, Message};
use storefront_types::domain::order::{CheckoutDetails, Order, OrderStatus, Party};
use storefront_types::domain::order_view::{OrderView, StatusCounts, StatusFilter};
use storefront_types::domain::product::{NewProduct, Product, ProductPatch};
use storefront_types::domain::role::Role;
use storefront_types::domain::Id;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: StorefrontRepository,
{
    pub storefront: Arc<Storefront<R>>,
    pub config: HttpServerConfig,
}

type Shared<R> = State<Arc<Storefront<R>>>;

#[derive(Deserialize, Default)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Deserialize)]
pub struct AddToCartRequest {
    #[serde(default)]
    pub cart: Cart,
    pub product_id: Id,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

#[derive(Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct RoleQuery {
    #[serde(default)]
    pub role: Role,
}

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub cart: Cart,
    pub details: CheckoutDetails,
    pub customer: Party,
}

#[derive(Serialize)]
struct CheckoutResponse {
    order: Order,
    cart: Cart,
}

#[derive(Deserialize)]
pub struct TransitionRequest {
    pub status: OrderStatus,
    pub role: Role,
    pub actor: Party,
}

#[derive(Deserialize)]
pub struct OpenConversationRequest {
    pub order_id: Id,
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub sender: Party,
    pub content: String,
}

#[derive(Serialize)]
struct ConversationView {
    #[serde(flatten)]
    conversation: Conversation,
    title: String,
}

impl<R> HttpServer<R>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    pub async fn new(storefront: Storefront<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            storefront: Arc::new(storefront),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route(
                "/products",
                get(list_products::<R>).post(create_product::<R>),
            )
            .route("/products/categories", get(categories::<R>))
            .route(
                "/products/{id}",
                get(get_product::<R>)
                    .patch(update_product::<R>)
                    .delete(delete_product::<R>),
            )
            .route("/cart/items", post(add_to_cart::<R>))
            .route("/orders", get(list_orders::<R>))
            .route("/orders/counts", get(status_counts::<R>))
            .route("/orders/checkout", post(checkout::<R>))
            .route(
                "/orders/{id}",
                get(get_order::<R>).delete(delete_order::<R>),
            )
            .route("/orders/{id}/view", get(view_order::<R>))
            .route("/orders/{id}/status", patch(transition::<R>))
            .route(
                "/conversations",
                get(list_conversations::<R>).post(open_conversation::<R>),
            )
            .route(
                "/conversations/{id}/messages",
                get(list_messages::<R>).post(send_message::<R>),
            )
            .layer(trace_layer)
            .layer(CorsLayer::permissive())
            .with_state(self.storefront.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<Id, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id {raw}")))
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn list_products<R>(
    State(storefront): Shared<R>,
    Query(q): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let category = CategoryFilter::from(q.category.as_str());
    let list = storefront
        .catalog
        .list_products(&q.search, &category)
        .await?;
    Ok(Json(list))
}

async fn categories<R>(State(storefront): Shared<R>) -> Result<Json<Vec<String>>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    Ok(Json(storefront.catalog.categories().await?))
}

async fn get_product<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let product = storefront.catalog.get_product(parse_id(&id)?).await?;
    Ok(Json(product))
}

async fn create_product<R>(
    State(storefront): Shared<R>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    let product = storefront.catalog.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    let product = storefront
        .catalog
        .update_product(parse_id(&id)?, payload)
        .await?;
    Ok(Json(product))
}

async fn delete_product<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    storefront.catalog.delete_product(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_to_cart<R>(
    State(storefront): Shared<R>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<Cart>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    let mut cart = payload.cart;
    storefront
        .catalog
        .add_to_cart(&mut cart, payload.product_id, payload.quantity)
        .await?;
    Ok(Json(cart))
}

async fn list_orders<R>(
    State(storefront): Shared<R>,
    Query(q): Query<OrdersQuery>,
) -> Result<Json<Vec<Order>>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let filter = match q.status.as_deref() {
        None => StatusFilter::All,
        Some(raw) => raw.parse::<StatusFilter>()?,
    };
    Ok(Json(storefront.orders.list_orders(filter).await?))
}

async fn status_counts<R>(State(storefront): Shared<R>) -> Result<Json<StatusCounts>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    Ok(Json(storefront.orders.status_counts().await?))
}

async fn checkout<R>(
    State(storefront): Shared<R>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    let mut cart = payload.cart;
    let order = storefront
        .orders
        .checkout(&mut cart, payload.details, payload.customer)
        .await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse { order, cart })))
}

async fn get_order<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    Ok(Json(storefront.orders.get_order(parse_id(&id)?).await?))
}

async fn view_order<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
    Query(q): Query<RoleQuery>,
) -> Result<Json<OrderView>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let view = storefront.orders.view_order(parse_id(&id)?, q.role).await?;
    Ok(Json(view))
}

async fn transition<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<Order>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    let updated = storefront
        .orders
        .transition(parse_id(&id)?, payload.status, payload.role, &payload.actor)
        .await?;
    Ok(Json(updated))
}

async fn delete_order<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    storefront.orders.delete_order(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_conversations<R>(
    State(storefront): Shared<R>,
    Query(q): Query<RoleQuery>,
) -> Result<Json<Vec<ConversationView>>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let views = storefront
        .chat
        .conversations()
        .await?
        .into_iter()
        .map(|conversation| ConversationView {
            title: conversation_title(&conversation, q.role),
            conversation,
        })
        .collect();
    Ok(Json(views))
}

async fn open_conversation<R>(
    State(storefront): Shared<R>,
    payload: Result<Json<OpenConversationRequest>, JsonRejection>,
) -> Result<Json<Conversation>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    let order = storefront.orders.get_order(payload.order_id).await?;
    Ok(Json(storefront.chat.open_for_order(&order).await?))
}

async fn list_messages<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    Ok(Json(storefront.chat.messages(parse_id(&id)?).await?))
}

async fn send_message<R>(
    State(storefront): Shared<R>,
    Path(id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), AppError>
where
    R: StorefrontRepository + Send + Sync + 'static,
{
    let Json(payload) = payload?;
    let message = storefront
        .chat
        .send_message(parse_id(&id)?, payload.sender, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
