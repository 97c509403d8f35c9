use storefront_client::{CheckoutRequest, StorefrontClient};
use storefront_hex::application::Storefront;
use storefront_hex::config::Config;
use storefront_hex::inbound::http::{HttpServer, HttpServerConfig};
use storefront_repo::{build_repo, LatencyProfile, Repo, RepoOptions};
use storefront_types::domain::cart::Cart;
use storefront_types::domain::order::{CheckoutDetails, OrderStatus, Party, PaymentMethod};
use storefront_types::domain::product::Product;
use storefront_types::domain::role::Role;
use storefront_types::ports::repository::Repository;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::test]
async fn builds_repo_from_a_fixtures_dir_in_config() {
    let dir = tempfile::tempdir().unwrap();
    for file in [
        "products.json",
        "orders.json",
        "conversations.json",
        "messages.json",
    ] {
        std::fs::write(dir.path().join(file), "[]").unwrap();
    }
    let path = dir.path().display().to_string();
    let config = Config::from_lookup(|key| match key {
        "STOREFRONT_FIXTURES_DIR" => Some(path.clone()),
        "STOREFRONT_LATENCY_MS" => Some("0".into()),
        _ => None,
    })
    .unwrap();

    let repo: Repo = build_repo(&RepoOptions {
        latency: LatencyProfile::none(),
        fixtures_dir: config.fixtures_dir.clone(),
        seed: config.seed,
    })
    .await
    .expect("build repo");
    // basic sanity: empty fixtures give empty collections
    let list: Vec<Product> = Repository::<Product>::get_all(&repo).await.expect("list");
    assert!(list.is_empty());
}

#[tokio::test]
async fn client_drives_a_running_server() {
    let port = find_free_port();
    let repo = build_repo(&RepoOptions {
        latency: LatencyProfile::none(),
        ..Default::default()
    })
    .await
    .unwrap();
    let server = HttpServer::new(
        Storefront::new(repo),
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await
    .unwrap();
    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = StorefrontClient::new(&format!("http://127.0.0.1:{port}/")).unwrap();
    let categories = client.categories().await.unwrap();
    assert!(categories.contains(&"Mode".to_string()));

    let cart = client.add_to_cart(&Cart::new(), 6, 2).await.unwrap();
    let placed = client
        .checkout(&CheckoutRequest {
            cart,
            details: CheckoutDetails {
                delivery_address: "Dassasgho".into(),
                payment_method: PaymentMethod::Card,
                phone_number: Some("76 11 22 33".into()),
                notes: Some("Sonner deux fois".into()),
            },
            customer: Party::new("customer-004", "Salif"),
        })
        .await
        .unwrap();
    assert_eq!(placed.order.status, OrderStatus::Placed);

    let cancelled = client
        .transition(
            placed.order.id,
            OrderStatus::Cancelled,
            Role::Customer,
            &Party::new("customer-004", "Salif"),
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let counts = client.status_counts().await.unwrap();
    assert_eq!(counts.get(OrderStatus::Cancelled), 2);

    handle.abort();
}
