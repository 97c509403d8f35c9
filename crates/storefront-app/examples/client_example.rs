///  To run :
///  cargo r --example client_example
use storefront_client::{CheckoutRequest, StorefrontClient};
use storefront_hex::application::Storefront;
use storefront_hex::inbound::http::{HttpServer, HttpServerConfig};
use storefront_repo::{build_repo, LatencyProfile, RepoOptions};
use storefront_types::domain::cart::Cart;
use storefront_types::domain::order::{CheckoutDetails, OrderStatus, Party, PaymentMethod};
use storefront_types::domain::role::Role;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start server on ephemeral port with the bundled fixtures.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    let repo = build_repo(&RepoOptions {
        latency: LatencyProfile::none(),
        ..Default::default()
    })
    .await?;
    let server = HttpServer::new(
        Storefront::new(repo),
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = StorefrontClient::new(&addr)?;
    let products = client.list_products("", "all").await?;
    println!("{} products in the catalog", products.len());

    let mut cart = Cart::new();
    for p in products.iter().filter(|p| p.in_stock).take(2) {
        cart = client.add_to_cart(&cart, p.id, 1).await?;
    }
    println!("Cart total with delivery: {} FCFA", cart.total_with_delivery()?);

    let customer = Party::new("customer-100", "Exemple");
    let placed = client
        .checkout(&CheckoutRequest {
            cart,
            details: CheckoutDetails {
                delivery_address: "Ouaga 2000".into(),
                payment_method: PaymentMethod::Cash,
                phone_number: None,
                notes: None,
            },
            customer: customer.clone(),
        })
        .await?;
    let id = placed.order.id;
    println!("Placed order {}", placed.order.display_number());

    let driver = Party::new("driver-100", "Livreur Exemple");
    for next in [
        OrderStatus::Accepted,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ] {
        let updated = client.transition(id, next, Role::Driver, &driver).await?;
        println!("Order {} is now {}", id, updated.status);
    }

    let view = client.view_order(id, Role::Customer).await?;
    println!(
        "{} {} ({})",
        view.number, view.status_display.label, view.status_display.icon
    );

    let conversation = client.open_conversation(id).await?;
    client
        .send_message(conversation.id, &customer, "Bien reçu, merci !")
        .await?;
    for m in client.messages(conversation.id).await? {
        println!("[{}] {}: {}", m.timestamp, m.sender_name, m.content);
    }

    handle.abort();
    Ok(())
}
