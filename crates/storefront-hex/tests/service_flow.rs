use storefront_hex::application::Storefront;
use storefront_hex::errors::AppError;
use storefront_repo::{LatencyProfile, Repo, SeedData};
use storefront_types::domain::cart::{Cart, DELIVERY_FEE};
use storefront_types::domain::catalog::CategoryFilter;
use storefront_types::domain::chat::conversation_title;
use storefront_types::domain::order::{CheckoutDetails, OrderStatus, Party, PaymentMethod};
use storefront_types::domain::order_view::StatusFilter;
use storefront_types::domain::role::Role;

fn seeded() -> Storefront<Repo> {
    let repo = Repo::new(SeedData::bundled().unwrap(), LatencyProfile::none());
    Storefront::new(repo)
}

// Browse, fill the cart, check out, deliver and chat against the in-memory adapter.
#[tokio::test]
async fn browse_checkout_deliver_and_chat() {
    let store = seeded();

    let food = store
        .catalog
        .list_products("", &CategoryFilter::from("Alimentation"))
        .await
        .unwrap();
    assert_eq!(food.len(), 2);

    let mut cart = Cart::new();
    for p in &food {
        store.catalog.add_to_cart(&mut cart, p.id, 1).await.unwrap();
    }
    store.catalog.add_to_cart(&mut cart, food[0].id, 1).await.unwrap();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 3);
    let expected = 2 * food[0].price + food[1].price + DELIVERY_FEE;
    assert_eq!(cart.total_with_delivery(), Ok(expected));

    let customer = Party::new("customer-009", "Fatou");
    let order = store
        .orders
        .checkout(
            &mut cart,
            CheckoutDetails {
                delivery_address: "Ouaga 2000".into(),
                payment_method: PaymentMethod::MobileMoney,
                phone_number: Some("70 00 00 00".into()),
                notes: None,
            },
            customer.clone(),
        )
        .await
        .unwrap();
    assert!(cart.is_empty());
    assert_eq!(order.id, 5);
    assert_eq!(order.total_amount, expected);
    assert_eq!(order.merchant_id, "merchant-001");

    let driver = Party::new("driver-002", "Issa");
    for next in [
        OrderStatus::Accepted,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ] {
        store
            .orders
            .transition(order.id, next, Role::Driver, &driver)
            .await
            .unwrap();
    }
    let delivered = store
        .orders
        .list_orders(StatusFilter::Only(OrderStatus::Delivered))
        .await
        .unwrap();
    assert_eq!(delivered.len(), 2);

    let done = store.orders.get_order(order.id).await.unwrap();
    let conv = store.chat.open_for_order(&done).await.unwrap();
    assert_eq!(
        conversation_title(&conv, Role::Customer),
        "Commande #0005 - Issa"
    );
    store
        .chat
        .send_message(conv.id, customer, "Merci !")
        .await
        .unwrap();
    let msgs = store.chat.messages(conv.id).await.unwrap();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].sender_name, "Fatou");
}

#[tokio::test]
async fn out_of_stock_products_stay_out_of_the_cart() {
    let store = seeded();
    let mut cart = Cart::new();
    let res = store.catalog.add_to_cart(&mut cart, 4, 1).await;
    assert!(matches!(res, Err(AppError::BadRequest(_))));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn customer_cannot_cancel_once_accepted() {
    let store = seeded();
    let customer = Party::new("customer-002", "Awa");
    let res = store
        .orders
        .transition(2, OrderStatus::Cancelled, Role::Customer, &customer)
        .await;
    assert!(matches!(res, Err(AppError::Conflict(_))));

    let merchant = Party::new("merchant-002", "Couture Wend");
    let cancelled = store
        .orders
        .transition(2, OrderStatus::Cancelled, Role::Merchant, &merchant)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}
